//! Single-feature CART decision tree used by the relevance scores

/// What the tree predicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeTask {
    /// Leaf value is the mean target; splits minimize squared error
    Regression,
    /// Targets are class codes `0..n_classes`; leaf value is the majority
    /// class, splits minimize Gini impurity
    Classification { n_classes: usize },
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted tree over one numeric feature
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit a tree on `(x, y)` pairs.
    ///
    /// Without `max_depth` the tree grows until every leaf is pure or holds a
    /// single distinct feature value.
    pub fn fit(xs: &[f64], ys: &[f64], task: TreeTask, max_depth: Option<usize>) -> Self {
        let mut pairs: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut tree = DecisionTree { nodes: Vec::new() };
        if pairs.is_empty() {
            tree.nodes.push(Node::Leaf(0.0));
        } else {
            tree.grow(&pairs, task, 0, max_depth);
        }
        tree
    }

    pub fn predict(&self, x: f64) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    threshold,
                    left,
                    right,
                } => idx = if x <= *threshold { *left } else { *right },
            }
        }
    }

    pub fn predict_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Number of leaves in the fitted tree
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf(_)))
            .count()
    }

    fn grow(
        &mut self,
        sorted_pairs: &[(f64, f64)],
        task: TreeTask,
        depth: usize,
        max_depth: Option<usize>,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf(leaf_value(sorted_pairs, task)));

        if max_depth.is_some_and(|max| depth >= max) || is_pure(sorted_pairs) {
            return idx;
        }

        let split = match task {
            TreeTask::Regression => find_best_regression_split(sorted_pairs),
            TreeTask::Classification { n_classes } => {
                find_best_classification_split(sorted_pairs, n_classes)
            }
        };

        if let Some(split_idx) = split {
            let threshold = (sorted_pairs[split_idx - 1].0 + sorted_pairs[split_idx].0) / 2.0;
            let (left_pairs, right_pairs) = sorted_pairs.split_at(split_idx);
            let left = self.grow(left_pairs, task, depth + 1, max_depth);
            let right = self.grow(right_pairs, task, depth + 1, max_depth);
            self.nodes[idx] = Node::Split {
                threshold,
                left,
                right,
            };
        }

        idx
    }
}

fn is_pure(pairs: &[(f64, f64)]) -> bool {
    let first = pairs[0].1;
    pairs.iter().all(|(_, y)| *y == first)
}

fn leaf_value(pairs: &[(f64, f64)], task: TreeTask) -> f64 {
    match task {
        TreeTask::Regression => pairs.iter().map(|(_, y)| y).sum::<f64>() / pairs.len() as f64,
        TreeTask::Classification { n_classes } => {
            let mut counts = vec![0usize; n_classes.max(1)];
            for (_, y) in pairs {
                counts[*y as usize] += 1;
            }
            // first maximum wins so ties resolve to the lowest class code
            let mut best = 0;
            for (class, &count) in counts.iter().enumerate() {
                if count > counts[best] {
                    best = class;
                }
            }
            best as f64
        }
    }
}

/// Split index minimizing total squared error; the right side starts at the index
fn find_best_regression_split(sorted_pairs: &[(f64, f64)]) -> Option<usize> {
    let n = sorted_pairs.len();
    let total_sum: f64 = sorted_pairs.iter().map(|(_, y)| y).sum();
    let total_sq: f64 = sorted_pairs.iter().map(|(_, y)| y * y).sum();

    let mut best: Option<(usize, f64)> = None;
    let mut left_sum = 0.0;
    let mut left_sq = 0.0;

    for i in 0..n - 1 {
        let (x, y) = sorted_pairs[i];
        left_sum += y;
        left_sq += y * y;

        // Skip if this value equals the next (avoid splitting within same value)
        if x == sorted_pairs[i + 1].0 {
            continue;
        }

        let left_n = (i + 1) as f64;
        let right_n = (n - i - 1) as f64;
        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;

        let sse = (left_sq - left_sum * left_sum / left_n) + (right_sq - right_sum * right_sum / right_n);

        if best.map_or(true, |(_, b)| sse < b) {
            best = Some((i + 1, sse));
        }
    }

    best.map(|(idx, _)| idx)
}

/// Split index minimizing size-weighted Gini impurity of the children
fn find_best_classification_split(sorted_pairs: &[(f64, f64)], n_classes: usize) -> Option<usize> {
    let n = sorted_pairs.len();
    let mut total = vec![0.0f64; n_classes.max(1)];
    for (_, y) in sorted_pairs {
        total[*y as usize] += 1.0;
    }

    let mut left = vec![0.0f64; total.len()];
    let mut best: Option<(usize, f64)> = None;

    for i in 0..n - 1 {
        let (x, y) = sorted_pairs[i];
        left[y as usize] += 1.0;

        if x == sorted_pairs[i + 1].0 {
            continue;
        }

        let left_n = (i + 1) as f64;
        let right_n = (n - i - 1) as f64;

        let left_sq: f64 = left.iter().map(|c| c * c).sum();
        let right_sq: f64 = total
            .iter()
            .zip(left.iter())
            .map(|(t, l)| (t - l) * (t - l))
            .sum();

        // n_l * gini_l + n_r * gini_r
        let weighted = (left_n - left_sq / left_n) + (right_n - right_sq / right_n);

        if best.map_or(true, |(_, b)| weighted < b) {
            best = Some((i + 1, weighted));
        }
    }

    best.map(|(idx, _)| idx)
}
