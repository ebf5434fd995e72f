//! Predictive power score (PPS) matrix
//!
//! For an ordered pair (predictor → target) a single-feature decision tree is
//! cross-validated and its error compared to a naive baseline:
//! - numeric target: mean absolute error vs always predicting the median
//! - categorical target: weighted F1 vs the better of "most common class"
//!   and "shuffled target"
//!
//! The score is 0 when the model is no better than the baseline and 1 for a
//! perfect prediction. Unlike correlation it is asymmetric.

use std::collections::HashSet;

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use super::dataset::{Column, ColumnData, Dataset};
use super::error::AnalysisError;
use super::matrix::{rank_against_target, RankedFeatureList, ScoreMatrix};
use super::tree::{DecisionTree, TreeTask};

/// Default row sample used per pair
pub const DEFAULT_SAMPLE: usize = 5000;

/// Default number of cross-validation folds
pub const DEFAULT_FOLDS: usize = 4;

/// Default seed for sampling, fold assignment and the shuffled baseline
pub const DEFAULT_SEED: u64 = 123;

/// Settings for relevance scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelevanceConfig {
    /// Maximum rows used per pair; larger datasets are down-sampled
    pub sample: usize,
    /// Cross-validation folds
    pub folds: usize,
    pub seed: u64,
    /// Depth limit of the decision tree, unlimited when `None`
    pub max_depth: Option<usize>,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            sample: DEFAULT_SAMPLE,
            folds: DEFAULT_FOLDS,
            seed: DEFAULT_SEED,
            max_depth: None,
        }
    }
}

/// How a pair was scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceCase {
    PredictItself,
    EmptyDataset,
    FeatureIsId,
    TargetIsConstant,
    TargetIsId,
    Regression,
    Classification,
}

/// Score of one ordered pair with the numbers it was derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceScore {
    pub predictor: String,
    pub target: String,
    pub case: RelevanceCase,
    pub score: f64,
    /// Cross-validated MAE (regression) or weighted F1 (classification)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_score: Option<f64>,
}

impl RelevanceScore {
    fn fixed(predictor: &str, target: &str, case: RelevanceCase, score: f64) -> Self {
        Self {
            predictor: predictor.to_string(),
            target: target.to_string(),
            case,
            score,
            model_score: None,
            baseline_score: None,
        }
    }
}

/// Asymmetric relevance matrix: `value(row, col)` is the score of
/// predictor `labels[col]` for target `labels[row]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl RelevanceMatrix {
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}

impl ScoreMatrix for RelevanceMatrix {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    fn is_symmetric(&self) -> bool {
        false
    }
}

/// Relevance matrix over every dataset column with default settings
pub fn compute_relevance_matrix(dataset: &Dataset) -> RelevanceMatrix {
    compute_relevance_matrix_with(dataset, &RelevanceConfig::default())
}

/// Relevance matrix over every dataset column.
///
/// Cells are independent and evaluated on the rayon pool; each cell uses its
/// own seeded RNG so results do not depend on scheduling.
pub fn compute_relevance_matrix_with(dataset: &Dataset, config: &RelevanceConfig) -> RelevanceMatrix {
    let labels: Vec<String> = dataset
        .column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let n = labels.len();

    let cells: Vec<(usize, usize)> = (0..n)
        .flat_map(|row| (0..n).filter(move |&col| col != row).map(move |col| (row, col)))
        .collect();

    let pb = ProgressBar::new(cells.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "   Scoring predictors [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) [{eta}]",
            )
            .unwrap()
            .progress_chars("=>-"),
    );

    let columns = dataset.columns();
    let scores: Vec<f64> = cells
        .par_iter()
        .map(|&(row, col)| {
            let score = score_pair(&columns[col], &columns[row], config).score;
            pb.inc(1);
            score
        })
        .collect();

    pb.finish_and_clear();

    let mut values: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    for (&(row, col), &score) in cells.iter().zip(scores.iter()) {
        values[row][col] = score;
    }

    log::debug!("relevance matrix over {} columns ({} pairs)", n, cells.len());

    RelevanceMatrix { labels, values }
}

/// Score a single ordered pair by column name
pub fn predictive_power_score(
    dataset: &Dataset,
    predictor: &str,
    target: &str,
    config: &RelevanceConfig,
) -> Result<RelevanceScore, AnalysisError> {
    let x = dataset
        .column(predictor)
        .ok_or_else(|| AnalysisError::ColumnNotFound {
            column: predictor.to_string(),
        })?;
    let y = dataset.column(target).ok_or_else(|| AnalysisError::ColumnNotFound {
        column: target.to_string(),
    })?;
    Ok(score_pair(x, y, config))
}

/// Rank predictors of `target` by relevance, at most `k` of them
pub fn top_k_predictors(
    matrix: &RelevanceMatrix,
    target: &str,
    k: usize,
) -> Result<RankedFeatureList, AnalysisError> {
    rank_against_target(matrix, target, k)
}

fn score_pair(x: &Column, y: &Column, config: &RelevanceConfig) -> RelevanceScore {
    let (predictor, target) = (x.name(), y.name());
    if predictor == target {
        return RelevanceScore::fixed(predictor, target, RelevanceCase::PredictItself, 1.0);
    }
    if x.is_empty() {
        return RelevanceScore::fixed(predictor, target, RelevanceCase::EmptyDataset, 0.0);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut order: Vec<usize> = (0..x.len()).collect();
    order.shuffle(&mut rng);
    order.truncate(config.sample.max(1));
    let rows = order.len();

    if !x.is_numeric() && distinct(x, &order) == rows {
        return RelevanceScore::fixed(predictor, target, RelevanceCase::FeatureIsId, 0.0);
    }
    let target_distinct = distinct(y, &order);
    if target_distinct == 1 {
        return RelevanceScore::fixed(predictor, target, RelevanceCase::TargetIsConstant, 0.0);
    }
    if !y.is_numeric() && target_distinct == rows {
        return RelevanceScore::fixed(predictor, target, RelevanceCase::TargetIsId, 0.0);
    }

    let x_encoded = x.encoded();
    let xs: Vec<f64> = order.iter().map(|&i| x_encoded[i]).collect();

    let folds = config.folds.clamp(2, rows.max(2)).min(rows);

    let (case, model_score, baseline_score, score) = match y.data() {
        ColumnData::Numeric(values) => {
            let ys: Vec<f64> = order.iter().map(|&i| values[i]).collect();
            let model = cross_validate(&xs, &ys, folds, TreeTask::Regression, config.max_depth, mean_absolute_error);
            let baseline = median_baseline_mae(&ys);
            let score = if baseline > 0.0 { 1.0 - model / baseline } else { 0.0 };
            (RelevanceCase::Regression, model, baseline, score)
        }
        ColumnData::Categorical(_) => {
            let codes = y.encoded();
            let ys: Vec<f64> = order.iter().map(|&i| codes[i]).collect();
            let n_classes = ys.iter().fold(0usize, |m, &c| m.max(c as usize + 1));
            let task = TreeTask::Classification { n_classes };
            let model = cross_validate(&xs, &ys, folds, task, config.max_depth, weighted_f1);
            let baseline = classification_baseline(&ys, n_classes, config.seed);
            let score = if baseline < 1.0 {
                (model - baseline) / (1.0 - baseline)
            } else {
                0.0
            };
            (RelevanceCase::Classification, model, baseline, score)
        }
    };

    let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };

    RelevanceScore {
        predictor: predictor.to_string(),
        target: target.to_string(),
        case,
        score,
        model_score: Some(model_score),
        baseline_score: Some(baseline_score),
    }
}

fn distinct(col: &Column, rows: &[usize]) -> usize {
    match col.data() {
        ColumnData::Numeric(v) => rows
            .iter()
            .map(|&i| if v[i] == 0.0 { 0u64 } else { v[i].to_bits() })
            .collect::<HashSet<_>>()
            .len(),
        ColumnData::Categorical(v) => rows.iter().map(|&i| &v[i]).collect::<HashSet<_>>().len(),
    }
}

/// Fold index of every row.
///
/// Regression rows are split into contiguous folds of the already-shuffled
/// order. Classification rows are stratified: rows are ordered by class
/// (stable) and dealt round-robin, so each fold holds every class in
/// proportion.
fn assign_folds(ys: &[f64], folds: usize, task: TreeTask) -> Vec<usize> {
    let n = ys.len();
    match task {
        TreeTask::Regression => (0..folds)
            .flat_map(|fold| {
                let start = fold * n / folds;
                let end = (fold + 1) * n / folds;
                std::iter::repeat(fold).take(end - start)
            })
            .collect(),
        TreeTask::Classification { .. } => {
            let mut by_class: Vec<usize> = (0..n).collect();
            by_class.sort_by(|&a, &b| ys[a].total_cmp(&ys[b]));

            let mut assignment = vec![0; n];
            for (rank, &row) in by_class.iter().enumerate() {
                assignment[row] = rank % folds;
            }
            assignment
        }
    }
}

/// Mean of per-fold metrics; folds with no held-out rows are skipped
fn cross_validate(
    xs: &[f64],
    ys: &[f64],
    folds: usize,
    task: TreeTask,
    max_depth: Option<usize>,
    metric: fn(&[f64], &[f64]) -> f64,
) -> f64 {
    let assignment = assign_folds(ys, folds, task);
    let mut total = 0.0;
    let mut used = 0usize;

    for fold in 0..folds {
        let (mut train_x, mut train_y) = (Vec::new(), Vec::new());
        let (mut test_x, mut test_y) = (Vec::new(), Vec::new());
        for (i, &f) in assignment.iter().enumerate() {
            if f == fold {
                test_x.push(xs[i]);
                test_y.push(ys[i]);
            } else {
                train_x.push(xs[i]);
                train_y.push(ys[i]);
            }
        }
        if test_x.is_empty() || train_x.is_empty() {
            continue;
        }

        let tree = DecisionTree::fit(&train_x, &train_y, task, max_depth);
        let predicted = tree.predict_all(&test_x);

        total += metric(&test_y, &predicted);
        used += 1;
    }

    if used == 0 {
        f64::NAN
    } else {
        total / used as f64
    }
}

fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn median_baseline_mae(ys: &[f64]) -> f64 {
    let m = median(ys);
    let naive = vec![m; ys.len()];
    mean_absolute_error(ys, &naive)
}

/// Support-weighted F1 over the classes present in `actual`
fn weighted_f1(actual: &[f64], predicted: &[f64]) -> f64 {
    let n_classes = actual
        .iter()
        .chain(predicted)
        .fold(0usize, |m, &c| m.max(c as usize + 1));
    let mut tp = vec![0.0f64; n_classes];
    let mut support = vec![0.0f64; n_classes];
    let mut predicted_count = vec![0.0f64; n_classes];

    for (&a, &p) in actual.iter().zip(predicted) {
        support[a as usize] += 1.0;
        predicted_count[p as usize] += 1.0;
        if a == p {
            tp[a as usize] += 1.0;
        }
    }

    let total: f64 = support.iter().sum();
    if total == 0.0 {
        return 0.0;
    }

    (0..n_classes)
        .filter(|&c| support[c] > 0.0)
        .map(|c| {
            let precision = if predicted_count[c] > 0.0 { tp[c] / predicted_count[c] } else { 0.0 };
            let recall = tp[c] / support[c];
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            f1 * support[c] / total
        })
        .sum()
}

fn classification_baseline(ys: &[f64], n_classes: usize, seed: u64) -> f64 {
    let mut counts = vec![0usize; n_classes.max(1)];
    for &y in ys {
        counts[y as usize] += 1;
    }
    let mut most_common = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[most_common] {
            most_common = class;
        }
    }
    let constant = vec![most_common as f64; ys.len()];

    let mut shuffled = ys.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    weighted_f1(ys, &constant).max(weighted_f1(ys, &shuffled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_f1_perfect_and_constant() {
        let actual = [0.0, 0.0, 1.0, 1.0];
        assert_eq!(weighted_f1(&actual, &actual), 1.0);
        // predicting class 0 everywhere: f1(0) = 2/3, f1(1) = 0
        let f1 = weighted_f1(&actual, &[0.0; 4]);
        assert!((f1 - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_regression_folds_are_contiguous() {
        let ys = [0.0; 10];
        assert_eq!(
            assign_folds(&ys, 4, TreeTask::Regression),
            vec![0, 0, 1, 1, 1, 2, 2, 3, 3, 3]
        );
    }

    #[test]
    fn test_classification_folds_are_stratified() {
        // rare class 1 appears 4 times among 20 rows
        let ys: Vec<f64> = (0..20).map(|i| if i % 5 == 0 { 1.0 } else { 0.0 }).collect();
        let task = TreeTask::Classification { n_classes: 2 };
        let assignment = assign_folds(&ys, 4, task);

        for fold in 0..4 {
            let rare = (0..20)
                .filter(|&i| assignment[i] == fold && ys[i] == 1.0)
                .count();
            let total = assignment.iter().filter(|&&f| f == fold).count();
            assert_eq!(rare, 1, "fold {} should hold one rare row", fold);
            assert_eq!(total, 5);
        }
    }

    #[test]
    fn test_rare_class_is_learned_in_every_fold() {
        // one rare row per fold, so every training split still sees the rare class
        let x = Column::numeric("x", (0..40).map(|i| (i % 10) as f64).collect());
        let y = Column::categorical(
            "label",
            (0..40).map(|i| if i % 10 == 9 { "rare" } else { "common" }).collect(),
        );
        let score = score_pair(&x, &y, &RelevanceConfig::default());
        assert_eq!(score.case, RelevanceCase::Classification);
        let model = score.model_score.unwrap();
        assert!((model - 1.0).abs() < 1e-9, "model F1 was {}", model);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_median_baseline_mae() {
        assert_eq!(median_baseline_mae(&[1.0, 2.0, 3.0]), 2.0 / 3.0);
    }

    #[test]
    fn test_constant_target_scores_zero() {
        let x = Column::numeric("x", vec![1.0, 2.0, 3.0, 4.0]);
        let y = Column::numeric("y", vec![5.0; 4]);
        let score = score_pair(&x, &y, &RelevanceConfig::default());
        assert_eq!(score.case, RelevanceCase::TargetIsConstant);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn test_id_feature_scores_zero() {
        let x = Column::categorical("id", vec!["a", "b", "c", "d"]);
        let y = Column::numeric("y", vec![1.0, 2.0, 1.0, 2.0]);
        let score = score_pair(&x, &y, &RelevanceConfig::default());
        assert_eq!(score.case, RelevanceCase::FeatureIsId);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn test_categorical_target_uses_classification() {
        let x = Column::numeric("x", (0..40).map(|i| i as f64).collect());
        let y = Column::categorical(
            "label",
            (0..40).map(|i| if i < 20 { "low" } else { "high" }).collect(),
        );
        let score = score_pair(&x, &y, &RelevanceConfig::default());
        assert_eq!(score.case, RelevanceCase::Classification);
        assert!(score.score > 0.8, "expected strong score, got {}", score.score);
    }
}
