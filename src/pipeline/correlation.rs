//! Pearson and Spearman correlation matrices

use faer::Mat;
use rayon::prelude::*;
use serde::Serialize;

use super::dataset::Dataset;
use super::error::AnalysisError;
use super::matrix::{rank_against_target, RankedFeatureList, ScoreMatrix};

/// Correlation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Linear association on raw values
    Pearson,
    /// Monotonic association: Pearson on average ranks
    Spearman,
}

impl std::fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationMethod::Pearson => write!(f, "Pearson"),
            CorrelationMethod::Spearman => write!(f, "Spearman"),
        }
    }
}

impl std::str::FromStr for CorrelationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pearson" | "linear" => Ok(CorrelationMethod::Pearson),
            "spearman" | "monotonic" => Ok(CorrelationMethod::Spearman),
            _ => Err(format!(
                "Unknown correlation method: '{}'. Use 'pearson' or 'spearman'",
                s
            )),
        }
    }
}

/// Symmetric correlation matrix over the usable numeric columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub method: CorrelationMethod,
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Row-major values
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}

impl ScoreMatrix for CorrelationMatrix {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

/// Threshold for auto-selecting matrix vs pairwise correlation computation.
/// Matrix multiplication is more efficient when there are many columns.
const MATRIX_METHOD_COLUMN_THRESHOLD: usize = 15;

/// Compute the correlation matrix of every usable numeric column.
///
/// Usable columns are numeric and non-constant; categorical and zero-variance
/// columns are left out. The target must be present and usable, and at least
/// two usable columns must remain.
pub fn compute_correlation(
    dataset: &Dataset,
    target: &str,
    method: CorrelationMethod,
) -> Result<CorrelationMatrix, AnalysisError> {
    let target_col = dataset.column(target).ok_or_else(|| {
        AnalysisError::invalid(format!("target column '{}' is absent", target))
    })?;
    if !target_col.is_numeric() {
        return Err(AnalysisError::invalid(format!(
            "target column '{}' is not numeric",
            target
        )));
    }

    let mut labels = Vec::new();
    let mut columns: Vec<&[f64]> = Vec::new();
    for col in dataset.columns() {
        match col.as_numeric() {
            Some(values) if !is_constant(values) => {
                labels.push(col.name().to_string());
                columns.push(values);
            }
            Some(_) => log::debug!("excluding constant column '{}' from correlation", col.name()),
            None => log::debug!("excluding categorical column '{}' from correlation", col.name()),
        }
    }

    if !labels.iter().any(|l| l == target) {
        return Err(AnalysisError::invalid(format!(
            "target column '{}' has zero variance",
            target
        )));
    }
    if labels.len() < 2 {
        return Err(AnalysisError::invalid(format!(
            "need at least 2 usable numeric columns, found {}",
            labels.len()
        )));
    }

    let prepared: Vec<Vec<f64>> = match method {
        CorrelationMethod::Pearson => columns.iter().map(|c| c.to_vec()).collect(),
        CorrelationMethod::Spearman => columns.par_iter().map(|c| average_ranks(c)).collect(),
    };

    let values = if prepared.len() >= MATRIX_METHOD_COLUMN_THRESHOLD {
        correlation_matrix_fast(&prepared)
    } else {
        correlation_matrix_pairwise(&prepared)
    };

    log::debug!(
        "{} correlation over {} columns ({} rows)",
        method,
        labels.len(),
        dataset.height()
    );

    Ok(CorrelationMatrix {
        method,
        labels,
        values,
    })
}

/// Rank features by absolute correlation with the target, at most `k` of them
pub fn top_k_by_absolute_correlation(
    matrix: &CorrelationMatrix,
    target: &str,
    k: usize,
) -> Result<RankedFeatureList, AnalysisError> {
    rank_against_target(matrix, target, k)
}

/// Pearson correlation of two equal-length series using Welford's algorithm.
///
/// Returns `None` for mismatched or empty input and for zero-variance series.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n == 0 || n != ys.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (&x, &y) in xs.iter().zip(ys.iter()) {
        count += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Spearman correlation of two series: Pearson on average ranks
pub fn spearman_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    pearson_correlation(&average_ranks(xs), &average_ranks(ys))
}

/// 1-based ranks, tied values share the mean of their positions
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }

    ranks
}

fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Pairwise Welford correlations over the upper triangle, mirrored below
fn correlation_matrix_pairwise(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<f64> = pairs
        .par_iter()
        .map(|&(i, j)| pearson_correlation(&columns[i], &columns[j]).unwrap_or(f64::NAN))
        .collect();

    let mut values = identity(n);
    for (&(i, j), &r) in pairs.iter().zip(coefficients.iter()) {
        values[i][j] = r;
        values[j][i] = r;
    }
    values
}

/// Correlation matrix via matrix operations (faster for many columns).
///
/// Algorithm:
/// 1. Standardize each column: z = (x - mean) / (std * sqrt(n))
/// 2. Correlation matrix: R = Z^T * Z
/// 3. Mirror the upper triangle and pin the diagonal to exactly 1
fn correlation_matrix_fast(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n_cols = columns.len();
    let n_rows = columns.first().map(Vec::len).unwrap_or(0);

    let standardized: Vec<Vec<f64>> = columns
        .par_iter()
        .map(|col| {
            let n = col.len() as f64;
            let mean = col.iter().sum::<f64>() / n;
            let ss: f64 = col.iter().map(|x| (x - mean) * (x - mean)).sum();
            let scale = ss.sqrt();
            col.iter().map(|x| (x - mean) / scale).collect()
        })
        .collect();

    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    for (col_idx, col_data) in standardized.iter().enumerate() {
        for (row_idx, &val) in col_data.iter().enumerate() {
            z[(row_idx, col_idx)] = val;
        }
    }

    let r = z.transpose() * &z;

    let mut values = identity(n_cols);
    for i in 0..n_cols {
        for j in (i + 1)..n_cols {
            let c = r[(i, j)].clamp(-1.0, 1.0);
            values[i][j] = c;
            values[j][i] = c;
        }
    }
    values
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_ranks_with_ties() {
        let ranks = average_ranks(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson_correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_none() {
        assert!(pearson_correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_fast_and_pairwise_agree() {
        let cols: Vec<Vec<f64>> = (0..4)
            .map(|c| (0..20).map(|r| ((r * (c + 3)) % 7) as f64 + r as f64 * 0.1).collect())
            .collect();
        let fast = correlation_matrix_fast(&cols);
        let pairwise = correlation_matrix_pairwise(&cols);
        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (fast[i][j] - pairwise[i][j]).abs() < 1e-9,
                    "mismatch at ({}, {}): {} vs {}",
                    i,
                    j,
                    fast[i][j],
                    pairwise[i][j]
                );
            }
        }
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("linear".parse::<CorrelationMethod>(), Ok(CorrelationMethod::Pearson));
        assert_eq!("Spearman".parse::<CorrelationMethod>(), Ok(CorrelationMethod::Spearman));
        assert!("kendall".parse::<CorrelationMethod>().is_err());
    }
}
