//! Labelled score matrices and target rankings

use serde::Serialize;

use super::error::AnalysisError;

/// A square matrix of scores indexed by column labels.
///
/// Implemented by the correlation and relevance matrices so that ranking and
/// rendering can treat them uniformly.
pub trait ScoreMatrix {
    /// Row/column labels in matrix order
    fn labels(&self) -> &[String];

    /// Value at `(row, col)`
    fn value(&self, row: usize, col: usize) -> f64;

    /// Whether `value(i, j) == value(j, i)` holds by construction
    fn is_symmetric(&self) -> bool;

    fn len(&self) -> usize {
        self.labels().len()
    }

    fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels().iter().position(|l| l == label)
    }

    /// Value looked up by labels
    fn get(&self, row: &str, col: &str) -> Option<f64> {
        Some(self.value(self.index_of(row)?, self.index_of(col)?))
    }
}

/// A feature and its association score with the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    pub feature: String,
    pub score: f64,
}

/// Features ordered by descending absolute score
pub type RankedFeatureList = Vec<RankedFeature>;

/// Rank every other label by the absolute value of its score in the target's row.
///
/// The sort is stable so equal scores keep matrix (dataset) order. NaN
/// scores are skipped, the target never ranks against itself.
pub fn rank_against_target<M: ScoreMatrix + ?Sized>(
    matrix: &M,
    target: &str,
    k: usize,
) -> Result<RankedFeatureList, AnalysisError> {
    let row = matrix.index_of(target).ok_or_else(|| {
        AnalysisError::invalid(format!("target column '{}' is not in the matrix", target))
    })?;

    let mut ranked: RankedFeatureList = matrix
        .labels()
        .iter()
        .enumerate()
        .filter(|(col, _)| *col != row)
        .map(|(col, label)| RankedFeature {
            feature: label.clone(),
            score: matrix.value(row, col),
        })
        .filter(|f| !f.score.is_nan())
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .abs()
            .partial_cmp(&a.score.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);

    Ok(ranked)
}
