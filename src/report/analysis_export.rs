//! JSON export of the analysis results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CorrelationMatrix, RankedFeatureList, RelevanceConfig, RelevanceMatrix};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub valuater_version: String,
    pub input_file: String,
    pub target_column: String,
    pub rows: usize,
    pub columns: usize,
}

/// Thresholds and limits used for rendering
#[derive(Serialize)]
pub struct ThresholdsConfig {
    pub correlation: f64,
    pub relevance: f64,
    pub top_k: usize,
}

/// One correlation method's results
#[derive(Serialize)]
pub struct CorrelationSection {
    pub ranking: RankedFeatureList,
    pub matrix: CorrelationMatrix,
}

/// Relevance (PPS) results with the settings that produced them
#[derive(Serialize)]
pub struct RelevanceSection {
    pub config: RelevanceConfig,
    pub ranking: RankedFeatureList,
    pub matrix: RelevanceMatrix,
}

/// Complete analysis export
#[derive(Serialize)]
pub struct AnalysisExport {
    pub metadata: AnalysisMetadata,
    pub thresholds: ThresholdsConfig,
    pub features_studied: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pearson: Option<CorrelationSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spearman: Option<CorrelationSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<RelevanceSection>,
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
    pub rows: usize,
    pub columns: usize,
    pub correlation_threshold: f64,
    pub relevance_threshold: f64,
    pub top_k: usize,
    pub features_studied: &'a [String],
}

impl AnalysisExport {
    /// Export with metadata filled in and no result sections yet
    pub fn new(params: &ExportParams) -> Self {
        Self {
            metadata: AnalysisMetadata {
                timestamp: Utc::now().to_rfc3339(),
                valuater_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: params.input_file.to_string(),
                target_column: params.target_column.to_string(),
                rows: params.rows,
                columns: params.columns,
            },
            thresholds: ThresholdsConfig {
                correlation: params.correlation_threshold,
                relevance: params.relevance_threshold,
                top_k: params.top_k,
            },
            features_studied: params.features_studied.to_vec(),
            pearson: None,
            spearman: None,
            relevance: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pearson.is_none() && self.spearman.is_none() && self.relevance.is_none()
    }
}

/// Write the export as pretty-printed JSON
pub fn export_analysis(export: &AnalysisExport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export)
        .context("Failed to serialize analysis export to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis export to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{compute_correlation, top_k_by_absolute_correlation, Column, CorrelationMethod, Dataset};
    use tempfile::TempDir;

    fn params<'a>(features: &'a [String]) -> ExportParams<'a> {
        ExportParams {
            input_file: "houses.csv",
            target_column: "SalePrice",
            rows: 4,
            columns: 2,
            correlation_threshold: 0.6,
            relevance_threshold: 0.15,
            top_k: 5,
            features_studied: features,
        }
    }

    #[test]
    fn test_export_contains_sections() {
        let ds = Dataset::new(vec![
            Column::numeric("GrLivArea", vec![1.0, 2.0, 3.0, 4.0]),
            Column::numeric("SalePrice", vec![2.0, 4.0, 6.0, 9.0]),
        ])
        .unwrap();
        let matrix = compute_correlation(&ds, "SalePrice", CorrelationMethod::Pearson).unwrap();
        let ranking = top_k_by_absolute_correlation(&matrix, "SalePrice", 5).unwrap();

        let features = vec!["GrLivArea".to_string()];
        let mut export = AnalysisExport::new(&params(&features));
        assert!(export.is_empty());
        export.pearson = Some(CorrelationSection { ranking, matrix });

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("analysis.json");
        export_analysis(&export, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["metadata"]["target_column"], "SalePrice");
        assert_eq!(json["thresholds"]["correlation"], 0.6);
        assert_eq!(json["pearson"]["ranking"][0]["feature"], "GrLivArea");
        assert_eq!(json["pearson"]["matrix"]["method"], "pearson");
        assert!(json.get("spearman").is_none());
    }
}
