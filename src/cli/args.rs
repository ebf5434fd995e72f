//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{RelevanceConfig, DEFAULT_GROUP_BY, DEFAULT_TARGET, VARS_TO_STUDY};

/// Valuater - Explore how house features relate to their sale price
#[derive(Parser, Debug)]
#[command(name = "valuater")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column the features are compared against
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Output directory for figures and reports.
    /// Defaults to the input directory with an '_analysis' suffix (e.g., houses.csv → houses_analysis/).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Features to study in the histogram/scatter section (comma-separated).
    /// Defaults to the curated list of twelve sale price drivers.
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Restrict the analysis to these columns (comma-separated); the target is always kept
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Column used to colour the scatter plots
    #[arg(long, default_value = DEFAULT_GROUP_BY)]
    pub group_by: String,

    /// Draw scatter plots without group colours
    #[arg(long, default_value = "false")]
    pub no_group: bool,

    /// Correlation heatmap threshold - cells with |r| below this value are hidden
    #[arg(long, default_value = "0.6", value_parser = validate_unit_interval)]
    pub correlation_threshold: f64,

    /// Relevance heatmap threshold - cells with a score below this value are hidden
    #[arg(long, default_value = "0.15", value_parser = validate_unit_interval)]
    pub relevance_threshold: f64,

    /// Number of features shown in the top correlation bar charts
    #[arg(long, default_value = "5")]
    pub top_k: usize,

    /// Show the first rows of the dataset
    #[arg(long, default_value = "false")]
    pub show_sample: bool,

    /// Pearson heatmap and bar chart
    #[arg(long, default_value = "false")]
    pub pearson: bool,

    /// Spearman heatmap and bar chart
    #[arg(long, default_value = "false")]
    pub spearman: bool,

    /// Histogram and scatter plot of each studied feature against the target
    #[arg(long, default_value = "false")]
    pub scatter: bool,

    /// Predictive power score heatmap (expensive: one model per column pair)
    #[arg(long, default_value = "false")]
    pub pps: bool,

    /// Enable every section
    #[arg(long, default_value = "false")]
    pub all: bool,

    /// Maximum rows sampled per column pair for the predictive power score
    #[arg(long, default_value = "5000")]
    pub pps_sample: usize,

    /// Cross-validation folds for the predictive power score (at least 2)
    #[arg(long, default_value = "4", value_parser = validate_folds)]
    pub pps_folds: usize,

    /// Depth limit for the predictive power score trees (unlimited by default)
    #[arg(long)]
    pub pps_max_depth: Option<usize>,

    /// Random seed for sampling and cross-validation
    #[arg(long, default_value = "123")]
    pub seed: u64,

    /// JSON report path. Defaults to 'analysis.json' inside the output directory.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Zip the output directory into '<output>.zip' when done
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Skip interactive confirmation prompts; only flagged sections run
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// Optional parts of the analysis, each gated by a flag or a confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Sample,
    Pearson,
    Spearman,
    Scatter,
    Relevance,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Sample,
        Section::Pearson,
        Section::Spearman,
        Section::Scatter,
        Section::Relevance,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Sample => "Data Sample",
            Section::Pearson => "Pearson Correlation",
            Section::Spearman => "Spearman Correlation",
            Section::Scatter => "Scatter & Histogram Plots",
            Section::Relevance => "Predictive Power Score",
        }
    }

    /// Confirmation question asked when the section was not flagged
    pub fn prompt(&self) -> &'static str {
        match self {
            Section::Sample => "Show Data Sample?",
            Section::Pearson => "Show Pearson Correlation Plots?",
            Section::Spearman => "Show Spearman Correlation Plots?",
            Section::Scatter => "Show Scatter and Histogram Plots?",
            Section::Relevance => "Show PPS Heatmap? (computes one model per column pair)",
        }
    }
}

impl Cli {
    /// Get the output directory, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with an '_analysis' suffix.
    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            parent.join(format!("{}_analysis", stem))
        })
    }

    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| self.output_dir().join("analysis.json"))
    }

    /// Zip path next to the output directory
    pub fn bundle_path(&self) -> PathBuf {
        let dir = self.output_dir();
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("analysis")
            .to_string();
        dir.with_file_name(format!("{}.zip", name))
    }

    /// Features to study, falling back to the curated list
    pub fn features_to_study(&self) -> Vec<String> {
        if self.features.is_empty() {
            VARS_TO_STUDY.iter().map(|s| s.to_string()).collect()
        } else {
            self.features.clone()
        }
    }

    /// Columns to load, empty meaning all of them
    pub fn columns_to_load(&self) -> Vec<String> {
        let mut columns = self.columns.clone();
        if !columns.is_empty() && !columns.contains(&self.target) {
            columns.push(self.target.clone());
        }
        columns
    }

    pub fn group_column(&self) -> Option<&str> {
        if self.no_group {
            None
        } else {
            Some(self.group_by.as_str())
        }
    }

    /// Whether a flag (or `--all`) requested the section
    pub fn section_flagged(&self, section: Section) -> bool {
        self.all
            || match section {
                Section::Sample => self.show_sample,
                Section::Pearson => self.pearson,
                Section::Spearman => self.spearman,
                Section::Scatter => self.scatter,
                Section::Relevance => self.pps,
            }
    }

    pub fn relevance_config(&self) -> RelevanceConfig {
        RelevanceConfig {
            sample: self.pps_sample,
            folds: self.pps_folds,
            seed: self.seed,
            max_depth: self.pps_max_depth,
        }
    }
}

/// Validator for thresholds in [0, 1]
fn validate_unit_interval(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("threshold must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the number of cross-validation folds
fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value < 2 {
        Err(format!("pps_folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}
