//! Pipeline module - dataset boundary and the correlation/relevance analyses

pub mod correlation;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod matrix;
pub mod on_demand;
pub mod relevance;
pub mod tree;

pub use correlation::*;
pub use dataset::{Column, ColumnData, ColumnKind, Dataset};
pub use error::AnalysisError;
pub use loader::*;
pub use matrix::*;
pub use on_demand::{compute_if_requested, compute_if_requested_timed};
pub use relevance::*;

/// Column whose sale price the analysis explains
pub const DEFAULT_TARGET: &str = "SalePrice";

/// Ordinal column used to colour scatter plots
pub const DEFAULT_GROUP_BY: &str = "OverallQual";

/// Features selected a priori from the Pearson and Spearman top-10 lists
pub const VARS_TO_STUDY: [&str; 12] = [
    "1stFlrSF",
    "BsmtFinSF1",
    "GarageArea",
    "GarageYrBlt",
    "GrLivArea",
    "LotArea",
    "MasVnrArea",
    "OpenPorchSF",
    "OverallQual",
    "TotalBsmtSF",
    "YearBuilt",
    "YearRemodAdd",
];
