//! Valuater: Sale Price Correlation Library
//!
//! Correlation (Pearson, Spearman) and predictive power analysis of a
//! housing dataset against its sale price, rendered as masked heatmaps,
//! bar charts and per-feature views.

pub mod cli;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod utils;
