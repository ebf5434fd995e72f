//! Report module - console summaries, JSON export and artifact output

pub mod analysis_export;
pub mod output;
pub mod summary;

pub use analysis_export::*;
pub use output::*;
pub use summary::*;
