//! Render module - figures handed to a display surface

pub mod axes;
pub mod bar;
pub mod colormap;
pub mod feature;
pub mod heatmap;
pub mod surface;
pub mod svg;

pub use bar::render_top_bar_chart;
pub use colormap::Colormap;
pub use feature::render_feature_vs_target;
pub use heatmap::{
    heatmap_mask, render_masked_heatmap, HeatmapLayout, CORRELATION_THRESHOLD, RELEVANCE_THRESHOLD,
};
pub use surface::{Artifact, DisplaySurface, Figure, MemorySurface, TextBlock, TextStyle};
