//! Cartesian axes shared by the bar, histogram and scatter charts

use super::svg::{Anchor, Font, SvgDocument};
use crate::pipeline::dataset::format_number;

const GRID_COLOR: &str = "#e5e5e5";
const AXIS_COLOR: &str = "#4d4d4d";

/// Linear mapping from a data interval to a pixel interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    start: f64,
    end: f64,
}

impl Scale {
    /// A degenerate domain is widened by one unit on both sides
    pub fn new(min: f64, max: f64, start: f64, end: f64) -> Self {
        let (min, max) = if max > min { (min, max) } else { (min - 1.0, max + 1.0) };
        Self { min, max, start, end }
    }

    /// Domain padded by `fraction` of its span on both sides
    pub fn padded(min: f64, max: f64, fraction: f64, start: f64, end: f64) -> Self {
        let span = if max > min { max - min } else { 0.0 };
        Self::new(min - span * fraction, max + span * fraction, start, end)
    }

    pub fn map(&self, value: f64) -> f64 {
        self.start + (value - self.min) / (self.max - self.min) * (self.end - self.start)
    }
}

/// Pixel rectangle holding the plotted data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Round tick positions covering `[min, max]`, roughly `target` of them
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) || target == 0 {
        return vec![min];
    }
    let raw = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Draw the title centred above the figure
pub fn draw_title(doc: &mut SvgDocument, title: &str, size: f64) {
    let x = doc.width() / 2.0;
    doc.text(x, size * 1.1, title, &Font::new(size).anchor(Anchor::Middle).bold());
}

/// Grid, ticks and labels along the y axis
pub fn draw_y_axis(doc: &mut SvgDocument, area: &PlotArea, y: &Scale, label: Option<&str>) {
    let font = Font::new(10.0).anchor(Anchor::End);
    for tick in nice_ticks(y.min, y.max, 5) {
        let py = y.map(tick);
        doc.line(area.left, py, area.right, py, GRID_COLOR, 1.0);
        doc.text(area.left - 6.0, py, &format_number(tick), &font);
    }
    doc.line(area.left, area.top, area.left, area.bottom, AXIS_COLOR, 1.0);

    if let Some(label) = label {
        let x = 14.0;
        let cy = (area.top + area.bottom) / 2.0;
        doc.text(x, cy, label, &Font::new(11.0).anchor(Anchor::Middle).rotate(-90.0));
    }
}

/// Numeric ticks and label along the x axis
pub fn draw_x_axis(doc: &mut SvgDocument, area: &PlotArea, x: &Scale, label: Option<&str>) {
    let font = Font::new(10.0).anchor(Anchor::Middle);
    for tick in nice_ticks(x.min, x.max, 6) {
        let px = x.map(tick);
        doc.line(px, area.top, px, area.bottom, GRID_COLOR, 1.0);
        doc.text(px, area.bottom + 12.0, &format_number(tick), &font);
    }
    doc.line(area.left, area.bottom, area.right, area.bottom, AXIS_COLOR, 1.0);

    if let Some(label) = label {
        let cx = (area.left + area.right) / 2.0;
        doc.text(cx, doc.height() - 10.0, label, &Font::new(11.0).anchor(Anchor::Middle));
    }
}
