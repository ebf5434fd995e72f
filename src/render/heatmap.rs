//! Masked heatmaps of correlation and relevance matrices

use anyhow::Result;

use super::colormap::{contrast_text, to_hex, Colormap};
use super::surface::{DisplaySurface, Figure};
use super::svg::{text_width, Anchor, Font, SvgDocument};
use crate::pipeline::ScoreMatrix;

/// Pixels per inch when converting reference figure sizes
pub const PIXELS_PER_INCH: f64 = 80.0;

/// Default masking threshold for correlation heatmaps
pub const CORRELATION_THRESHOLD: f64 = 0.6;

/// Default masking threshold for relevance heatmaps
pub const RELEVANCE_THRESHOLD: f64 = 0.15;

/// Size and styling of a heatmap figure
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapLayout {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Font size of the in-cell value annotations
    pub font_annot: f64,
    pub colormap: Colormap,
    /// Cell border width; 0 disables borders
    pub line_width: f64,
    pub line_color: String,
}

impl HeatmapLayout {
    /// Layout from a figure size in inches
    pub fn from_inches(title: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            title: title.into(),
            width: (width * PIXELS_PER_INCH).round() as u32,
            height: (height * PIXELS_PER_INCH).round() as u32,
            font_annot: 8.0,
            colormap: Colormap::Viridis,
            line_width: 0.5,
            line_color: "#ffffff".to_string(),
        }
    }

    /// 12x10 in, viridis, white 0.5 borders
    pub fn correlation(title: impl Into<String>) -> Self {
        Self {
            font_annot: 10.0,
            ..Self::from_inches(title, 12.0, 10.0)
        }
    }

    /// 12x10 in, reversed rocket, thin grey borders
    pub fn relevance(title: impl Into<String>) -> Self {
        Self {
            font_annot: 10.0,
            colormap: Colormap::RocketReversed,
            line_width: 0.05,
            line_color: "#808080".to_string(),
            ..Self::from_inches(title, 12.0, 10.0)
        }
    }
}

/// Which cells are hidden: `true` means masked.
///
/// Cells whose absolute value is below `threshold` (or NaN) are masked. For
/// symmetric matrices the diagonal and upper triangle are masked as well,
/// leaving the strict lower triangle.
pub fn heatmap_mask<M: ScoreMatrix + ?Sized>(matrix: &M, threshold: f64) -> Vec<Vec<bool>> {
    let n = matrix.len();
    let symmetric = matrix.is_symmetric();
    (0..n)
        .map(|row| {
            (0..n)
                .map(|col| {
                    let v = matrix.value(row, col);
                    (symmetric && col >= row) || v.is_nan() || v.abs() < threshold
                })
                .collect()
        })
        .collect()
}

/// Render `matrix` as a masked, annotated heatmap and hand it to `surface`.
///
/// Matrices with fewer than two columns produce nothing.
pub fn render_masked_heatmap<M, S>(
    matrix: &M,
    threshold: f64,
    layout: &HeatmapLayout,
    surface: &mut S,
) -> Result<()>
where
    M: ScoreMatrix + ?Sized,
    S: DisplaySurface + ?Sized,
{
    let n = matrix.len();
    if n < 2 {
        log::debug!("skipping heatmap '{}': {} column(s)", layout.title, n);
        return Ok(());
    }

    let mask = heatmap_mask(matrix, threshold);
    let labels = matrix.labels();

    // colour range over the visible cells, as seaborn does without vmin/vmax
    let visible: Vec<f64> = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .filter(|&(r, c)| !mask[r][c])
        .map(|(r, c)| matrix.value(r, c))
        .collect();
    let (vmin, vmax) = visible
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (vmin, vmax) = if visible.is_empty() {
        (0.0, 1.0)
    } else if vmax > vmin {
        (vmin, vmax)
    } else {
        (vmin - 0.5, vmax + 0.5)
    };

    let tick_size = 10.0;
    let longest = labels
        .iter()
        .map(|l| text_width(l, tick_size))
        .fold(0.0, f64::max);

    let mut doc = SvgDocument::new(layout.width, layout.height);
    let left = longest + 16.0;
    let top = 40.0;
    let right = doc.width() - 90.0;
    let bottom = doc.height() - (longest * 0.75 + 20.0);

    let cell_w = (right - left) / n as f64;
    let cell_h = (bottom - top) / n as f64;

    doc.text(
        doc.width() / 2.0,
        20.0,
        &layout.title,
        &Font::new(14.0).anchor(Anchor::Middle).bold(),
    );

    let stroke = Some((layout.line_color.as_str(), layout.line_width));
    for row in 0..n {
        for col in 0..n {
            if mask[row][col] {
                continue;
            }
            let value = matrix.value(row, col);
            let color = layout.colormap.color((value - vmin) / (vmax - vmin));
            let x = left + col as f64 * cell_w;
            let y = top + row as f64 * cell_h;
            doc.rect(x, y, cell_w, cell_h, &to_hex(color), stroke);
            doc.text(
                x + cell_w / 2.0,
                y + cell_h / 2.0,
                &format!("{:.2}", value),
                &Font::new(layout.font_annot)
                    .anchor(Anchor::Middle)
                    .color(contrast_text(color)),
            );
        }
    }

    let y_font = Font::new(tick_size).anchor(Anchor::End);
    for (row, label) in labels.iter().enumerate() {
        doc.text(left - 6.0, top + (row as f64 + 0.5) * cell_h, label, &y_font);
    }
    for (col, label) in labels.iter().enumerate() {
        let x = left + (col as f64 + 0.5) * cell_w;
        doc.text(
            x,
            bottom + 8.0,
            label,
            &Font::new(tick_size).anchor(Anchor::End).rotate(-45.0),
        );
    }

    draw_colorbar(&mut doc, layout.colormap, vmin, vmax, right + 20.0, top, bottom);

    surface.show_figure(Figure {
        title: layout.title.clone(),
        width: layout.width,
        height: layout.height,
        svg: doc.finish(),
    })
}

fn draw_colorbar(
    doc: &mut SvgDocument,
    colormap: Colormap,
    vmin: f64,
    vmax: f64,
    x: f64,
    top: f64,
    bottom: f64,
) {
    const STEPS: usize = 32;
    let width = 16.0;
    let step_h = (bottom - top) / STEPS as f64;
    for i in 0..STEPS {
        // top of the bar is the maximum
        let t = 1.0 - (i as f64 + 0.5) / STEPS as f64;
        doc.rect(x, top + i as f64 * step_h, width, step_h + 0.5, &colormap.hex(t), None);
    }

    let font = Font::new(9.0);
    doc.text(x + width + 4.0, top, &format!("{:.2}", vmax), &font);
    doc.text(x + width + 4.0, (top + bottom) / 2.0, &format!("{:.2}", (vmin + vmax) / 2.0), &font);
    doc.text(x + width + 4.0, bottom, &format!("{:.2}", vmin), &font);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grid {
        labels: Vec<String>,
        values: Vec<Vec<f64>>,
        symmetric: bool,
    }

    impl ScoreMatrix for Grid {
        fn labels(&self) -> &[String] {
            &self.labels
        }
        fn value(&self, row: usize, col: usize) -> f64 {
            self.values[row][col]
        }
        fn is_symmetric(&self) -> bool {
            self.symmetric
        }
    }

    fn grid(symmetric: bool) -> Grid {
        Grid {
            labels: vec!["a".into(), "b".into(), "c".into()],
            values: vec![
                vec![1.0, 0.9, 0.1],
                vec![0.9, 1.0, -0.7],
                vec![0.1, -0.7, 1.0],
            ],
            symmetric,
        }
    }

    #[test]
    fn test_symmetric_mask_keeps_strict_lower_triangle() {
        let mask = heatmap_mask(&grid(true), 0.6);
        assert_eq!(
            mask,
            vec![
                vec![true, true, true],
                vec![false, true, true],
                vec![true, false, true],
            ]
        );
    }

    #[test]
    fn test_asymmetric_mask_only_thresholds() {
        let mask = heatmap_mask(&grid(false), 0.6);
        assert_eq!(
            mask,
            vec![
                vec![false, false, true],
                vec![false, false, false],
                vec![true, false, false],
            ]
        );
    }

    #[test]
    fn test_layout_defaults() {
        let corr = HeatmapLayout::correlation("Pearson");
        assert_eq!((corr.width, corr.height), (960, 800));
        assert_eq!(corr.colormap, Colormap::Viridis);
        let pps = HeatmapLayout::relevance("PPS");
        assert_eq!(pps.colormap, Colormap::RocketReversed);
        assert_eq!(pps.line_width, 0.05);
    }
}
