//! Bar chart of the top ranked features

use anyhow::Result;

use super::axes::{draw_title, draw_y_axis, PlotArea, Scale};
use super::heatmap::PIXELS_PER_INCH;
use super::surface::{DisplaySurface, Figure};
use super::svg::{text_width, Anchor, Font, SvgDocument};
use crate::pipeline::RankedFeature;

const BAR_COLOR: &str = "#1f77b4";

/// Draw the first `k` ranked features with their signed scores.
///
/// Bars grow from zero, so negative correlations point down. An empty ranking
/// produces nothing.
pub fn render_top_bar_chart<S>(
    ranked: &[RankedFeature],
    k: usize,
    title: &str,
    surface: &mut S,
) -> Result<()>
where
    S: DisplaySurface + ?Sized,
{
    let shown = &ranked[..k.min(ranked.len())];
    if shown.is_empty() {
        log::debug!("skipping bar chart '{}': nothing ranked", title);
        return Ok(());
    }

    let width = (6.0 * PIXELS_PER_INCH) as u32;
    let height = (3.0 * PIXELS_PER_INCH) as u32;
    let mut doc = SvgDocument::new(width, height);

    let longest = shown
        .iter()
        .map(|f| text_width(&f.feature, 9.0))
        .fold(0.0, f64::max);
    let area = PlotArea {
        left: 50.0,
        top: 36.0,
        right: doc.width() - 12.0,
        bottom: doc.height() - (longest * 0.75 + 16.0).min(doc.height() * 0.45),
    };

    let lo = shown.iter().map(|f| f.score).fold(0.0, f64::min);
    let hi = shown.iter().map(|f| f.score).fold(0.0, f64::max);
    let y = Scale::padded(lo, hi, 0.05, area.bottom, area.top);

    draw_title(&mut doc, title, 15.0);
    draw_y_axis(&mut doc, &area, &y, None);

    let slot = area.width() / shown.len() as f64;
    let bar_w = slot * 0.8;
    let zero = y.map(0.0);
    let label_font = Font::new(9.0).anchor(Anchor::End).rotate(-45.0);

    for (i, feature) in shown.iter().enumerate() {
        let x = area.left + i as f64 * slot + (slot - bar_w) / 2.0;
        let top = y.map(feature.score);
        let (bar_top, bar_h) = if top < zero {
            (top, zero - top)
        } else {
            (zero, top - zero)
        };
        doc.rect(x, bar_top, bar_w, bar_h, BAR_COLOR, None);
        doc.text(x + bar_w / 2.0, area.bottom + 8.0, &feature.feature, &label_font);
    }
    doc.line(area.left, zero, area.right, zero, "#4d4d4d", 1.0);

    surface.show_figure(Figure {
        title: title.to_string(),
        width,
        height,
        svg: doc.finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;

    fn ranked() -> Vec<RankedFeature> {
        vec![
            RankedFeature {
                feature: "OverallQual".into(),
                score: 0.79,
            },
            RankedFeature {
                feature: "KitchenAbvGr".into(),
                score: -0.14,
            },
            RankedFeature {
                feature: "LotArea".into(),
                score: 0.1,
            },
        ]
    }

    #[test]
    fn test_truncates_to_k() {
        let mut surface = MemorySurface::new();
        render_top_bar_chart(&ranked(), 2, "Top Pearson Correlations", &mut surface).unwrap();

        let fig = surface.figures().next().unwrap();
        assert!(fig.svg.contains("OverallQual"));
        assert!(fig.svg.contains("KitchenAbvGr"));
        assert!(!fig.svg.contains("LotArea"));
        assert_eq!((fig.width, fig.height), (480, 240));
    }

    #[test]
    fn test_empty_ranking_is_noop() {
        let mut surface = MemorySurface::new();
        render_top_bar_chart(&[], 5, "Top", &mut surface).unwrap();
        assert!(surface.is_empty());
    }
}
