//! Per-feature views against the target: 2-D histogram and grouped scatter

use std::collections::BTreeMap;

use anyhow::Result;

use super::axes::{draw_title, draw_x_axis, draw_y_axis, PlotArea, Scale};
use super::colormap::{generate_palette, Colormap};
use super::heatmap::PIXELS_PER_INCH;
use super::surface::{DisplaySurface, Figure};
use super::svg::{Anchor, Font, SvgDocument};
use crate::pipeline::{Column, Dataset};

/// Most legend entries drawn before the rest are summarized
const MAX_LEGEND_ENTRIES: usize = 12;

const POINT_COLOR: &str = "#1f77b4";

/// Histogram and scatter of `feature` against `target`.
///
/// The scatter is coloured by `group_by` when that column exists. Missing or
/// non-numeric feature/target columns skip both figures.
pub fn render_feature_vs_target<S>(
    dataset: &Dataset,
    feature: &str,
    target: &str,
    group_by: Option<&str>,
    surface: &mut S,
) -> Result<()>
where
    S: DisplaySurface + ?Sized,
{
    let (Some(xs), Some(ys)) = (dataset.numeric(feature), dataset.numeric(target)) else {
        log::warn!(
            "skipping '{}' vs '{}': both columns must exist and be numeric",
            feature,
            target
        );
        return Ok(());
    };
    if xs.is_empty() {
        log::warn!("skipping '{}' vs '{}': dataset is empty", feature, target);
        return Ok(());
    }

    let groups = group_by.and_then(|name| {
        let col = dataset.column(name);
        if col.is_none() {
            log::warn!("group column '{}' not found, scatter will be uncoloured", name);
        }
        col
    });

    surface.show_figure(histogram_figure(xs, ys, feature, target))?;
    surface.show_figure(scatter_figure(xs, ys, feature, target, groups))
}

fn view_size() -> (u32, u32) {
    ((8.0 * PIXELS_PER_INCH) as u32, (5.0 * PIXELS_PER_INCH) as u32)
}

fn plot_area(doc: &SvgDocument, legend: bool) -> PlotArea {
    PlotArea {
        left: 80.0,
        top: 44.0,
        right: doc.width() - if legend { 110.0 } else { 20.0 },
        bottom: doc.height() - 40.0,
    }
}

fn bin_count(n: usize) -> usize {
    ((n as f64).sqrt().ceil() as usize).clamp(5, 30)
}

fn bin_of(value: f64, min: f64, max: f64, bins: usize) -> usize {
    if max <= min {
        return 0;
    }
    (((value - min) / (max - min) * bins as f64) as usize).min(bins - 1)
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Bivariate histogram: counts per (x bin, y bin), darker is denser
fn histogram_figure(xs: &[f64], ys: &[f64], feature: &str, target: &str) -> Figure {
    let (width, height) = view_size();
    let mut doc = SvgDocument::new(width, height);
    let area = plot_area(&doc, false);

    let bins = bin_count(xs.len());
    let (x_min, x_max) = bounds(xs);
    let (y_min, y_max) = bounds(ys);

    let mut counts = vec![vec![0usize; bins]; bins];
    for (&x, &y) in xs.iter().zip(ys) {
        counts[bin_of(x, x_min, x_max, bins)][bin_of(y, y_min, y_max, bins)] += 1;
    }
    let max_count = counts.iter().flatten().copied().max().unwrap_or(0).max(1);

    let x_scale = Scale::new(x_min, x_max, area.left, area.right);
    let y_scale = Scale::new(y_min, y_max, area.bottom, area.top);

    draw_title(&mut doc, feature, 20.0);
    draw_x_axis(&mut doc, &area, &x_scale, Some(feature));
    draw_y_axis(&mut doc, &area, &y_scale, Some(target));

    let cell_w = area.width() / bins as f64;
    let cell_h = area.height() / bins as f64;
    for (bx, column) in counts.iter().enumerate() {
        for (by, &count) in column.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let t = count as f64 / max_count as f64;
            doc.rect(
                area.left + bx as f64 * cell_w,
                area.bottom - (by as f64 + 1.0) * cell_h,
                cell_w,
                cell_h,
                &Colormap::Blues.hex(t),
                None,
            );
        }
    }

    Figure {
        title: format!("{} histogram", feature),
        width,
        height,
        svg: doc.finish(),
    }
}

/// Colour assignment for the scatter groups, in legend order
fn group_colors(column: &Column) -> (Vec<String>, Vec<(String, String)>) {
    let rows = column.len();
    let labels: Vec<String> = (0..rows).map(|r| column.value_string(r)).collect();

    match column.as_numeric() {
        Some(values) => {
            // numeric groups follow a sequential map, ordered by value
            let (lo, hi) = bounds(values);
            let span = if hi > lo { hi - lo } else { 1.0 };
            let colors: Vec<String> = values
                .iter()
                .map(|v| Colormap::Viridis.hex((v - lo) / span))
                .collect();

            let mut legend: BTreeMap<u64, (f64, String)> = BTreeMap::new();
            for (i, v) in values.iter().enumerate() {
                legend
                    .entry(order_key(*v))
                    .or_insert_with(|| (*v, colors[i].clone()));
            }
            let entries = legend
                .into_values()
                .map(|(v, c)| (crate::pipeline::dataset::format_number(v), c))
                .collect();
            (colors, entries)
        }
        None => {
            let distinct: Vec<String> = {
                let mut d = labels.clone();
                d.sort();
                d.dedup();
                d
            };
            let palette = generate_palette(distinct.len());
            let lookup: BTreeMap<&str, &String> = distinct
                .iter()
                .map(String::as_str)
                .zip(palette.iter())
                .collect();
            let colors = labels.iter().map(|l| lookup[l.as_str()].clone()).collect();
            let entries = distinct.iter().cloned().zip(palette.iter().cloned()).collect();
            (colors, entries)
        }
    }
}

/// Key that sorts like the float it came from
fn order_key(v: f64) -> u64 {
    let bits = v.to_bits();
    if v.is_sign_negative() {
        !bits
    } else {
        bits | (1 << 63)
    }
}

fn scatter_figure(
    xs: &[f64],
    ys: &[f64],
    feature: &str,
    target: &str,
    groups: Option<&Column>,
) -> Figure {
    let (width, height) = view_size();
    let mut doc = SvgDocument::new(width, height);
    let area = plot_area(&doc, groups.is_some());

    let (x_min, x_max) = bounds(xs);
    let (y_min, y_max) = bounds(ys);
    let x_scale = Scale::padded(x_min, x_max, 0.03, area.left, area.right);
    let y_scale = Scale::padded(y_min, y_max, 0.03, area.bottom, area.top);

    draw_title(&mut doc, feature, 20.0);
    draw_x_axis(&mut doc, &area, &x_scale, Some(feature));
    draw_y_axis(&mut doc, &area, &y_scale, Some(target));

    let (colors, legend) = match groups {
        Some(col) => {
            let (colors, legend) = group_colors(col);
            (Some(colors), Some((col.name(), legend)))
        }
        None => (None, None),
    };

    for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
        let color = colors.as_ref().map_or(POINT_COLOR, |c| c[i].as_str());
        doc.circle(x_scale.map(x), y_scale.map(y), 3.0, color, 0.8);
    }

    if let Some((name, entries)) = legend {
        draw_legend(&mut doc, &area, name, &entries);
    }

    Figure {
        title: format!("{} scatter", feature),
        width,
        height,
        svg: doc.finish(),
    }
}

fn draw_legend(doc: &mut SvgDocument, area: &PlotArea, name: &str, entries: &[(String, String)]) {
    let x = area.right + 14.0;
    let mut y = area.top + 6.0;
    doc.text(x, y, name, &Font::new(10.0).bold());

    let font = Font::new(9.0).anchor(Anchor::Start);
    for (label, color) in entries.iter().take(MAX_LEGEND_ENTRIES) {
        y += 15.0;
        doc.circle(x + 4.0, y, 4.0, color, 1.0);
        doc.text(x + 14.0, y, label, &font);
    }
    if entries.len() > MAX_LEGEND_ENTRIES {
        y += 15.0;
        doc.text(
            x,
            y,
            &format!("+{} more", entries.len() - MAX_LEGEND_ENTRIES),
            &font,
        );
    }
}
