//! Console summaries: rankings, data sample and the run summary

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{Dataset, RankedFeature};

/// Summary of one analysis run
#[derive(Debug, Default)]
pub struct AnalysisSummary {
    pub rows: usize,
    pub columns: usize,
    pub sections_run: Vec<String>,
    pub sections_skipped: Vec<String>,
    pub figures: usize,
    pub timings: Vec<(String, Duration)>,
}

impl AnalysisSummary {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn add_section(&mut self, name: &str, elapsed: Duration) {
        self.sections_run.push(name.to_string());
        self.timings.push((name.to_string(), elapsed));
    }

    pub fn skip_section(&mut self, name: &str) {
        self.sections_skipped.push(name.to_string());
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("🧮 Columns"), Cell::new(self.columns)]);
        table.add_row(vec![
            Cell::new("✅ Sections Run"),
            Cell::new(self.sections_run.len()).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("⏭️  Sections Skipped"),
            Cell::new(self.sections_skipped.len()).fg(if self.sections_skipped.is_empty() {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("🖼️  Figures"),
            Cell::new(self.figures)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.timings.is_empty() {
            println!();
            for (name, elapsed) in &self.timings {
                println!(
                    "      {} {:<28} {}",
                    style("•").dim(),
                    name,
                    style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
                );
            }
        }
    }
}

/// Table of ranked features with signed scores
pub fn ranking_table(ranked: &[RankedFeature]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
    ]);

    for (i, feature) in ranked.iter().enumerate() {
        let color = if feature.score < 0.0 {
            Color::Red
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&feature.feature),
            Cell::new(format!("{:+.3}", feature.score)).fg(color),
        ]);
    }
    table
}

/// Print a ranking under a heading, indented like the rest of the output
pub fn print_ranking(title: &str, ranked: &[RankedFeature]) {
    println!();
    println!("      {}", style(title).yellow());
    for line in ranking_table(ranked).to_string().lines() {
        println!("      {}", line);
    }
}

/// Table with the first `n` rows of the dataset
pub fn sample_table(dataset: &Dataset, n: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        dataset
            .column_names()
            .into_iter()
            .map(|name| Cell::new(name).add_attribute(Attribute::Bold)),
    );
    for row in dataset.head(n) {
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Column;

    #[test]
    fn test_ranking_table_lists_features_in_order() {
        let ranked = vec![
            RankedFeature {
                feature: "OverallQual".to_string(),
                score: 0.79,
            },
            RankedFeature {
                feature: "EnclosedPorch".to_string(),
                score: -0.13,
            },
        ];
        let rendered = ranking_table(&ranked).to_string();
        let first = rendered.find("OverallQual").unwrap();
        let second = rendered.find("EnclosedPorch").unwrap();
        assert!(first < second);
        assert!(rendered.contains("-0.130"));
    }

    #[test]
    fn test_sample_table_limits_rows() {
        let ds = Dataset::new(vec![Column::numeric(
            "SalePrice",
            (0..20).map(|i| i as f64 * 1000.0).collect(),
        )])
        .unwrap();
        let rendered = sample_table(&ds, 10).to_string();
        assert!(rendered.contains("9000"));
        assert!(!rendered.contains("10000"));
    }

    #[test]
    fn test_summary_records_sections() {
        let mut summary = AnalysisSummary::new(10, 3);
        summary.add_section("Pearson", Duration::from_millis(5));
        summary.skip_section("Relevance");
        assert_eq!(summary.sections_run, vec!["Pearson"]);
        assert_eq!(summary.sections_skipped, vec!["Relevance"]);
    }
}
