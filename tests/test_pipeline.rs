//! End-to-end tests running the valuater binary

use assert_cmd::Command;
use predicates::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn svg_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".svg"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_full_run_writes_figures_and_report() {
    let mut df = create_house_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("out");

    Command::cargo_bin("valuater")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-o")
        .arg(&out)
        .args(["--features", "GrLivArea,LotArea,GarageArea"])
        .args(["--all", "--no-confirm", "--bundle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pearson Correlation"))
        .stdout(predicate::str::contains("Features not in dataset: GarageArea"));

    let figures = svg_files(&out);
    // 2 heatmaps + 2 bar charts for the correlations, 2 views per present feature, 1 relevance heatmap
    assert_eq!(figures.len(), 9, "figures: {:?}", figures);
    assert!(figures[0].starts_with("01_"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("analysis.json")).unwrap()).unwrap();
    assert_eq!(report["metadata"]["target_column"], "SalePrice");
    assert!(report["pearson"]["ranking"].is_array());
    assert!(report["spearman"]["matrix"].is_object());
    assert_eq!(report["relevance"]["config"]["folds"], 4);

    let text_log = std::fs::read_to_string(out.join("analysis.md")).unwrap();
    assert!(text_log.contains("Sale Price Correlation Study"));

    assert!(temp_dir.path().join("out.zip").exists());
}

#[test]
fn test_no_sections_without_flags() {
    let mut df = create_house_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("out");

    Command::cargo_bin("valuater")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-o")
        .arg(&out)
        .arg("--no-confirm")
        .assert()
        .success();

    assert!(svg_files(&out).is_empty());
    assert!(!out.join("analysis.json").exists());
}

#[test]
fn test_missing_target_fails_without_prompt() {
    let mut df = create_house_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);

    Command::cargo_bin("valuater")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .args(["-t", "Price", "--no-confirm", "--pearson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target column 'Price' not found"));
}

#[test]
fn test_constant_target_skips_correlation() {
    let mut df = create_house_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("out");

    Command::cargo_bin("valuater")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-o")
        .arg(&out)
        .args(["-t", "PoolArea", "--no-confirm", "--pearson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zero variance"));

    assert!(svg_files(&out).is_empty());
}

#[test]
fn test_missing_input_fails() {
    Command::cargo_bin("valuater")
        .unwrap()
        .args(["-i", "/nonexistent/houses.csv", "--no-confirm"])
        .assert()
        .failure();
}
