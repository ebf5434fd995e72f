//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;
use valuater::pipeline::{Column as DatasetColumn, Dataset};

/// Number of rows in [`create_house_dataframe`]
pub const HOUSE_ROWS: usize = 30;

/// Create a small housing DataFrame with known characteristics
///
/// This DataFrame includes:
/// - `SalePrice`: target, linear in `GrLivArea` and `OverallQual`
/// - `GrLivArea`: strongly correlated with the target
/// - `OverallQual`: quality grade 1-10, used for scatter colouring
/// - `YearBuilt`: weakly related
/// - `LotArea`: scrambled noise
/// - `PoolArea`: constant (zero variance)
/// - `Neighborhood`: categorical
pub fn create_house_dataframe() -> DataFrame {
    let idx: Vec<i64> = (0..HOUSE_ROWS as i64).collect();
    let gr_liv_area: Vec<f64> = idx
        .iter()
        .map(|&i| 800.0 + 50.0 * i as f64 + ((i * 37) % 11) as f64 * 10.0)
        .collect();
    let overall_qual: Vec<i64> = idx.iter().map(|&i| 1 + i / 3).collect();
    let year_built: Vec<i64> = idx.iter().map(|&i| 1950 + (i * 7) % 60).collect();
    let lot_area: Vec<f64> = idx
        .iter()
        .map(|&i| 5000.0 + ((i * 7919) % 97) as f64 * 53.0)
        .collect();
    let pool_area = vec![0.0f64; HOUSE_ROWS];
    let neighborhood: Vec<&str> = idx
        .iter()
        .map(|&i| ["NAmes", "CollgCr", "OldTown"][(i % 3) as usize])
        .collect();
    let sale_price: Vec<f64> = gr_liv_area
        .iter()
        .zip(&overall_qual)
        .map(|(&area, &qual)| 50_000.0 + 120.0 * area + 8_000.0 * qual as f64)
        .collect();

    df! {
        "GrLivArea" => gr_liv_area,
        "OverallQual" => overall_qual,
        "YearBuilt" => year_built,
        "LotArea" => lot_area,
        "PoolArea" => pool_area,
        "Neighborhood" => neighborhood,
        "SalePrice" => sale_price,
    }
    .unwrap()
}

/// Validated [`Dataset`] built from [`create_house_dataframe`]
pub fn create_house_dataset() -> Dataset {
    Dataset::from_dataframe(&create_house_dataframe()).unwrap()
}

/// Dataset with `x`, `y = 2x` and `cube = x^3`
pub fn create_monotonic_dataset() -> Dataset {
    let xs: Vec<f64> = (1..=12).map(|i| i as f64).collect();
    Dataset::new(vec![
        DatasetColumn::numeric("x", xs.clone()),
        DatasetColumn::numeric("y", xs.iter().map(|x| 2.0 * x).collect()),
        DatasetColumn::numeric("cube", xs.iter().map(|x| x * x * x).collect()),
    ])
    .unwrap()
}

/// Seeded random numeric dataset with a `SalePrice` column and `cols` features
pub fn create_large_house_dataset(rows: usize, cols: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns = Vec::with_capacity(cols + 1);
    let mut price = vec![100_000.0; rows];
    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 100.0).collect();
        if i % 3 == 0 {
            for (p, v) in price.iter_mut().zip(&values) {
                *p += v * 1_000.0;
            }
        }
        columns.push(DatasetColumn::numeric(format!("feature_{}", i), values));
    }
    for p in price.iter_mut() {
        *p += rng.gen::<f64>() * 5_000.0;
    }
    columns.push(DatasetColumn::numeric("SalePrice", price));

    Dataset::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("houses.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("houses.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a dataset contains specific columns
pub fn assert_has_columns(dataset: &Dataset, expected_cols: &[&str]) {
    for col in expected_cols {
        assert!(
            dataset.contains(col),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            dataset.column_names()
        );
    }
}
