//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::dataset::{Column as DatasetColumn, Dataset};
use super::error::AnalysisError;

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_lazy(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    // 0 means full table scan
    let infer = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(infer)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load a file into a validated [`Dataset`].
///
/// Returns the dataset together with the estimated in-memory size of the
/// source frame in megabytes.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<(Dataset, f64)> {
    load_dataset_columns(path, infer_schema_length, &[])
}

/// Like [`load_dataset`], keeping only `columns` (all columns when empty)
pub fn load_dataset_columns(
    path: &Path,
    infer_schema_length: usize,
    columns: &[String],
) -> Result<(Dataset, f64)> {
    let mut lf = load_lazy(path, infer_schema_length)?;
    if !columns.is_empty() {
        let exprs: Vec<Expr> = columns.iter().map(|name| col(name.as_str())).collect();
        lf = lf.select(exprs);
    }

    let df = lf
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    log::debug!(
        "collected {} rows x {} columns ({:.2} MB) from {}",
        df.height(),
        df.width(),
        memory_mb,
        path.display()
    );

    let dataset = Dataset::from_dataframe(&df)
        .with_context(|| format!("Dataset {} failed validation", path.display()))?;

    Ok((dataset, memory_mb))
}

impl Dataset {
    /// Convert a polars frame into a validated dataset.
    ///
    /// Numeric dtypes become numeric columns; strings, booleans and
    /// categoricals become categorical columns. Nulls and any other dtype are
    /// rejected here so analysis never sees them.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, AnalysisError> {
        let mut columns = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let name = col.name().to_string();

            if col.null_count() > 0 {
                return Err(AnalysisError::invalid(format!(
                    "column '{}' contains {} missing value(s)",
                    name,
                    col.null_count()
                )));
            }

            let dtype = col.dtype();
            if dtype.is_primitive_numeric() {
                let float_col = col
                    .cast(&DataType::Float64)
                    .map_err(|e| AnalysisError::invalid(format!("column '{}': {}", name, e)))?;
                let ca = float_col
                    .f64()
                    .map_err(|e| AnalysisError::invalid(format!("column '{}': {}", name, e)))?;
                let values: Vec<f64> = ca.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
                columns.push(DatasetColumn::numeric(name, values));
            } else if matches!(
                dtype,
                DataType::String | DataType::Boolean | DataType::Categorical(_, _) | DataType::Enum(_, _)
            ) {
                let str_col = col
                    .cast(&DataType::String)
                    .map_err(|e| AnalysisError::invalid(format!("column '{}': {}", name, e)))?;
                let ca = str_col
                    .str()
                    .map_err(|e| AnalysisError::invalid(format!("column '{}': {}", name, e)))?;
                let values: Vec<String> = ca
                    .iter()
                    .map(|v| v.unwrap_or_default().to_string())
                    .collect();
                columns.push(DatasetColumn::categorical(name, values));
            } else {
                return Err(AnalysisError::invalid(format!(
                    "column '{}' has unsupported dtype {}",
                    name, dtype
                )));
            }
        }

        Dataset::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ColumnKind;

    #[test]
    fn test_from_dataframe_maps_kinds() {
        let df = df! {
            "price" => [100i64, 200, 300],
            "quality" => ["Gd", "TA", "Ex"],
            "central_air" => [true, false, true],
        }
        .unwrap();

        let ds = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(ds.shape(), (3, 3));
        assert_eq!(ds.column("price").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(ds.column("quality").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(
            ds.column("central_air").unwrap().kind(),
            ColumnKind::Categorical
        );
        assert_eq!(ds.numeric("price").unwrap(), &[100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_load_dataset_columns_selects() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("houses.csv");
        std::fs::write(&path, "LotArea,GrLivArea,SalePrice\n1,2,3\n4,5,6\n").unwrap();

        let selected = vec!["GrLivArea".to_string(), "SalePrice".to_string()];
        let (ds, _) = load_dataset_columns(&path, 100, &selected).unwrap();
        assert_eq!(ds.column_names(), vec!["GrLivArea", "SalePrice"]);

        let missing = vec!["Nope".to_string()];
        assert!(load_dataset_columns(&path, 100, &missing).is_err());
    }

    #[test]
    fn test_from_dataframe_rejects_nulls() {
        let df = df! {
            "a" => [Some(1.0f64), None, Some(3.0)],
        }
        .unwrap();

        let err = Dataset::from_dataframe(&df).unwrap_err();
        assert!(err.to_string().contains("missing value"));
    }
}
