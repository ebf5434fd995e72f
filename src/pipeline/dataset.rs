//! Strongly-typed, validated, immutable dataset

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::error::AnalysisError;

/// Kind of values held by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Values of a single column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<S>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Numeric values, or `None` for categorical columns
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Number of distinct values (numeric values compared by bit pattern)
    pub fn distinct_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v
                .iter()
                .map(|x| normalize_zero(*x).to_bits())
                .collect::<HashSet<_>>()
                .len(),
            ColumnData::Categorical(v) => v.iter().collect::<HashSet<_>>().len(),
        }
    }

    /// Label-encoded values: numeric columns are returned as-is, categorical
    /// values are mapped to the index of the value in sorted distinct order.
    pub fn encoded(&self) -> Vec<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.clone(),
            ColumnData::Categorical(v) => {
                let codes: BTreeMap<&str, usize> = v
                    .iter()
                    .map(String::as_str)
                    .collect::<std::collections::BTreeSet<_>>()
                    .into_iter()
                    .enumerate()
                    .map(|(code, value)| (value, code))
                    .collect();
                v.iter().map(|s| codes[s.as_str()] as f64).collect()
            }
        }
    }

    /// Display form of the value at `row`
    pub fn value_string(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).map(|x| format_number(*x)).unwrap_or_default(),
            ColumnData::Categorical(v) => v.get(row).cloned().unwrap_or_default(),
        }
    }
}

/// Immutable tabular dataset: ordered, uniquely named columns of equal length.
///
/// Validation happens once in [`Dataset::new`]; every analysis downstream can
/// rely on rectangular, finite, non-missing data.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, AnalysisError> {
        if columns.is_empty() {
            return Err(AnalysisError::invalid("dataset has no columns"));
        }

        let mut seen = HashSet::new();
        for col in &columns {
            if col.name.trim().is_empty() {
                return Err(AnalysisError::invalid("column names must not be empty"));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(AnalysisError::invalid(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }

        let rows = columns[0].len();
        for col in &columns {
            if col.len() != rows {
                return Err(AnalysisError::invalid(format!(
                    "column '{}' has {} rows, expected {}",
                    col.name,
                    col.len(),
                    rows
                )));
            }
            if let Some(values) = col.as_numeric() {
                if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
                    return Err(AnalysisError::invalid(format!(
                        "column '{}' contains a non-finite value at row {}",
                        col.name, pos
                    )));
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric values of a column, `None` if missing or categorical
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::as_numeric)
    }

    /// First `n` rows formatted for display, one `Vec` of cells per row
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..n.min(self.rows))
            .map(|row| self.columns.iter().map(|c| c.value_string(row)).collect())
            .collect()
    }
}

fn normalize_zero(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

/// Integers print without a fractional part, everything else with up to 4 decimals
pub(crate) fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        let s = format!("{:.4}", x);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
