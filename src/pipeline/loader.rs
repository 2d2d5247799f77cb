//! Bin table loader for CSV and Parquet files
//!
//! Expected columns: `score_range`, `midpoint`, `population`, `default_count`
//! and optionally `default_rate_pct` (percent, e.g. 31.35). Columns are read
//! into `BinColumns` so file input goes through the same shape check as the
//! embedded table.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::bins::{BinColumns, ScorecardBin};
use super::error::ScorecardError;

pub const SCORE_RANGE_COLUMN: &str = "score_range";
pub const MIDPOINT_COLUMN: &str = "midpoint";
pub const POPULATION_COLUMN: &str = "population";
pub const DEFAULT_COUNT_COLUMN: &str = "default_count";
pub const DEFAULT_RATE_COLUMN: &str = "default_rate_pct";

/// Read a bin table file into a DataFrame (CSV or Parquet based on extension)
pub fn read_bin_frame(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read bin table: {}", path.display()))
}

/// Extract the parallel bin fields from a DataFrame
pub fn columns_from_frame(df: &DataFrame) -> Result<BinColumns> {
    let score_ranges = string_values(require_column(df, SCORE_RANGE_COLUMN)?)?;
    let midpoints = float_values(require_column(df, MIDPOINT_COLUMN)?)?;
    let populations = count_values(require_column(df, POPULATION_COLUMN)?)?;
    let default_counts = count_values(require_column(df, DEFAULT_COUNT_COLUMN)?)?;
    let default_rates_pct = match df.column(DEFAULT_RATE_COLUMN) {
        Ok(col) => Some(float_values(col)?),
        Err(_) => None,
    };

    Ok(BinColumns {
        score_ranges,
        midpoints,
        populations,
        default_counts,
        default_rates_pct,
    })
}

/// Load and validate a bin table from a CSV or Parquet file
pub fn load_bin_table(path: &Path) -> Result<Vec<ScorecardBin>> {
    let df = read_bin_frame(path)?;
    let columns = columns_from_frame(&df)?;
    let bins = columns
        .into_bins()
        .with_context(|| format!("Invalid bin table: {}", path.display()))?;
    Ok(bins)
}

fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| {
        let available = df.get_column_names().iter().map(|s| s.to_string()).collect();
        anyhow::Error::new(ScorecardError::MissingColumn {
            column: name.to_string(),
            available,
        })
    })
}

fn string_values(column: &Column) -> Result<Vec<String>> {
    let cast = column
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' cannot be read as text", column.name()))?;
    let ca = cast.str()?;
    ca.iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(|s| s.to_string())
                .with_context(|| format!("Column '{}' has a null value at row {}", column.name(), row))
        })
        .collect()
}

fn float_values(column: &Column) -> Result<Vec<f64>> {
    let cast = column.cast(&DataType::Float64).with_context(|| {
        format!("Column '{}' must be numeric (cannot cast to Float64)", column.name())
    })?;
    let ca = cast.f64()?;
    ca.iter()
        .enumerate()
        .map(|(row, v)| {
            v.with_context(|| format!("Column '{}' has a null value at row {}", column.name(), row))
        })
        .collect()
}

fn count_values(column: &Column) -> Result<Vec<u64>> {
    let cast = column.cast(&DataType::Int64).with_context(|| {
        format!("Column '{}' must contain integer counts", column.name())
    })?;
    let ca = cast.i64()?;
    ca.iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(n) if n >= 0 => Ok(n as u64),
            Some(n) => bail!(
                "Column '{}' has a negative count {} at row {}",
                column.name(),
                n,
                row
            ),
            None => bail!("Column '{}' has a null value at row {}", column.name(), row),
        })
        .collect()
}
