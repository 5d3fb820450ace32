//! Data loading utilities for the backstrat CLI.

use std::path::Path;

use polars::prelude::*;

use backstrat_traits::{BackstratError, BenchmarkSeries, Panel};

/// Read a CSV file into a DataFrame.
fn read_csv(path: &Path) -> Result<DataFrame, BackstratError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| BackstratError::InvalidData(format!("{}: {e}", path.display())))?
        .finish()
        .map_err(|e| BackstratError::InvalidData(format!("{}: {e}", path.display())))?;
    Ok(df)
}

/// Load a wide panel CSV: one date column plus one value column per entity.
pub(crate) fn load_panel(path: &Path, date_column: &str) -> Result<Panel, BackstratError> {
    let df = read_csv(path)?;
    Panel::from_dataframe(&df, date_column)
}

/// Load a benchmark CSV holding a date column and a periodic-return column.
pub(crate) fn load_benchmark(
    path: &Path,
    date_column: &str,
    value_column: &str,
) -> Result<BenchmarkSeries, BackstratError> {
    let df = read_csv(path)?;
    BenchmarkSeries::from_dataframe(&df, date_column, value_column)
}
