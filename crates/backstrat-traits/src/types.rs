//! Common types used throughout the backstrat engine.
//!
//! This module defines the panel and benchmark containers consumed by the
//! strategy builders. Panels are read-only inputs supplied once per run;
//! every derived quantity (masks, spreads, summaries) is recomputed from
//! them without mutation.

use ndarray::{Array2, ArrayView1};
use polars::prelude::*;

use crate::error::{BackstratError, Result};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// An entity identifier: an asset ticker or a factor column name.
pub type Symbol = String;

/// Offset between the polars date epoch (days since 1970-01-01) and
/// chrono's day count from the common era.
const POLARS_DATE_EPOCH_OFFSET: i32 = 719_163;

fn date_from_days(days: i32) -> Result<Date> {
    Date::from_num_days_from_ce_opt(days + POLARS_DATE_EPOCH_OFFSET)
        .ok_or_else(|| BackstratError::InvalidDate(format!("day offset {days} is out of range")))
}

/// Parse a date string, accepting ISO (`2024-01-31`) and US (`01/31/2024`) forms.
pub fn parse_date(s: &str) -> Result<Date> {
    Date::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| Date::parse_from_str(s, "%m/%d/%Y"))
        .map_err(|e| BackstratError::InvalidDate(format!("{s}: {e}")))
}

/// A time-indexed table of real values: rows are dates, columns are entities.
///
/// Missing observations are encoded as `NaN`. The date index is
/// chronologically ordered and unique, and entity names are unique; both
/// invariants are checked at construction.
///
/// # Example
///
/// ```
/// use backstrat_traits::{Panel, Date};
/// use ndarray::array;
///
/// let panel = Panel::new(
///     vec![
///         Date::from_ymd_opt(2024, 1, 31).unwrap(),
///         Date::from_ymd_opt(2024, 2, 29).unwrap(),
///     ],
///     vec!["AAA".to_string(), "BBB".to_string()],
///     array![[0.01, 0.02], [0.03, f64::NAN]],
/// )
/// .unwrap();
///
/// assert_eq!(panel.n_periods(), 2);
/// assert_eq!(panel.n_entities(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Panel {
    dates: Vec<Date>,
    entities: Vec<Symbol>,
    values: Array2<f64>,
}

impl Panel {
    /// Creates a panel from a date index, entity names, and a value matrix.
    ///
    /// # Errors
    ///
    /// Returns [`BackstratError::InvalidData`] if the matrix shape does not
    /// match the index lengths, the dates are not strictly increasing, or an
    /// entity name repeats.
    pub fn new(dates: Vec<Date>, entities: Vec<Symbol>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != dates.len() || values.ncols() != entities.len() {
            return Err(BackstratError::InvalidData(format!(
                "value matrix is {}x{} but index is {} dates x {} entities",
                values.nrows(),
                values.ncols(),
                dates.len(),
                entities.len()
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BackstratError::InvalidData(
                "date index must be strictly increasing".to_string(),
            ));
        }
        for (i, name) in entities.iter().enumerate() {
            if entities[..i].contains(name) {
                return Err(BackstratError::InvalidData(format!(
                    "duplicate entity column: {name}"
                )));
            }
        }
        Ok(Self {
            dates,
            entities,
            values,
        })
    }

    /// Builds a panel from a wide DataFrame: one date column plus one value
    /// column per entity.
    ///
    /// The date column may hold either a polars `Date` dtype or parseable
    /// date strings; value columns are cast to `f64` with nulls becoming
    /// `NaN`.
    pub fn from_dataframe(df: &DataFrame, date_column: &str) -> Result<Self> {
        let dates = extract_dates(df, date_column)?;

        let mut entities = Vec::new();
        let mut columns = Vec::new();
        for name in df.get_column_names() {
            if name.as_str() == date_column {
                continue;
            }
            let series = df
                .column(name.as_str())?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let ca = series.f64()?;
            let col: Vec<f64> = ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            entities.push(name.to_string());
            columns.push(col);
        }

        let mut values = Array2::from_elem((dates.len(), entities.len()), f64::NAN);
        for (j, col) in columns.iter().enumerate() {
            for (i, &v) in col.iter().enumerate() {
                values[[i, j]] = v;
            }
        }

        Self::new(dates, entities, values)
    }

    /// Returns the date index.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the entity names in column order.
    pub fn entities(&self) -> &[Symbol] {
        &self.entities
    }

    /// Returns the underlying value matrix (dates x entities).
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of periods (rows).
    pub fn n_periods(&self) -> usize {
        self.dates.len()
    }

    /// Number of entities (columns).
    pub fn n_entities(&self) -> usize {
        self.entities.len()
    }

    /// Returns whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column index of an entity, if present.
    pub fn entity_index(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|e| e == name)
    }

    /// The cross-section at row `t`.
    pub fn row(&self, t: usize) -> ArrayView1<'_, f64> {
        self.values.row(t)
    }

    /// Returns a copy of the panel lagged by `periods` rows.
    ///
    /// Row `t` of the result holds the values observed at `t - periods`;
    /// the first `periods` rows are entirely missing. The date index is
    /// unchanged, so the lagged panel stays aligned to the original dates.
    pub fn shift(&self, periods: usize) -> Self {
        let mut shifted = Array2::from_elem(self.values.dim(), f64::NAN);
        for t in periods..self.values.nrows() {
            for j in 0..self.values.ncols() {
                shifted[[t, j]] = self.values[[t - periods, j]];
            }
        }
        Self {
            dates: self.dates.clone(),
            entities: self.entities.clone(),
            values: shifted,
        }
    }
}

fn extract_dates(df: &DataFrame, date_column: &str) -> Result<Vec<Date>> {
    let column = df
        .column(date_column)
        .map_err(|_| BackstratError::MissingColumn(date_column.to_string()))?;
    let series = column.as_materialized_series();

    match series.dtype() {
        DataType::Date => series
            .date()?
            .into_iter()
            .map(|d| {
                d.ok_or_else(|| BackstratError::InvalidDate("null date entry".to_string()))
                    .and_then(date_from_days)
            })
            .collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .map(|s| {
                s.ok_or_else(|| BackstratError::InvalidDate("null date entry".to_string()))
                    .and_then(parse_date)
            })
            .collect(),
        other => Err(BackstratError::InvalidData(format!(
            "date column {date_column} has unsupported dtype {other}"
        ))),
    }
}

/// A date-keyed periodic return series for a single benchmark instrument.
///
/// The derived cumulative performance index compounds the periodic returns
/// and is rebased to 1.0 at the first observation.
#[derive(Debug, Clone)]
pub struct BenchmarkSeries {
    dates: Vec<Date>,
    returns: Vec<f64>,
}

impl BenchmarkSeries {
    /// Creates a benchmark series from a date index and periodic returns.
    ///
    /// # Errors
    ///
    /// Returns [`BackstratError::InvalidData`] if the lengths differ or the
    /// dates are not strictly increasing.
    pub fn new(dates: Vec<Date>, returns: Vec<f64>) -> Result<Self> {
        if dates.len() != returns.len() {
            return Err(BackstratError::InvalidData(format!(
                "{} dates but {} returns",
                dates.len(),
                returns.len()
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BackstratError::InvalidData(
                "date index must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { dates, returns })
    }

    /// Builds a benchmark series from a DataFrame holding a date column and
    /// a periodic-return column.
    pub fn from_dataframe(df: &DataFrame, date_column: &str, value_column: &str) -> Result<Self> {
        let dates = extract_dates(df, date_column)?;
        let series = df
            .column(value_column)
            .map_err(|_| BackstratError::MissingColumn(value_column.to_string()))?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let returns: Vec<f64> = series
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Self::new(dates, returns)
    }

    /// Returns the date index.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the periodic returns.
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The cumulative compounded performance index, rebased to 1.0 at the
    /// first observation.
    pub fn performance_index(&self) -> Vec<f64> {
        crate::stats::cumulative_curve(&self.returns)
    }
}

/// The immutable input bundle for one backtest run.
///
/// Holds the asset return panel, the size-factor panel, and the benchmark
/// series. Strategies borrow this bundle and never mutate it, so a caller
/// may freely reuse one instance across parameter sweeps.
#[derive(Debug, Clone)]
pub struct BacktestData {
    returns: Panel,
    size_factor: Panel,
    benchmark: BenchmarkSeries,
}

impl BacktestData {
    /// Bundles the three input series.
    ///
    /// # Errors
    ///
    /// Returns [`BackstratError::InvalidData`] if the factor panel does not
    /// cover the same number of periods as the return panel; strategy
    /// outputs are indexed by the return panel's dates.
    pub fn new(returns: Panel, size_factor: Panel, benchmark: BenchmarkSeries) -> Result<Self> {
        if size_factor.n_periods() != returns.n_periods() {
            return Err(BackstratError::InvalidData(format!(
                "factor panel has {} periods but return panel has {}",
                size_factor.n_periods(),
                returns.n_periods()
            )));
        }
        Ok(Self {
            returns,
            size_factor,
            benchmark,
        })
    }

    /// The asset return panel.
    pub const fn returns(&self) -> &Panel {
        &self.returns
    }

    /// The size-factor panel.
    pub const fn size_factor(&self) -> &Panel {
        &self.size_factor
    }

    /// The benchmark series.
    pub const fn benchmark(&self) -> &BenchmarkSeries {
        &self.benchmark
    }
}
