//! Error types for the backstrat engine.
//!
//! This module defines the error taxonomy used throughout the backstrat
//! ecosystem. Parameter and math-domain errors abort a recomputation before
//! any partial result is produced; per-row degeneracies (an empty
//! cross-section, a zero-volatility series) are instead absorbed into the
//! output as missing values and never surface through this type.

use thiserror::Error;

/// The main error type for backstrat operations.
///
/// This enum encompasses all error cases that can occur when validating
/// parameters, loading panels, and computing strategy returns.
#[derive(Debug, Error)]
pub enum BackstratError {
    /// A backtest parameter is outside its accepted range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A cross-section or return series is degenerate (empty, zero volatility).
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A periodic return at or below -100% was fed into the compounding utility.
    #[error("Math domain error: {0}")]
    MathDomain(String),

    /// The requested strategy selector is recognized but not implemented.
    #[error("Unsupported strategy: {0}")]
    UnsupportedStrategy(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from the data.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error when a date is out of range or cannot be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for BackstratError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for BackstratError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for backstrat operations.
///
/// This is a convenience type that uses [`BackstratError`] as the error type.
pub type Result<T> = std::result::Result<T, BackstratError>;
