#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/backstrat/backstrat/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # backstrat
//!
//! Long/short factor strategy backtesting over monthly return panels.
//!
//! backstrat is an umbrella crate that re-exports all backstrat sub-crates
//! for convenience. It provides a unified API for loading return and factor
//! panels, constructing point-in-time selection masks, and scoring the
//! resulting long/short strategies against a market benchmark.
//!
//! ## Quick Start
//!
//! ```ignore
//! use backstrat::eval::{run_backtest, BacktestParams};
//! use backstrat::signals::registry::StrategyKind;
//! use backstrat::types::{BacktestData, BenchmarkSeries, Panel};
//!
//! # fn main() -> backstrat::Result<()> {
//! // Bundle the immutable inputs once...
//! let data = BacktestData::new(returns, size_factor, benchmark)?;
//!
//! // ...then recompute freely per parameter set.
//! let params = BacktestParams {
//!     strategy: StrategyKind::Momentum,
//!     window: 3,
//!     quantile: 0.25,
//!     ..Default::default()
//! };
//! let run = run_backtest(&data, &params)?;
//! println!("Sharpe: {:.2}", run.summary.strategy.sharpe_ratio);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`types`] - Panel and benchmark containers, error taxonomy, `Strategy` trait
//! - [`signals`] - Quantile masker, momentum and SMB builders, strategy registry
//! - [`eval`] - Performance evaluator and the backtest engine
//!
//! ## Architecture
//!
//! backstrat follows a one-way data flow:
//!
//! 1. **Panels** are loaded once and stay immutable for the run
//! 2. **The masker** turns a lagged cross-section into low/high buckets
//! 3. **Strategy builders** aggregate bucket returns into a spread series
//! 4. **The evaluator** annualizes the series and builds the summary table

/// Version information for the backstrat crate.
///
/// This constant contains the current version of backstrat as specified in
/// Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core type definitions for backstrat.
///
/// Re-exports the panel containers, the error taxonomy, the statistical
/// utilities, and the [`Strategy`] trait implemented by the builders.
pub mod types {
    pub use backstrat_traits::*;
}

// Re-export core trait and error types at top level for convenience
pub use backstrat_traits::{BackstratError, Result, Strategy, StrategyOutput};

// Re-export common types
pub use backstrat_traits::{BacktestData, BenchmarkSeries, Date, Panel, Symbol};

// ============================================================================
// Strategy Builders
// ============================================================================

/// Strategy implementations and the quantile masker.
///
/// - **Momentum**: long prior-period winners, short prior-period losers,
///   with a rolling completeness filter over the estimation window
/// - **SmallMinusBig**: long the small tail of the size factor, short the
///   big tail, with an excludable non-investable column
/// - **registry**: the recognized strategy selectors, including the
///   reserved value factor
pub mod signals {
    pub use backstrat_signals::*;
}

// ============================================================================
// Evaluation
// ============================================================================

/// Performance evaluation and the backtest engine.
///
/// Annualized return and volatility scale periodic statistics by the
/// annualization factor (12 for the monthly panels this engine targets);
/// the Sharpe ratio relates excess return to volatility and signals a
/// degenerate zero-volatility series instead of dividing by zero.
pub mod eval {
    pub use backstrat_eval::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use backstrat::prelude::*;
/// ```
///
/// This brings into scope the panel containers, the `Strategy` trait, the
/// backtest engine, and the error types.
pub mod prelude {
    pub use crate::eval::{run_backtest, Backtest, BacktestParams, BacktestRun};
    pub use crate::signals::registry::StrategyKind;
    pub use crate::{BackstratError, Result, Strategy, StrategyOutput};
    pub use crate::{BacktestData, BenchmarkSeries, Date, Panel, Symbol};
}

// ============================================================================
// Tests
// ============================================================================
