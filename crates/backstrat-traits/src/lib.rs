#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/backstrat/backstrat/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions for the backstrat backtesting engine.
//!
//! This crate provides the foundational abstractions for building and
//! scoring long/short factor strategies: the panel containers, the error
//! taxonomy, the compounding and masked-aggregation utilities, and the
//! `Strategy` trait implemented by the concrete builders.

/// The version of the backstrat-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod stats;
pub mod strategy;
pub mod types;

// Re-exports
pub use error::{BackstratError, Result};
pub use strategy::{Strategy, StrategyOutput};
pub use types::{BacktestData, BenchmarkSeries, Date, Panel, Symbol};
