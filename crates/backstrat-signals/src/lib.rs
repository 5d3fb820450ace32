//! Strategy builders for the backstrat backtesting engine.
//!
//! This crate provides the cross-sectional quantile masker and the concrete
//! long/short strategy implementations built on it:
//! - Momentum: long prior-period winners, short prior-period losers
//! - Small-minus-big: long the small tail of the size factor, short the big
//!
//! All selection is point-in-time: masks at date `t` derive strictly from
//! data observed before `t`.
//!
//! # Example
//!
//! ```ignore
//! use backstrat_signals::momentum::{Momentum, MomentumConfig};
//! use backstrat_signals::registry::available_strategies;
//! use backstrat_traits::Strategy;
//!
//! let strategy = Momentum::new(MomentumConfig { window: 3, quantile: 0.25 });
//! let output = strategy.spread_series(&data)?;
//!
//! // Discover recognized selectors
//! let strategies = available_strategies();
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod masker;
pub mod momentum;
pub mod registry;
pub mod smb;

// Re-export key types
pub use masker::{selection_masks, SelectionMasks};
pub use momentum::{Momentum, MomentumConfig};
pub use registry::{available_strategies, StrategyInfo, StrategyKind};
pub use smb::{SmallMinusBig, SmbConfig};
