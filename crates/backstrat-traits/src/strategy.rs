//! Strategy trait for long/short return construction.
//!
//! This module defines the `Strategy` trait, the core abstraction for
//! turning the immutable input panels into a per-period long/short return
//! series. Implementations are pure functions of (panels, parameters):
//! invoking one repeatedly with the same inputs yields the same output, and
//! no shared state survives between invocations.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{BacktestData, Date};

/// The derived return series of one strategy run.
///
/// `spread` holds the per-period long/short spread aligned to the return
/// panel's dates, with `NaN` marking periods where no valid selection
/// existed. `curve` is the cumulative compounded performance index rebased
/// to 1.0 at the first period; undefined spreads contribute zero growth so
/// the curve repeats the prior value instead of going missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyOutput {
    /// Date index of the spread series.
    pub dates: Vec<Date>,
    /// Per-period long-minus-short return spread (`NaN` where undefined).
    pub spread: Vec<f64>,
    /// Cumulative compounded performance curve, rebased to 1.0.
    pub curve: Vec<f64>,
    /// Sample standard deviation of the observed spread values.
    pub volatility: f64,
}

impl StrategyOutput {
    /// Number of periods in the series.
    pub fn len(&self) -> usize {
        self.spread.len()
    }

    /// Returns whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.spread.is_empty()
    }
}

/// A long/short strategy that produces a periodic return spread.
///
/// Implementations must be `Send + Sync` so a caller may evaluate several
/// parameter sets in parallel over the same read-only inputs.
///
/// # Example
///
/// ```no_run
/// use backstrat_traits::{BacktestData, Result, Strategy, StrategyOutput};
///
/// struct FlatStrategy;
///
/// impl Strategy for FlatStrategy {
///     fn name(&self) -> &str {
///         "flat"
///     }
///
///     fn spread_series(&self, data: &BacktestData) -> Result<StrategyOutput> {
///         let n = data.returns().n_periods();
///         Ok(StrategyOutput {
///             dates: data.returns().dates().to_vec(),
///             spread: vec![0.0; n],
///             curve: vec![1.0; n],
///             volatility: 0.0,
///         })
///     }
/// }
/// ```
pub trait Strategy: Send + Sync {
    /// Returns the name of this strategy, used in listings and summaries.
    fn name(&self) -> &str;

    /// Computes the per-period long/short spread from the input bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs cannot support the computation at
    /// all; per-period degeneracies (an empty cross-section) are absorbed
    /// into the output as `NaN` entries instead.
    fn spread_series(&self, data: &BacktestData) -> Result<StrategyOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BenchmarkSeries, Panel};
    use ndarray::array;

    struct TestStrategy;

    impl Strategy for TestStrategy {
        fn name(&self) -> &str {
            "test"
        }

        fn spread_series(&self, data: &BacktestData) -> Result<StrategyOutput> {
            Ok(StrategyOutput {
                dates: data.returns().dates().to_vec(),
                spread: vec![0.01; data.returns().n_periods()],
                curve: vec![1.0; data.returns().n_periods()],
                volatility: 0.0,
            })
        }
    }

    fn sample_data() -> BacktestData {
        let dates = vec![
            Date::from_ymd_opt(2024, 1, 31).unwrap(),
            Date::from_ymd_opt(2024, 2, 29).unwrap(),
        ];
        let returns = Panel::new(
            dates.clone(),
            vec!["AAA".to_string()],
            array![[0.01], [0.02]],
        )
        .unwrap();
        let factor = Panel::new(
            dates.clone(),
            vec!["AAA".to_string()],
            array![[1.0], [2.0]],
        )
        .unwrap();
        let benchmark = BenchmarkSeries::new(dates, vec![0.01, 0.02]).unwrap();
        BacktestData::new(returns, factor, benchmark).unwrap()
    }

    #[test]
    fn test_strategy_output_len() {
        let data = sample_data();
        let output = TestStrategy.spread_series(&data).unwrap();
        assert_eq!(output.len(), 2);
        assert!(!output.is_empty());
    }

    #[test]
    fn test_strategy_name() {
        assert_eq!(TestStrategy.name(), "test");
    }

    #[test]
    fn test_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn Strategy>>();
    }
}
