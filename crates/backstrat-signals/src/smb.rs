//! Small-minus-big size factor strategy.
//!
//! Buys the entities in the low tail of the lagged size-factor
//! cross-section and sells the high tail, aggregating over the asset
//! return panel. Factor columns are matched to return columns by entity
//! name, and one designated non-investable column (the benchmark-tracking
//! basket) can be excluded from the aggregation entirely.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use backstrat_traits::stats::{cumulative_curve, masked_mean, sample_std};
use backstrat_traits::{
    BackstratError, BacktestData, Result, Strategy, StrategyOutput, Symbol,
};

use crate::masker::{selection_masks, SelectionMasks};

/// Configuration for the small-minus-big strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmbConfig {
    /// Cross-sectional quantile defining the small and big buckets.
    pub quantile: f64,
    /// Return column excluded from aggregation regardless of its factor
    /// ranking (the benchmark-tracking basket).
    pub excluded: Option<Symbol>,
}

impl SmbConfig {
    /// Config with the given quantile and no excluded column.
    #[must_use]
    pub const fn with_quantile(quantile: f64) -> Self {
        Self {
            quantile,
            excluded: None,
        }
    }
}

/// Long small / short big over the size-factor panel.
#[derive(Debug, Clone, Default)]
pub struct SmallMinusBig {
    config: SmbConfig,
}

impl SmallMinusBig {
    /// Create a new small-minus-big strategy with the given configuration.
    #[must_use]
    pub const fn new(config: SmbConfig) -> Self {
        Self { config }
    }

    /// The selection quantile.
    #[must_use]
    pub const fn quantile(&self) -> f64 {
        self.config.quantile
    }

    fn validate(&self, data: &BacktestData) -> Result<()> {
        if !(self.config.quantile > 0.0 && self.config.quantile < 1.0) {
            return Err(BackstratError::InvalidParameter(format!(
                "quantile {} must lie strictly between 0 and 1",
                self.config.quantile
            )));
        }
        if let Some(name) = &self.config.excluded {
            if data.returns().entity_index(name).is_none() {
                return Err(BackstratError::MissingColumn(format!(
                    "excluded column {name} is not in the return panel"
                )));
            }
        }
        Ok(())
    }

    /// Align a factor-panel mask row to the return panel's columns.
    ///
    /// A return entity is selected when a factor column of the same name is
    /// selected; entities absent from the factor panel, and the excluded
    /// column, contribute nothing to the aggregate.
    fn align_mask(
        &self,
        masks: &SelectionMasks,
        mask_row: ArrayView1<'_, bool>,
        return_entities: &[Symbol],
    ) -> Vec<bool> {
        return_entities
            .iter()
            .map(|name| {
                if self.config.excluded.as_deref() == Some(name.as_str()) {
                    return false;
                }
                masks
                    .entity_index(name)
                    .is_some_and(|j| mask_row[j])
            })
            .collect()
    }
}

impl Strategy for SmallMinusBig {
    fn name(&self) -> &str {
        "smb"
    }

    fn spread_series(&self, data: &BacktestData) -> Result<StrategyOutput> {
        self.validate(data)?;

        let returns = data.returns();
        let masks = selection_masks(data.size_factor(), self.config.quantile);

        let n = returns.n_periods();
        let mut spread = Vec::with_capacity(n);
        for t in 0..n {
            let row = returns.row(t);
            let small = self.align_mask(&masks, masks.low_row(t), returns.entities());
            let big = self.align_mask(&masks, masks.high_row(t), returns.entities());

            let long = masked_mean(row, ArrayView1::from(small.as_slice()));
            let short = masked_mean(row, ArrayView1::from(big.as_slice()));

            spread.push(match (long, short) {
                (Some(l), Some(s)) => l - s,
                _ => f64::NAN,
            });
        }

        let volatility = sample_std(&spread);
        Ok(StrategyOutput {
            dates: returns.dates().to_vec(),
            curve: cumulative_curve(&spread),
            spread,
            volatility,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstrat_traits::{BenchmarkSeries, Date, Panel};
    use ndarray::array;

    fn dates(n: usize) -> Vec<Date> {
        (0..n)
            .map(|i| Date::from_ymd_opt(2024, 1 + i as u32, 1).unwrap())
            .collect()
    }

    /// Four assets: A0/A1 small caps, A2/A3 large caps, constant over time.
    fn sample_data() -> BacktestData {
        let idx = dates(4);
        let names: Vec<String> = (0..4).map(|j| format!("A{j}")).collect();
        let returns = Panel::new(
            idx.clone(),
            names.clone(),
            array![
                [0.01, 0.02, 0.03, 0.04],
                [0.05, 0.03, -0.01, 0.01],
                [0.02, 0.04, 0.00, -0.02],
                [0.01, 0.01, 0.02, 0.02],
            ],
        )
        .unwrap();
        let factor = Panel::new(
            idx.clone(),
            names,
            array![
                [1.0, 2.0, 9.0, 10.0],
                [1.0, 2.0, 9.0, 10.0],
                [1.0, 2.0, 9.0, 10.0],
                [1.0, 2.0, 9.0, 10.0],
            ],
        )
        .unwrap();
        let benchmark = BenchmarkSeries::new(idx, vec![0.01; 4]).unwrap();
        BacktestData::new(returns, factor, benchmark).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range_quantile() {
        let strategy = SmallMinusBig::new(SmbConfig::with_quantile(0.0));
        let result = strategy.spread_series(&sample_data());
        assert!(matches!(result, Err(BackstratError::InvalidParameter(_))));
    }

    #[test]
    fn test_rejects_unknown_excluded_column() {
        let strategy = SmallMinusBig::new(SmbConfig {
            quantile: 0.25,
            excluded: Some("ZZZ".to_string()),
        });
        let result = strategy.spread_series(&sample_data());
        assert!(matches!(result, Err(BackstratError::MissingColumn(_))));
    }

    #[test]
    fn test_small_minus_big_spread() {
        let strategy = SmallMinusBig::new(SmbConfig::with_quantile(0.3));
        let output = strategy.spread_series(&sample_data()).unwrap();

        assert_eq!(output.len(), 4);
        // No lagged factor data at the first date.
        assert!(output.spread[0].is_nan());
        // Quantile 0.3 of [1, 2, 9, 10]: low cut 1.9, high cut 9.1 — the
        // small bucket is {A0}, the big bucket is {A3}.
        assert!((output.spread[1] - (0.05 - 0.01)).abs() < 1e-12);
        assert!((output.spread[2] - (0.02 - (-0.02))).abs() < 1e-12);
        assert_eq!(output.curve[0], 1.0);
    }

    #[test]
    fn test_excluded_column_contributes_exactly_zero() {
        // Excluding A3 must remove it from the big bucket no matter how
        // extreme its returns are.
        let data = sample_data();
        let strategy = SmallMinusBig::new(SmbConfig {
            quantile: 0.3,
            excluded: Some("A3".to_string()),
        });
        let output = strategy.spread_series(&data).unwrap();

        // The big bucket at t = 1 becomes empty, so the spread is
        // undefined rather than influenced by A3.
        assert!(output.spread[1].is_nan());

        // Widen the quantile so the big bucket holds A2 and A3; excluding
        // A3 leaves only A2's return in the short leg.
        let strategy = SmallMinusBig::new(SmbConfig {
            quantile: 0.45,
            excluded: Some("A3".to_string()),
        });
        let output = strategy.spread_series(&data).unwrap();
        let expected = (0.05 + 0.03) / 2.0 - (-0.01);
        assert!((output.spread[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_factor_entity_missing_from_returns_is_ignored() {
        // Factor panel knows an entity the return panel does not carry;
        // alignment by name simply drops it.
        let idx = dates(2);
        let returns = Panel::new(
            idx.clone(),
            vec!["A0".to_string(), "A1".to_string()],
            array![[0.01, 0.02], [0.03, 0.04]],
        )
        .unwrap();
        let factor = Panel::new(
            idx.clone(),
            vec!["A0".to_string(), "A1".to_string(), "GHOST".to_string()],
            array![[1.0, 10.0, 5.0], [1.0, 10.0, 5.0]],
        )
        .unwrap();
        let benchmark = BenchmarkSeries::new(idx, vec![0.0; 2]).unwrap();
        let data = BacktestData::new(returns, factor, benchmark).unwrap();

        let strategy = SmallMinusBig::new(SmbConfig::with_quantile(0.4));
        let output = strategy.spread_series(&data).unwrap();
        // Low cut of [1, 5, 10] at 0.4 is 4.2, high cut at 0.6 is 6.0:
        // small = {A0}, big = {A1}; GHOST is unmapped.
        assert!((output.spread[1] - (0.03 - 0.04)).abs() < 1e-12);
    }

    #[test]
    fn test_strategy_name() {
        assert_eq!(SmallMinusBig::default().name(), "smb");
    }
}
