//! Cross-sectional momentum strategy.
//!
//! Buys the prior-period winners and sells the prior-period losers of the
//! return panel itself. The quantile masker supplies the one-period signal
//! lag: the mask row at date `t` ranks the returns observed at `t - 1`, and
//! the payoff at `t` is the return panel's own row `t` — the period that
//! follows signal formation. A rolling completeness filter drops entities
//! with missing observations inside the trailing estimation window.

use serde::{Deserialize, Serialize};

use backstrat_traits::stats::{cumulative_curve, masked_mean, sample_std};
use backstrat_traits::{BackstratError, BacktestData, Panel, Result, Strategy, StrategyOutput};

use crate::masker::selection_masks;

/// Configuration for the momentum strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Estimation window in periods; an entity must be fully observed over
    /// this trailing window for its selection to be honored.
    pub window: usize,
    /// Cross-sectional quantile defining the winner and loser buckets.
    pub quantile: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            window: 1,
            quantile: 0.1,
        }
    }
}

/// Winner-minus-loser momentum over the asset return panel.
///
/// # Example
///
/// ```ignore
/// use backstrat_signals::momentum::{Momentum, MomentumConfig};
/// use backstrat_traits::Strategy;
///
/// let strategy = Momentum::new(MomentumConfig { window: 3, quantile: 0.25 });
/// let output = strategy.spread_series(&data)?;
/// ```
#[derive(Debug, Clone)]
pub struct Momentum {
    config: MomentumConfig,
}

impl Momentum {
    /// Create a new momentum strategy with the given configuration.
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// The trailing estimation window in periods.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }

    /// The selection quantile.
    #[must_use]
    pub const fn quantile(&self) -> f64 {
        self.config.quantile
    }

    fn validate(&self) -> Result<()> {
        if self.config.window == 0 {
            return Err(BackstratError::InvalidParameter(
                "momentum window must be a positive number of periods".to_string(),
            ));
        }
        if !(self.config.quantile > 0.0 && self.config.quantile < 1.0) {
            return Err(BackstratError::InvalidParameter(format!(
                "quantile {} must lie strictly between 0 and 1",
                self.config.quantile
            )));
        }
        Ok(())
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(MomentumConfig::default())
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn spread_series(&self, data: &BacktestData) -> Result<StrategyOutput> {
        self.validate()?;

        let returns = data.returns();
        let masks = selection_masks(returns, self.config.quantile);
        let valid = rolling_completeness(&returns.shift(1), self.config.window);

        let n = returns.n_periods();
        let mut spread = Vec::with_capacity(n);
        for t in 0..n {
            let row = returns.row(t);
            let winners: Vec<bool> = masks
                .high_row(t)
                .iter()
                .zip(valid.row(t).iter())
                .map(|(&m, &v)| m && v)
                .collect();
            let losers: Vec<bool> = masks
                .low_row(t)
                .iter()
                .zip(valid.row(t).iter())
                .map(|(&m, &v)| m && v)
                .collect();

            let long = masked_mean(row, ndarray::ArrayView1::from(winners.as_slice()));
            let short = masked_mean(row, ndarray::ArrayView1::from(losers.as_slice()));

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

/// Rolling completeness of a panel: `true` at `(t, j)` when entity `j` has
/// no missing observation over the trailing `window` rows ending at `t`.
///
/// Windows shorter than `window` at the start of the series are checked
/// over the rows available (minimum one), so output can begin as soon as a
/// single period has been observed.
fn rolling_completeness(panel: &Panel, window: usize) -> ndarray::Array2<bool> {
    let n = panel.n_periods();
    let k = panel.n_entities();
    let mut complete = ndarray::Array2::from_elem((n, k), false);

    for t in 0..n {
        let start = (t + 1).saturating_sub(window);
        for j in 0..k {
            complete[[t, j]] = (start..=t).all(|s| panel.values()[[s, j]].is_finite());
        }
    }
    complete
}
