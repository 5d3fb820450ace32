//! Backtest orchestration.
//!
//! Binds a strategy selector and its parameters to the immutable input
//! panels, producing the per-period spread series, its cumulative
//! performance curve, and the benchmark/strategy summary table. Each run
//! is an independent pure function of (data, params): parameter errors
//! abort before any computation, and nothing is cached or shared between
//! runs, so callers may sweep parameter sets freely — including in
//! parallel — over one shared [`BacktestData`].

use serde::{Deserialize, Serialize};

use backstrat_signals::momentum::{Momentum, MomentumConfig};
use backstrat_signals::registry::StrategyKind;
use backstrat_signals::smb::{SmallMinusBig, SmbConfig};
use backstrat_traits::{
    BackstratError, BacktestData, Result, Strategy, StrategyOutput, Symbol,
};

use crate::performance::{PerformanceConfig, PerformanceSummary, PERIODS_PER_YEAR};

/// Parameters of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestParams {
    /// Strategy selector.
    pub strategy: StrategyKind,
    /// Momentum estimation window in periods.
    pub window: usize,
    /// Cross-sectional selection quantile.
    pub quantile: f64,
    /// Annualized risk-free rate for the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Non-investable return column excluded from SMB aggregation.
    pub excluded: Option<Symbol>,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Momentum,
            window: 1,
            quantile: 0.1,
            risk_free_rate: 0.03,
            excluded: None,
        }
    }
}

impl BacktestParams {
    /// Validates the parameters before any computation is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`BackstratError::InvalidParameter`] for a quantile outside
    /// `(0, 1)` or a non-positive estimation window.
    pub fn validate(&self) -> Result<()> {
        if !(self.quantile > 0.0 && self.quantile < 1.0) {
            return Err(BackstratError::InvalidParameter(format!(
                "quantile {} must lie strictly between 0 and 1",
                self.quantile
            )));
        }
        if self.window == 0 {
            return Err(BackstratError::InvalidParameter(
                "estimation window must be a positive number of periods".to_string(),
            ));
        }
        Ok(())
    }
}

/// The result bundle of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRun {
    /// The parameters the run was computed with.
    pub params: BacktestParams,
    /// Name of the strategy that produced the series.
    pub strategy_name: String,
    /// The spread series, cumulative curve, and spread volatility.
    pub output: StrategyOutput,
    /// Benchmark/strategy comparison table.
    pub summary: PerformanceSummary,
}

/// Backtest engine binding parameters to the input panels.
///
/// # Example
///
/// ```ignore
/// use backstrat_eval::{Backtest, BacktestParams};
///
/// let backtest = Backtest::new(BacktestParams::default());
/// let run = backtest.run(&data)?;
/// println!("Sharpe: {:.2}", run.summary.strategy.sharpe_ratio);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Backtest {
    params: BacktestParams,
}

impl Backtest {
    /// Create a new backtest with the given parameters.
    #[must_use]
    pub const fn new(params: BacktestParams) -> Self {
        Self { params }
    }

    /// The parameters this backtest was configured with.
    #[must_use]
    pub const fn params(&self) -> &BacktestParams {
        &self.params
    }

    /// Runs one full recomputation from the immutable input panels.
    ///
    /// # Errors
    ///
    /// - [`BackstratError::InvalidParameter`] before any computation when
    ///   the parameters are out of range.
    /// - [`BackstratError::UnsupportedStrategy`] for a recognized selector
    ///   with no builder (the reserved value strategy); the caller keeps
    ///   its previously displayed result.
    pub fn run(&self, data: &BacktestData) -> Result<BacktestRun> {
        self.params.validate()?;

        let strategy: Box<dyn Strategy> = match self.params.strategy {
            StrategyKind::Momentum => Box::new(Momentum::new(MomentumConfig {
                window: self.params.window,
                quantile: self.params.quantile,
            })),
            StrategyKind::SizeFactor => Box::new(SmallMinusBig::new(SmbConfig {
                quantile: self.params.quantile,
                excluded: self.params.excluded.clone(),
            })),
            StrategyKind::ValueFactor => {
                return Err(BackstratError::UnsupportedStrategy(
                    self.params.strategy.selector().to_string(),
                ));
            }
        };

        let output = strategy.spread_series(data)?;

        let config = PerformanceConfig {
            periods_per_year: PERIODS_PER_YEAR,
            risk_free_rate: self.params.risk_free_rate,
        };
        let summary =
            PerformanceSummary::compare(data.benchmark().returns(), &output.spread, &config);

        Ok(BacktestRun {
            params: self.params.clone(),
            strategy_name: strategy.name().to_string(),
            output,
            summary,
        })
    }
}

/// Convenience wrapper: one run as a pure function of (data, params).
///
/// # Errors
///
/// See [`Backtest::run`].
pub fn run_backtest(data: &BacktestData, params: &BacktestParams) -> Result<BacktestRun> {
    Backtest::new(params.clone()).run(data)
}
