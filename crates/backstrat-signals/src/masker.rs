//! Cross-sectional quantile masker.
//!
//! Selects, for every date, the entities whose lagged value sits above the
//! `(1 - e)`-quantile ("high") or below the `e`-quantile ("low") of that
//! date's cross-section. The one-period lag is applied here, so mask rows
//! at date `t` depend only on data observed at `t - 1` or earlier.

use ndarray::{Array2, ArrayView1};

use backstrat_traits::{Date, Panel, Symbol};

/// Per-date boolean selection masks derived from one panel.
///
/// `low` and `high` are aligned to the source panel's original date index
/// and entity columns. The two masks are disjoint: an entity satisfying
/// both comparisons (possible when `e > 0.5`) is placed in neither bucket,
/// as are entities exactly at a quantile boundary.
#[derive(Debug, Clone)]
pub struct SelectionMasks {
    dates: Vec<Date>,
    entities: Vec<Symbol>,
    low: Array2<bool>,
    high: Array2<bool>,
}

impl SelectionMasks {
    /// Returns the date index the masks are aligned to.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the entity names in column order.
    pub fn entities(&self) -> &[Symbol] {
        &self.entities
    }

    /// The "low bucket" mask matrix (dates x entities).
    pub const fn low(&self) -> &Array2<bool> {
        &self.low
    }

    /// The "high bucket" mask matrix (dates x entities).
    pub const fn high(&self) -> &Array2<bool> {
        &self.high
    }

    /// Low-bucket mask row at date index `t`.
    pub fn low_row(&self, t: usize) -> ArrayView1<'_, bool> {
        self.low.row(t)
    }

    /// High-bucket mask row at date index `t`.
    pub fn high_row(&self, t: usize) -> ArrayView1<'_, bool> {
        self.high.row(t)
    }

    /// Column index of an entity, if present.
    pub fn entity_index(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|e| e == name)
    }
}

/// Computes low/high selection masks for a panel at quantile `e`.
///
/// The panel is lagged by one period before any quantile is taken, so the
/// selection at date `t` never sees same-period information. Quantiles are
/// computed per date row over the present entities with linear
/// interpolation; membership uses strict inequalities, so entities exactly
/// at the threshold fall in neither bucket.
///
/// This function is total: a quantile outside `(0, 1)` or a date row with
/// no observed entity yields all-false mask rows rather than an error.
/// Parameter validation with proper error reporting happens at the backtest
/// boundary instead.
pub fn selection_masks(panel: &Panel, quantile: f64) -> SelectionMasks {
    let lagged = panel.shift(1);
    let n_periods = panel.n_periods();
    let n_entities = panel.n_entities();

    let mut low = Array2::from_elem((n_periods, n_entities), false);
    let mut high = Array2::from_elem((n_periods, n_entities), false);

    let valid_quantile = quantile > 0.0 && quantile < 1.0;

    for t in 0..n_periods {
        if !valid_quantile {
            continue;
        }
        let row = lagged.row(t);
        let mut present: Vec<f64> = row.iter().copied().filter(|v| v.is_finite()).collect();
        if present.is_empty() {
            continue;
        }
        present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let low_cut = interpolated_quantile(&present, quantile);
        let high_cut = interpolated_quantile(&present, 1.0 - quantile);

        for (j, &v) in row.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            let below = v < low_cut;
            let above = v > high_cut;
            // Both can hold when e > 0.5; such entities join neither bucket.
            if below && !above {
                low[[t, j]] = true;
            }
            if above && !below {
                high[[t, j]] = true;
            }
        }
    }

    SelectionMasks {
        dates: panel.dates().to_vec(),
        entities: panel.entities().to_vec(),
        low,
        high,
    }
}

/// Linear-interpolation quantile over an ascending-sorted cross-section.
fn interpolated_quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * q;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 < n {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[n - 1]
    }
}
