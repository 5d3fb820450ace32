//! Statistical utility functions shared by the strategy builders.
//!
//! This module provides the numerically stable compounding utility, the
//! masked-aggregation primitive used for bucket returns, and the small
//! mean / standard-deviation helpers used by the performance evaluator.
//! All helpers are total over missing values: `NaN` entries are skipped
//! rather than propagated, and empty selections yield `None`/`NaN`
//! sentinels instead of panicking.

use ndarray::ArrayView1;

use crate::error::{BackstratError, Result};

/// Returns the single compounded return of a sequence of periodic returns.
///
/// Computes `(1 + R) = prod(1 + r_i)` via the sum of `ln(1 + r_i)`, inverted
/// with `exp_m1`. The log-domain formulation avoids the floating-point drift
/// of naive repeated multiplication over long sequences.
///
/// `NaN` entries are treated as missing observations and skipped.
///
/// # Errors
///
/// Returns [`BackstratError::MathDomain`] if any observed return is at or
/// below -100%, where `ln(1 + r)` is undefined.
///
/// # Examples
///
/// ```
/// use backstrat_traits::stats::compound;
///
/// let r = compound(&[0.10, -0.05]).unwrap();
/// assert!((r - (1.10_f64 * 0.95 - 1.0)).abs() < 1e-12);
/// ```
pub fn compound(returns: &[f64]) -> Result<f64> {
    let mut log_sum = 0.0;
    for &r in returns {
        if r.is_nan() {
            continue;
        }
        if r <= -1.0 {
            return Err(BackstratError::MathDomain(format!(
                "periodic return {r} is at or below -100%, cannot compound"
            )));
        }
        log_sum += r.ln_1p();
    }
    Ok(log_sum.exp_m1())
}

/// Builds the cumulative compounded performance curve of a return series.
///
/// The curve is rebased so that the index value at the first observation is
/// exactly 1.0; each subsequent value compounds the previous one by
/// `(1 + r_t)`. Undefined periods (`NaN`) contribute zero growth, so the
/// curve repeats the prior value instead of going missing.
///
/// Returns an empty vector for an empty input series.
pub fn cumulative_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len());
    let mut index = 1.0;
    for (i, &r) in returns.iter().enumerate() {
        if i > 0 && r.is_finite() {
            index *= 1.0 + r;
        }
        curve.push(index);
    }
    curve
}

/// Mean of the values selected by a boolean mask.
///
/// This is the masked-aggregation primitive behind every bucket return:
/// it is total, never raises on an empty selection, and returns `None`
/// when no selected entity carries an observed value.
///
/// # Examples
///
/// ```
/// use backstrat_traits::stats::masked_mean;
/// use ndarray::array;
///
/// let values = array![0.02, f64::NAN, -0.01, 0.03];
/// let mask = array![true, true, true, false];
/// let m = masked_mean(values.view(), mask.view()).unwrap();
/// assert!((m - 0.005).abs() < 1e-12);
///
/// let empty = ndarray::Array1::from_elem(4, false);
/// assert!(masked_mean(values.view(), empty.view()).is_none());
/// ```
pub fn masked_mean(values: ArrayView1<'_, f64>, mask: ArrayView1<'_, bool>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (&v, &selected) in values.iter().zip(mask.iter()) {
        if selected && v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean of the observed (finite) values in a series.
///
/// Returns `NaN` when no finite value is present.
pub fn mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}

/// Sample standard deviation (N-1 denominator) of the observed values.
///
/// Returns `NaN` when fewer than two finite values are present.
pub fn sample_std(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.len() < 2 {
        return f64::NAN;
    }
    let m = finite.iter().sum::<f64>() / finite.len() as f64;
    let variance =
        finite.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (finite.len() - 1) as f64;
    variance.sqrt()
}

/// Rounds a value to two decimal places.
///
/// `NaN` and infinities pass through unchanged.
pub fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_compound_matches_naive_product() {
        let returns = vec![0.01, 0.02, -0.015, 0.004, 0.03, -0.02];
        let naive = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
        let stable = compound(&returns).unwrap();
        assert_relative_eq!(stable, naive, epsilon = 1e-12);
    }

    #[test]
    fn test_compound_long_sequence_stability() {
        let returns = vec![0.0001; 10_000];
        let naive = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
        let stable = compound(&returns).unwrap();
        assert_relative_eq!(stable, naive, max_relative = 1e-9);
    }

    #[test]
    fn test_compound_skips_missing() {
        let with_nan = vec![0.01, f64::NAN, 0.02];
        let without = vec![0.01, 0.02];
        assert_relative_eq!(
            compound(&with_nan).unwrap(),
            compound(&without).unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_compound_rejects_total_loss() {
        let result = compound(&[0.01, -1.0, 0.02]);
        assert!(matches!(result, Err(BackstratError::MathDomain(_))));

        let result = compound(&[-1.5]);
        assert!(matches!(result, Err(BackstratError::MathDomain(_))));
    }

    #[test]
    fn test_compound_empty() {
        assert_eq!(compound(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_cumulative_curve_rebased_to_one() {
        let curve = cumulative_curve(&[0.05, 0.10, -0.02]);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0], 1.0);
        assert_relative_eq!(curve[1], 1.10, epsilon = 1e-12);
        assert_relative_eq!(curve[2], 1.10 * 0.98, epsilon = 1e-12);
    }

    #[test]
    fn test_cumulative_curve_carries_forward_missing() {
        let curve = cumulative_curve(&[f64::NAN, 0.10, f64::NAN, 0.05]);
        assert_eq!(curve[0], 1.0);
        assert_relative_eq!(curve[1], 1.10, epsilon = 1e-12);
        assert_eq!(curve[2], curve[1]);
        assert_relative_eq!(curve[3], 1.10 * 1.05, epsilon = 1e-12);
    }

    #[test]
    fn test_cumulative_curve_empty() {
        assert!(cumulative_curve(&[]).is_empty());
    }

    #[test]
    fn test_masked_mean_basic() {
        let values = array![0.01, 0.02, 0.03, 0.04];
        let mask = array![true, false, true, false];
        let m = masked_mean(values.view(), mask.view()).unwrap();
        assert_relative_eq!(m, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_masked_mean_empty_selection() {
        let values = array![0.01, 0.02];
        let mask = array![false, false];
        assert!(masked_mean(values.view(), mask.view()).is_none());
    }

    #[test]
    fn test_masked_mean_all_selected_missing() {
        let values = array![f64::NAN, f64::NAN];
        let mask = array![true, true];
        assert!(masked_mean(values.view(), mask.view()).is_none());
    }

    #[test]
    fn test_mean_and_std_filter_missing() {
        let values = vec![0.01, f64::NAN, 0.03];
        assert_relative_eq!(mean(&values), 0.02, epsilon = 1e-12);
        assert!(sample_std(&values).is_finite());
    }

    #[test]
    fn test_mean_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(mean(&[f64::NAN]).is_nan());
    }

    #[test]
    fn test_sample_std_constant_is_zero() {
        let values = vec![0.01; 12];
        assert_relative_eq!(sample_std(&values), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.14759), 0.15);
        assert_eq!(round2(-0.005), -0.01);
        assert!(round2(f64::NAN).is_nan());
    }
}
