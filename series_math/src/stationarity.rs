//! Augmented Dickey-Fuller unit-root test
//!
//! Null hypothesis: the series has a unit root. The regression carries a
//! constant and no trend, the lag length is picked by AIC over a common
//! sample, and p-values come from MacKinnon's (1994) response surface.

use crate::descriptive::{all_equal, is_constant, mean};
use crate::differencing::difference_once;
use crate::regression::{least_squares, LeastSquaresFit};
use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

// MacKinnon (1994), one variable, constant only
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Result of an augmented Dickey-Fuller test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdfResult {
    /// t-statistic of the lagged level coefficient
    pub statistic: f64,
    /// Approximate p-value in [0, 1]
    pub p_value: f64,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Rows in the final regression
    pub observations: usize,
}

/// Default upper bound on the lag search: `ceil(12 * (n / 100)^(1/4))`
pub fn default_max_lag(n: usize) -> usize {
    (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize
}

/// Run the augmented Dickey-Fuller test on `series`
///
/// `max_lag` bounds the AIC lag search; `None` uses [`default_max_lag`].
/// Either way the bound is clipped to `n / 2 - 2`, and a series with fewer
/// than four observations cannot be tested.
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> Result<AdfResult> {
    let n = series.len();
    if series.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Unit-root test input contains non-finite values".to_string(),
        ));
    }
    if n / 2 < 2 {
        return Err(MathError::InsufficientData(format!(
            "Unit-root test needs at least 4 observations, have {}",
            n
        )));
    }

    // a flat series has no unit root to speak of
    if all_equal(series) {
        return Ok(AdfResult {
            statistic: f64::NEG_INFINITY,
            p_value: 0.0,
            used_lag: 0,
            observations: n - 1,
        });
    }

    let diffs = difference_once(series);
    // a deterministic line: nothing left for the level term to explain.
    // Float differencing leaves rounding residue, hence the tolerance here.
    if is_constant(&diffs) {
        return Ok(AdfResult {
            statistic: f64::INFINITY,
            p_value: 1.0,
            used_lag: 0,
            observations: diffs.len(),
        });
    }

    let max_lag = max_lag.unwrap_or_else(|| default_max_lag(n)).min(n / 2 - 2);
    // centering the level column leaves its t-statistic unchanged and keeps
    // the design well conditioned for series far from zero
    let level_mean = mean(series).unwrap_or(0.0);
    let levels: Vec<f64> = series.iter().map(|v| v - level_mean).collect();

    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let fit = match adf_regression(&levels, &diffs, lag, max_lag) {
            Ok(fit) => fit,
            Err(MathError::InsufficientData(_)) | Err(MathError::SingularMatrix(_)) => continue,
            Err(e) => return Err(e),
        };
        let aic = fit.aic();
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    let used_lag = best.map(|(_, lag)| lag).ok_or_else(|| {
        MathError::InsufficientData(format!(
            "No lag length up to {} could be estimated from {} observations",
            max_lag, n
        ))
    })?;

    let fit = adf_regression(&levels, &diffs, used_lag, used_lag)?;
    let statistic = fit.t_value(0).ok_or_else(|| {
        MathError::CalculationError("Lagged level coefficient has no t-statistic".to_string())
    })?;

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag,
        observations: fit.observations,
    })
}

/// Regress `diffs[t]` on `[levels[t], diffs[t-1..=t-lag], 1]` for `t >= skip`
fn adf_regression(levels: &[f64], diffs: &[f64], lag: usize, skip: usize) -> Result<LeastSquaresFit> {
    let rows = diffs.len().saturating_sub(skip);
    let cols = lag + 2;
    let design = DMatrix::from_fn(rows, cols, |r, c| {
        let t = skip + r;
        match c {
            0 => levels[t],
            c if c <= lag => diffs[t - c],
            _ => 1.0,
        }
    });
    let target = DVector::from_fn(rows, |r, _| diffs[skip + r]);
    least_squares(&design, &target)
}

/// Approximate p-value for an ADF statistic (constant, no trend)
///
/// Statistics beyond the tabulated range saturate to 0 or 1.
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * statistic + c);
    standard_normal_cdf(z)
}

fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use rstest::rstest;

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    #[rstest]
    #[case(-3.43, 0.01)]
    #[case(-2.86, 0.05)]
    #[case(-2.57, 0.10)]
    fn test_p_value_at_critical_values(#[case] statistic: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(mackinnon_p_value(statistic), expected, epsilon = 0.003);
    }

    #[test]
    fn test_p_value_saturates_and_is_monotonic() {
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-25.0), 0.0);
        assert_eq!(mackinnon_p_value(f64::NEG_INFINITY), 0.0);

        let grid: Vec<f64> = (0..100).map(|i| -18.0 + 0.2 * i as f64).collect();
        let ps: Vec<f64> = grid.iter().map(|&t| mackinnon_p_value(t)).collect();
        assert!(ps.windows(2).all(|w| w[0] <= w[1] + 1e-12));
        assert!(ps.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_white_noise_is_stationary() {
        let series: Vec<f64> = white_noise(300, 7).iter().map(|e| 50.0 + e).collect();
        let result = adf_test(&series, None).unwrap();

        assert!(result.p_value < 0.01, "p = {}", result.p_value);
        assert!(result.statistic < -3.43);
        assert!(result.used_lag <= default_max_lag(300));
    }

    #[test]
    fn test_accelerating_trend_is_not_stationary() {
        let noise = white_noise(250, 11);
        let series: Vec<f64> = noise
            .iter()
            .enumerate()
            .map(|(t, e)| 100.0 + 0.01 * (t * t) as f64 + 0.5 * e)
            .collect();

        // plain Dickey-Fuller regression, no lagged differences
        let result = adf_test(&series, Some(0)).unwrap();
        assert_eq!(result.used_lag, 0);
        assert!(result.statistic > 0.0);
        assert!(result.p_value > 0.05, "p = {}", result.p_value);
    }

    #[test]
    fn test_constant_series_is_trivially_stationary() {
        let result = adf_test(&[50.0; 365], None).unwrap();
        assert_eq!(result.p_value, 0.0);
    }

    #[test]
    fn test_large_level_white_noise_is_stationary() {
        let noise = white_noise(300, 7);
        let far: Vec<f64> = noise.iter().map(|e| 1e11 + e).collect();
        let near: Vec<f64> = noise.iter().map(|e| 50.0 + e).collect();

        let result = adf_test(&far, None).unwrap();
        let reference = adf_test(&near, None).unwrap();

        assert!(result.statistic.is_finite());
        assert!(result.p_value < 0.05, "p = {}", result.p_value);
        assert_eq!(result.used_lag, reference.used_lag);
        assert_abs_diff_eq!(result.statistic, reference.statistic, epsilon = 1e-2);
    }

    #[test]
    fn test_straight_line_is_not_stationary() {
        let line: Vec<f64> = (0..50).map(|t| 10.0 + 2.0 * t as f64).collect();
        assert_eq!(adf_test(&line, None).unwrap().p_value, 1.0);
    }

    #[test]
    fn test_too_short_series() {
        assert!(matches!(
            adf_test(&[1.0, 2.0, 1.5], None),
            Err(MathError::InsufficientData(_))
        ));
        assert!(adf_test(&[1.0, 3.0, 2.0, 5.0, 4.0, 4.5], None).is_ok());
    }

    #[test]
    fn test_rejects_non_finite_input() {
        assert!(matches!(
            adf_test(&[1.0, f64::NAN, 2.0, 3.0, 4.0], None),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_default_max_lag() {
        assert_eq!(default_max_lag(100), 12);
        assert_eq!(default_max_lag(400), 17);
    }
}
