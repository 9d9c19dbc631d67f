//! Descriptive statistics shared by the other modules

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`), `None` for an empty slice
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    Some(values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64)
}

/// True when every value is exactly equal to the first one
pub fn all_equal(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// True when every value equals the first one up to a magnitude-relative tolerance.
///
/// Float differencing of an exact linear trend leaves residue around 1e-14,
/// so an exact comparison would miss series that are constant in practice.
pub fn is_constant(values: &[f64]) -> bool {
    let Some(&first) = values.first() else {
        return true;
    };
    let (min, max, max_abs) = values.iter().fold((first, first, 0.0_f64), |(lo, hi, mag), &v| {
        (lo.min(v), hi.max(v), mag.max(v.abs()))
    });
    (max - min) <= 1e-10 * max_abs.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        assert_relative_eq!(population_variance(&values).unwrap(), 4.0);
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn test_is_constant() {
        assert!(is_constant(&[50.0; 10]));
        assert!(is_constant(&[]));
        assert!(!is_constant(&[1.0, 1.0, 1.5]));

        // first differences of an exact float trend
        let trend: Vec<f64> = (0..100).map(|t| 100.0 + 0.1 * t as f64).collect();
        let diffs: Vec<f64> = trend.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(is_constant(&diffs));
    }

    #[test]
    fn test_all_equal_ignores_magnitude() {
        assert!(all_equal(&[1e11; 4]));
        assert!(all_equal(&[]));
        assert!(!all_equal(&[1e11, 1e11 + 1.0, 1e11 + 2.0]));
        // the relative tolerance would treat this series as flat
        assert!(is_constant(&[1e11, 1e11 + 1.0, 1e11 + 2.0]));
    }
}
