//! Standard (z-score) scaling

use crate::descriptive::{all_equal, mean, population_variance};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Mean and standard deviation captured from a fitted series
///
/// The transform is the linear map `(x - mean) / std_dev`, so
/// [`StandardScaler::inverse_transform`] undoes it exactly up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: f64,
    std_dev: f64,
}

impl StandardScaler {
    /// Learn mean and population standard deviation from `values`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Cannot scale non-finite values".to_string(),
            ));
        }
        let (Some(mean), Some(variance)) = (mean(values), population_variance(values)) else {
            return Err(MathError::InsufficientData(
                "Cannot scale an empty series".to_string(),
            ));
        };
        if all_equal(values) || variance <= 0.0 {
            return Err(MathError::DegenerateInput(format!(
                "Series of {} values has zero variance",
                values.len()
            )));
        }

        Ok(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Fit on `values` and return the scaled copy with the scaler
    pub fn fit_transform(values: &[f64]) -> Result<(Vec<f64>, Self)> {
        let scaler = Self::fit(values)?;
        Ok((scaler.transform(values), scaler))
    }

    /// Standardize values with the captured parameters
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v - self.mean) / self.std_dev).collect()
    }

    /// Map standardized values back to the original scale
    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&z| self.inverse_value(z)).collect()
    }

    pub fn inverse_value(&self, scaled: f64) -> f64 {
        scaled * self.std_dev + self.mean
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_transform_standardizes() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        let (scaled, scaler) = StandardScaler::fit_transform(&data).unwrap();

        assert_relative_eq!(scaler.mean(), 30.0);
        assert_relative_eq!(scaler.std_dev(), 200.0_f64.sqrt());

        let mean: f64 = scaled.iter().sum::<f64>() / scaled.len() as f64;
        let variance: f64 = scaled.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
        assert!(mean.abs() < 1e-12);
        assert_relative_eq!(variance, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let data: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let (scaled, scaler) = StandardScaler::fit_transform(&data).unwrap();
        let restored = scaler.inverse_transform(&scaled);

        for (a, b) in data.iter().zip(restored.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_large_magnitude_with_small_spread() {
        let data = [1e11, 1e11 + 1.0, 1e11 + 2.0];
        let (scaled, scaler) = StandardScaler::fit_transform(&data).unwrap();

        assert_relative_eq!(scaler.mean(), 1e11 + 1.0);
        assert_relative_eq!(scaler.std_dev(), (2.0_f64 / 3.0).sqrt(), epsilon = 1e-6);
        assert_relative_eq!(scaled[0], -scaled[2], epsilon = 1e-6);

        let restored = scaler.inverse_transform(&scaled);
        for (a, b) in data.iter().zip(restored.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_zero_variance_is_degenerate() {
        assert!(matches!(
            StandardScaler::fit(&[50.0; 365]),
            Err(MathError::DegenerateInput(_))
        ));
        assert!(matches!(
            StandardScaler::fit(&[]),
            Err(MathError::InsufficientData(_))
        ));
    }
}
