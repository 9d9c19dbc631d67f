//! Stationarity analysis of a numeric series

use crate::config::SelectorConfig;
use crate::error::Result;
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use series_math::{adf_test, AdfResult};

/// Outcome of one unit-root test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationarityReport {
    /// p-value of the augmented Dickey-Fuller test, after rounding
    pub p_value: f64,
    /// ADF test statistic
    pub statistic: f64,
    /// Lagged differences chosen by AIC
    pub used_lag: usize,
    /// Observations in the test regression
    pub observations: usize,
}

impl StationarityReport {
    /// True when the unit-root null is rejected at `significance`
    pub fn is_stationary(&self, significance: f64) -> bool {
        self.p_value <= significance
    }
}

/// Runs the augmented Dickey-Fuller test and reports its p-value
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityAnalyzer {
    max_lag: Option<usize>,
    p_value_decimals: Option<u32>,
}

impl StationarityAnalyzer {
    /// `p_value_decimals` rounds reported p-values, e.g. `Some(3)` gives 0.049
    pub fn new(max_lag: Option<usize>, p_value_decimals: Option<u32>) -> Self {
        Self {
            max_lag,
            p_value_decimals,
        }
    }

    pub fn from_config(config: &SelectorConfig) -> Self {
        Self::new(config.max_lag, config.p_value_decimals)
    }

    /// Test `series` for a unit root
    pub fn analyze(&self, series: &[f64]) -> Result<StationarityReport> {
        let AdfResult {
            statistic,
            p_value,
            used_lag,
            observations,
        } = adf_test(series, self.max_lag)?;

        let p_value = match self.p_value_decimals {
            Some(decimals) => round_to(p_value, decimals),
            None => p_value,
        };

        Ok(StationarityReport {
            p_value,
            statistic,
            used_lag,
            observations,
        })
    }
}

impl Default for StationarityAnalyzer {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    #[test]
    fn test_constant_series_reports_zero() {
        let report = StationarityAnalyzer::default().analyze(&[50.0; 365]).unwrap();
        assert_eq!(report.p_value, 0.0);
        assert!(report.is_stationary(0.05));
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let result = StationarityAnalyzer::default().analyze(&[1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::InsufficientData(_))));

        let result = StationarityAnalyzer::default().analyze(&[]);
        assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
    }
}
