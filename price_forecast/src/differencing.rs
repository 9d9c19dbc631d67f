//! Choosing how many times to difference a series

use crate::config::SelectorConfig;
use crate::error::{ForecastError, Result};
use crate::stationarity::StationarityAnalyzer;
use serde::{Deserialize, Serialize};
use series_math::difference_once;
use tracing::debug;

/// The selected differencing order and the p-value that stopped the search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferencingOrder {
    pub d: usize,
    pub p_value: f64,
}

/// Differences a series until the unit-root test rejects
///
/// Each round tests the current series; while the p-value is above the
/// significance level the series is replaced by its first difference. Without
/// a round cap the search ends either at stationarity or when the series has
/// become too short to test, which surfaces as `InsufficientData`.
#[derive(Debug, Clone)]
pub struct DifferencingOrderSelector {
    analyzer: StationarityAnalyzer,
    significance: f64,
    max_rounds: Option<usize>,
}

impl DifferencingOrderSelector {
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            analyzer: StationarityAnalyzer::from_config(config),
            significance: config.significance,
            max_rounds: config.max_rounds,
        }
    }

    pub fn analyzer(&self) -> &StationarityAnalyzer {
        &self.analyzer
    }

    /// Smallest `d` whose differenced series tests as stationary
    pub fn select(&self, series: &[f64]) -> Result<DifferencingOrder> {
        let mut current = series.to_vec();
        let mut d = 0;

        loop {
            let report = self.analyzer.analyze(&current)?;
            debug!(d, p_value = report.p_value, len = current.len(), "stationarity check");

            if report.is_stationary(self.significance) {
                return Ok(DifferencingOrder {
                    d,
                    p_value: report.p_value,
                });
            }
            if let Some(max_rounds) = self.max_rounds {
                if d >= max_rounds {
                    return Err(ForecastError::DifferencingLimit {
                        max_rounds,
                        p_value: report.p_value,
                    });
                }
            }

            d += 1;
            current = difference_once(&current);
        }
    }
}

impl Default for DifferencingOrderSelector {
    fn default() -> Self {
        Self::new(&SelectorConfig::default())
    }
}

/// Differencing order of `series` with the default selector settings
pub fn determine_differencing_order(series: &[f64]) -> Result<usize> {
    DifferencingOrderSelector::default()
        .select(series)
        .map(|order| order.d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use series_math::difference;

    fn cumulative(values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .scan(0.0, |acc, v| {
                *acc += v;
                Some(*acc)
            })
            .collect()
    }

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    #[test]
    fn test_stationary_series_needs_no_differencing() {
        let series: Vec<f64> = white_noise(300, 5).iter().map(|v| 100.0 + v).collect();
        let order = DifferencingOrderSelector::default().select(&series).unwrap();
        assert_eq!(order.d, 0);
        assert!(order.p_value <= 0.05);
    }

    #[test]
    fn test_order_is_minimal() {
        let noise = white_noise(300, 12);
        let walk: Vec<f64> = cumulative(&cumulative(&noise)).iter().map(|v| 1000.0 + v).collect();

        let selector = DifferencingOrderSelector::default();
        let order = selector.select(&walk).unwrap();
        let analyzer = StationarityAnalyzer::default();

        let at_d = analyzer.analyze(&difference(&walk, order.d)).unwrap();
        assert!(at_d.p_value <= 0.05);
        if order.d > 0 {
            let before = analyzer.analyze(&difference(&walk, order.d - 1)).unwrap();
            assert!(before.p_value > 0.05);
        }
    }

    #[test]
    fn test_round_cap_reports_limit() {
        let series: Vec<f64> = (0..200).map(|t| 10.0 + (t * t) as f64 * 0.01).collect();
        let config = SelectorConfig {
            max_rounds: Some(0),
            max_lag: Some(0),
            ..SelectorConfig::default()
        };
        let result = DifferencingOrderSelector::new(&config).select(&series);
        assert!(matches!(
            result,
            Err(ForecastError::DifferencingLimit { max_rounds: 0, .. })
        ));
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        assert!(matches!(
            determine_differencing_order(&[]),
            Err(ForecastError::InsufficientData(_))
        ));
    }
}
