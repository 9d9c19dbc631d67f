//! Dated forecasts from a model fitted on the full series

use crate::config::DEFAULT_HORIZON;
use crate::error::{ForecastError, Result};
use crate::models::{ArimaModel, FittedModel, Forecastable};
use crate::utils::forecast_dates;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One predicted close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Predicted closes on consecutive calendar days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Name of the fitted model
    pub model: String,
    /// Differencing order the model was fitted with
    pub d: usize,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Apply `f` to every predicted close, keeping the dates
    pub fn map_values<F: Fn(f64) -> f64>(mut self, f: F) -> Self {
        for point in &mut self.points {
            point.close = f(point.close);
        }
        self
    }
}

/// Fits a model on the entire series and forecasts the next `horizon` days
#[derive(Debug, Clone)]
pub struct Forecaster<M: Forecastable> {
    model: M,
    horizon: usize,
}

impl<M: Forecastable> Forecaster<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            horizon: DEFAULT_HORIZON,
        }
    }

    pub fn with_horizon(mut self, horizon: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be greater than zero".to_string(),
            ));
        }
        self.horizon = horizon;
        Ok(self)
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Forecast dated from today's local date, not from the last observation
    pub fn forecast(&self, series: &[f64], d: usize) -> Result<ForecastResult> {
        self.forecast_from(series, d, Local::now().date_naive())
    }

    /// Forecast with the first predicted day pinned to `start`
    pub fn forecast_from(&self, series: &[f64], d: usize, start: NaiveDate) -> Result<ForecastResult> {
        let fitted = self.model.fit(series, d)?;
        let values = fitted.predict(self.horizon)?;

        info!(model = fitted.name(), d, %start, horizon = self.horizon, "forecast");

        let points = forecast_dates(start, self.horizon)
            .into_iter()
            .zip(values)
            .map(|(date, close)| ForecastPoint { date, close })
            .collect();

        Ok(ForecastResult {
            model: fitted.name().to_string(),
            d,
            points,
        })
    }
}

impl Default for Forecaster<ArimaModel> {
    fn default() -> Self {
        Self::new(ArimaModel::default())
    }
}

/// 30-day forecast of the default ARIMA(30, d, 30) model, dated from today
pub fn forecast(series: &[f64], d: usize) -> Result<ForecastResult> {
    Forecaster::default().forecast(series, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelOrder;
    use chrono::Duration;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n)
            .map(|t| 100.0 + 0.5 * t as f64 + ((t as f64) * 1.7).sin() + 0.6 * ((t as f64) * 0.45).cos())
            .collect()
    }

    #[test]
    fn test_forecast_from_dates_are_consecutive() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 20).unwrap();
        let result = Forecaster::new(ArimaModel::new(ModelOrder::new(2, 0)))
            .forecast_from(&ramp(120), 1, start)
            .unwrap();

        assert_eq!(result.len(), 30);
        assert_eq!(result.d, 1);
        assert_eq!(result.model, "ARIMA(2,1,0)");
        for (i, point) in result.points.iter().enumerate() {
            assert_eq!(point.date, start + Duration::days(i as i64));
            assert!(point.close.is_finite());
        }
        // crosses the end of February
        assert_eq!(result.points[9].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_custom_horizon() {
        let forecaster = Forecaster::new(ArimaModel::new(ModelOrder::new(1, 0)))
            .with_horizon(5)
            .unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let result = forecaster.forecast_from(&ramp(80), 1, start).unwrap();
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_map_values_keeps_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let result = ForecastResult {
            model: "test".to_string(),
            d: 0,
            points: vec![ForecastPoint { date: start, close: 2.0 }],
        };
        let mapped = result.map_values(|v| v * 10.0);
        assert_eq!(mapped.points[0], ForecastPoint { date: start, close: 20.0 });
    }
}
