//! Utility functions for the price_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Split a series into training values and the trailing `holdout` values
pub fn holdout_split(data: &[f64], holdout: usize) -> Result<(&[f64], &[f64])> {
    if holdout == 0 {
        return Err(ForecastError::InvalidParameter(
            "Holdout length must be greater than zero".to_string(),
        ));
    }
    if data.len() < holdout + 1 {
        return Err(ForecastError::InsufficientData(format!(
            "Need at least {} observations for a {}-day holdout, got {}",
            holdout + 1,
            holdout,
            data.len()
        )));
    }

    Ok(data.split_at(data.len() - holdout))
}

/// `horizon` consecutive calendar days starting at `start` itself
pub fn forecast_dates(start: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (0..horizon)
        .map(|i| start + Duration::days(i as i64))
        .collect()
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Holdout errors of a forecast, RMSE first since it is the headline metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    pub rmse: f64,
    pub mae: f64,
    /// Percentage error over the non-zero actuals; `None` when every actual is zero
    pub mape: Option<f64>,
    /// Symmetric percentage error, in [0, 200]
    pub smape: f64,
}

impl ForecastAccuracy {
    pub fn mse(&self) -> f64 {
        self.rmse * self.rmse
    }
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RMSE {:.4}, MAE {:.4}", self.rmse, self.mae)?;
        match self.mape {
            Some(mape) => write!(f, ", MAPE {:.2}%", mape)?,
            None => write!(f, ", MAPE n/a")?,
        }
        write!(f, ", SMAPE {:.2}%", self.smape)
    }
}

#[derive(Default)]
struct ErrorSums {
    squared: f64,
    absolute: f64,
    relative: f64,
    relative_count: usize,
    symmetric: f64,
}

/// Compare `forecast` against the held-out `actual` closes, point by point
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.is_empty() || forecast.len() != actual.len() {
        return Err(ForecastError::DataError(format!(
            "Cannot score {} forecasts against {} actual values",
            forecast.len(),
            actual.len()
        )));
    }

    let sums = forecast
        .iter()
        .zip(actual)
        .fold(ErrorSums::default(), |mut sums, (&predicted, &observed)| {
            let error = (observed - predicted).abs();
            sums.squared += error * error;
            sums.absolute += error;
            if observed != 0.0 {
                sums.relative += error / observed.abs();
                sums.relative_count += 1;
            }
            let scale = observed.abs() + predicted.abs();
            if scale > 0.0 {
                sums.symmetric += 2.0 * error / scale;
            }
            sums
        });

    let n = forecast.len() as f64;
    Ok(ForecastAccuracy {
        rmse: (sums.squared / n).sqrt(),
        mae: sums.absolute / n,
        mape: (sums.relative_count > 0)
            .then(|| 100.0 * sums.relative / sums.relative_count as f64),
        smape: 100.0 * sums.symmetric / n,
    })
}
