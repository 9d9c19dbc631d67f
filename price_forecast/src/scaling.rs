//! Standardizing price series for modelling

use crate::data::PriceSeries;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::StandardScaler;

/// A price series mapped to zero mean and unit variance
///
/// Scaled values can be negative, so this is kept apart from [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ScaledSeries {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Map back to prices with the scaler that produced this series
    pub fn unscale(&self, scaler: &StandardScaler) -> Result<PriceSeries> {
        PriceSeries::from_parts(self.dates.clone(), unscale(scaler, &self.values))
    }
}

/// Standardize the closes of `series`
///
/// A series whose closes are all equal has no scale and is rejected with
/// [`ForecastError::DegenerateInput`].
pub fn scale(series: &PriceSeries) -> Result<(ScaledSeries, StandardScaler)> {
    let (values, scaler) = StandardScaler::fit_transform(&series.closes())?;
    Ok((
        ScaledSeries {
            dates: series.dates(),
            values,
        },
        scaler,
    ))
}

/// Map standardized values back to price units
pub fn unscale(scaler: &StandardScaler, values: &[f64]) -> Vec<f64> {
    scaler.inverse_transform(values)
}
