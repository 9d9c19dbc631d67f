//! Forecasting models for daily close series

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod arima;

pub use arima::{ArimaModel, FittedArima};

/// Autoregressive and moving-average orders of an ARIMA model
///
/// The differencing order is chosen per series and passed to
/// [`Forecastable::fit`] separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOrder {
    /// AR order (p)
    pub ar: usize,
    /// MA order (q)
    pub ma: usize,
}

impl ModelOrder {
    pub fn new(ar: usize, ma: usize) -> Self {
        Self { ar, ma }
    }
}

impl Default for ModelOrder {
    /// Thirty daily lags on each side, roughly one month of structure
    fn default() -> Self {
        Self { ar: 30, ma: 30 }
    }
}

/// Estimation settings for the ARIMA fitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Estimate a constant: the mean when d = 0, a drift when d >= 1.
    /// `None` estimates the mean for undifferenced series and leaves the drift
    /// out; `Some(true)` opts into a drift.
    pub include_constant: Option<bool>,
    /// Order of the long autoregression used to estimate innovations.
    /// Defaults to twice the larger of the AR and MA orders.
    pub long_ar_order: Option<usize>,
    /// Extra re-estimation passes with re-filtered innovations
    pub refinement_iterations: usize,
    /// Largest coefficient change that counts as converged
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            include_constant: None,
            long_ar_order: None,
            refinement_iterations: 0,
            tolerance: 1e-6,
        }
    }
}

impl FitOptions {
    /// Whether a constant is estimated for a series differenced `d` times
    pub fn constant_for(&self, d: usize) -> bool {
        self.include_constant.unwrap_or(d == 0)
    }
}

/// A model fitted to one specific series
pub trait FittedModel: Debug {
    /// Point forecasts (predictive means) for the next `horizon` steps
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecasting capability that can be fitted to a series
///
/// The evaluator and forecaster only talk to this trait, so another
/// estimator can be swapped in without touching them.
pub trait Forecastable: Debug + Clone {
    /// The type of fitted model produced
    type Model: FittedModel;

    /// Fit to `series` after differencing it `differencing` times
    fn fit(&self, series: &[f64], differencing: usize) -> Result<Self::Model>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
