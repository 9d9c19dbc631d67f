//! Pipeline configuration
//!
//! Every field has a default, so a JSON file only needs the values it changes:
//!
//! ```json
//! { "smoothing_window": 7, "scale": true, "order": { "ar": 5, "ma": 5 } }
//! ```

use crate::error::{ForecastError, Result};
use crate::models::{FitOptions, ModelOrder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Forecast horizon and holdout length used throughout the source application
pub const DEFAULT_HORIZON: usize = 30;

/// Settings for choosing the differencing order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// p-value at or below which a series counts as stationary
    pub significance: f64,
    /// Stop with an error after this many differencing rounds; `None` keeps
    /// differencing until the series is too short to test
    pub max_rounds: Option<usize>,
    /// Upper bound on the ADF lag search; `None` uses the sample-size rule
    pub max_lag: Option<usize>,
    /// Decimal places kept in reported p-values
    pub p_value_decimals: Option<u32>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            significance: 0.05,
            max_rounds: None,
            max_lag: None,
            p_value_decimals: Some(3),
        }
    }
}

/// Full configuration of a forecasting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of days to forecast
    pub horizon: usize,
    /// Trailing observations held out for evaluation
    pub holdout: usize,
    pub order: ModelOrder,
    pub fit: FitOptions,
    pub selector: SelectorConfig,
    /// Rolling-mean window applied before modelling
    pub smoothing_window: Option<usize>,
    /// Standardize the series before fitting
    pub scale: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            holdout: DEFAULT_HORIZON,
            order: ModelOrder::default(),
            fit: FitOptions::default(),
            selector: SelectorConfig::default(),
            smoothing_window: None,
            scale: false,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Reject settings no run could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be greater than zero".to_string(),
            ));
        }
        if self.holdout == 0 {
            return Err(ForecastError::InvalidParameter(
                "Holdout length must be greater than zero".to_string(),
            ));
        }
        if self.smoothing_window == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "Smoothing window must be greater than zero".to_string(),
            ));
        }
        if !(self.selector.significance > 0.0 && self.selector.significance < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Significance must be between 0 and 1, got {}",
                self.selector.significance
            )));
        }
        if !(self.fit.tolerance > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Tolerance must be positive, got {}",
                self.fit.tolerance
            )));
        }
        Ok(())
    }
}
