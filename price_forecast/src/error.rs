//! Error types for the price_forecast crate

use series_math::MathError;
use std::time::Duration;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Series too short for the requested operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Model estimation failed or produced unusable predictions
    #[error("Model did not converge: {0}")]
    ModelConvergence(String),

    /// Input with no spread, e.g. a constant series passed to scaling
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Differencing stopped at the configured cap while still non-stationary
    #[error("Series still non-stationary after {max_rounds} differencing rounds (p-value {p_value})")]
    DifferencingLimit { max_rounds: usize, p_value: f64 },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed input data
    #[error("Data error: {0}")]
    DataError(String),

    /// Unreadable or invalid configuration
    #[error("Config error: {0}")]
    ConfigError(String),

    /// The pipeline did not finish within its deadline
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::DegenerateInput(msg) => ForecastError::DegenerateInput(msg),
            MathError::InvalidInput(msg) => ForecastError::DataError(msg),
            MathError::CalculationError(msg) | MathError::SingularMatrix(msg) => {
                ForecastError::ModelConvergence(msg)
            }
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
