//! # Series Math
//!
//! Numeric building blocks for univariate daily price series.
//! This crate provides the statistics the forecasting pipeline is built on:
//! differencing and integration, rolling means, ordinary least squares,
//! lag polynomial roots, the augmented Dickey-Fuller unit-root test and standard scaling.

use thiserror::Error;

pub mod descriptive;
pub mod differencing;
pub mod moving_averages;
pub mod polynomial;
pub mod regression;
pub mod scaling;
pub mod stationarity;

pub use differencing::{difference, difference_once, integrate};
pub use moving_averages::{rolling_mean, SimpleMovingAverage};
pub use polynomial::{constrain_to_unit_circle, max_root_modulus, reciprocal_roots};
pub use regression::{least_squares, LeastSquaresFit};
pub use scaling::StandardScaler;
pub use stationarity::{adf_test, mackinnon_p_value, AdfResult};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
