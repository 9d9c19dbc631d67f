//! # Price Forecast Workspace
//!
//! Umbrella crate for the daily price forecasting libraries:
//!
//! - [`series_math`]: differencing, rolling means, least squares, the
//!   augmented Dickey-Fuller test and standard scaling
//! - [`price_forecast`]: price series, ARIMA models, evaluation, forecasting
//!   and the end-to-end pipeline
//!
//! ## Example
//!
//! ```
//! use price_forecast_workspace::series_math::difference;
//!
//! assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 2), vec![2.0, 2.0]);
//! ```

pub use price_forecast;
pub use series_math;
