//! # Price Forecast
//!
//! A Rust library for short-horizon forecasting of daily close prices.
//!
//! ## Features
//!
//! - Daily close series with validated dates and CSV loading
//! - Stationarity analysis with the augmented Dickey-Fuller test
//! - Automatic selection of the differencing order
//! - ARIMA(p, d, q) estimation and forecasting
//! - Holdout evaluation with RMSE and related accuracy metrics
//! - Standard scaling, rolling-mean smoothing and an end-to-end pipeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::data::DataLoader;
//! use price_forecast::{determine_differencing_order, evaluate, forecast};
//!
//! # fn main() -> price_forecast::error::Result<()> {
//! // Load data
//! let series = DataLoader::from_csv("AAPL.csv")?;
//! let closes = series.closes();
//!
//! // How many differences until the series is stationary
//! let d = determine_differencing_order(&closes)?;
//!
//! // Score ARIMA(30, d, 30) on the last 30 days
//! let rmse = evaluate(&closes)?;
//! println!("Holdout RMSE: {}", rmse);
//!
//! // Forecast the next 30 days, starting today
//! let result = forecast(&closes, d)?;
//! for point in &result.points {
//!     println!("{}: {:.2}", point.date, point.close);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The [`pipeline::ForecastPipeline`] runs the same steps under one
//! [`config::PipelineConfig`], with optional smoothing and scaling.

pub mod config;
pub mod data;
pub mod differencing;
pub mod error;
pub mod evaluation;
pub mod forecaster;
pub mod models;
pub mod pipeline;
pub mod scaling;
pub mod stationarity;
pub mod synthetic;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{PipelineConfig, SelectorConfig};
pub use crate::data::{CsvMarketData, DataLoader, MarketDataSource, PricePoint, PriceSeries};
pub use crate::differencing::{determine_differencing_order, DifferencingOrder, DifferencingOrderSelector};
pub use crate::error::ForecastError;
pub use crate::evaluation::{evaluate, AccuracyMetric, Evaluator, HoldoutEvaluation};
pub use crate::forecaster::{forecast, ForecastPoint, ForecastResult, Forecaster};
pub use crate::models::{ArimaModel, FitOptions, FittedModel, Forecastable, ModelOrder};
pub use crate::pipeline::{ForecastPipeline, PipelineReport};
pub use crate::scaling::{scale, unscale, ScaledSeries};
pub use crate::stationarity::{StationarityAnalyzer, StationarityReport};
pub use series_math::StandardScaler;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
