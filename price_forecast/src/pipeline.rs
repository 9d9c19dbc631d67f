//! End-to-end forecasting run
//!
//! The pipeline chains the steps a user of the forecasting screen goes
//! through: optional smoothing, choosing the differencing order, optional
//! scaling, a holdout evaluation and finally the dated forecast. Results are
//! always reported in price units.

use crate::config::PipelineConfig;
use crate::data::{MarketDataSource, PriceSeries};
use crate::differencing::DifferencingOrderSelector;
use crate::error::{ForecastError, Result};
use crate::evaluation::{Evaluator, HoldoutEvaluation};
use crate::forecaster::{ForecastResult, Forecaster};
use crate::models::ArimaModel;
use crate::scaling::{scale, unscale};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Differencing order used by both the evaluation and the forecast
    pub d: usize,
    /// Stationarity p-value after `d` differences
    pub p_value: f64,
    /// Holdout evaluation in price units
    pub evaluation: HoldoutEvaluation,
    /// Dated forecast in price units
    pub forecast: ForecastResult,
    /// The series the model was trained on, after smoothing
    pub history: PriceSeries,
    pub scaled: bool,
}

/// Runs the whole forecasting workflow under one configuration
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: PipelineConfig,
}

impl ForecastPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with the forecast dated from today
    pub fn run(&self, series: &PriceSeries) -> Result<PipelineReport> {
        self.run_at(series, Local::now().date_naive())
    }

    /// Run with the first forecast day pinned to `start`
    pub fn run_at(&self, series: &PriceSeries, start: NaiveDate) -> Result<PipelineReport> {
        let history = match self.config.smoothing_window {
            Some(window) => series.smoothed(window)?,
            None => series.clone(),
        };
        let closes = history.closes();

        let selector = DifferencingOrderSelector::new(&self.config.selector);
        let order = selector.select(&closes)?;
        let d = order.d;

        let (values, scaler) = if self.config.scale {
            let (scaled, scaler) = scale(&history)?;
            (scaled.values().to_vec(), Some(scaler))
        } else {
            (closes, None)
        };

        let model = ArimaModel::with_options(self.config.order, self.config.fit.clone());

        let evaluation = Evaluator::new(model.clone())
            .with_holdout(self.config.holdout)?
            .with_selector(selector)
            .evaluate_detailed(&values, Some(d))?;
        let evaluation = match &scaler {
            Some(scaler) => HoldoutEvaluation::score(
                d,
                unscale(scaler, &evaluation.predictions),
                unscale(scaler, &evaluation.actuals),
            )?,
            None => evaluation,
        };

        let forecast = Forecaster::new(model)
            .with_horizon(self.config.horizon)?
            .forecast_from(&values, d, start)?;
        let forecast = match &scaler {
            Some(scaler) => forecast.map_values(|v| scaler.inverse_value(v)),
            None => forecast,
        };

        info!(
            d,
            p_value = order.p_value,
            rmse = evaluation.metric.value(),
            observations = history.len(),
            "pipeline finished"
        );

        Ok(PipelineReport {
            d,
            p_value: order.p_value,
            evaluation,
            forecast,
            history,
            scaled: scaler.is_some(),
        })
    }

    /// Fetch `symbol` from `source` and run on the closes in `[from, to]`
    pub fn run_for_symbol<S: MarketDataSource + ?Sized>(
        &self,
        source: &S,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PipelineReport> {
        let series = source.daily_closes(symbol, from, to)?;
        info!(symbol, observations = series.len(), "loaded market data");
        self.run(&series)
    }

    /// Run on a worker thread, giving up after `timeout`
    ///
    /// On timeout the worker is left to finish in the background and its
    /// result is discarded.
    pub fn run_with_deadline(&self, series: PriceSeries, timeout: Duration) -> Result<PipelineReport> {
        let pipeline = self.clone();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            // the receiver is gone once the deadline has passed
            let _ = tx.send(pipeline.run(&series));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(?timeout, "pipeline deadline exceeded");
                Err(ForecastError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(ForecastError::ModelConvergence(
                "Pipeline worker stopped without a result".to_string(),
            )),
        }
    }
}

impl Default for ForecastPipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }
}
