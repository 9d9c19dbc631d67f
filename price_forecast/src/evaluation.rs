//! Holdout evaluation of a forecasting model

use crate::config::DEFAULT_HORIZON;
use crate::differencing::DifferencingOrderSelector;
use crate::error::{ForecastError, Result};
use crate::models::{ArimaModel, FittedModel, Forecastable};
use crate::utils::{forecast_accuracy, holdout_split, round_to, ForecastAccuracy};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Holdout RMSE in price units, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccuracyMetric(f64);

impl AccuracyMetric {
    pub fn from_rmse(rmse: f64) -> Result<Self> {
        if !rmse.is_finite() || rmse < 0.0 {
            return Err(ForecastError::ModelConvergence(format!(
                "RMSE must be finite and non-negative, got {}",
                rmse
            )));
        }
        Ok(Self(round_to(rmse, 2)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for AccuracyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Everything a holdout evaluation produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldoutEvaluation {
    /// Differencing order the model was fitted with
    pub d: usize,
    pub predictions: Vec<f64>,
    pub actuals: Vec<f64>,
    pub accuracy: ForecastAccuracy,
    pub metric: AccuracyMetric,
}

impl HoldoutEvaluation {
    /// Score `predictions` against `actuals`
    pub fn score(d: usize, predictions: Vec<f64>, actuals: Vec<f64>) -> Result<Self> {
        let accuracy = forecast_accuracy(&predictions, &actuals)?;
        let metric = AccuracyMetric::from_rmse(accuracy.rmse)?;
        Ok(Self {
            d,
            predictions,
            actuals,
            accuracy,
            metric,
        })
    }
}

/// Fits on all but the trailing `holdout` values and scores the forecast of them
#[derive(Debug, Clone)]
pub struct Evaluator<M: Forecastable> {
    model: M,
    holdout: usize,
    selector: DifferencingOrderSelector,
}

impl<M: Forecastable> Evaluator<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            holdout: DEFAULT_HORIZON,
            selector: DifferencingOrderSelector::default(),
        }
    }

    pub fn with_holdout(mut self, holdout: usize) -> Result<Self> {
        if holdout == 0 {
            return Err(ForecastError::InvalidParameter(
                "Holdout length must be greater than zero".to_string(),
            ));
        }
        self.holdout = holdout;
        Ok(self)
    }

    pub fn with_selector(mut self, selector: DifferencingOrderSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn holdout(&self) -> usize {
        self.holdout
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Holdout RMSE with `d` chosen on the training part
    pub fn evaluate(&self, series: &[f64]) -> Result<AccuracyMetric> {
        self.evaluate_detailed(series, None).map(|e| e.metric)
    }

    /// Holdout RMSE with a given differencing order
    pub fn evaluate_with_order(&self, series: &[f64], d: usize) -> Result<AccuracyMetric> {
        self.evaluate_detailed(series, Some(d)).map(|e| e.metric)
    }

    /// Full holdout evaluation; `d` is selected on the training part when `None`
    ///
    /// The length check happens before any differencing or fitting.
    pub fn evaluate_detailed(&self, series: &[f64], d: Option<usize>) -> Result<HoldoutEvaluation> {
        let (train, test) = holdout_split(series, self.holdout)?;

        let d = match d {
            Some(d) => d,
            None => self.selector.select(train)?.d,
        };

        let fitted = self.model.fit(train, d)?;
        let predictions = fitted.predict(test.len())?;
        let evaluation = HoldoutEvaluation::score(d, predictions, test.to_vec())?;

        info!(
            model = fitted.name(),
            d,
            holdout = self.holdout,
            rmse = evaluation.metric.value(),
            "holdout evaluation"
        );
        Ok(evaluation)
    }
}

impl Default for Evaluator<ArimaModel> {
    fn default() -> Self {
        Self::new(ArimaModel::default())
    }
}

/// Holdout RMSE of the default ARIMA(30, d, 30) model
pub fn evaluate(series: &[f64]) -> Result<AccuracyMetric> {
    Evaluator::default().evaluate(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelOrder;

    #[derive(Debug, Clone)]
    struct LastValue;

    #[derive(Debug)]
    struct FittedLastValue(f64);

    impl FittedModel for FittedLastValue {
        fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
            Ok(vec![self.0; horizon])
        }

        fn name(&self) -> &str {
            "LastValue"
        }
    }

    impl Forecastable for LastValue {
        type Model = FittedLastValue;

        fn fit(&self, series: &[f64], _differencing: usize) -> Result<FittedLastValue> {
            series
                .last()
                .copied()
                .map(FittedLastValue)
                .ok_or_else(|| ForecastError::InsufficientData("empty".to_string()))
        }

        fn name(&self) -> &str {
            "LastValue"
        }
    }

    #[test]
    fn test_metric_rounding() {
        assert_eq!(AccuracyMetric::from_rmse(1.23456).unwrap().value(), 1.23);
        assert_eq!(AccuracyMetric::from_rmse(0.0).unwrap().value(), 0.0);
        assert!(AccuracyMetric::from_rmse(f64::NAN).is_err());
        assert!(AccuracyMetric::from_rmse(-1.0).is_err());
    }

    #[test]
    fn test_holdout_scores_trailing_values() {
        // train ends at 9.0; the holdout is 10..=39
        let series: Vec<f64> = (0..40).map(|v| v as f64).collect();
        let evaluation = Evaluator::new(LastValue)
            .with_holdout(30)
            .unwrap()
            .evaluate_detailed(&series, Some(1))
            .unwrap();

        assert_eq!(evaluation.d, 1);
        assert_eq!(evaluation.actuals.len(), 30);
        assert_eq!(evaluation.actuals[0], 10.0);
        assert!(evaluation.predictions.iter().all(|&p| p == 9.0));
        assert_eq!(evaluation.accuracy.mae, 15.5);
    }

    #[test]
    fn test_short_series_fails_before_fitting() {
        let series = vec![1.0; 30];
        let result = Evaluator::new(ArimaModel::new(ModelOrder::new(1, 0))).evaluate(&series);
        assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
    }

    #[test]
    fn test_zero_holdout_rejected() {
        assert!(matches!(
            Evaluator::new(LastValue).with_holdout(0),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
