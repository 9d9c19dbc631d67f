//! ARIMA models for daily price forecasting
//!
//! Estimation follows the Hannan-Rissanen regression approach: a long
//! autoregression supplies innovation estimates, then the ARMA coefficients
//! come from one least squares regression on lagged values and lagged
//! innovations. Optional refinement passes re-filter the innovations with the
//! current coefficients and re-estimate until the coefficients settle.
//!
//! A constant enters as a regression with ARMA errors: its mean is removed
//! from the differenced series before estimation and added back to the
//! forecasts. After every estimate the AR roots are kept inside the
//! stationarity region and the MA roots inside the invertibility region.

use crate::error::{ForecastError, Result};
use crate::models::{FitOptions, FittedModel, Forecastable, ModelOrder};
use nalgebra::{DMatrix, DVector};
use series_math::descriptive::{all_equal, is_constant, mean};
use series_math::{
    constrain_to_unit_circle, difference, integrate, least_squares, max_root_modulus, MathError,
};
use tracing::debug;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ModelOrder,
    options: FitOptions,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct FittedArima {
    name: String,
    order: ModelOrder,
    /// Differencing order (d)
    d: usize,
    coefficients: Coefficients,
    /// Mean removed from the differenced series; the drift when d >= 1
    mean: f64,
    /// Series the model was fitted on, needed to integrate forecasts
    original: Vec<f64>,
    /// The `d`-times differenced series with `mean` removed
    centered: Vec<f64>,
    /// In-sample innovations aligned with `centered`; zero where unestimated
    residuals: Vec<f64>,
    /// Refinement passes actually run
    iterations: usize,
    /// Whether any root had to be moved inside the unit circle
    constrained: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Coefficients {
    ar: Vec<f64>,
    ma: Vec<f64>,
}

impl Coefficients {
    fn max_change(&self, other: &Coefficients) -> f64 {
        self.ar
            .iter()
            .copied()
            .zip(other.ar.iter().copied())
            .chain(self.ma.iter().copied().zip(other.ma.iter().copied()))
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl ArimaModel {
    /// Create a new ARIMA model with the given AR/MA orders
    pub fn new(order: ModelOrder) -> Self {
        Self::with_options(order, FitOptions::default())
    }

    /// Create a new ARIMA model with explicit estimation settings
    pub fn with_options(order: ModelOrder, options: FitOptions) -> Self {
        Self {
            name: format!("ARIMA({},d,{})", order.ar, order.ma),
            order,
            options,
        }
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Regress `w[t]` on `[w[t-1..=t-p], innovations[t-1..=t-q]]` for `t >= start`
    ///
    /// Returns the coefficients and the residuals placed at their time index.
    fn arma_regression(
        w: &[f64],
        innovations: &[f64],
        p: usize,
        q: usize,
        start: usize,
    ) -> std::result::Result<(Coefficients, Vec<f64>), MathError> {
        let rows = w.len().saturating_sub(start);
        let cols = p + q;

        if cols == 0 {
            let mut residuals = vec![0.0; w.len()];
            residuals[start..].copy_from_slice(&w[start..]);
            return Ok((Coefficients::default(), residuals));
        }

        let design = DMatrix::from_fn(rows, cols, |r, c| {
            let t = start + r;
            if c < p {
                w[t - 1 - c]
            } else {
                innovations[t - 1 - (c - p)]
            }
        });
        let target = DVector::from_fn(rows, |r, _| w[start + r]);
        let fit = least_squares(&design, &target)?;

        let beta = &fit.coefficients;
        let coefficients = Coefficients {
            ar: beta[..p].to_vec(),
            ma: beta[p..].to_vec(),
        };
        let mut residuals = vec![0.0; w.len()];
        residuals[start..].copy_from_slice(&fit.residuals);

        Ok((coefficients, residuals))
    }

    /// Recursively filter innovations implied by `coefficients`
    fn filter_innovations(w: &[f64], coefficients: &Coefficients) -> Result<Vec<f64>> {
        let p = coefficients.ar.len();
        let q = coefficients.ma.len();
        let mut innovations = vec![0.0; w.len()];

        for t in p.max(q)..w.len() {
            let ar: f64 = (0..p).map(|i| coefficients.ar[i] * w[t - 1 - i]).sum();
            let ma: f64 = (0..q).map(|j| coefficients.ma[j] * innovations[t - 1 - j]).sum();
            let innovation = w[t] - ar - ma;
            if !innovation.is_finite() {
                return Err(ForecastError::ModelConvergence(format!(
                    "Innovation filter diverged at observation {}",
                    t
                )));
            }
            innovations[t] = innovation;
        }

        Ok(innovations)
    }

    /// Pull AR roots inside the stationarity bound and MA roots inside the
    /// invertibility bound; `None` when both polynomials already comply
    fn constrain_roots(&self, d: usize, coefficients: &Coefficients) -> Result<Option<Coefficients>> {
        let ar = constrain_to_unit_circle(&coefficients.ar)
            .map_err(|e| self.stage_error(d, "AR stationarity", e))?;
        // θ(z) = 1 + θ_1 z + ... is the lag polynomial of -θ
        let negated: Vec<f64> = coefficients.ma.iter().map(|theta| -theta).collect();
        let ma = constrain_to_unit_circle(&negated)
            .map_err(|e| self.stage_error(d, "MA invertibility", e))?
            .map(|c| c.into_iter().map(|theta| -theta).collect::<Vec<f64>>());

        if ar.is_none() && ma.is_none() {
            return Ok(None);
        }
        debug!(
            model = %self.name,
            d,
            ar = ar.is_some(),
            ma = ma.is_some(),
            "moved ARIMA roots inside the unit circle"
        );

        Ok(Some(Coefficients {
            ar: ar.unwrap_or_else(|| coefficients.ar.clone()),
            ma: ma.unwrap_or_else(|| coefficients.ma.clone()),
        }))
    }

    fn stage_error(&self, d: usize, stage: &str, err: MathError) -> ForecastError {
        ForecastError::ModelConvergence(format!(
            "ARIMA({},{},{}) {}: {}",
            self.order.ar, d, self.order.ma, stage, err
        ))
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new(ModelOrder::default())
    }
}

impl Forecastable for ArimaModel {
    type Model = FittedArima;

    fn fit(&self, series: &[f64], d: usize) -> Result<FittedArima> {
        if series.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(
                "Series contains non-finite values".to_string(),
            ));
        }

        let p = self.order.ar;
        let q = self.order.ma;
        let w = difference(series, d);
        if w.len() < 2 {
            return Err(ForecastError::ModelConvergence(format!(
                "ARIMA({},{},{}) has only {} observations after differencing",
                p,
                d,
                q,
                w.len()
            )));
        }
        // differencing an exact line leaves float residue, levels must match exactly
        let flat = if d == 0 { all_equal(&w) } else { is_constant(&w) };
        if flat {
            return Err(ForecastError::ModelConvergence(format!(
                "ARIMA({},{},{}) cannot be estimated on a constant series",
                p, d, q
            )));
        }

        let level = if self.options.constant_for(d) {
            mean(&w).unwrap_or(0.0)
        } else {
            0.0
        };
        let z: Vec<f64> = w.iter().map(|v| v - level).collect();

        let (mut coefficients, mut residuals, start) = if q == 0 {
            let (coefficients, residuals) = Self::arma_regression(&z, &[], p, 0, p)
                .map_err(|e| self.stage_error(d, "autoregression", e))?;
            (coefficients, residuals, p)
        } else {
            let m = self
                .options
                .long_ar_order
                .unwrap_or(2 * p.max(q))
                .max(1);
            let (_, long_ar_residuals) = Self::arma_regression(&z, &[], m, 0, m)
                .map_err(|e| self.stage_error(d, "long autoregression", e))?;

            let start = p.max(m + q);
            let (coefficients, residuals) = Self::arma_regression(&z, &long_ar_residuals, p, q, start)
                .map_err(|e| self.stage_error(d, "ARMA regression", e))?;
            (coefficients, residuals, start)
        };

        let mut constrained = false;
        if let Some(adjusted) = self.constrain_roots(d, &coefficients)? {
            residuals = Self::filter_innovations(&z, &adjusted)?;
            coefficients = adjusted;
            constrained = true;
        }

        let mut iterations = 0;
        if q > 0 && self.options.refinement_iterations > 0 {
            let refine_start = p.max(q);
            let mut last_change = f64::INFINITY;

            while iterations < self.options.refinement_iterations {
                iterations += 1;
                let innovations = Self::filter_innovations(&z, &coefficients)?;
                let (mut next, mut next_residuals) =
                    Self::arma_regression(&z, &innovations, p, q, refine_start)
                        .map_err(|e| self.stage_error(d, "refinement", e))?;
                if let Some(adjusted) = self.constrain_roots(d, &next)? {
                    next_residuals = Self::filter_innovations(&z, &adjusted)?;
                    next = adjusted;
                    constrained = true;
                }

                last_change = coefficients.max_change(&next);
                coefficients = next;
                residuals = next_residuals;
                if last_change < self.options.tolerance {
                    break;
                }
            }

            if last_change >= self.options.tolerance {
                return Err(ForecastError::ModelConvergence(format!(
                    "ARIMA({},{},{}) refinement did not converge within {} iterations (last change {:.3e})",
                    p, d, q, iterations, last_change
                )));
            }
        }

        debug!(
            model = %self.name,
            d,
            observations = z.len() - start,
            iterations,
            constrained,
            "fitted ARIMA model"
        );

        Ok(FittedArima {
            name: format!("ARIMA({},{},{})", p, d, q),
            order: self.order,
            d,
            coefficients,
            mean: level,
            original: series.to_vec(),
            centered: z,
            residuals,
            iterations,
            constrained,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedArima {
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn differencing(&self) -> usize {
        self.d
    }

    /// Mean of the differenced series, or 0 when no constant was estimated
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.coefficients.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.coefficients.ma
    }

    /// In-sample innovations on the differenced scale
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn constrained(&self) -> bool {
        self.constrained
    }

    /// Largest reciprocal-root modulus of the AR polynomial
    pub fn ar_root_modulus(&self) -> Result<f64> {
        Ok(max_root_modulus(&self.coefficients.ar)?)
    }

    /// Largest reciprocal-root modulus of the MA polynomial
    pub fn ma_root_modulus(&self) -> Result<f64> {
        let negated: Vec<f64> = self.coefficients.ma.iter().map(|theta| -theta).collect();
        Ok(max_root_modulus(&negated)?)
    }
}

impl FittedModel for FittedArima {
    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let n = self.centered.len();
        let mut extended = self.centered.clone();
        let mut innovations = self.residuals.clone();
        extended.reserve(horizon);
        innovations.reserve(horizon);

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = 0.0;
            for (i, phi) in self.coefficients.ar.iter().enumerate() {
                pred += phi * extended[t - 1 - i];
            }
            // future innovations have zero mean
            for (j, theta) in self.coefficients.ma.iter().enumerate() {
                pred += theta * innovations[t - 1 - j];
            }
            extended.push(pred);
            innovations.push(0.0);
        }

        let future: Vec<f64> = extended[n..].iter().map(|v| v + self.mean).collect();
        let predictions = integrate(&future, &self.original, self.d)?;
        if predictions.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelConvergence(format!(
                "{} produced non-finite predictions",
                self.name
            )));
        }

        Ok(predictions)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
