//! Ordinary least squares
//!
//! Solved through a singular value decomposition so nearly collinear lag
//! regressors are detected as rank deficiency instead of producing garbage.

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};

/// Outcome of an ordinary least squares regression
#[derive(Debug, Clone)]
pub struct LeastSquaresFit {
    /// Estimated coefficients, one per design column
    pub coefficients: Vec<f64>,
    /// Observed minus fitted values
    pub residuals: Vec<f64>,
    /// Residual sum of squares
    pub rss: f64,
    /// Number of rows in the regression
    pub observations: usize,
    std_errors: Vec<f64>,
}

impl LeastSquaresFit {
    /// Standard error of coefficient `index`
    pub fn std_error(&self, index: usize) -> Option<f64> {
        self.std_errors.get(index).copied()
    }

    /// t-statistic of coefficient `index`
    ///
    /// An exact fit has zero standard errors; the statistic is then infinite
    /// with the sign of the coefficient.
    pub fn t_value(&self, index: usize) -> Option<f64> {
        let coefficient = *self.coefficients.get(index)?;
        let se = self.std_error(index)?;
        if se > 0.0 {
            Some(coefficient / se)
        } else if coefficient < 0.0 {
            Some(f64::NEG_INFINITY)
        } else if coefficient > 0.0 {
            Some(f64::INFINITY)
        } else {
            None
        }
    }

    /// Number of estimated coefficients
    pub fn parameters(&self) -> usize {
        self.coefficients.len()
    }

    /// Gaussian Akaike information criterion of the fit
    pub fn aic(&self) -> f64 {
        let n = self.observations as f64;
        let k = self.parameters() as f64;
        n * ((2.0 * std::f64::consts::PI).ln() + (self.rss / n).ln() + 1.0) + 2.0 * k
    }
}

/// Regress `target` on the columns of `design`
///
/// Requires more rows than columns and a full column rank design.
pub fn least_squares(design: &DMatrix<f64>, target: &DVector<f64>) -> Result<LeastSquaresFit> {
    let (rows, cols) = design.shape();
    if cols == 0 {
        return Err(MathError::InvalidInput(
            "Design matrix has no columns".to_string(),
        ));
    }
    if target.len() != rows {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            rows,
            target.len()
        )));
    }
    if rows <= cols {
        return Err(MathError::InsufficientData(format!(
            "Least squares with {} parameters needs more than {} observations, have {}",
            cols, cols, rows
        )));
    }
    if design.iter().chain(target.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Regression input contains non-finite values".to_string(),
        ));
    }

    let svd = design.clone().svd(true, true);
    let largest = svd.singular_values.max();
    let eps = largest * rows.max(cols) as f64 * f64::EPSILON;
    if largest <= 0.0 || svd.rank(eps) < cols {
        return Err(MathError::SingularMatrix(format!(
            "Design matrix of {} columns is rank deficient",
            cols
        )));
    }

    let beta = svd
        .solve(target, eps)
        .map_err(|e| MathError::CalculationError(e.to_string()))?;
    let residuals = target - design * &beta;
    let rss = residuals.norm_squared();

    let v_t = svd.v_t.as_ref().ok_or_else(|| {
        MathError::CalculationError("SVD did not produce right singular vectors".to_string())
    })?;
    let sigma_sq = rss / (rows - cols) as f64;
    // diag((X'X)^-1) = sum_k (V[j, k] / s_k)^2
    let std_errors = (0..cols)
        .map(|j| {
            let inv_diag: f64 = (0..svd.singular_values.len())
                .map(|k| (v_t[(k, j)] / svd.singular_values[k]).powi(2))
                .sum();
            (sigma_sq * inv_diag).sqrt()
        })
        .collect();

    Ok(LeastSquaresFit {
        coefficients: beta.iter().copied().collect(),
        residuals: residuals.iter().copied().collect(),
        rss,
        observations: rows,
        std_errors,
    })
}
