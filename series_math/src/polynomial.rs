//! Lag polynomials and their roots
//!
//! A lag polynomial `1 - c_1 z - ... - c_k z^k` factors as `Π (1 - λ_i z)`.
//! The `λ_i` are the reciprocal roots: the eigenvalues of the companion matrix
//! whose first row holds the coefficients. An autoregression is stationary and
//! a moving average is invertible when every reciprocal root lies strictly
//! inside the unit circle.

use crate::{MathError, Result};
use nalgebra::linalg::Schur;
use nalgebra::{Complex, DMatrix, Normed};

/// Largest reciprocal-root modulus a constrained polynomial keeps, so that
/// every root lies at least 1% outside the unit circle
pub const MAX_ROOT_MODULUS: f64 = 1.0 / 1.01;

const SCHUR_MAX_ITERATIONS: usize = 10_000;

/// Reciprocal roots of `1 - c_1 z - ... - c_k z^k`
pub fn reciprocal_roots(coefficients: &[f64]) -> Result<Vec<Complex<f64>>> {
    let k = coefficients.len();
    if k == 0 {
        return Ok(Vec::new());
    }
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(MathError::InvalidInput(
            "Lag polynomial has non-finite coefficients".to_string(),
        ));
    }

    let companion = DMatrix::from_fn(k, k, |r, c| {
        if r == 0 {
            coefficients[c]
        } else if r == c + 1 {
            1.0
        } else {
            0.0
        }
    });
    let schur = Schur::try_new(companion, f64::EPSILON, SCHUR_MAX_ITERATIONS).ok_or_else(|| {
        MathError::CalculationError(format!(
            "Companion matrix of order {} did not converge to Schur form",
            k
        ))
    })?;

    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

/// Largest reciprocal-root modulus, 0 for an empty polynomial
pub fn max_root_modulus(coefficients: &[f64]) -> Result<f64> {
    Ok(reciprocal_roots(coefficients)?
        .iter()
        .map(|root| root.norm())
        .fold(0.0, f64::max))
}

/// Coefficients `c_i` of `Π (1 - λ_i z) = 1 - c_1 z - ... - c_k z^k`
///
/// Complex roots are expected in conjugate pairs; the imaginary residue of the
/// expansion is dropped.
pub fn from_reciprocal_roots(roots: &[Complex<f64>]) -> Vec<f64> {
    let mut expanded = vec![Complex::new(1.0, 0.0)];
    for &root in roots {
        let mut next = expanded.clone();
        next.push(Complex::new(0.0, 0.0));
        for k in 1..next.len() {
            next[k] -= root * expanded[k - 1];
        }
        expanded = next;
    }
    expanded[1..].iter().map(|c| -c.re).collect()
}

/// Move every reciprocal root into the disc of radius [`MAX_ROOT_MODULUS`]
///
/// Roots outside the unit circle are reflected to `1 / conj(λ)`; whatever still
/// lies beyond the bound is pulled radially onto it. Returns `None` when no root
/// needed moving.
pub fn constrain_to_unit_circle(coefficients: &[f64]) -> Result<Option<Vec<f64>>> {
    let roots = reciprocal_roots(coefficients)?;
    if roots.iter().all(|root| root.norm() <= MAX_ROOT_MODULUS) {
        return Ok(None);
    }

    let constrained: Vec<Complex<f64>> = roots
        .into_iter()
        .map(|root| {
            let reflected = if root.norm() > 1.0 {
                root / root.norm_sqr()
            } else {
                root
            };
            let modulus = reflected.norm();
            if modulus > MAX_ROOT_MODULUS {
                reflected * (MAX_ROOT_MODULUS / modulus)
            } else {
                reflected
            }
        })
        .collect();

    Ok(Some(from_reciprocal_roots(&constrained)))
}
