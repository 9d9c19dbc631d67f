//! Differencing and its inverse
//!
//! Each differencing round replaces every value with its change from the
//! previous one, so a round shortens the series by exactly one observation.

use crate::{MathError, Result};

/// First difference of a series; empty when fewer than two values are given
pub fn difference_once(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Apply first-order differencing `d` times
///
/// The result has `series.len() - d` values, or is empty once the series runs out.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.is_empty() {
            break;
        }
        result = difference_once(&result);
    }
    result
}

/// Undo `d` rounds of differencing for values that continue `original`
///
/// `differenced` holds future values on the `d`-times differenced scale. Each
/// level is rebuilt by a cumulative sum anchored at the last observation of the
/// corresponding intermediate difference of `original`. Only the trailing `d`
/// observations of `original` determine those anchors.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Result<Vec<f64>> {
    if d == 0 {
        return Ok(differenced.to_vec());
    }
    if original.len() < d {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} original observations to integrate {} times, have {}",
            d,
            d,
            original.len()
        )));
    }

    // anchors[level] is the last value of the level-times differenced series
    let mut anchors = Vec::with_capacity(d);
    let mut tail = original[original.len() - d..].to_vec();
    while let Some(&last) = tail.last() {
        anchors.push(last);
        tail = difference_once(&tail);
    }

    let mut result = differenced.to_vec();
    for anchor in anchors.into_iter().rev() {
        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    Ok(result)
}
