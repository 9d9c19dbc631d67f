//! Trailing moving averages
//!
//! Used to smooth a daily close series before it is modelled.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) over a fixed trailing window
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// True once a full window has been observed
    pub fn is_ready(&self) -> bool {
        self.values.len() >= self.period
    }
}

/// Trailing rolling mean with the incomplete leading windows dropped
///
/// The output has `values.len() - window + 1` entries; position `i` is the mean
/// of `values[i..i + window]`.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    if values.len() < window {
        return Err(MathError::InsufficientData(format!(
            "Rolling mean over {} values needs at least {} observations, have {}",
            window,
            window,
            values.len()
        )));
    }

    let mut out = Vec::with_capacity(values.len() + 1 - window);
    for &value in values {
        sma.update(value);
        if sma.is_ready() {
            out.push(sma.value()?);
        }
    }
    Ok(out)
}
