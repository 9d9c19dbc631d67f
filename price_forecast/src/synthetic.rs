//! Reproducible synthetic price series for demos and tests

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Generator of daily close series with Gaussian noise
#[derive(Debug, Clone)]
pub struct SyntheticSeries {
    start: NaiveDate,
    level: f64,
    seed: Option<u64>,
}

impl SyntheticSeries {
    /// Series starting on `start` around the price `level`
    pub fn new(start: NaiveDate, level: f64) -> Self {
        Self {
            start,
            level,
            seed: None,
        }
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn normal(std_dev: f64) -> Result<Normal<f64>> {
        Normal::new(0.0, std_dev).map_err(|e| {
            ForecastError::InvalidParameter(format!("Invalid noise deviation {}: {}", std_dev, e))
        })
    }

    /// `level + slope * t + noise`
    pub fn trend_with_noise(&self, len: usize, slope: f64, noise_sd: f64) -> Result<PriceSeries> {
        let normal = Self::normal(noise_sd)?;
        let mut rng = self.rng();
        let closes: Vec<f64> = (0..len)
            .map(|t| self.level + slope * t as f64 + normal.sample(&mut rng))
            .collect();
        PriceSeries::daily(self.start, &closes)
    }

    /// Gaussian random walk started at `level`
    pub fn random_walk(&self, len: usize, step_sd: f64) -> Result<PriceSeries> {
        let normal = Self::normal(step_sd)?;
        let mut rng = self.rng();
        let closes: Vec<f64> = (0..len)
            .scan(self.level, |price, _| {
                let current = *price;
                *price += normal.sample(&mut rng);
                Some(current)
            })
            .collect();
        PriceSeries::daily(self.start, &closes)
    }

    /// Stationary noise around `level`
    pub fn white_noise(&self, len: usize, noise_sd: f64) -> Result<PriceSeries> {
        self.trend_with_noise(len, 0.0, noise_sd)
    }
}
