//! Daily close series and the loaders that produce them

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use series_math::rolling_mean;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One daily observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered daily close prices
///
/// Dates are strictly increasing and closes are positive and finite. The series
/// is never empty. Every transformation returns a new series, leaving the
/// caller's copy untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a validated series from points already in date order
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Price series is empty".to_string(),
            ));
        }

        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(ForecastError::DataError(format!(
                    "Close on {} must be positive and finite, got {}",
                    point.date, point.close
                )));
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(ForecastError::DataError(format!(
                    "Dates must be strictly increasing: {} follows {}",
                    point.date,
                    points[i - 1].date
                )));
            }
        }

        Ok(Self { points })
    }

    /// Create a series from parallel date and close vectors
    pub fn from_parts(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match closes length ({})",
                dates.len(),
                closes.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(closes)
                .map(|(date, close)| PricePoint { date, close })
                .collect(),
        )
    }

    /// Create a series on consecutive calendar days starting at `start`
    pub fn daily(start: NaiveDate, closes: &[f64]) -> Result<Self> {
        let dates = (0..closes.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Self::from_parts(dates, closes.to_vec())
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for parity with `len`
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close prices in date order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    /// Points with `start <= date <= end`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(
            self.points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        )
    }

    /// Trailing rolling mean of the closes
    ///
    /// Each smoothed value is dated at the last day of its window, so the first
    /// `window - 1` dates are dropped.
    pub fn smoothed(&self, window: usize) -> Result<Self> {
        let means = rolling_mean(&self.closes(), window)?;
        let dates = self.dates().split_off(window - 1);
        Self::from_parts(dates, means)
    }
}

/// Data loader for daily close CSV files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a daily close series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a daily close series from any CSV source with a header row
    ///
    /// Rows whose close is empty, `null` or `NaN` are skipped (market data
    /// exports use these for holidays). Rows are sorted by date.
    pub fn from_reader<R: Read>(reader: R) -> Result<PriceSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let date_idx = Self::detect_date_column(&columns)?;
        let close_idx = Self::detect_close_column(&columns)?;

        let mut points = Vec::new();
        let mut skipped = 0usize;
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let (Some(raw_date), Some(raw_close)) = (record.get(date_idx), record.get(close_idx))
            else {
                skipped += 1;
                continue;
            };

            if Self::is_missing(raw_close) {
                skipped += 1;
                continue;
            }

            let date = parse_date(raw_date)?;
            let close: f64 = raw_close.parse().map_err(|_| {
                ForecastError::DataError(format!(
                    "Row {}: cannot parse close value '{}'",
                    row + 2,
                    raw_close
                ))
            })?;
            points.push(PricePoint { date, close });
        }

        if skipped > 0 {
            debug!(skipped, "skipped rows without a close value");
        }
        if points.is_empty() {
            return Err(ForecastError::InsufficientData(
                "CSV source contains no close prices".to_string(),
            ));
        }

        points.sort_by_key(|p| p.date);
        PriceSeries::new(points)
    }

    /// Find the date column: the first header mentioning a date or time
    fn detect_date_column(columns: &[String]) -> Result<usize> {
        columns
            .iter()
            .position(|name| {
                let lower = name.to_lowercase();
                lower.contains("date") || lower.contains("time")
            })
            .ok_or_else(|| ForecastError::DataError("No date column found in data".to_string()))
    }

    /// Find the close column, preferring `Close` over `Adj Close`, then any price column
    fn detect_close_column(columns: &[String]) -> Result<usize> {
        let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

        lowered
            .iter()
            .position(|name| name == "close")
            .or_else(|| {
                lowered
                    .iter()
                    .position(|name| name.contains("close") && !name.contains("adj"))
            })
            .or_else(|| lowered.iter().position(|name| name.contains("close")))
            .or_else(|| lowered.iter().position(|name| name.contains("price")))
            .ok_or_else(|| ForecastError::DataError("No close column found in data".to_string()))
    }

    fn is_missing(raw: &str) -> bool {
        raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("nan")
    }
}

/// Parse a calendar date from the formats market data exports commonly use
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    // timestamps with a zone suffix such as "2025-01-02 00:00:00-05:00"
    if let Some(prefix) = raw.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(date);
        }
    }

    Err(ForecastError::DataError(format!("Unrecognised date '{}'", raw)))
}

/// Supplier of daily close series for a symbol and date range
pub trait MarketDataSource {
    /// Daily closes for `symbol` with `start <= date <= end`
    ///
    /// An unknown symbol or an empty range is reported as
    /// [`ForecastError::InsufficientData`].
    fn daily_closes(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// Market data read from `<root>/<SYMBOL>.csv` files
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    root: PathBuf,
}

impl CsvMarketData {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl MarketDataSource for CsvMarketData {
    fn daily_closes(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(ForecastError::InsufficientData(format!(
                "No market data for symbol {}",
                symbol
            )));
        }

        let series = DataLoader::from_csv(&path)?;
        series.between(start, end).map_err(|_| {
            ForecastError::InsufficientData(format!(
                "No market data for {} between {} and {}",
                symbol, start, end
            ))
        })
    }
}
