//! Price series and date range types.

use crate::error::{DataError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days per year used when sizing a trailing window.
const DAYS_PER_YEAR: i64 = 365;

/// Inclusive range of calendar dates to fetch and analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting a start after the end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// The `years` calendar years (of 365 days) ending at `end`.
    pub fn trailing_years(end: NaiveDate, years: u32) -> Self {
        let start = end - Duration::days(i64::from(years) * DAYS_PER_YEAR);
        Self { start, end }
    }

    /// First date of the range.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the range.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Closing price of one symbol on one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Date-ordered closing prices for a single symbol.
///
/// An empty series means the source had nothing for the symbol in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series, sorting the points by date.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Build a series from `(date, close)` pairs.
    pub fn from_pairs(
        symbol: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let points = pairs
            .into_iter()
            .map(|(date, close)| PricePoint::new(date, close))
            .collect();
        Self::new(symbol, points)
    }

    /// An empty series for `symbol`.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Price points in ascending date order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dates of every observation.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Closing prices of every observation.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_sorted_on_construction() {
        let series = PriceSeries::from_pairs(
            "AAPL",
            vec![
                (date(2024, 1, 3), 3.0),
                (date(2024, 1, 1), 1.0),
                (date(2024, 1, 2), 2.0),
            ],
        );

        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("XXXX");
        assert!(series.is_empty());
        assert_eq!(series.dates().count(), 0);
    }

    #[test]
    fn test_trailing_years() {
        let range = DateRange::trailing_years(date(2024, 6, 30), 5);
        assert_eq!(range.end(), date(2024, 6, 30));
        assert_eq!((range.end() - range.start()).num_days(), 5 * 365);
        assert!(range.contains(date(2022, 1, 1)));
        assert!(!range.contains(date(2024, 7, 1)));
    }

    #[test]
    fn test_invalid_range() {
        let result = DateRange::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(DataError::InvalidDateRange { .. })));
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }
}
