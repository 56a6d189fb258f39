//! Industry Breadth Aggregate
//!
//! Reduces the crossover signals of an industry's tickers to one daily
//! percentage: how many of the configured tickers were bullish that day.

use crate::crossover::SignalSeries;
use crate::error::{Result, SignalError};
use crate::frame::{date_column, read_dates};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Breadth of one industry on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreadthPoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Tickers with a bullish signal on this date.
    pub bullish: usize,
    /// Configured tickers in the industry.
    pub total: usize,
    /// `100 * bullish / total`.
    pub percentage: f64,
}

/// Daily percentage of an industry's tickers in the bullish state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryAggregate {
    industry: String,
    configured: usize,
    points: Vec<BreadthPoint>,
}

impl IndustryAggregate {
    /// An aggregate with no dates.
    pub fn empty(industry: impl Into<String>, configured: usize) -> Self {
        Self {
            industry: industry.into(),
            configured,
            points: Vec::new(),
        }
    }

    /// Aggregate the signals of an industry.
    ///
    /// Dates are the union of all series' dates. A ticker with no observation
    /// on a date counts as not bullish, and so does every configured ticker
    /// that has no series at all: the denominator is always `configured`,
    /// never the number of tickers with data that day.
    pub fn from_signals(
        industry: impl Into<String>,
        signals: &[SignalSeries],
        configured: usize,
    ) -> Result<Self> {
        let industry = industry.into();

        if signals.len() > configured {
            return Err(SignalError::TickerCountMismatch {
                industry,
                series: signals.len(),
                configured,
            });
        }

        if signals.iter().all(SignalSeries::is_empty) {
            return Ok(Self::empty(industry, configured));
        }

        let frames = signals
            .iter()
            .map(|s| signal_frame(s).map(IntoLazy::lazy))
            .collect::<PolarsResult<Vec<_>>>()?;

        // 1. Stack every ticker's (date, bullish) rows
        // 2. Count bullish rows per date; a missing row adds nothing
        // 3. Divide by the configured ticker count
        let counts = concat(frames, UnionArgs::default())?
            .group_by([col("date")])
            .agg([col("bullish")
                .cast(DataType::UInt32)
                .sum()
                .cast(DataType::UInt32)
                .alias("bullish_count")])
            .with_column(
                (col("bullish_count").cast(DataType::Float64) * lit(100.0)
                    / lit(configured as f64))
                .alias("percentage"),
            )
            .sort(["date"], SortMultipleOptions::default())
            .collect()?;

        let dates = read_dates(&counts, "date")?;
        let bullish = counts.column("bullish_count")?.u32()?;
        let percentage = counts.column("percentage")?.f64()?;

        let points = dates
            .into_iter()
            .zip(bullish.into_iter())
            .zip(percentage.into_iter())
            .map(|((date, bullish), percentage)| BreadthPoint {
                date,
                bullish: bullish.unwrap_or(0) as usize,
                total: configured,
                percentage: percentage.unwrap_or(0.0),
            })
            .collect();

        Ok(Self {
            industry,
            configured,
            points,
        })
    }

    /// Industry name.
    pub fn industry(&self) -> &str {
        &self.industry
    }

    /// Configured ticker count used as the denominator.
    pub const fn configured_count(&self) -> usize {
        self.configured
    }

    /// Points in ascending date order.
    pub fn points(&self) -> &[BreadthPoint] {
        &self.points
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no ticker contributed any date.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Percentage on `date`, if the date is covered.
    pub fn percentage_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].percentage)
    }

    /// First and last covered dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }
}

/// Returns a DataFrame with columns: date, bullish
fn signal_frame(signals: &SignalSeries) -> PolarsResult<DataFrame> {
    let flags: Vec<bool> = signals.points().iter().map(|p| p.bullish).collect();
    DataFrame::new(vec![
        date_column("date", signals.points().iter().map(|p| p.date))?,
        Series::new("bullish".into(), flags).into(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossover::CrossoverConfig;
    use approx::assert_relative_eq;
    use breadth_data::PriceSeries;
    use chrono::Duration;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 1).unwrap() + Duration::days(offset)
    }

    // 2 / 4 day windows: rising prices turn bullish from the fourth row on
    fn rising(symbol: &str, first: i64, days: usize) -> SignalSeries {
        let config = CrossoverConfig::new(2, 4).unwrap();
        let pairs = (0..days).map(|i| (day(first + i as i64), 10.0 + i as f64));
        SignalSeries::compute(&PriceSeries::from_pairs(symbol, pairs), &config).unwrap()
    }

    fn falling(symbol: &str, first: i64, days: usize) -> SignalSeries {
        let config = CrossoverConfig::new(2, 4).unwrap();
        let pairs = (0..days).map(|i| (day(first + i as i64), 100.0 - i as f64));
        SignalSeries::compute(&PriceSeries::from_pairs(symbol, pairs), &config).unwrap()
    }

    #[test]
    fn test_half_bullish() {
        let aapl = rising("AAPL", 0, 10);
        let msft = falling("MSFT", 0, 10);
        let aggregate = IndustryAggregate::from_signals("Tech", &[aapl, msft], 2).unwrap();

        assert_eq!(aggregate.len(), 10);
        assert_relative_eq!(aggregate.percentage_on(day(9)).unwrap(), 50.0);
        assert_relative_eq!(aggregate.percentage_on(day(0)).unwrap(), 0.0);
        assert_eq!(aggregate.points()[9].bullish, 1);
        assert_eq!(aggregate.points()[9].total, 2);
    }

    #[test]
    fn test_no_signals_is_empty() {
        let aggregate = IndustryAggregate::from_signals("Tech", &[], 3).unwrap();
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.configured_count(), 3);
        assert!(aggregate.date_span().is_none());
    }

    #[test]
    fn test_configured_count_is_denominator() {
        // Three tickers configured, only one has data. The missing two still
        // count, so a fully bullish day reads 33.3% rather than 100%.
        let aggregate =
            IndustryAggregate::from_signals("Energy", &[rising("XOM", 0, 8)], 3).unwrap();

        assert_relative_eq!(
            aggregate.percentage_on(day(7)).unwrap(),
            100.0 / 3.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_dates_are_union_with_missing_as_false() {
        // AAPL covers days 0..10, MSFT only days 5..15
        let aapl = rising("AAPL", 0, 10);
        let msft = rising("MSFT", 5, 10);
        let aggregate = IndustryAggregate::from_signals("Tech", &[aapl, msft], 2).unwrap();

        assert_eq!(aggregate.date_span(), Some((day(0), day(14))));
        assert_eq!(aggregate.len(), 15);
        // Only AAPL is bullish (and present) on day 4
        assert_relative_eq!(aggregate.percentage_on(day(4)).unwrap(), 50.0);
        // Both bullish on day 9
        assert_relative_eq!(aggregate.percentage_on(day(9)).unwrap(), 100.0);
        // AAPL has no data on day 12, MSFT bullish
        assert_relative_eq!(aggregate.percentage_on(day(12)).unwrap(), 50.0);
    }

    #[test]
    fn test_percentages_within_bounds() {
        let series = vec![rising("A", 0, 20), rising("B", 3, 20), falling("C", 1, 20)];
        let aggregate = IndustryAggregate::from_signals("Mixed", &series, 4).unwrap();

        for point in aggregate.points() {
            assert!((0.0..=100.0).contains(&point.percentage));
            assert_relative_eq!(
                point.percentage,
                100.0 * point.bullish as f64 / 4.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let series = vec![rising("A", 0, 12), falling("B", 2, 12)];
        let first = IndustryAggregate::from_signals("Tech", &series, 2).unwrap();
        let second = IndustryAggregate::from_signals("Tech", &series, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_more_series_than_configured() {
        let series = vec![rising("A", 0, 5), rising("B", 0, 5)];
        let result = IndustryAggregate::from_signals("Tech", &series, 1);
        assert!(matches!(
            result,
            Err(SignalError::TickerCountMismatch { .. })
        ));
    }
}
