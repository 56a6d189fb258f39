//! Moving Average Crossover Signal
//!
//! Flags each trading day on which the fast simple moving average of the
//! closing price sits above the slow one (the "golden cross" state).

use crate::error::{Result, SignalError};
use crate::frame::{date_column, read_dates};
use breadth_data::PriceSeries;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the crossover signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverConfig {
    /// Fast SMA window in trading days (default: 50)
    pub fast_window: usize,
    /// Slow SMA window in trading days (default: 200)
    pub slow_window: usize,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            fast_window: 50,
            slow_window: 200,
        }
    }
}

impl CrossoverConfig {
    /// Create a config, rejecting windows that cannot cross.
    pub const fn new(fast_window: usize, slow_window: usize) -> Result<Self> {
        if fast_window == 0 || fast_window >= slow_window {
            return Err(SignalError::InvalidWindows {
                fast: fast_window,
                slow: slow_window,
            });
        }
        Ok(Self {
            fast_window,
            slow_window,
        })
    }
}

fn full_window(window_size: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size,
        min_periods: window_size,
        ..Default::default()
    }
}

/// Crossover state of one symbol on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Fast SMA, `None` until the fast window is full.
    pub sma_fast: Option<f64>,
    /// Slow SMA, `None` until the slow window is full.
    pub sma_slow: Option<f64>,
    /// `sma_fast > sma_slow`, `false` while either is undefined.
    pub bullish: bool,
}

/// Daily crossover flags for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSeries {
    symbol: String,
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    /// Compute the crossover flags of `series`.
    ///
    /// Windows count observations, not calendar days. Every observation of
    /// the input gets exactly one point, so a series shorter than the slow
    /// window yields all `false`.
    pub fn compute(series: &PriceSeries, config: &CrossoverConfig) -> Result<Self> {
        let frame = crossover_frame(series, config)?;

        let dates = read_dates(&frame, "date")?;
        let fast = frame.column("sma_fast")?.f64()?;
        let slow = frame.column("sma_slow")?.f64()?;
        let bullish = frame.column("bullish")?.bool()?;

        let points = dates
            .into_iter()
            .zip(fast.into_iter())
            .zip(slow.into_iter())
            .zip(bullish.into_iter())
            .map(|(((date, sma_fast), sma_slow), bullish)| SignalPoint {
                date,
                sma_fast,
                sma_slow,
                bullish: bullish.unwrap_or(false),
            })
            .collect();

        Ok(Self {
            symbol: series.symbol().to_string(),
            points,
        })
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Points in ascending date order.
    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    /// Number of dates covered.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no dates are covered.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of bullish dates.
    pub fn bullish_days(&self) -> usize {
        self.points.iter().filter(|p| p.bullish).count()
    }
}

/// Compute the SMA and crossover columns of a price series.
///
/// Returns a DataFrame with columns: date, close, sma_fast, sma_slow, bullish
fn crossover_frame(series: &PriceSeries, config: &CrossoverConfig) -> Result<DataFrame> {
    let closes: Vec<f64> = series.closes().collect();
    let prices = DataFrame::new(vec![
        date_column("date", series.dates())?,
        Series::new("close".into(), closes).into(),
    ])?;

    // 1. Order by date so the rolling windows run over consecutive sessions
    // 2. Rolling means require a full window, earlier rows stay null
    // 3. A null comparison means "not yet bullish"
    let frame = prices
        .lazy()
        .sort(["date"], SortMultipleOptions::default())
        .with_columns([
            col("close")
                .rolling_mean(full_window(config.fast_window))
                .alias("sma_fast"),
            col("close")
                .rolling_mean(full_window(config.slow_window))
                .alias("sma_slow"),
        ])
        .with_column(
            col("sma_fast")
                .gt(col("sma_slow"))
                .fill_null(lit(false))
                .alias("bullish"),
        )
        .collect()?;

    Ok(frame)
}
