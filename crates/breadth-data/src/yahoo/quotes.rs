//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::provider::QuoteProvider;
use crate::series::{DateRange, PricePoint, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Default pause after each request.
const DEFAULT_RATE_LIMIT_MS: u64 = 500;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a new Yahoo Finance quote provider with the default pause between requests.
    pub fn try_new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(DEFAULT_RATE_LIMIT_MS))
    }

    /// Create a new Yahoo Finance quote provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Fetch daily closing prices for a single symbol.
    ///
    /// # Arguments
    /// * `symbol` - The ticker symbol (e.g., "AAPL")
    /// * `range` - Inclusive calendar range to fetch
    ///
    /// # Returns
    /// The adjusted closing price series, or [`DataError::MissingData`] when
    /// Yahoo has nothing for the symbol in range.
    pub async fn fetch_quotes(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries> {
        if range.start() > range.end() {
            return Err(DataError::InvalidDateRange {
                start: range.start().to_string(),
                end: range.end().to_string(),
            });
        }

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        // The end bound is exclusive on Yahoo's side
        let start_time = to_offset_datetime(range.start())?;
        let end_time = to_offset_datetime(range.end().succ_opt().unwrap_or(range.end()))?;

        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await;

        // Pause before reporting so failed requests are rate limited too
        sleep(self.rate_limit_delay).await;

        let quotes = response?
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        if quotes.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No data returned from Yahoo Finance".to_string(),
            });
        }

        let mut points = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let timestamp = i64::try_from(quote.timestamp)
                .map_err(|e| DataError::TimeConversion(e.to_string()))?;
            let date = DateTime::from_timestamp(timestamp, 0)
                .ok_or_else(|| {
                    DataError::TimeConversion(format!("timestamp {timestamp} out of range"))
                })?
                .date_naive();
            if range.contains(date) {
                points.push(PricePoint::new(date, quote.adjclose));
            }
        }

        debug!(
            symbol,
            quotes = quotes.len(),
            in_range = points.len(),
            "Fetched quote history"
        );

        Ok(PriceSeries::new(symbol, points))
    }
}

impl QuoteProvider for YahooQuoteProvider {
    async fn fetch_history(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries> {
        self.fetch_quotes(symbol, range).await
    }
}

/// Midnight UTC of `date` as a `time` timestamp.
fn to_offset_datetime(date: NaiveDate) -> Result<time::OffsetDateTime> {
    let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    time::OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}
