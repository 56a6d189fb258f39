//! Price history sources and retrieval outcomes.

use crate::error::{DataError, Result};
use crate::series::{DateRange, PriceSeries};
use std::future::Future;

/// A source of daily closing prices.
pub trait QuoteProvider {
    /// Fetch the closing price history of `symbol` over `range`.
    ///
    /// An empty result may be reported either as an empty series or as
    /// [`DataError::MissingData`].
    fn fetch_history(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> impl Future<Output = Result<PriceSeries>>;
}

/// Outcome of fetching one symbol.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The source returned at least one observation.
    Series(PriceSeries),
    /// The symbol is unknown or has nothing in range.
    NoData,
    /// The request itself failed.
    Failed(DataError),
}

impl FetchOutcome {
    /// Fetch `symbol` from `provider` and classify the result.
    pub async fn fetch<P: QuoteProvider>(provider: &P, symbol: &str, range: &DateRange) -> Self {
        Self::from_result(provider.fetch_history(symbol, range).await)
    }

    /// Classify a provider result.
    pub fn from_result(result: Result<PriceSeries>) -> Self {
        match result {
            Ok(series) if series.is_empty() => Self::NoData,
            Ok(series) => Self::Series(series),
            Err(e) if e.is_missing_data() => Self::NoData,
            Err(e) => Self::Failed(e),
        }
    }
}
