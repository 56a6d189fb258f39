//! Error types for signal computation.

use thiserror::Error;

/// Result type for signal operations.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors that can occur while computing signals or aggregates.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Window lengths that cannot form a crossover
    #[error("Invalid crossover windows: fast {fast} must be positive and shorter than slow {slow}")]
    InvalidWindows {
        /// Fast window length
        fast: usize,
        /// Slow window length
        slow: usize,
    },

    /// More signal series than configured tickers
    #[error("{industry}: {series} signal series exceed {configured} configured tickers")]
    TickerCountMismatch {
        /// Industry name
        industry: String,
        /// Number of series supplied
        series: usize,
        /// Configured ticker count
        configured: usize,
    },

    /// A stored date could not be mapped back to a calendar date
    #[error("Date out of range: {0} days since epoch")]
    DateOutOfRange(i32),
}
