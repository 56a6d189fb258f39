//! Industry breadth pipeline.
//!
//! Fetches every ticker of every industry, one request at a time, turns each
//! price history into crossover signals and reduces them per industry.
//! A ticker that cannot be fetched is logged and skipped but still counts in
//! its industry's denominator.

use crate::universe::{Industry, TickerUniverse, Universe};
use breadth_data::{DateRange, FetchOutcome, QuoteProvider};
use breadth_signals::{CrossoverConfig, IndustryAggregate, SignalError, SignalSeries};
use indicatif::ProgressBar;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Rows of SMA data logged per ticker at debug level.
const DEBUG_HEAD_ROWS: usize = 5;

/// Aggregates keyed by industry name.
pub type IndustryBreadth = BTreeMap<String, IndustryAggregate>;

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Signal or aggregate computation failed.
    #[error("Signal computation error: {0}")]
    Signal(#[from] SignalError),
}

/// Compute the breadth aggregate of every industry in `universe`.
///
/// Every industry of the universe appears in the result, including those
/// where no ticker returned data (their aggregate is empty).
pub async fn compute_industry_breadth<P: QuoteProvider>(
    provider: &P,
    universe: &TickerUniverse,
    range: &DateRange,
    config: &CrossoverConfig,
    progress: Option<&ProgressBar>,
) -> Result<IndustryBreadth, PipelineError> {
    if let Some(pb) = progress {
        pb.set_length(universe.size() as u64);
    }

    let mut breadth = IndustryBreadth::new();
    for industry in universe.industries() {
        suspended(progress, || {
            info!(
                industry = industry.name(),
                tickers = industry.configured_count(),
                "Processing industry"
            );
        });
        let aggregate = industry_breadth(provider, &industry, range, config, progress).await?;
        breadth.insert(industry.name().to_string(), aggregate);
    }

    Ok(breadth)
}

/// Compute the breadth aggregate of a single industry.
pub async fn industry_breadth<P: QuoteProvider>(
    provider: &P,
    industry: &Industry,
    range: &DateRange,
    config: &CrossoverConfig,
    progress: Option<&ProgressBar>,
) -> Result<IndustryAggregate, PipelineError> {
    let mut signals = Vec::new();
    let mut seen = HashSet::new();

    for symbol in industry.symbols() {
        if let Some(pb) = progress {
            pb.set_message(format!("{}: {}", industry.name(), symbol));
        }

        if !seen.insert(symbol.as_str()) {
            suspended(progress, || {
                warn!(symbol = %symbol, "Ticker listed twice in industry, fetching once");
            });
        } else {
            suspended(progress, || info!(symbol = %symbol, "Processing ticker"));
            match FetchOutcome::fetch(provider, symbol, range).await {
                FetchOutcome::Series(series) => {
                    let signal = SignalSeries::compute(&series, config)?;
                    log_head(&signal);
                    signals.push(signal);
                }
                FetchOutcome::NoData => suspended(progress, || {
                    warn!(symbol = %symbol, "No data found, skipping ticker");
                }),
                FetchOutcome::Failed(e) => suspended(progress, || {
                    warn!(symbol = %symbol, error = %e, "Error fetching ticker, skipping");
                }),
            }
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    let aggregate =
        IndustryAggregate::from_signals(industry.name(), &signals, industry.configured_count())?;

    for point in aggregate.points() {
        trace!(
            industry = industry.name(),
            date = %point.date,
            bullish = point.bullish,
            total = point.total,
            percentage = format_args!("{:.2}%", point.percentage),
            "Processed date"
        );
    }
    if aggregate.is_empty() {
        warn!(industry = industry.name(), "No ticker in industry returned data");
    }

    Ok(aggregate)
}

/// Log the first rows of a ticker's SMA data.
fn log_head(signal: &SignalSeries) {
    debug!(
        symbol = signal.symbol(),
        rows = signal.len(),
        bullish_days = signal.bullish_days(),
        "Computed SMA signals"
    );
    for point in signal.points().iter().take(DEBUG_HEAD_ROWS) {
        debug!(
            symbol = signal.symbol(),
            date = %point.date,
            sma_fast = ?point.sma_fast,
            sma_slow = ?point.sma_slow,
            bullish = point.bullish,
            "SMA data"
        );
    }
}

/// Run `f` with the progress bar hidden so log lines are not overdrawn.
fn suspended(progress: Option<&ProgressBar>, f: impl FnOnce()) {
    match progress {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}
