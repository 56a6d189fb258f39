//! Ticker universe management.
//!
//! A universe is the static list of (symbol, industry) pairs a report runs
//! over, loaded once from a text file and never modified.

pub mod tickers;

pub use tickers::{Industry, TickerEntry, TickerUniverse, UniverseError};

/// Trait for stock universes.
pub trait Universe {
    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

impl Universe for TickerUniverse {
    fn symbols(&self) -> Vec<String> {
        self.symbols()
    }

    fn size(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_trait() {
        let universe = TickerUniverse::parse("AAPL,Tech\nXOM,Energy\nMSFT,Tech\n").unwrap();

        assert_eq!(Universe::symbols(&universe), vec!["AAPL", "XOM", "MSFT"]);
        assert_eq!(Universe::size(&universe), 3);
    }
}
