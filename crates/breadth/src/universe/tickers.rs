//! Ticker list loading and industry grouping.
//!
//! The input is plain text, one `SYMBOL,INDUSTRY` pair per line, with no
//! header. Whitespace around either field is ignored and blank lines are
//! skipped. Any other line shape is rejected.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a ticker list.
#[derive(Debug, Error)]
pub enum UniverseError {
    /// The ticker file could not be read.
    #[error("Failed to read ticker file {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A non-blank line is not exactly `SYMBOL,INDUSTRY`.
    #[error("Malformed ticker line {line}: {content:?} (expected SYMBOL,INDUSTRY)")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// Raw line content
        content: String,
    },
}

/// A ticker and the industry it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{symbol},{industry}")]
pub struct TickerEntry {
    /// Stock symbol.
    pub symbol: String,
    /// Industry name.
    pub industry: String,
}

impl TickerEntry {
    /// Create a new entry.
    pub fn new(symbol: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            industry: industry.into(),
        }
    }

    /// Parse one `SYMBOL,INDUSTRY` line.
    fn parse_line(line_number: usize, raw: &str) -> Result<Self, UniverseError> {
        let malformed = || UniverseError::MalformedLine {
            line: line_number,
            content: raw.to_string(),
        };

        let mut fields = raw.split(',').map(str::trim);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(symbol), Some(industry), None) if !symbol.is_empty() && !industry.is_empty() => {
                Ok(Self::new(symbol, industry))
            }
            _ => Err(malformed()),
        }
    }
}

/// An industry and its configured members.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{name}")]
pub struct Industry {
    name: String,
    symbols: Vec<String>,
}

impl Industry {
    /// Industry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member symbols in input order. A symbol listed twice appears twice.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of configured members, the denominator of the breadth percentage.
    pub fn configured_count(&self) -> usize {
        self.symbols.len()
    }
}

/// The static list of tickers a report runs over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerUniverse {
    entries: Vec<TickerEntry>,
}

impl TickerUniverse {
    /// Parse ticker list text, failing on the first malformed line.
    pub fn parse(text: &str) -> Result<Self, UniverseError> {
        let entries = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| TickerEntry::parse_line(idx + 1, line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Read and parse a ticker file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UniverseError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| UniverseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// All entries in input order.
    pub fn entries(&self) -> &[TickerEntry] {
        &self.entries
    }

    /// All symbols in input order.
    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the universe has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group entries by industry, ordered by industry name.
    pub fn industries(&self) -> Vec<Industry> {
        let mut grouped: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.industry.as_str())
                .or_default()
                .push(entry.symbol.clone());
        }

        grouped
            .into_iter()
            .map(|(name, symbols)| Industry {
                name: name.to_string(),
                symbols,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let universe = TickerUniverse::parse("  AAPL , Tech \n\n   \nXOM,Energy\r\n").unwrap();

        assert_eq!(
            universe.entries(),
            &[
                TickerEntry::new("AAPL", "Tech"),
                TickerEntry::new("XOM", "Energy")
            ]
        );
    }

    #[rstest]
    #[case("AAPL", 1)]
    #[case("AAPL,Tech,Extra", 1)]
    #[case(",Tech", 1)]
    #[case("AAPL, ", 1)]
    #[case("MSFT,Tech\n\nAAPL", 3)]
    fn test_malformed_lines(#[case] text: &str, #[case] expected_line: usize) {
        match TickerUniverse::parse(text) {
            Err(UniverseError::MalformedLine { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn test_industries_grouped_in_input_order() {
        let universe =
            TickerUniverse::parse("MSFT,Tech\nXOM,Energy\nAAPL,Tech\nCVX,Energy\n").unwrap();
        let industries = universe.industries();

        assert_eq!(industries.len(), 2);
        assert_eq!(industries[0].name(), "Energy");
        assert_eq!(industries[0].symbols(), &["XOM", "CVX"]);
        assert_eq!(industries[1].name(), "Tech");
        assert_eq!(industries[1].symbols(), &["MSFT", "AAPL"]);
        assert_eq!(industries[1].configured_count(), 2);
    }

    #[test]
    fn test_duplicate_listing_counts_twice() {
        let universe = TickerUniverse::parse("AAPL,Tech\nAAPL,Tech\n").unwrap();
        assert_eq!(universe.industries()[0].configured_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let universe = TickerUniverse::parse("\n\n").unwrap();
        assert!(universe.is_empty());
        assert!(universe.industries().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = TickerUniverse::from_path("/nonexistent/tickers.txt");
        assert!(matches!(result, Err(UniverseError::Io { .. })));
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(TickerEntry::new("AAPL", "Tech").to_string(), "AAPL,Tech");
    }
}
