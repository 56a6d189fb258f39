#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/breadth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod provider;
pub mod series;
pub mod yahoo;

pub use error::{DataError, Result};
pub use provider::{FetchOutcome, QuoteProvider};
pub use series::{DateRange, PricePoint, PriceSeries};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
