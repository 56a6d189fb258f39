#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/breadth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;
pub mod universe;

// Re-export main types from sub-crates
pub use breadth_data as data;
pub use breadth_output as output;
pub use breadth_signals as signals;

pub use pipeline::{IndustryBreadth, PipelineError, compute_industry_breadth};
pub use universe::{Industry, TickerEntry, TickerUniverse, Universe, UniverseError};

/// Years of history each report covers.
pub const LOOKBACK_YEARS: u32 = 5;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
