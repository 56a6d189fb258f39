#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/breadth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod crossover;
pub mod error;
mod frame;

pub use aggregate::{BreadthPoint, IndustryAggregate};
pub use crossover::{CrossoverConfig, SignalPoint, SignalSeries};
pub use error::{Result, SignalError};
