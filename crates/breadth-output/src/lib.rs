#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/breadth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod mail;
pub mod report;

pub use chart::{ChartConfig, ChartError, render_industry_chart};
pub use mail::{EmailContent, MailConfig, MailError, SmtpMailer, compose_message};
pub use report::{Attachments, attachment_filename, render_attachments};
