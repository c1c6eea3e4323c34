//! Output module for crawl summaries and the record stream
//!
//! This module handles:
//! - Logging a summary of each mirror run
//! - Writing extracted records as Singer messages

mod singer;
pub mod stats;

pub use singer::{record_schema, SingerWriter};
pub use stats::{log_report, CrawlStatistics};
