//! Output module
//!
//! This module handles:
//! - The shared tab-separated record file
//! - Run statistics and their console summary

mod sink;
pub mod stats;

pub use sink::{format_block, CrawlRecord, RecordSink, RECORD_HEADER};
pub use stats::{
    print_download_summary, print_summary, DownloadSummary, HarvestSummary, TaskReport,
};
