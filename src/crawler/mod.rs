//! Crawler module: the link-harvesting pipeline
//!
//! This module contains the pipeline stages, leaf first:
//! - HTTP fetching over a shared client
//! - Fixed-pattern link extraction
//! - Per-page crawling with failure containment
//! - Fan-out coordination across seeds
//! - Asset downloading for harvested `srcset` links

mod coordinator;
mod download;
mod extractor;
mod fetcher;
mod page;

pub use coordinator::{harvest_seed, run_harvest, Coordinator};
pub use download::{asset_file_name, download_assets};
pub use extractor::{extract_links, LinkAttribute};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchFailure};
pub use page::{crawl_page, links_from_body, resolve_all, PageLinkSet, PageOutcome};

use crate::config::Config;
use crate::output::HarvestSummary;
use crate::HarvestError;
use std::collections::BTreeSet;
use url::Url;

/// Runs a complete harvest over `seeds`
///
/// This is the main entry point. It will:
/// 1. Initialise the record file
/// 2. Build the shared HTTP client
/// 3. Crawl every seed and append its records
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - Every task reached a terminal state
/// * `Err(HarvestError)` - The record file or HTTP client could not be set up
pub async fn harvest(config: &Config, seeds: BTreeSet<Url>) -> Result<HarvestSummary, HarvestError> {
    run_harvest(config, seeds).await
}
