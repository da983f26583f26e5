//! Harvest coordinator - fan-out orchestration
//!
//! This module runs one task per seed URL:
//! - Building the shared HTTP client for the run
//! - Spawning crawl-and-write tasks, optionally behind a concurrency cap
//! - Awaiting every task and folding the results into a summary
//!
//! A failed or panicking task never cancels its siblings.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::page::{crawl_page, PageOutcome};
use crate::crawler::{build_http_client, LinkAttribute};
use crate::output::{HarvestSummary, RecordSink, TaskReport};
use crate::HarvestError;
use reqwest::Client;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use url::Url;

/// Main harvest coordinator structure
pub struct Coordinator {
    client: Client,
    sink: Arc<RecordSink>,
    attribute: LinkAttribute,
    limit: Option<Arc<Semaphore>>,
}

impl Coordinator {
    /// Creates a coordinator with a freshly built HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `sink` - The record file, already initialised with its header
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &Config, sink: RecordSink) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        Ok(Self::with_client(client, sink, &config.crawler))
    }

    /// Creates a coordinator around an existing client
    pub fn with_client(client: Client, sink: RecordSink, crawler: &CrawlerConfig) -> Self {
        let limit = crawler
            .max_concurrent_tasks
            .map(|permits| Arc::new(Semaphore::new(permits as usize)));

        Self {
            client,
            sink: Arc::new(sink),
            attribute: crawler.link_attribute,
            limit,
        }
    }

    /// Harvests every seed and waits for all tasks to finish
    ///
    /// Consumes the coordinator: the shared client is released once the last
    /// task completes.
    pub async fn run(self, seeds: BTreeSet<Url>) -> HarvestSummary {
        let start_time = Instant::now();
        let mut summary = HarvestSummary::new(seeds.len());

        tracing::info!(
            seeds = seeds.len(),
            attribute = %self.attribute,
            "Harvesting {} seeds",
            seeds.len()
        );

        let tasks: Vec<_> = seeds
            .into_iter()
            .map(|seed| {
                let client = self.client.clone();
                let sink = Arc::clone(&self.sink);
                let limit = self.limit.clone();
                let attribute = self.attribute;
                let handle = {
                    let seed = seed.clone();
                    tokio::spawn(async move {
                        let _permit = match limit {
                            Some(semaphore) => semaphore.acquire_owned().await.ok(),
                            None => None,
                        };
                        harvest_seed(&client, &sink, &seed, attribute).await
                    })
                };
                (seed, handle)
            })
            .collect();

        for (seed, handle) in tasks {
            match handle.await {
                Ok(report) => summary.record(report),
                Err(e) => {
                    tracing::error!(
                        url = %seed,
                        unexpected = true,
                        error = ?e,
                        "Harvest task for {} aborted: {}",
                        seed,
                        e
                    );
                    summary.record(TaskReport::Failed);
                }
            }
        }

        tracing::info!(
            harvested = summary.pages_harvested,
            empty = summary.pages_empty,
            failed = summary.pages_failed,
            rows = summary.rows_written,
            "Harvest completed in {:?}",
            start_time.elapsed()
        );

        summary
    }
}

/// Crawls one seed and appends its records to the sink
///
/// Failures are logged where they happen; the report only says how the task
/// ended.
pub async fn harvest_seed(
    client: &Client,
    sink: &RecordSink,
    seed: &Url,
    attribute: LinkAttribute,
) -> TaskReport {
    let links = match crawl_page(client, seed, attribute).await {
        PageOutcome::Done(links) => links,
        PageOutcome::Failed(_) => return TaskReport::Failed,
    };

    if links.is_empty() {
        return TaskReport::Empty;
    }

    match sink.write_records(seed, &links).await {
        Ok(rows) => TaskReport::Harvested { rows },
        Err(e) => {
            tracing::error!(url = %seed, "Failed to write records for {}: {}", seed, e);
            TaskReport::Failed
        }
    }
}

/// Runs a complete harvest
///
/// 1. Truncate the record file and write its header
/// 2. Build the shared HTTP client
/// 3. Crawl every seed concurrently, appending records as pages finish
///
/// # Example
///
/// ```no_run
/// use link_harvester::config::{collect_seeds, load_config};
/// use link_harvester::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let seeds = collect_seeds(&config.input)?;
/// let summary = run_harvest(&config, seeds).await?;
/// println!("{} rows", summary.rows_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: &Config,
    seeds: BTreeSet<Url>,
) -> Result<HarvestSummary, HarvestError> {
    let sink = RecordSink::create(&config.output.records_path).await?;
    let coordinator = Coordinator::new(config, sink)?;
    Ok(coordinator.run(seeds).await)
}
