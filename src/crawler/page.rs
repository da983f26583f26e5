//! Per-page crawl: fetch, extract, resolve, dedupe
//!
//! Every failure of a page is contained here. Fetch failures and unexpected
//! errors (including panics during extraction or resolution) are logged once
//! and turned into [`PageOutcome::Failed`]; they never reach sibling tasks.

use crate::crawler::extractor::{extract_links, LinkAttribute};
use crate::crawler::fetcher::fetch_page;
use crate::state::{PageProgress, PageState};
use crate::url::normalize_link;
use crate::HarvestError;
use reqwest::Client;
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use url::Url;

/// Unique absolute links found on one page
pub type PageLinkSet = BTreeSet<Url>;

/// Terminal result of crawling one page
#[derive(Debug)]
pub enum PageOutcome {
    /// Link set built (possibly empty)
    Done(PageLinkSet),

    /// The page produced nothing; the error has already been logged
    Failed(HarvestError),
}

impl PageOutcome {
    /// Returns true if the page failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The link set, or an empty set for a failed page
    pub fn into_links(self) -> PageLinkSet {
        match self {
            Self::Done(links) => links,
            Self::Failed(_) => PageLinkSet::new(),
        }
    }
}

/// Crawls one seed URL into its set of unique absolute links
///
/// # Flow
///
/// `Pending → Fetching → Fetched → Extracting → Normalizing → Done`, with any
/// error moving the page to `Failed`.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `seed` - The page to crawl; also the base for relative links
/// * `attribute` - Which attribute values to harvest
pub async fn crawl_page(client: &Client, seed: &Url, attribute: LinkAttribute) -> PageOutcome {
    let mut progress = PageProgress::new(seed.as_str());

    match harvest(client, seed, attribute, &mut progress).await {
        Ok(links) => {
            tracing::info!(url = %seed, links = links.len(), "Found {} links for {}", links.len(), seed);
            PageOutcome::Done(links)
        }
        Err(error) => {
            progress.fail();
            report_failure(seed, &error);
            PageOutcome::Failed(error)
        }
    }
}

async fn harvest(
    client: &Client,
    seed: &Url,
    attribute: LinkAttribute,
    progress: &mut PageProgress,
) -> Result<PageLinkSet, HarvestError> {
    progress.advance(PageState::Fetching)?;
    let body = fetch_page(client, seed).await?;
    progress.advance(PageState::Fetched)?;

    progress.advance(PageState::Extracting)?;
    let raw_links = contain_panics(seed, || extract_links(&body, attribute))?;
    tracing::debug!(url = %seed, raw = raw_links.len(), "Extracted raw {} values", attribute);

    progress.advance(PageState::Normalizing)?;
    let links = contain_panics(seed, || resolve_all(seed, &raw_links))?;

    progress.advance(PageState::Done)?;
    Ok(links)
}

/// Resolves raw links against `base`, skipping the ones that fail
pub fn resolve_all(base: &Url, raw_links: &[&str]) -> PageLinkSet {
    raw_links
        .iter()
        .filter_map(|raw| normalize_link(base, raw))
        .collect()
}

/// Extracts and resolves every link in an already-fetched body
pub fn links_from_body(base: &Url, body: &str, attribute: LinkAttribute) -> PageLinkSet {
    resolve_all(base, &extract_links(body, attribute))
}

fn report_failure(seed: &Url, error: &HarvestError) {
    match error {
        HarvestError::Fetch(failure) => {
            tracing::error!(
                url = %seed,
                kind = failure.kind(),
                status = ?failure.status(),
                "Fetch failed: {}",
                failure
            );
        }
        other => {
            tracing::error!(
                url = %seed,
                unexpected = true,
                error = ?other,
                "Unexpected error while crawling {}: {}",
                seed,
                other
            );
        }
    }
}

/// Runs `f`, converting a panic into `HarvestError::Unexpected`
pub(crate) fn contain_panics<T>(seed: &Url, f: impl FnOnce() -> T) -> Result<T, HarvestError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| HarvestError::Unexpected {
        url: seed.to_string(),
        message: panic_message(payload.as_ref()),
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
