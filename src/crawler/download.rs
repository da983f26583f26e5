//! Asset downloader
//!
//! The downloader variant of the pipeline: harvest links (normally `srcset`
//! candidates) from every seed page, then fetch each distinct asset with the
//! shared client and save it under the download directory.

use crate::crawler::fetcher::fetch_bytes;
use crate::crawler::page::{crawl_page, PageOutcome};
use crate::crawler::LinkAttribute;
use crate::output::DownloadSummary;
use crate::url::is_fetchable;
use crate::HarvestError;
use reqwest::Client;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use url::Url;

/// Downloads every asset linked from `seeds` into `dir`
///
/// Pages are harvested concurrently first, then all distinct assets are
/// fetched concurrently. Per-page and per-asset failures are logged and
/// counted; only failing to create `dir` aborts the run.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `seeds` - Pages to harvest asset links from
/// * `attribute` - Attribute to harvest (`srcset` for images)
/// * `dir` - Target directory, created if missing
pub async fn download_assets(
    client: &Client,
    seeds: &BTreeSet<Url>,
    attribute: LinkAttribute,
    dir: &Path,
) -> Result<DownloadSummary, HarvestError> {
    tokio::fs::create_dir_all(dir).await?;

    let mut summary = DownloadSummary::default();

    // Phase 1: harvest asset links from every page
    let pages: Vec<_> = seeds
        .iter()
        .map(|seed| {
            let client = client.clone();
            let seed = seed.clone();
            tokio::spawn(async move { crawl_page(&client, &seed, attribute).await })
        })
        .collect();

    let mut assets = BTreeSet::new();
    for (seed, handle) in seeds.iter().zip(pages) {
        match handle.await {
            Ok(PageOutcome::Done(links)) => {
                summary.pages += 1;
                assets.extend(links);
            }
            Ok(PageOutcome::Failed(_)) => {}
            Err(e) => {
                tracing::error!(url = %seed, unexpected = true, error = ?e, "Page task aborted: {}", e);
            }
        }
    }

    let (fetchable, skipped): (Vec<Url>, Vec<Url>) =
        assets.into_iter().partition(|url| is_fetchable(url));
    for url in &skipped {
        tracing::debug!(url = %url, "Skipping asset that is not fetchable over http(s)");
    }
    summary.skipped = skipped.len();
    summary.assets = fetchable.len();

    // Phase 2: fetch and save each asset
    let mut names = HashSet::new();
    let downloads: Vec<_> = fetchable
        .into_iter()
        .map(|url| {
            let path = dir.join(unique_file_name(&mut names, &url));
            let client = client.clone();
            let handle = {
                let url = url.clone();
                tokio::spawn(async move { save_asset(&client, &url, path).await })
            };
            (url, handle)
        })
        .collect();

    for (url, handle) in downloads {
        match handle.await {
            Ok(Ok(_)) => summary.files_written += 1,
            Ok(Err(e)) => {
                tracing::error!(url = %url, "Download failed: {}", e);
                summary.failures += 1;
            }
            Err(e) => {
                tracing::error!(url = %url, unexpected = true, error = ?e, "Download task aborted: {}", e);
                summary.failures += 1;
            }
        }
    }

    tracing::info!(
        files = summary.files_written,
        failures = summary.failures,
        "Downloaded {} of {} assets into {}",
        summary.files_written,
        summary.assets,
        dir.display()
    );

    Ok(summary)
}

async fn save_asset(client: &Client, url: &Url, path: PathBuf) -> Result<PathBuf, HarvestError> {
    let bytes = fetch_bytes(client, url).await?;
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!(url = %url, path = %path.display(), bytes = bytes.len(), "Wrote file {}", path.display());
    Ok(path)
}

/// Derives a file name from the last path segment of `url`
///
/// Characters outside `[A-Za-z0-9._-]` become `_`; an empty segment becomes
/// `index`.
///
/// ```
/// use link_harvester::crawler::asset_file_name;
/// use url::Url;
///
/// let url = Url::parse("https://cdn.test/img/cat%20photo.jpg?w=2").unwrap();
/// assert_eq!(asset_file_name(&url), "cat_20photo.jpg");
/// ```
pub fn asset_file_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    let name: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        "index".to_string()
    } else {
        name
    }
}

/// Like [`asset_file_name`], but never hands out a name already in `taken`
///
/// A clash gets the lowest free `N-` prefix, checked against every name
/// assigned so far, not just the repeats of the same base name.
fn unique_file_name(taken: &mut HashSet<String>, url: &Url) -> String {
    let name = asset_file_name(url);
    let mut candidate = name.clone();
    let mut counter = 0usize;
    while taken.contains(&candidate) {
        counter += 1;
        candidate = format!("{}-{}", counter, name);
    }
    taken.insert(candidate.clone());
    candidate
}
