//! Seed list loading
//!
//! A seed list is plain text with one absolute URL per line. Lines are
//! trimmed, blank lines ignored, and the result collapsed into a set.

use crate::config::types::InputConfig;
use crate::url::parse_seed;
use crate::ConfigError;
use std::collections::BTreeSet;
use std::path::Path;
use url::Url;

/// Parses seed list text into a set of URLs
///
/// Lines that are not absolute http(s) URLs are logged and skipped.
pub fn parse_seeds(content: &str) -> BTreeSet<Url> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match parse_seed(line) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Skipping seed: {}", e);
                None
            }
        })
        .collect()
}

/// Reads a newline-delimited seed list from disk
pub fn load_seeds(path: &Path) -> Result<BTreeSet<Url>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_seeds(&content))
}

/// Collects every seed named by the input configuration
///
/// The seed file (if any) and inline seeds are unioned.
pub fn collect_seeds(input: &InputConfig) -> Result<BTreeSet<Url>, ConfigError> {
    let mut seeds = match &input.seeds_path {
        Some(path) => load_seeds(Path::new(path))?,
        None => BTreeSet::new(),
    };

    seeds.extend(parse_seeds(&input.seeds.join("\n")));
    Ok(seeds)
}
