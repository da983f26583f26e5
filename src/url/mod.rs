//! URL handling module for Link Harvester
//!
//! Resolves raw links captured from page markup into absolute URLs, and
//! parses seed URLs.

mod normalize;

pub use normalize::{normalize_link, resolve_link};

use crate::UrlError;
use url::Url;

/// Parses a seed URL, which must be absolute and fetchable over HTTP(S)
///
/// # Examples
///
/// ```
/// use link_harvester::url::parse_seed;
///
/// assert!(parse_seed("http://a.test/").is_ok());
/// assert!(parse_seed("/relative").is_err());
/// ```
pub fn parse_seed(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input).map_err(|_| UrlError::NotAbsolute(input.to_string()))?;

    if !is_fetchable(&url) {
        return Err(UrlError::NotAbsolute(input.to_string()));
    }

    Ok(url)
}

/// Returns true for http(s) URLs with a host
pub fn is_fetchable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.has_host()
}
