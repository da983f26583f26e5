use crate::UrlError;
use url::Url;

/// Resolves a raw link against the URL of the page it was found on
///
/// Resolution follows the WHATWG URL standard as implemented by the `url`
/// crate: relative paths, protocol-relative links (`//host/path`),
/// fragment-only links (`#top`) and absolute links are all accepted. An
/// absolute link in canonical form resolves to itself.
///
/// No scheme filtering is applied: `mailto:` and similar absolute URLs are
/// returned as-is.
///
/// # Arguments
///
/// * `base` - The URL of the page the link was found on
/// * `raw` - The link exactly as captured from the page
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError::Resolve)` - The link could not be resolved
///
/// # Examples
///
/// ```
/// use link_harvester::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("http://a.test/dir/page").unwrap();
/// let url = resolve_link(&base, "../b").unwrap();
/// assert_eq!(url.as_str(), "http://a.test/b");
/// ```
pub fn resolve_link(base: &Url, raw: &str) -> Result<Url, UrlError> {
    base.join(raw).map_err(|e| UrlError::Resolve {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Resolves a raw link, logging and skipping it on failure
///
/// A link that cannot be resolved is local to itself: the warning carries the
/// offending raw value and the caller moves on to the next link.
pub fn normalize_link(base: &Url, raw: &str) -> Option<Url> {
    match resolve_link(base, raw) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(page = %base, raw = %raw, "Skipping link: {}", e);
            None
        }
    }
}
