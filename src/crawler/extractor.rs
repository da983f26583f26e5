//! Fixed-pattern link extraction
//!
//! Links are pulled out of page markup with a single non-greedy pattern,
//! `<attr>="(.*?)"`, rather than an HTML parser. The contract is narrow:
//!
//! - the attribute name is matched literally and case-sensitively
//! - only double-quoted values directly after `=` are captured
//! - a value never spans a line break
//!
//! Anything else simply does not match. There is no parse-error state.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

static HREF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(.*?)""#).expect("href pattern is valid"));

static SRCSET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"srcset="(.*?)""#).expect("srcset pattern is valid"));

/// The markup attribute whose values are harvested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkAttribute {
    /// `href="..."`: one link per match
    #[default]
    Href,

    /// `srcset="..."`: a candidate list; only the first URL of each match is kept
    Srcset,
}

impl LinkAttribute {
    /// The literal attribute name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Href => "href",
            Self::Srcset => "srcset",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Href => &HREF_PATTERN,
            Self::Srcset => &SRCSET_PATTERN,
        }
    }
}

impl fmt::Display for LinkAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extracts raw link values for `attribute` from a page body
///
/// Values are returned in document order and may repeat; they are not
/// resolved or validated here.
///
/// # Example
///
/// ```
/// use link_harvester::crawler::{extract_links, LinkAttribute};
///
/// let body = r#"<a href="/b">b</a> <img srcset="/s.png 1x, /l.png 2x">"#;
/// assert_eq!(extract_links(body, LinkAttribute::Href), vec!["/b"]);
/// assert_eq!(extract_links(body, LinkAttribute::Srcset), vec!["/s.png"]);
/// ```
pub fn extract_links(body: &str, attribute: LinkAttribute) -> Vec<&str> {
    attribute
        .pattern()
        .captures_iter(body)
        .filter_map(|captures| captures.get(1))
        .filter_map(|value| match attribute {
            LinkAttribute::Href => Some(value.as_str()),
            LinkAttribute::Srcset => value.as_str().split_whitespace().next(),
        })
        .collect()
}
