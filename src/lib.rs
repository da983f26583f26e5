//! Link Harvester: a concurrent link-harvesting pipeline
//!
//! This crate fetches a set of seed pages concurrently, pulls link targets out
//! of each page with a fixed attribute pattern, resolves them against the page
//! URL and appends `(source, target)` rows to a shared tab-separated sink.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Link Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] crawler::FetchFailure),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition for {url}: {from} -> {to}")]
    InvalidTransition {
        url: String,
        from: state::PageState,
        to: state::PageState,
    },

    #[error("Unexpected failure while processing {url}: {message}")]
    Unexpected { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Cannot resolve link {raw:?}: {reason}")]
    Resolve { raw: String, reason: String },

    #[error("Not an absolute URL: {0}")]
    NotAbsolute(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{LinkAttribute, PageLinkSet};
pub use state::PageState;
pub use crate::url::{normalize_link, resolve_link};
