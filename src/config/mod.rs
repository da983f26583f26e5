//! Configuration module for Link Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and loading the seed list they point at.
//!
//! # Example
//!
//! ```no_run
//! use link_harvester::config::{collect_seeds, load_config};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! let seeds = collect_seeds(&config.input).unwrap();
//! println!("{} seeds, writing to {}", seeds.len(), config.output.records_path);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, InputConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use seeds::{collect_seeds, load_seeds, parse_seeds};
