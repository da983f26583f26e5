use crate::crawler::LinkAttribute;
use serde::Deserialize;

/// Main configuration structure for Link Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Attribute whose quoted values are harvested
    #[serde(rename = "link-attribute", default)]
    pub link_attribute: LinkAttribute,

    /// Maximum number of seed tasks running at once (unbounded when absent)
    #[serde(rename = "max-concurrent-tasks", default)]
    pub max_concurrent_tasks: Option<u32>,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            link_attribute: LinkAttribute::default(),
            max_concurrent_tasks: None,
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "LinkHarvester".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Where seed URLs come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    /// Newline-delimited seed list
    #[serde(rename = "seeds-path", default)]
    pub seeds_path: Option<String>,

    /// Seeds listed directly in the config
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the tab-separated record file
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Persistent log file, appended to on every run
    #[serde(rename = "log-path", default = "default_log_path")]
    pub log_path: String,

    /// Directory for downloaded assets
    #[serde(rename = "download-dir", default = "default_download_dir")]
    pub download_dir: String,
}

fn default_log_path() -> String {
    "harvest.log".to_string()
}

fn default_download_dir() -> String {
    "downloaded".to_string()
}
