//! Shared tab-separated record sink
//!
//! Every seed task appends its block of `(source, target)` rows here. The
//! sink lock is held for the open/append/close of one whole block, so blocks
//! from different sources never interleave.

use crate::crawler::PageLinkSet;
use crate::HarvestError;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use url::Url;

/// First line of every record file
pub const RECORD_HEADER: &str = "source_url\tparsed_url\n";

/// One `(source, target)` row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlRecord<'a> {
    pub source: &'a Url,
    pub target: &'a Url,
}

impl fmt::Display for CrawlRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.source, self.target)
    }
}

/// Append-only record file shared by all tasks of a run
#[derive(Debug)]
pub struct RecordSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordSink {
    /// Truncates (or creates) the record file and writes the header
    ///
    /// The parent directory must already exist.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, HarvestError> {
        let path = path.into();

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await?;
        file.write_all(RECORD_HEADER.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), "Record file initialised");

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row per link for `source`
    ///
    /// An empty link set is a no-op and does not touch the file.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of rows written
    /// * `Err(HarvestError::Io)` - The file could not be opened or written
    pub async fn write_records(
        &self,
        source: &Url,
        links: &PageLinkSet,
    ) -> Result<usize, HarvestError> {
        if links.is_empty() {
            return Ok(0);
        }

        let block = format_block(source, links);

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new().append(true).open(&self.path).await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tracing::info!(source = %source, rows = links.len(), "Wrote {} rows for {}", links.len(), source);
        Ok(links.len())
    }
}

/// Renders the rows for one source as a single newline-terminated block
pub fn format_block(source: &Url, links: &PageLinkSet) -> String {
    let mut block = String::new();
    for target in links {
        // Writing to a String cannot fail
        let _ = writeln!(block, "{}", CrawlRecord { source, target });
    }
    block
}
