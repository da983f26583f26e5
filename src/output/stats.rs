//! Run statistics
//!
//! Counters gathered by the coordinator as tasks finish, and by the asset
//! downloader as files are saved.

/// How a single seed task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskReport {
    /// Links found and `rows` rows appended to the sink
    Harvested { rows: usize },

    /// Page fetched, but no link survived extraction/normalization
    Empty,

    /// Fetch failed, or the task hit an unexpected error
    Failed,
}

/// Summary of a harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Distinct seeds scheduled
    pub seeds: usize,

    /// Seeds that produced at least one row
    pub pages_harvested: usize,

    /// Seeds fetched successfully with zero links
    pub pages_empty: usize,

    /// Seeds that failed
    pub pages_failed: usize,

    /// Total rows appended to the sink
    pub rows_written: usize,
}

impl HarvestSummary {
    /// Starts a summary for `seeds` scheduled tasks
    pub fn new(seeds: usize) -> Self {
        Self {
            seeds,
            ..Self::default()
        }
    }

    /// Folds one finished task into the counters
    pub fn record(&mut self, report: TaskReport) {
        match report {
            TaskReport::Harvested { rows } => {
                self.pages_harvested += 1;
                self.rows_written += rows;
            }
            TaskReport::Empty => self.pages_empty += 1,
            TaskReport::Failed => self.pages_failed += 1,
        }
    }

    /// Number of tasks that have reported
    pub fn completed(&self) -> usize {
        self.pages_harvested + self.pages_empty + self.pages_failed
    }
}

/// Summary of an asset download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Pages whose links were harvested
    pub pages: usize,

    /// Distinct assets attempted
    pub assets: usize,

    /// Files written to disk
    pub files_written: usize,

    /// Assets that failed to fetch or save
    pub failures: usize,

    /// Links skipped because they are not fetchable over http(s)
    pub skipped: usize,
}

/// Prints a harvest summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");
    println!("  Seeds:            {}", summary.seeds);
    println!("  Pages harvested:  {}", summary.pages_harvested);
    println!("  Pages w/o links:  {}", summary.pages_empty);
    println!("  Pages failed:     {}", summary.pages_failed);
    println!("  Rows written:     {}", summary.rows_written);
}

/// Prints a download summary to stdout
pub fn print_download_summary(summary: &DownloadSummary) {
    println!("=== Download Summary ===\n");
    println!("  Pages:          {}", summary.pages);
    println!("  Assets:         {}", summary.assets);
    println!("  Files written:  {}", summary.files_written);
    println!("  Failures:       {}", summary.failures);
    println!("  Skipped:        {}", summary.skipped);
}
