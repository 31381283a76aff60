//! # Scanner Module
//!
//! Concurrent, ignore-aware directory walk.
//!
//! ## How a scan runs
//! - The root directory becomes the first task on a rayon pool.
//! - Each task lists its directory's direct children only.
//! - Subdirectories that survive the ignore rules become new tasks.
//! - Regular files go through the [`FileProcessor`](crate::core::processor::FileProcessor).
//! - The caller blocks on a [`Synchronizer`] until every task has finished.
//!
//! ## Example
//! ```rust,ignore
//! use exif_scan::core::scanner::{IgnoreMatcher, ScanConfig, Scanner};
//!
//! let config = ScanConfig::default();
//! let matcher = IgnoreMatcher::from_file(&config.ignore_file)?;
//! let scanner = Scanner::new(&config, matcher, ExifDecoder, Arc::new(ScanMetrics::new()))?;
//! let summary = scanner.scan("/Users/photos".as_ref())?;
//! ```

mod filter;
pub mod sniff;
mod sync;
mod walker;

pub use filter::{IgnoreDecision, IgnoreMatcher, IgnoreRule};
pub use sync::{Synchronizer, TaskGuard};
pub use walker::{ScanConfig, Scanner};

use crate::metrics::MetricsSnapshot;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Path the scan started from
    pub root: PathBuf,
    /// Counter growth caused by this scan
    pub counters: MetricsSnapshot,
    /// Number of files that produced a tag report
    pub reports: u64,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}
