//! # Metrics Module
//!
//! Live scan counters, readable while the walk is still running.
//!
//! All counters are monotonic atomics updated with relaxed ordering; there is
//! no ordering guarantee between counters bumped by different tasks.

pub mod server;

pub use server::{MetricsConfig, MetricsServer};

use crate::core::processor::ProcessingOutcome;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every directory task
#[derive(Debug, Default)]
pub struct ScanMetrics {
    subdirs_processed: AtomicU64,
    subdirs_ignored: AtomicU64,
    files_failed: AtomicU64,
    files_size: AtomicU64,
}

impl ScanMetrics {
    pub const fn new() -> Self {
        Self {
            subdirs_processed: AtomicU64::new(0),
            subdirs_ignored: AtomicU64::new(0),
            files_failed: AtomicU64::new(0),
            files_size: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn inc_subdirs_processed(&self) {
        self.subdirs_processed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_subdirs_ignored(&self) {
        self.subdirs_ignored.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_files_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_files_size(&self, bytes: u64) {
        self.files_size.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Fold a file outcome into the counters
    pub fn record(&self, outcome: &ProcessingOutcome) {
        if let ProcessingOutcome::DecodedOk { size, .. } = outcome {
            self.add_files_size(*size);
        } else if outcome.is_failure() {
            self.inc_files_failed();
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            subdirs_processed: self.subdirs_processed.load(Ordering::Relaxed),
            subdirs_ignored: self.subdirs_ignored.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            files_size: self.files_size.load(Ordering::Relaxed),
        }
    }

    /// Format as Prometheus text exposition format
    pub fn prometheus_format(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"# HELP exif_processed_subdir_count The number of subdirectories processed till now
# TYPE exif_processed_subdir_count counter
exif_processed_subdir_count {}

# HELP exif_ignored_subdir_count The number of subdirectories ignored till now
# TYPE exif_ignored_subdir_count counter
exif_ignored_subdir_count {}

# HELP exif_failed_file_count The number of files which we failed to process till now
# TYPE exif_failed_file_count counter
exif_failed_file_count {}

# HELP exif_processed_files_size The total size of files processed till now
# TYPE exif_processed_files_size counter
exif_processed_files_size {}
"#,
            s.subdirs_processed, s.subdirs_ignored, s.files_failed, s.files_size,
        )
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub subdirs_processed: u64,
    pub subdirs_ignored: u64,
    pub files_failed: u64,
    pub files_size: u64,
}

impl MetricsSnapshot {
    /// Counter growth since `earlier`
    pub fn delta_since(&self, earlier: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            subdirs_processed: self.subdirs_processed.saturating_sub(earlier.subdirs_processed),
            subdirs_ignored: self.subdirs_ignored.saturating_sub(earlier.subdirs_ignored),
            files_failed: self.files_failed.saturating_sub(earlier.files_failed),
            files_size: self.files_size.saturating_sub(earlier.files_size),
        }
    }
}
