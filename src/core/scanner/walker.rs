//! Directory walking: one rayon task per directory, walkdir for listing.

use super::filter::IgnoreMatcher;
use super::sync::{Synchronizer, TaskGuard};
use super::ScanSummary;
use crate::core::metadata::{ExifDecoder, MetadataDecoder};
use crate::core::processor::{FileProcessor, ProcessingOutcome};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use crate::metrics::ScanMetrics;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Gitignore-style rule file, compiled once at startup
    pub ignore_file: PathBuf,
    /// Worker threads for directory tasks (None = one per CPU)
    pub threads: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_file: PathBuf::from(".gitignore"),
            threads: None,
        }
    }
}

/// Read-only state shared by every task
struct ScanContext<D> {
    matcher: IgnoreMatcher,
    processor: FileProcessor<D>,
    metrics: Arc<ScanMetrics>,
}

/// What each directory task carries
struct WalkTask<D> {
    context: Arc<ScanContext<D>>,
    events: EventSender,
    reports: Arc<AtomicU64>,
}

impl<D> Clone for WalkTask<D> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            events: self.events.clone(),
            reports: Arc::clone(&self.reports),
        }
    }
}

/// Scanner that fans directory walks out over a rayon pool
pub struct Scanner<D = ExifDecoder> {
    context: Arc<ScanContext<D>>,
    pool: rayon::ThreadPool,
}

impl<D: MetadataDecoder + 'static> Scanner<D> {
    /// Create a scanner. The matcher is shared read-only by every task.
    pub fn new(
        config: &ScanConfig,
        matcher: IgnoreMatcher,
        decoder: D,
        metrics: Arc<ScanMetrics>,
    ) -> Result<Self, ScanError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("exif-walk-{i}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

        Ok(Self {
            context: Arc::new(ScanContext {
                matcher,
                processor: FileProcessor::new(decoder),
                metrics,
            }),
            pool,
        })
    }

    pub fn metrics(&self) -> &Arc<ScanMetrics> {
        &self.context.metrics
    }

    /// Scan `root` (a directory or a single file)
    pub fn scan(&self, root: &Path) -> Result<ScanSummary, ScanError> {
        self.scan_with_events(root, &null_sender())
    }

    /// Scan with results streamed as events
    pub fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanSummary, ScanError> {
        let metadata = fs::metadata(root).map_err(|source| ScanError::RootUnavailable {
            path: root.to_path_buf(),
            source,
        })?;

        let start = Instant::now();
        let before = self.context.metrics.snapshot();
        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let task = WalkTask {
            context: Arc::clone(&self.context),
            events: events.clone(),
            reports: Arc::new(AtomicU64::new(0)),
        };
        let reports = Arc::clone(&task.reports);

        if metadata.is_dir() {
            let sync = Synchronizer::new();
            // Registered before anything runs so the count cannot touch zero early
            let guard = sync.register();
            let dir = root.to_path_buf();
            self.pool.spawn(move || walk_directory(task, dir, guard));
            sync.wait();
        } else if metadata.is_file() {
            // A file named explicitly is processed without consulting ignore rules
            handle_file(&task, root, metadata.len());
        } else {
            tracing::warn!(path = %root.display(), "scan root is neither a file nor a directory");
        }

        let summary = ScanSummary {
            root: root.to_path_buf(),
            counters: self.context.metrics.snapshot().delta_since(&before),
            reports: reports.load(Ordering::Relaxed),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            root = %root.display(),
            directories = summary.counters.subdirs_processed,
            ignored = summary.counters.subdirs_ignored,
            failed = summary.counters.files_failed,
            bytes = summary.counters.files_size,
            "scan finished"
        );
        events.send(Event::Scan(ScanEvent::Completed(summary.clone())));
        Ok(summary)
    }
}

/// List the direct children of `dir`, spawning a task per kept subdirectory
fn walk_directory<D: MetadataDecoder + 'static>(task: WalkTask<D>, dir: PathBuf, guard: TaskGuard) {
    let context = Arc::clone(&task.context);
    tracing::debug!(dir = %dir.display(), "walking");

    let entries = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                let error = ScanError::ReadDirectory {
                    path: path.clone(),
                    source: err.into(),
                };
                tracing::warn!(path = %path.display(), "{error}");
                task.events.send(Event::Scan(ScanEvent::Error {
                    path,
                    message: error.to_string(),
                }));
                continue;
            }
        };

        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            let decision = context.matcher.decide(path, true);
            if decision.is_hidden() {
                tracing::trace!(path = %path.display(), "skipping hidden directory");
                continue;
            }
            if let Some(rule) = decision.reason {
                context.metrics.inc_subdirs_ignored();
                tracing::info!(
                    path = %path.display(),
                    line = rule.line,
                    rule = %rule.pattern,
                    "ignored directory"
                );
                task.events.send(Event::Scan(ScanEvent::DirectoryIgnored {
                    path: path.to_path_buf(),
                    rule,
                }));
                continue;
            }

            // The child owns this subtree from here on
            let child_guard = guard.register();
            let child_task = task.clone();
            let child_dir = path.to_path_buf();
            rayon::spawn(move || walk_directory(child_task, child_dir, child_guard));
        } else if file_type.is_file() {
            if context.matcher.decide(path, false).excluded {
                continue;
            }
            match entry.metadata() {
                Ok(metadata) => handle_file(&task, path, metadata.len()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "cannot stat file");
                    task.events.send(Event::Scan(ScanEvent::Error {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    }));
                }
            }
        }
        // Symlinks and special files are skipped
    }

    context.metrics.inc_subdirs_processed();
    // Release the event sender before signalling completion
    drop(task);
    guard.done();
}

fn handle_file<D: MetadataDecoder>(task: &WalkTask<D>, path: &Path, size: u64) {
    let outcome = task.context.processor.process(path, size);
    task.context.metrics.record(&outcome);

    match outcome {
        ProcessingOutcome::DecodedOk { report, .. } if !report.is_empty() => {
            task.reports.fetch_add(1, Ordering::Relaxed);
            task.events.send(Event::Scan(ScanEvent::TagsFound(report)));
        }
        ProcessingOutcome::DecodeError { reason } => {
            task.events.send(Event::Scan(ScanEvent::FileFailed {
                path: path.to_path_buf(),
                message: reason,
            }));
        }
        ProcessingOutcome::Unreadable { reason } => {
            task.events.send(Event::Scan(ScanEvent::Error {
                path: path.to_path_buf(),
                message: reason,
            }));
        }
        _ => {}
    }
}
