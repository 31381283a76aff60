//! # CLI Module
//!
//! Command-line interface for the EXIF scanner.
//!
//! ## Usage
//! ```bash
//! # Scan a tree, keep serving metrics afterwards
//! exif-scan ~/Photos
//!
//! # Exit as soon as the scan is done
//! exif-scan ~/Photos --exit-when-done
//!
//! # No metrics endpoint, JSON summary
//! exif-scan ~/Photos --no-metrics --output json
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use exif_scan::core::metadata::ExifDecoder;
use exif_scan::core::scanner::{IgnoreMatcher, ScanConfig, ScanSummary, Scanner};
use exif_scan::error::{Result, ScanError};
use exif_scan::events::{Event, EventChannel, EventReceiver, ScanEvent};
use exif_scan::metrics::server::DEFAULT_METRICS_ADDR;
use exif_scan::metrics::{MetricsConfig, MetricsServer, ScanMetrics};
use std::fs;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

/// exif-scan - dump embedded image tags across a directory tree
#[derive(Parser, Debug)]
#[command(name = "exif-scan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File or directory to scan
    root: PathBuf,

    /// Gitignore-style rule file
    #[arg(long, default_value = ".gitignore")]
    ignore_file: PathBuf,

    /// Address for the /metrics endpoint
    #[arg(long, default_value = DEFAULT_METRICS_ADDR)]
    metrics_addr: SocketAddr,

    /// Do not serve metrics
    #[arg(long)]
    no_metrics: bool,

    /// Exit once the scan completes instead of continuing to serve metrics
    #[arg(long)]
    exit_when_done: bool,

    /// Worker threads for directory tasks
    #[arg(long)]
    threads: Option<usize>,

    /// Summary format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary on stderr
    Pretty,
    /// JSON summary on stdout
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    exif_scan::init_tracing(cli.verbose);

    let scan_config = ScanConfig {
        ignore_file: cli.ignore_file,
        threads: cli.threads,
    };
    let metrics_config = MetricsConfig {
        enabled: !cli.no_metrics,
        addr: cli.metrics_addr,
        keep_serving: !cli.exit_when_done,
    };

    run_scan(&cli.root, &scan_config, &metrics_config, cli.output)
}

fn run_scan(
    root: &Path,
    scan_config: &ScanConfig,
    metrics_config: &MetricsConfig,
    output: OutputFormat,
) -> Result<()> {
    // Startup checks: any failure here ends the process
    fs::metadata(root).map_err(|source| ScanError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    })?;
    let matcher = IgnoreMatcher::from_file(&scan_config.ignore_file)?;

    let metrics = Arc::new(ScanMetrics::new());
    let server = if metrics_config.enabled {
        Some(MetricsServer::start(metrics_config.addr, Arc::clone(&metrics))?)
    } else {
        None
    };

    let scanner = Scanner::new(scan_config, matcher, ExifDecoder, metrics)?;

    let (sender, receiver) = EventChannel::new();
    let printer = thread::spawn(move || print_events(receiver));

    let summary = scanner.scan_with_events(root, &sender)?;

    // Drop sender so the printer drains and exits
    drop(sender);
    printer.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_summary(&summary),
        OutputFormat::Json => print_json_summary(&summary),
    }

    if let Some(server) = server {
        if metrics_config.keep_serving {
            if matches!(output, OutputFormat::Pretty) {
                Term::stderr()
                    .write_line(&format!(
                        "  {} http://{}/metrics {}",
                        style("Serving metrics at").dim(),
                        server.local_addr(),
                        style("(Ctrl-C to stop)").dim()
                    ))
                    .ok();
            }
            server.join()?;
        }
    }

    Ok(())
}

/// Print tag reports and ignore notices in arrival order
fn print_events(receiver: EventReceiver) {
    let stdout = io::stdout();
    for event in receiver.iter() {
        let mut out = stdout.lock();
        let written = match event {
            Event::Scan(ScanEvent::TagsFound(report)) => write!(out, "{report}"),
            Event::Scan(ScanEvent::DirectoryIgnored { path, rule }) => writeln!(
                out,
                "Ignored: {}; Reason: Occurs at: line {} {}",
                path.display(),
                rule.line,
                rule.pattern
            ),
            _ => Ok(()),
        };
        // Reader went away (e.g. piped into `head`)
        if written.is_err() {
            break;
        }
    }
}

fn print_pretty_summary(summary: &ScanSummary) {
    let term = Term::stderr();
    let counters = &summary.counters;

    term.write_line("").ok();
    term.write_line(&format!("{} Done", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} directories processed in {:.1}s",
        style(counters.subdirs_processed).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();

    term.write_line(&format!(
        "  {} directories ignored by rule",
        style(counters.subdirs_ignored).cyan()
    ))
    .ok();

    term.write_line(&format!(
        "  {} files with printable tags ({} decoded)",
        style(summary.reports).cyan(),
        style(format_bytes(counters.files_size)).yellow()
    ))
    .ok();

    if counters.files_failed > 0 {
        term.write_line(&format!(
            "  {} files failed to decode",
            style(counters.files_failed).red()
        ))
        .ok();
    }
}

fn print_json_summary(summary: &ScanSummary) {
    let output = serde_json::json!({
        "status": "done",
        "root": summary.root.display().to_string(),
        "directories_processed": summary.counters.subdirs_processed,
        "directories_ignored": summary.counters.subdirs_ignored,
        "files_failed": summary.counters.files_failed,
        "bytes_decoded": summary.counters.files_size,
        "files_with_tags": summary.reports,
        "duration_ms": summary.duration_ms,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "cannot serialise summary"),
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
