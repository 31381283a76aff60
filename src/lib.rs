//! # exif-scan
//!
//! Walks a directory tree concurrently, sniffs every regular file for image
//! content, and dumps the printable EXIF tags of each image it can decode.
//!
//! ## Architecture
//! - `core` - ignore rules, content sniffing, tag rendering, the per-file
//!   processor and the concurrent directory walker
//! - `metrics` - live scan counters and the `/metrics` HTTP endpoint
//! - `events` - channel used to stream tag reports and progress to the UI layer
//! - `error` - error types

pub mod core;
pub mod error;
pub mod events;
pub mod metrics;

// Re-export commonly used types at the crate root
pub use error::{ExifScanError, Result};

/// Initialize tracing for the binary
///
/// Logs go to stderr so they never interleave with the tag dump on stdout.
/// `RUST_LOG` takes precedence over the `verbose` switch.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("tracing already initialised: {err}");
    }
}
