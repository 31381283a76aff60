//! # Error Module
//!
//! Error types for the EXIF scanner.
//!
//! ## Design Principles
//! - **Only startup is fatal** - bad root path, bad ignore rules, unbindable metrics address
//! - **Include context** - every error names the path or address involved
//! - **Per-entry failures stay local** - they are logged and reported as events, never propagated

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ExifScanError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Ignore rules error: {0}")]
    Ignore(#[from] IgnoreError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

/// Errors that occur while walking the tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot open scan root {path}: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Errors raised while loading the ignore rule file
#[derive(Error, Debug)]
pub enum IgnoreError {
    #[error("Failed to read ignore rules from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ignore rules in {path}: {reason}")]
    Compile { path: PathBuf, reason: String },
}

/// Errors from the metadata decoder
///
/// `NoMetadata` covers a container without a tag block and a stream that ends
/// before one is found. It is not counted as a failure.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("no metadata: {0}")]
    NoMetadata(String),

    #[error("malformed metadata: {0}")]
    Malformed(String),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Whether this error means "nothing to decode" rather than corruption
    pub fn is_no_metadata(&self) -> bool {
        matches!(self, DecodeError::NoMetadata(_))
    }
}

/// Errors from the metrics HTTP endpoint
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Cannot bind metrics endpoint to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start metrics runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Metrics server stopped: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Metrics server thread panicked")]
    Panicked,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ExifScanError>;
