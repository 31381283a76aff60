//! # Core Module
//!
//! The scan engine, independent of how results are presented.
//!
//! ## Modules
//! - `scanner` - Concurrent directory walk, ignore rules, image sniffing
//! - `processor` - Per-file sniff/decode/render pipeline
//! - `metadata` - Decoder seam and tag rendering

pub mod metadata;
pub mod processor;
pub mod scanner;

#[cfg(test)]
pub(crate) mod testdata;

// Re-export commonly used types
pub use metadata::{ExifDecoder, MetadataDecoder, MetadataField, TagReport};
pub use processor::{FileProcessor, ProcessingOutcome};
pub use scanner::{IgnoreMatcher, ScanConfig, ScanSummary, Scanner};
