//! # Processor Module
//!
//! Handles one regular file: open, sniff, decode, render, classify.
//!
//! ## Outcomes
//! | Outcome       | Counter update                      |
//! |---------------|-------------------------------------|
//! | `NotAnImage`  | none                                |
//! | `DecodedOk`   | adds the file size to the byte total|
//! | `NoMetadata`  | none                                |
//! | `DecodeError` | increments failed files             |
//! | `Unreadable`  | none                                |

use crate::core::metadata::{MetadataDecoder, TagReport};
use crate::core::scanner::sniff;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Seek};
use std::path::Path;

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingOutcome {
    /// Leading bytes are not an image; the decoder was not invoked
    NotAnImage,
    /// Tags decoded
    DecodedOk { size: u64, report: TagReport },
    /// An image without a tag block, or a stream that ended early
    NoMetadata { reason: String },
    /// Any other decode failure
    DecodeError { reason: String },
    /// The file could not be opened or read
    Unreadable { reason: String },
}

impl ProcessingOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProcessingOutcome::DecodeError { .. })
    }
}

/// Runs the per-file steps with a pluggable decoder
#[derive(Debug, Clone, Default)]
pub struct FileProcessor<D> {
    decoder: D,
}

impl<D: MetadataDecoder> FileProcessor<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// Process the file at `path`; `size` is its on-disk length
    pub fn process(&self, path: &Path, size: u64) -> ProcessingOutcome {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) => return unreadable(path, &err),
        };
        let prefix = match sniff::read_prefix(&mut file) {
            Ok(prefix) => prefix,
            Err(err) => return unreadable(path, &err),
        };
        if !sniff::is_image_prefix(&prefix) {
            return ProcessingOutcome::NotAnImage;
        }
        if let Err(err) = file.rewind() {
            return unreadable(path, &err);
        }
        let mut reader = BufReader::new(file);

        match self.decoder.decode(&mut reader) {
            Ok(fields) => ProcessingOutcome::DecodedOk {
                size,
                report: TagReport::from_fields(path, fields),
            },
            Err(err) if err.is_no_metadata() => {
                tracing::debug!(path = %path.display(), error = %err, "no metadata");
                ProcessingOutcome::NoMetadata {
                    reason: err.to_string(),
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to decode metadata");
                ProcessingOutcome::DecodeError {
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn unreadable(path: &Path, err: &io::Error) -> ProcessingOutcome {
    tracing::warn!(path = %path.display(), error = %err, "cannot read file");
    ProcessingOutcome::Unreadable {
        reason: err.to_string(),
    }
}
