//! Event type definitions.

use crate::core::metadata::TagReport;
use crate::core::scanner::{IgnoreRule, ScanSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Scan(ScanEvent),
}

/// Events during a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// The scan of `root` has started
    Started { root: PathBuf },
    /// A directory was pruned by an explicit ignore rule
    DirectoryIgnored { path: PathBuf, rule: IgnoreRule },
    /// An image produced at least one printable tag
    TagsFound(TagReport),
    /// An image failed to decode
    FileFailed { path: PathBuf, message: String },
    /// An entry could not be read; the scan continues
    Error { path: PathBuf, message: String },
    /// Every directory task has finished
    Completed(ScanSummary),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Scan(ScanEvent::DirectoryIgnored {
            path: PathBuf::from("/photos/raw"),
            rule: IgnoreRule {
                line: 4,
                pattern: "raw/".to_string(),
            },
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Scan(ScanEvent::DirectoryIgnored { rule, .. }) => assert_eq!(rule.line, 4),
            other => panic!("Wrong event type: {other:?}"),
        }
    }
}
