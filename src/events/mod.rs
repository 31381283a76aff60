//! # Events Module
//!
//! Streams scan results from the walker to whatever presents them.
//!
//! ## Design
//! Directory tasks run on a worker pool and never write to stdout themselves.
//! They send events through a channel; the CLI drains it on one thread, so the
//! lines of a tag report are never interleaved with another file's.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Scan(ScanEvent::TagsFound(report)) = event {
//!             print!("{report}");
//!         }
//!     }
//! });
//!
//! scanner.scan_with_events(&root, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
