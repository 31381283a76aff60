//! Completion tracking for directory tasks.
//!
//! Every task owns a [`TaskGuard`]. A guard is registered *before* the task it
//! represents is spawned and released when that task has finished its own
//! enumeration, so the outstanding count can only reach zero once the whole
//! tree is done.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Waits for every registered task, including ones registered by other tasks
pub struct Synchronizer {
    // Never used to send. `recv` fails once every clone is dropped.
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
    outstanding: Arc<AtomicUsize>,
}

impl Synchronizer {
    pub fn new() -> Self {
        let (done_tx, done_rx) = bounded(0);
        Self {
            done_tx,
            done_rx,
            outstanding: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register a task; it stays outstanding until the guard is released
    pub fn register(&self) -> TaskGuard {
        TaskGuard::issue(&self.done_tx, &self.outstanding)
    }

    /// Number of tasks registered and not yet released
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Block until every guard has been released
    pub fn wait(self) {
        tracing::debug!(outstanding = self.outstanding(), "waiting for directory tasks");
        let Synchronizer {
            done_tx, done_rx, ..
        } = self;
        drop(done_tx);
        // Only disconnection ends this
        while done_rx.recv().is_ok() {}
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that keeps one task outstanding
#[must_use = "dropping a guard releases its task immediately"]
pub struct TaskGuard {
    done_tx: Sender<()>,
    outstanding: Arc<AtomicUsize>,
}

impl TaskGuard {
    fn issue(done_tx: &Sender<()>, outstanding: &Arc<AtomicUsize>) -> Self {
        outstanding.fetch_add(1, Ordering::SeqCst);
        Self {
            done_tx: done_tx.clone(),
            outstanding: Arc::clone(outstanding),
        }
    }

    /// Register a child task. Call this before spawning the child.
    pub fn register(&self) -> TaskGuard {
        TaskGuard::issue(&self.done_tx, &self.outstanding)
    }

    /// Release this task
    pub fn done(self) {
        drop(self);
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}
