//! Latest-value snapshot slot read by the UI thread.

use client_core::LabSnapshot;
use tokio::sync::watch;

/// Wraps the runtime's snapshot channel. Intermediate snapshots may be
/// skipped, but the most recent one is always observed on the next poll.
pub struct SnapshotFeed {
    rx: watch::Receiver<LabSnapshot>,
}

impl SnapshotFeed {
    pub fn new(rx: watch::Receiver<LabSnapshot>) -> Self {
        Self { rx }
    }

    /// Returns the newest snapshot if it has not been seen yet.
    pub fn poll(&mut self) -> Option<LabSnapshot> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            Ok(false) | Err(_) => None,
        }
    }

    pub fn current(&self) -> LabSnapshot {
        self.rx.borrow().clone()
    }
}
