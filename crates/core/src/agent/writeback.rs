//! Tracking for fire-and-forget write-back tasks.
//!
//! Write-backs are detached tasks; the response goes to the caller before the
//! store write lands. The tracker counts in-flight writes so tests and
//! shutdown paths can await quiescence deterministically instead of sleeping.

use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Counts in-flight background writes.
#[derive(Debug, Default)]
pub struct WriteTracker {
    inflight: AtomicUsize,
    idle: Notify,
}

impl WriteTracker {
    /// Claim a slot for one background write. The slot is released when the
    /// returned guard drops, including on panic.
    pub fn begin(self: &Arc<Self>) -> WriteGuard {
        self.inflight.fetch_add(1, Ordering::AcqRel);
        WriteGuard { tracker: Arc::clone(self) }
    }

    /// Wait until no writes are in flight.
    pub async fn drain(&self) {
        let mut notified = pin!(self.idle.notified());
        loop {
            notified.as_mut().enable();
            if self.inflight.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.as_mut().await;
            notified.set(self.idle.notified());
        }
    }
}

/// RAII guard for one in-flight write.
pub struct WriteGuard {
    tracker: Arc<WriteTracker>,
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        if self.tracker.inflight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.tracker.idle.notify_waiters();
        }
    }
}
