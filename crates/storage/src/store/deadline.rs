#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rusqlite::Connection;

use super::StoreError;

/// Virtual machine steps between two deadline probes.
const PROGRESS_STEPS: i32 = 1_000;

/// Shared flag that cancels every operation carrying a `Deadline` built from it.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-operation time limit and cancellation.
///
/// Checked before a connection is opened and polled by SQLite's progress
/// handler while a statement runs; an expired deadline interrupts the statement.
#[derive(Clone, Debug, Default)]
pub struct Deadline {
    at: Option<Instant>,
    cancel: Option<CancelHandle>,
}

impl Deadline {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn at(instant: Instant) -> Self {
        Self {
            at: Some(instant),
            cancel: None,
        }
    }

    /// A timeout too large to represent is treated as no time limit.
    pub fn after(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(instant) => Self::at(instant),
            None => Self::none(),
        }
    }

    pub fn with_cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.at.is_none() && self.cancel.is_none()
    }

    pub fn is_expired(&self) -> bool {
        if self
            .cancel
            .as_ref()
            .is_some_and(CancelHandle::is_cancelled)
        {
            return true;
        }
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_expired() {
            return Err(StoreError::DeadlineExceeded);
        }
        Ok(())
    }

    pub(in crate::store) fn install(&self, conn: &Connection) {
        if self.is_unbounded() {
            return;
        }
        let probe = self.clone();
        conn.progress_handler(PROGRESS_STEPS, Some(move || probe.is_expired()));
    }
}
