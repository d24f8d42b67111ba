//! ErrorLog - run-scoped, append-only list of human-readable failures
//!
//! Owned by the top-level run and handed by clone to every component that
//! can fail. Drained once by the run logger at the end of the run.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;

/// Thread-safe error accumulator for one run.
///
/// Cloning is cheap and yields a handle to the same underlying list.
/// Appends are serialized by a mutex; a poisoned lock is recovered rather
/// than propagated so recording an error can never itself fail.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry, prefixed with the local time of day.
    pub fn record(&self, message: impl AsRef<str>) {
        let line = format!(
            "[{}] {}",
            Local::now().format("%H:%M:%S"),
            message.as_ref().trim_end()
        );
        self.lock().push(line);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current entries, in append order.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Take all entries, leaving the log empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
