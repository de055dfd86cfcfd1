//! Best completion time tracking.
//!
//! The store trait is the persistence port; front ends back it with whatever
//! storage they have. Only a strictly faster run replaces the record, so
//! repeating the record time keeps the original entry.

use log::{debug, info};

/// Persistence port for the best completion time.
pub trait BestTimeStore {
    /// Returns the stored best time in milliseconds, if any.
    fn load(&self) -> Option<u64>;

    /// Persists a new best time in milliseconds.
    fn save(&mut self, best_ms: u64);
}

/// Volatile store used by tests and runs without persistence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best_ms: Option<u64>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { best_ms: None }
    }

    /// Creates a store seeded with an existing record.
    #[must_use]
    pub const fn with_record(best_ms: u64) -> Self {
        Self {
            best_ms: Some(best_ms),
        }
    }
}

impl BestTimeStore for MemoryStore {
    fn load(&self) -> Option<u64> {
        self.best_ms
    }

    fn save(&mut self, best_ms: u64) {
        self.best_ms = Some(best_ms);
    }
}

/// Outcome of submitting a finished run to the record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunRecord {
    /// Best time on record after the submission, in milliseconds.
    pub best_ms: u64,
    /// Whether the submitted run became the new record.
    pub improved: bool,
}

/// Submits a finished run, returning the record to display.
pub fn record_run(store: &mut dyn BestTimeStore, elapsed_ms: u64) -> RunRecord {
    match store.load() {
        Some(best_ms) if best_ms <= elapsed_ms => {
            debug!("run of {elapsed_ms} ms kept the {best_ms} ms record");
            RunRecord {
                best_ms,
                improved: false,
            }
        }
        previous => {
            store.save(elapsed_ms);
            info!("new best time {elapsed_ms} ms (previous {previous:?})");
            RunRecord {
                best_ms: elapsed_ms,
                improved: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_sets_the_record() {
        let mut store = MemoryStore::new();

        let record = record_run(&mut store, 61_234);

        assert_eq!(
            record,
            RunRecord {
                best_ms: 61_234,
                improved: true
            }
        );
        assert_eq!(store.load(), Some(61_234));
    }

    #[test]
    fn slower_run_keeps_the_record() {
        let mut store = MemoryStore::with_record(58_000);

        let record = record_run(&mut store, 74_500);

        assert_eq!(
            record,
            RunRecord {
                best_ms: 58_000,
                improved: false
            }
        );
        assert_eq!(store.load(), Some(58_000));
    }

    #[test]
    fn matching_the_record_does_not_replace_it() {
        let mut store = MemoryStore::with_record(58_000);

        let record = record_run(&mut store, 58_000);

        assert!(!record.improved);
        assert_eq!(store.load(), Some(58_000));
    }

    #[test]
    fn faster_run_replaces_the_record() {
        let mut store = MemoryStore::with_record(58_000);

        let record = record_run(&mut store, 57_999);

        assert_eq!(
            record,
            RunRecord {
                best_ms: 57_999,
                improved: true
            }
        );
        assert_eq!(store.load(), Some(57_999));
    }
}
