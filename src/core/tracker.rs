//! Runs the history tracker next to a command.
//!
//! The tracker takes its baseline synchronously, then consumes change events
//! on its own thread and writes audit entries through its own connection.
//! Audit writes are fire-and-forget: failures are reported and logged, never
//! returned to the code that made the change.

use crate::config::Config;
use crate::core::history::{HistoryOptions, HistoryTracker};
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::store::{Collection, CollectionStore, Subscription};
use crate::ui::messages::error;
use chrono::Local;
use std::ops::Deref;
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Audit entries written.
    pub entries: usize,
    /// Audit entries that could not be written.
    pub failures: usize,
}

pub struct TrackerHandle {
    thread: Option<JoinHandle<TrackerStats>>,
}

impl TrackerHandle {
    /// Subscribe to the tracked collections of `store` and start consuming.
    pub fn spawn(store: &CollectionStore, options: HistoryOptions) -> AppResult<Self> {
        let mut sub = store.subscribe(&Collection::TRACKED)?;

        let mut tracker = HistoryTracker::new(options);
        for (collection, records) in sub.take_baseline() {
            tracker.load_baseline(collection, records);
        }

        let path = store.path().to_string();
        let thread = thread::Builder::new()
            .name("history-tracker".into())
            .spawn(move || consume(&path, sub, tracker))?;

        Ok(Self {
            thread: Some(thread),
        })
    }

    /// Wait for the tracker to drain. Returns once the store it watches is
    /// closed.
    pub fn join(mut self) -> TrackerStats {
        self.wait()
    }

    fn wait(&mut self) -> TrackerStats {
        match self.thread.take() {
            Some(t) => t.join().unwrap_or_else(|_| {
                error("History tracker stopped unexpectedly.");
                TrackerStats::default()
            }),
            None => TrackerStats::default(),
        }
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.wait();
    }
}

fn consume(path: &str, mut sub: Subscription, mut tracker: HistoryTracker) -> TrackerStats {
    let mut stats = TrackerStats::default();

    let writer = match CollectionStore::open(path) {
        Ok(w) => Some(w),
        Err(e) => {
            error(format!("History tracker cannot open {}: {}", path, e));
            None
        }
    };

    while let Some(event) = sub.recv() {
        let entry = tracker.observe(&event, Local::now());

        let Some(w) = &writer else {
            stats.failures += 1;
            continue;
        };

        match w.push(Collection::History, entry.to_fields()) {
            Ok(_) => stats.entries += 1,
            Err(e) => {
                stats.failures += 1;
                error(format!("Failed to record history for {}: {}", event.key(), e));
                ttlog_quiet(w.conn(), "history_error", &event.key(), &e.to_string());
            }
        }
    }

    stats
}

/// A store with the history tracker attached.
///
/// Field order matters: the store drops first, which closes the change
/// channel and lets the tracker finish before its handle joins.
pub struct TrackedStore {
    store: CollectionStore,
    tracker: Option<TrackerHandle>,
}

impl TrackedStore {
    /// Open the configured database, attaching the tracker unless history is
    /// disabled.
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let options = cfg.history.enabled.then(|| HistoryOptions {
            user: cfg.acting_user(),
            full_created_summary: cfg.history.full_created_summary,
        });
        Self::open_with(&cfg.database, options)
    }

    pub fn open_with(path: &str, history: Option<HistoryOptions>) -> AppResult<Self> {
        let store = CollectionStore::open(path)?;
        let tracker = match history {
            Some(options) => Some(TrackerHandle::spawn(&store, options)?),
            None => None,
        };
        Ok(Self { store, tracker })
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Close the store and wait until every pending audit entry is written.
    pub fn close(self) -> Option<TrackerStats> {
        let TrackedStore { store, tracker } = self;
        drop(store);
        tracker.map(TrackerHandle::join)
    }
}

impl Deref for TrackedStore {
    type Target = CollectionStore;

    fn deref(&self) -> &CollectionStore {
        &self.store
    }
}
