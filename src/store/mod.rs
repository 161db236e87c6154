//! Realtime collection store.
//!
//! Named collections of JSON records keyed by generated ids, persisted in
//! SQLite. Every successful mutation is queued as a [`ChangeEvent`] for each
//! subscriber of its collection. Queues are unbounded: a slow subscriber
//! never loses events.

pub mod collection;
pub mod events;
pub mod record;

use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::value;
use rusqlite::Connection;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

pub use collection::{Collection, INVOICE_COUNTER};
pub use events::{ChangeEvent, ChangeKind, Subscription};
pub use record::{Fields, Record};

pub struct CollectionStore {
    pool: DbPool,
    path: String,
    subscribers: Mutex<Vec<Subscriber>>,
}

/// Sending half of one subscription.
struct Subscriber {
    collections: Vec<Collection>,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl CollectionStore {
    /// Open (and migrate if needed) the store at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;

        Ok(Self {
            pool,
            path: path.to_string(),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw connection, used for the internal log and maintenance commands.
    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    // ---------------------------
    // Reads
    // ---------------------------

    /// Subscribe to `collections`. The returned subscription holds the
    /// current content of each collection and receives every later change.
    pub fn subscribe(&self, collections: &[Collection]) -> AppResult<Subscription> {
        // Register first: nothing committed after the snapshot can be missed.
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Subscriber {
                collections: collections.to_vec(),
                tx,
            });

        let mut baseline = BTreeMap::new();
        for c in collections {
            baseline.insert(*c, self.snapshot(*c)?);
        }

        Ok(Subscription::new(baseline, rx))
    }

    /// Full current content of a collection, in insertion order.
    pub fn snapshot(&self, collection: Collection) -> AppResult<Vec<Record>> {
        queries::load_collection(&self.pool.conn, collection)
    }

    pub fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Record>> {
        queries::load_record(&self.pool.conn, collection, id)
    }

    /// Like [`get`](Self::get), but a missing record is an error.
    pub fn require(&self, collection: Collection, id: &str) -> AppResult<Record> {
        self.get(collection, id)?
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))
    }

    // ---------------------------
    // Writes
    // ---------------------------

    /// Fresh opaque id for a record that is about to be written.
    pub fn create_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Merge-update the named fields of one record, creating it if missing.
    /// A merge that changes nothing is not written and not announced.
    pub fn write(&self, collection: Collection, id: &str, partial: Fields) -> AppResult<Record> {
        let partial = normalize_fields(partial);

        match self.get(collection, id)? {
            Some(mut existing) => {
                if existing.merge(&partial) {
                    queries::upsert_record(&self.pool.conn, collection, &existing)?;
                    self.emit(collection, ChangeKind::Changed, &existing);
                }
                Ok(existing)
            }
            None => {
                let record = Record::new(id, partial);
                queries::upsert_record(&self.pool.conn, collection, &record)?;
                self.emit(collection, ChangeKind::Added, &record);
                Ok(record)
            }
        }
    }

    /// Overwrite a whole record.
    pub fn replace(&self, collection: Collection, id: &str, fields: Fields) -> AppResult<Record> {
        let record = Record::new(id, normalize_fields(fields));

        let kind = match self.get(collection, id)? {
            Some(existing) if existing == record => return Ok(record),
            Some(_) => ChangeKind::Changed,
            None => ChangeKind::Added,
        };

        queries::upsert_record(&self.pool.conn, collection, &record)?;
        self.emit(collection, kind, &record);
        Ok(record)
    }

    /// Create a record under a freshly generated id.
    pub fn push(&self, collection: Collection, fields: Fields) -> AppResult<Record> {
        let id = self.create_id();
        self.replace(collection, &id, fields)
    }

    /// Delete a record. Returns the removed value, if it existed.
    pub fn remove(&self, collection: Collection, id: &str) -> AppResult<Option<Record>> {
        let existing = self.get(collection, id)?;

        if existing.is_some() && queries::delete_record(&self.pool.conn, collection, id)? {
            self.dispatch(ChangeEvent {
                collection,
                kind: ChangeKind::Removed,
                id: id.to_string(),
                record: None,
            });
        }

        Ok(existing)
    }

    /// Strictly increasing value of a named counter.
    pub fn atomic_increment(&self, counter: &str) -> AppResult<i64> {
        queries::increment_counter(&self.pool.conn, counter)
    }

    pub fn counter_value(&self, counter: &str) -> AppResult<i64> {
        queries::read_counter(&self.pool.conn, counter)
    }

    pub fn set_counter(&self, counter: &str, value: i64) -> AppResult<()> {
        queries::set_counter(&self.pool.conn, counter, value)
    }

    fn emit(&self, collection: Collection, kind: ChangeKind, record: &Record) {
        self.dispatch(ChangeEvent {
            collection,
            kind,
            id: record.id.clone(),
            record: Some(record.clone()),
        });
    }

    /// Queue `event` for every subscriber of its collection. Subscriptions
    /// that were dropped are forgotten here.
    fn dispatch(&self, event: ChangeEvent) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|p| p.into_inner());
        subs.retain(|s| {
            if !s.collections.contains(&event.collection) {
                return !s.tx.is_closed();
            }
            s.tx.send(event.clone()).is_ok()
        });
    }
}

fn normalize_fields(fields: Fields) -> Fields {
    fields
        .into_iter()
        .map(|(k, v)| (k, value::normalize(v)))
        .collect()
}

/// Build a field map from `(name, value)` pairs.
pub fn fields<I, K>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
