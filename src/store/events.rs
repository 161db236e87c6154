//! Change events pushed by the store and the subscription that receives them.

use crate::store::collection::Collection;
use crate::store::record::Record;
use std::collections::BTreeMap;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
}

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub id: String,
    /// New value for `Added`/`Changed`; `None` for `Removed`.
    pub record: Option<Record>,
}

impl ChangeEvent {
    pub fn key(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

/// Live subscription to one or more collections.
///
/// It carries the full content of every requested collection as of the
/// moment it was taken (the baseline), then yields every later change to them, in commit order.
/// Dropping it unsubscribes.
pub struct Subscription {
    baseline: BTreeMap<Collection, Vec<Record>>,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl Subscription {
    pub(crate) fn new(
        baseline: BTreeMap<Collection, Vec<Record>>,
        rx: mpsc::UnboundedReceiver<ChangeEvent>,
    ) -> Self {
        Self {
            baseline,
            rx,
        }
    }

    /// Hand the baseline over to the consumer, leaving it empty here.
    pub fn take_baseline(&mut self) -> BTreeMap<Collection, Vec<Record>> {
        std::mem::take(&mut self.baseline)
    }

    /// Block until the next event. `None` once the store is closed and
    /// every queued event has been received.
    ///
    /// Must not be called from inside an async runtime.
    pub fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.blocking_recv()
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }
}
