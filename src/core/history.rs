//! Change-history tracking.
//!
//! [`HistoryTracker`] turns store change events into audit entries. It
//! remembers the last value seen for every record so that an edit can be
//! described field by field. The tracker is fed a baseline first (records
//! that already existed when it started are loads, not creations) and then
//! every later event, in order.

use crate::models::audit::{
    AuditAction, AuditEntry, CREATED_TAG, DELETED_TAG, EDITED_TAG, RECORD_PREFIX,
};
use crate::models::value::display_value;
use crate::store::record::{Fields, Record};
use crate::store::{ChangeEvent, ChangeKind, Collection};
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Fields that change on every save and say nothing about the edit.
pub const BOOKKEEPING_FIELDS: [&str; 6] = [
    "fecha",
    "hora",
    "usuario",
    "timestamp",
    "fechaRegistro",
    "horaRegistro",
];

pub const NO_CHANGES: &str = "Sin cambios detectados";
pub const UNKNOWN_USER: &str = "desconocido";

/// Fields listed in the summary of a created record.
const CREATED_SUMMARY_FIELDS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Acting user, used when the record carries no `usuario`.
    pub user: Option<String>,
    /// Summarize created records with every field instead of the first three.
    pub full_created_summary: bool,
}

/// One differing field between two versions of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    pub before: String,
    pub after: String,
}

impl FieldChange {
    pub fn render(&self) -> String {
        format!("{}: \"{}\" → \"{}\"", self.field, self.before, self.after)
    }
}

/// Field-level diff over the union of keys: the old record's keys in
/// order, then keys only the new record has. Bookkeeping fields are
/// ignored; values are compared in their rendered form.
pub fn diff_fields(before: Option<&Fields>, after: &Fields) -> Vec<FieldChange> {
    let mut keys: Vec<&String> = Vec::new();
    if let Some(b) = before {
        keys.extend(b.keys());
    }
    for k in after.keys() {
        if !keys.contains(&k) {
            keys.push(k);
        }
    }

    keys.into_iter()
        .filter(|k| !BOOKKEEPING_FIELDS.contains(&k.as_str()))
        .filter_map(|k| {
            let old = display_value(before.and_then(|b| b.get(k)));
            let new = display_value(after.get(k));
            (old != new).then(|| FieldChange {
                field: k.clone(),
                before: old,
                after: new,
            })
        })
        .collect()
}

/// `field: "a" → "b" | ...`, or the no-change marker.
pub fn describe_changes(changes: &[FieldChange]) -> String {
    if changes.is_empty() {
        return NO_CHANGES.to_string();
    }
    changes
        .iter()
        .map(FieldChange::render)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// `field: value | field: value | ...` over the leading fields of a record.
pub fn created_summary(fields: &Fields, full: bool) -> String {
    let take = if full { usize::MAX } else { CREATED_SUMMARY_FIELDS };
    fields
        .iter()
        .take(take)
        .map(|(k, v)| format!("{}: {}", k, display_value(Some(v))))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub struct HistoryTracker {
    last_seen: HashMap<String, Record>,
    options: HistoryOptions,
}

impl HistoryTracker {
    pub fn new(options: HistoryOptions) -> Self {
        Self {
            last_seen: HashMap::new(),
            options,
        }
    }

    fn key(collection: Collection, id: &str) -> String {
        format!("{}/{}", collection, id)
    }

    /// Remember records that existed before tracking started. They never
    /// produce a creation entry.
    pub fn load_baseline(&mut self, collection: Collection, records: Vec<Record>) {
        for r in records {
            self.last_seen.insert(Self::key(collection, &r.id), r);
        }
    }

    /// Number of records with a known last value.
    pub fn known(&self) -> usize {
        self.last_seen.len()
    }

    pub fn last_seen(&self, collection: Collection, id: &str) -> Option<&Record> {
        self.last_seen.get(&Self::key(collection, id))
    }

    /// Audit entry for one change event, updating the last-seen state.
    pub fn observe(&mut self, event: &ChangeEvent, now: DateTime<Local>) -> AuditEntry {
        let key = event.key();

        let (cambio, data) = match event.kind {
            ChangeKind::Added => {
                let fields = event
                    .record
                    .as_ref()
                    .map(|r| r.fields.clone())
                    .unwrap_or_default();
                let cambio = format!(
                    "{} {}: {}",
                    RECORD_PREFIX,
                    CREATED_TAG,
                    created_summary(&fields, self.options.full_created_summary)
                );
                if let Some(r) = &event.record {
                    self.last_seen.insert(key, r.clone());
                }
                (cambio, fields)
            }
            ChangeKind::Changed => {
                let fields = event
                    .record
                    .as_ref()
                    .map(|r| r.fields.clone())
                    .unwrap_or_default();
                let before = self.last_seen.get(&key).map(|r| &r.fields);
                let changes = diff_fields(before, &fields);
                let cambio = format!(
                    "{} {}: {}",
                    RECORD_PREFIX,
                    EDITED_TAG,
                    describe_changes(&changes)
                );
                if let Some(r) = &event.record {
                    self.last_seen.insert(key, r.clone());
                }
                (cambio, fields)
            }
            ChangeKind::Removed => {
                let fields = self
                    .last_seen
                    .remove(&key)
                    .map(|r| r.fields)
                    .unwrap_or_default();
                let cambio = format!(
                    "{} {} en \"{}\"",
                    RECORD_PREFIX, DELETED_TAG, event.collection
                );
                (cambio, fields)
            }
        };

        let usuario = data
            .get("usuario")
            .map(|v| display_value(Some(v)))
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.options.user.clone().filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        AuditEntry {
            record_id: event.id.clone(),
            lugar: event.collection.name().to_string(),
            cambio,
            fecha: now.format("%d-%m-%Y").to_string(),
            hora: now.format("%H:%M:%S").to_string(),
            usuario,
            timestamp: now.timestamp_millis(),
            data,
        }
    }
}

/// Filters for listing the audit log.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub lugar: Option<Collection>,
    pub record_id: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<usize>,
}

/// Audit entries matching `filter`, newest first.
pub fn filter_entries(records: &[Record], filter: &HistoryFilter) -> Vec<AuditEntry> {
    let mut entries: Vec<AuditEntry> = records
        .iter()
        .map(AuditEntry::from_record)
        .filter(|e| filter.lugar.is_none_or(|c| e.lugar == c.name()))
        .filter(|e| {
            filter
                .record_id
                .as_deref()
                .is_none_or(|id| e.record_id == id)
        })
        .filter(|e| filter.action.is_none_or(|a| e.action() == Some(a)))
        .collect();

    // Entries of the same millisecond stay newest first.
    entries.reverse();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if let Some(n) = filter.limit {
        entries.truncate(n);
    }
    entries
}
