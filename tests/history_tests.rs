mod common;
use chrono::Local;
use common::{open_tracked, setup_test_db};
use rserviceops::core::history::{
    FieldChange, HistoryFilter, HistoryOptions, HistoryTracker, NO_CHANGES, UNKNOWN_USER,
    created_summary, describe_changes, diff_fields, filter_entries,
};
use rserviceops::core::tracker::TrackedStore;
use rserviceops::models::audit::{AuditAction, AuditEntry};
use rserviceops::store::{ChangeEvent, ChangeKind, Collection, CollectionStore, fields};
use serde_json::json;

/// Audit entries of `db_path`, newest first.
fn history_of(db_path: &str) -> Vec<AuditEntry> {
    let store = CollectionStore::open(db_path).expect("reopen");
    filter_entries(
        &store.snapshot(Collection::History).expect("history"),
        &HistoryFilter::default(),
    )
}

#[test]
fn test_diff_lists_changed_fields_in_order() {
    let before = fields([
        ("direccion", json!("A")),
        ("servicio", json!("Poso")),
        ("valor", json!(50)),
        ("fecha", json!("01-01-2024")),
    ]);
    let after = fields([
        ("direccion", json!("B")),
        ("servicio", json!("Poso")),
        ("valor", json!(60)),
        ("fecha", json!("02-01-2024")),
    ]);

    let changes = diff_fields(Some(&before), &after);
    assert_eq!(
        describe_changes(&changes),
        "direccion: \"A\" → \"B\" | valor: \"50\" → \"60\""
    );
}

#[test]
fn test_diff_treats_null_and_missing_alike() {
    let before = fields([("cubicos", json!(null)), ("notas", json!(""))]);
    let after = fields([("notas", json!(""))]);
    assert!(diff_fields(Some(&before), &after).is_empty());

    let added = fields([("notas", json!("")), ("banco", json!("BHD"))]);
    assert_eq!(
        diff_fields(Some(&after), &added),
        vec![FieldChange {
            field: "banco".into(),
            before: String::new(),
            after: "BHD".into(),
        }]
    );
}

#[test]
fn test_bookkeeping_only_edit_has_no_changes() {
    let before = fields([("valor", json!(10)), ("hora", json!("10:00:00"))]);
    let after = fields([("valor", json!(10)), ("hora", json!("11:00:00"))]);
    assert_eq!(describe_changes(&diff_fields(Some(&before), &after)), NO_CHANGES);
}

#[test]
fn test_created_summary_first_three_fields() {
    let f = fields([
        ("direccion", json!("Palm St 5")),
        ("servicio", json!("Poso")),
        ("valor", json!(80.0)),
        ("notas", json!("gate code 12")),
    ]);
    assert_eq!(
        created_summary(&f, false),
        "direccion: Palm St 5 | servicio: Poso | valor: 80"
    );
    assert!(created_summary(&f, true).ends_with("notas: gate code 12"));
}

#[test]
fn test_removal_without_snapshot_is_still_audited() {
    let mut tracker = HistoryTracker::new(HistoryOptions::default());
    let entry = tracker.observe(
        &ChangeEvent {
            collection: Collection::Today,
            kind: ChangeKind::Removed,
            id: "ghost".into(),
            record: None,
        },
        Local::now(),
    );

    assert_eq!(entry.cambio, "Registro ELIMINADO en \"data\"");
    assert_eq!(entry.action(), Some(AuditAction::Deleted));
    assert!(entry.data.is_empty());
    assert_eq!(entry.usuario, UNKNOWN_USER);
}

#[test]
fn test_tracker_records_create_edit_delete() {
    let store = open_tracked("history_lifecycle", Some("maria"));
    let db_path = store.path().to_string();

    store
        .write(
            Collection::Today,
            "j1",
            fields([
                ("direccion", json!("Palm St 5")),
                ("servicio", json!("Poso")),
                ("valor", json!(80)),
            ]),
        )
        .expect("create");
    store
        .write(Collection::Today, "j1", fields([("valor", json!(95))]))
        .expect("edit");
    store.remove(Collection::Today, "j1").expect("delete");

    let stats = store.close().expect("tracker stats");
    assert_eq!(stats.entries, 3);
    assert_eq!(stats.failures, 0);

    let entries = history_of(&db_path);
    assert_eq!(entries.len(), 3);

    let actions: Vec<Option<AuditAction>> = entries.iter().rev().map(AuditEntry::action).collect();
    assert_eq!(
        actions,
        vec![
            Some(AuditAction::Created),
            Some(AuditAction::Edited),
            Some(AuditAction::Deleted)
        ]
    );

    let edit = &entries[1];
    assert_eq!(edit.cambio, "Registro EDITADO: valor: \"80\" → \"95\"");
    assert_eq!(edit.lugar, "data");
    assert_eq!(edit.record_id, "j1");
    assert_eq!(edit.usuario, "maria");

    // the deletion carries the last value seen
    let deleted = &entries[0];
    assert_eq!(deleted.data.get("direccion"), Some(&json!("Palm St 5")));
}

#[test]
fn test_existing_records_are_not_created_again() {
    let db_path = setup_test_db("history_baseline");
    {
        let plain = CollectionStore::open(&db_path).expect("open");
        plain
            .write(
                Collection::Invoices,
                "f1",
                fields([("numerodefactura", json!("25060001")), ("qty", json!(1))]),
            )
            .expect("seed");
    }

    let store = TrackedStore::open_with(&db_path, Some(HistoryOptions::default())).expect("open");
    store
        .write(Collection::Invoices, "f1", fields([("qty", json!(2))]))
        .expect("edit");
    store.close();

    let entries = history_of(&db_path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].cambio, "Registro EDITADO: qty: \"1\" → \"2\"");
}

#[test]
fn test_record_user_wins_over_acting_user() {
    let store = open_tracked("history_usuario", Some("maria"));
    let db_path = store.path().to_string();

    store
        .write(
            Collection::CashReport,
            "e1",
            fields([("efectivo", json!(100)), ("usuario", json!("pedro"))]),
        )
        .expect("create");
    store.close();

    let entries = history_of(&db_path);
    assert_eq!(entries[0].usuario, "pedro");
}

#[test]
fn test_untracked_collections_leave_no_history() {
    let store = open_tracked("history_untracked", None);
    let db_path = store.path().to_string();

    store
        .write(Collection::Clients, "c1", fields([("direccion", json!("X"))]))
        .expect("client");
    store
        .write(Collection::Users, "u1", fields([("name", json!("Ana"))]))
        .expect("user");
    let stats = store.close().expect("stats");

    assert_eq!(stats.entries, 0);
    assert!(history_of(&db_path).is_empty());
}

#[test]
fn test_history_disabled_writes_nothing() {
    let db_path = setup_test_db("history_disabled");
    let store = TrackedStore::open_with(&db_path, None).expect("open");
    store
        .write(Collection::Today, "j1", fields([("direccion", json!("A"))]))
        .expect("create");
    assert!(store.close().is_none());

    assert!(history_of(&db_path).is_empty());
}

#[test]
fn test_filter_by_record_and_action() {
    let store = open_tracked("history_filter", None);
    let db_path = store.path().to_string();

    for id in ["a", "b"] {
        store
            .write(Collection::Today, id, fields([("valor", json!(1))]))
            .expect("create");
        store
            .write(Collection::Today, id, fields([("valor", json!(2))]))
            .expect("edit");
    }
    store.close();

    let reopened = CollectionStore::open(&db_path).expect("reopen");
    let all = reopened.snapshot(Collection::History).expect("history");

    let only_a = filter_entries(
        &all,
        &HistoryFilter {
            record_id: Some("a".into()),
            ..Default::default()
        },
    );
    assert_eq!(only_a.len(), 2);
    assert!(only_a.iter().all(|e| e.record_id == "a"));

    let edits = filter_entries(
        &all,
        &HistoryFilter {
            action: Some(AuditAction::Edited),
            limit: Some(1),
            ..Default::default()
        },
    );
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].record_id, "b");
}

#[test]
fn test_burst_of_writes_is_fully_audited() {
    let store = open_tracked("history_burst", None);
    let db_path = store.path().to_string();

    let n = 3000;
    for i in 0..n {
        store
            .write(
                Collection::Today,
                &format!("j{}", i),
                fields([("direccion", json!(format!("Calle {}", i)))]),
            )
            .expect("write");
    }

    let stats = store.close().expect("tracker stats");
    assert_eq!(stats.entries, n);
    assert_eq!(stats.failures, 0);

    let entries = history_of(&db_path);
    assert_eq!(entries.len(), n);
    let audited: std::collections::HashSet<&str> =
        entries.iter().map(|e| e.record_id.as_str()).collect();
    assert_eq!(audited.len(), n);
    assert!(audited.contains("j0"));
    assert!(audited.contains("j2999"));
}
