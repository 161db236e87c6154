mod common;
use common::{open_store, setup_test_db};
use rserviceops::store::{ChangeKind, Collection, CollectionStore, INVOICE_COUNTER, fields};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::thread;

#[test]
fn test_write_creates_then_merges() {
    let store = open_store("store_write_merge");

    let rec = store
        .write(
            Collection::Clients,
            "c1",
            fields([("direccion", json!("Palm St 5")), ("cubicos", json!(4))]),
        )
        .expect("create");
    assert_eq!(rec.text("direccion"), Some("Palm St 5"));

    let rec = store
        .write(Collection::Clients, "c1", fields([("valor", json!(120))]))
        .expect("merge");
    assert_eq!(rec.text("direccion"), Some("Palm St 5"));
    assert_eq!(rec.number("cubicos"), Some(4.0));
    assert_eq!(rec.number("valor"), Some(120.0));

    let stored = store.require(Collection::Clients, "c1").expect("stored");
    assert_eq!(stored, rec);
}

#[test]
fn test_events_added_changed_removed() {
    let store = open_store("store_events");
    let mut sub = store.subscribe(&[Collection::Today]).expect("subscribe");

    store
        .write(Collection::Today, "j1", fields([("direccion", json!("A"))]))
        .expect("add");
    store
        .write(Collection::Today, "j1", fields([("direccion", json!("B"))]))
        .expect("edit");
    store.remove(Collection::Today, "j1").expect("remove");

    let added = sub.try_recv().expect("added event");
    assert_eq!(added.kind, ChangeKind::Added);
    assert_eq!(added.id, "j1");

    let changed = sub.try_recv().expect("changed event");
    assert_eq!(changed.kind, ChangeKind::Changed);
    let rec = changed.record.expect("changed carries the new value");
    assert_eq!(rec.text("direccion"), Some("B"));

    let removed = sub.try_recv().expect("removed event");
    assert_eq!(removed.kind, ChangeKind::Removed);
    assert!(removed.record.is_none());

    assert!(sub.try_recv().is_none());
}

#[test]
fn test_noop_write_emits_nothing() {
    let store = open_store("store_noop");
    store
        .write(Collection::Today, "j1", fields([("valor", json!(50))]))
        .expect("add");

    let mut sub = store.subscribe(&[Collection::Today]).expect("subscribe");

    // 50.0 is stored as 50, so this is the same value
    store
        .write(Collection::Today, "j1", fields([("valor", json!(50.0))]))
        .expect("same write");
    store
        .replace(
            Collection::Today,
            "j1",
            fields([("valor", json!(50))]),
        )
        .expect("same replace");

    assert!(sub.try_recv().is_none());
}

#[test]
fn test_subscription_only_sees_its_collections() {
    let store = open_store("store_filter");
    store
        .write(Collection::Clients, "old", fields([("direccion", json!("X"))]))
        .expect("seed");

    let mut sub = store.subscribe(&[Collection::Clients]).expect("subscribe");
    let baseline = sub.take_baseline();
    assert_eq!(baseline[&Collection::Clients].len(), 1);

    store
        .write(Collection::Users, "u1", fields([("name", json!("Ana"))]))
        .expect("user");
    store
        .write(Collection::Clients, "c2", fields([("direccion", json!("Y"))]))
        .expect("client");

    let ev = sub.try_recv().expect("client event");
    assert_eq!(ev.collection, Collection::Clients);
    assert_eq!(ev.id, "c2");
    assert!(sub.try_recv().is_none());
}

#[test]
fn test_remove_missing_record_returns_none() {
    let store = open_store("store_remove_missing");
    let mut sub = store.subscribe(&[Collection::Invoices]).expect("subscribe");

    let removed = store.remove(Collection::Invoices, "nope").expect("remove");
    assert!(removed.is_none());
    assert!(sub.try_recv().is_none());
}

#[test]
fn test_push_generates_distinct_ids() {
    let store = open_store("store_push_ids");
    let a = store
        .push(Collection::Expenses, fields([("monto", json!(10))]))
        .expect("a");
    let b = store
        .push(Collection::Expenses, fields([("monto", json!(10))]))
        .expect("b");
    assert_ne!(a.id, b.id);
    assert_eq!(store.snapshot(Collection::Expenses).expect("snapshot").len(), 2);
}

#[test]
fn test_snapshot_keeps_field_order() {
    let store = open_store("store_field_order");
    store
        .replace(
            Collection::Today,
            "j1",
            fields([
                ("realizadopor", Value::from("")),
                ("direccion", json!("Palm St 5")),
                ("servicio", json!("Poso")),
            ]),
        )
        .expect("replace");

    let rec = store.require(Collection::Today, "j1").expect("record");
    let keys: Vec<&str> = rec.fields.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["realizadopor", "direccion", "servicio"]);
}

#[test]
fn test_counter_increments_and_can_be_set() {
    let store = open_store("store_counter");
    assert_eq!(store.counter_value(INVOICE_COUNTER).expect("read"), 0);
    assert_eq!(store.atomic_increment(INVOICE_COUNTER).expect("inc"), 1);
    assert_eq!(store.atomic_increment(INVOICE_COUNTER).expect("inc"), 2);

    store.set_counter(INVOICE_COUNTER, 41).expect("set");
    assert_eq!(store.atomic_increment(INVOICE_COUNTER).expect("inc"), 42);
}

#[test]
fn test_counter_is_unique_across_connections() {
    let db_path = setup_test_db("store_counter_threads");
    CollectionStore::open(&db_path).expect("migrate");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = db_path.clone();
            thread::spawn(move || {
                let store = CollectionStore::open(&path).expect("open");
                (0..25)
                    .map(|_| store.atomic_increment(INVOICE_COUNTER).expect("inc"))
                    .collect::<Vec<i64>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for h in handles {
        for v in h.join().expect("thread") {
            assert!(seen.insert(v), "duplicate counter value {}", v);
        }
    }
    assert_eq!(seen.len(), 100);
    assert_eq!(seen.iter().max(), Some(&100));
}

#[test]
fn test_unknown_collection_name() {
    assert!(Collection::parse("nope").is_err());
    assert_eq!(
        Collection::parse("hojamañana").expect("known"),
        Collection::Tomorrow
    );
    assert!(Collection::CashReport.is_tracked());
    assert!(!Collection::Clients.is_tracked());
}

#[test]
fn test_slow_subscriber_keeps_every_event() {
    let store = open_store("store_no_lag");
    let mut sub = store.subscribe(&[Collection::Today]).expect("subscribe");

    for i in 0..2500 {
        store
            .write(Collection::Today, &format!("j{}", i), fields([("valor", json!(i))]))
            .expect("write");
    }

    let mut received = 0;
    while let Some(ev) = sub.try_recv() {
        assert_eq!(ev.id, format!("j{}", received));
        received += 1;
    }
    assert_eq!(received, 2500);
}

#[test]
fn test_dropped_subscription_does_not_block_writes() {
    let store = open_store("store_dropped_sub");
    let sub = store.subscribe(&[Collection::Today]).expect("subscribe");
    drop(sub);

    store
        .write(Collection::Today, "j1", fields([("valor", json!(1))]))
        .expect("write after unsubscribe");

    let mut live = store.subscribe(&[Collection::Today]).expect("subscribe");
    store
        .write(Collection::Today, "j1", fields([("valor", json!(2))]))
        .expect("write");
    assert_eq!(live.try_recv().expect("event").kind, ChangeKind::Changed);
}
