mod common;
use common::open_store;
use rserviceops::core::clients::{ClientsLogic, NewClient};
use rserviceops::core::jobs::JobsLogic;
use rserviceops::core::propagation::{LookupMode, find_client_by_address, propagate};
use rserviceops::models::client::ClientField;
use rserviceops::models::job::JobField;
use rserviceops::store::{Collection, CollectionStore, Fields, fields};
use serde_json::{Value, json};

fn seed_client(store: &CollectionStore) {
    ClientsLogic::add(
        store,
        &NewClient {
            direccion: "Elm 1".into(),
            anombrede: Some("Juan Perez".into()),
            cubicos: Some(6.0),
            valor: Some(150.0),
            email: None,
        },
    )
    .expect("client");
}

#[test]
fn test_new_address_with_service_creates_client() {
    let store = open_store("prop_new_client");
    store
        .write(Collection::Today, "j1", fields([("direccion", json!("Palm St 5"))]))
        .expect("job");

    let job = JobsLogic::set_field(&store, Collection::Today, "j1", JobField::Servicio, "Poso")
        .expect("set servicio");

    let clients = store.snapshot(Collection::Clients).expect("clients");
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].text("direccion"), Some("Palm St 5"));
    assert_eq!(clients[0].get("cubicos"), Some(&Value::Null));

    assert_eq!(job.text("servicio"), Some("Poso"));
    assert_eq!(job.get("cubicos"), Some(&Value::Null));
}

#[test]
fn test_new_client_keeps_the_jobs_volume() {
    let store = open_store("prop_seed_cubicos");
    store
        .write(
            Collection::Tomorrow,
            "j1",
            fields([("direccion", json!("Oak 3")), ("cubicos", json!(4))]),
        )
        .expect("job");

    let job = JobsLogic::set_field(&store, Collection::Tomorrow, "j1", JobField::Servicio, "Tuberia")
        .expect("set servicio");

    let client = find_client_by_address(&store, "Oak 3")
        .expect("lookup")
        .expect("client created");
    assert_eq!(client.number("cubicos"), Some(4.0));
    assert_eq!(job.number("cubicos"), Some(4.0));
}

#[test]
fn test_today_sheet_copies_extended_defaults() {
    let store = open_store("prop_extended");
    seed_client(&store);

    let job = JobsLogic::add_express(
        &store,
        Collection::Today,
        &[(JobField::Direccion, "Elm 1".to_string())],
    )
    .expect("add");

    assert_eq!(job.number("cubicos"), Some(6.0));
    assert_eq!(job.number("valor"), Some(150.0));
    assert_eq!(job.text("anombrede"), Some("Juan Perez"));
}

#[test]
fn test_planning_sheets_copy_volume_only() {
    let store = open_store("prop_basic");
    seed_client(&store);

    let job = JobsLogic::add_express(
        &store,
        Collection::DayAfter,
        &[(JobField::Direccion, "Elm 1".to_string())],
    )
    .expect("add");

    assert_eq!(job.number("cubicos"), Some(6.0));
    assert_eq!(job.number("valor"), None);
    assert_eq!(job.text("anombrede"), None);
}

#[test]
fn test_unknown_address_clears_derived_fields() {
    let store = open_store("prop_clear");
    store
        .write(
            Collection::Today,
            "j1",
            fields([
                ("direccion", json!("Elm 1")),
                ("cubicos", json!(6)),
                ("valor", json!(150)),
            ]),
        )
        .expect("job");

    let job = JobsLogic::set_field(&store, Collection::Today, "j1", JobField::Direccion, "Nowhere 9")
        .expect("set direccion");

    assert_eq!(job.get("cubicos"), Some(&Value::Null));
    assert_eq!(job.get("valor"), Some(&Value::Null));
    // writing an address alone never creates a client
    assert!(store.snapshot(Collection::Clients).expect("clients").is_empty());
}

#[test]
fn test_clearing_service_clears_volume() {
    let store = open_store("prop_clear_service");
    store
        .write(
            Collection::Tomorrow,
            "j1",
            fields([
                ("direccion", json!("Elm 1")),
                ("servicio", json!("Poso")),
                ("cubicos", json!(6)),
            ]),
        )
        .expect("job");

    let job = JobsLogic::set_field(&store, Collection::Tomorrow, "j1", JobField::Servicio, "")
        .expect("clear servicio");
    assert_eq!(job.get("cubicos"), Some(&Value::Null));
}

#[test]
fn test_directory_is_not_pushed_back_to_jobs() {
    let store = open_store("prop_one_way");
    seed_client(&store);

    let job = JobsLogic::add_express(
        &store,
        Collection::Today,
        &[(JobField::Direccion, "Elm 1".to_string())],
    )
    .expect("add");

    let client = find_client_by_address(&store, "Elm 1")
        .expect("lookup")
        .expect("client");
    ClientsLogic::set_field(&store, &client.id, ClientField::Cubicos, "9").expect("edit client");

    let again = store.require(Collection::Today, &job.id).expect("job");
    assert_eq!(again.number("cubicos"), Some(6.0));
}

#[test]
fn test_propagate_without_address_or_service_changes_nothing() {
    let store = open_store("prop_passthrough");
    seed_client(&store);

    let current: Fields = fields([("direccion", json!("Elm 1"))]);
    let out = propagate(
        &store,
        LookupMode::Extended,
        &current,
        fields([("notas", json!("call first"))]),
    )
    .expect("propagate");

    assert_eq!(out, fields([("notas", json!("call first"))]));
}

#[test]
fn test_empty_address_matches_no_client() {
    let store = open_store("prop_empty_address");
    store
        .write(Collection::Clients, "c0", fields([("direccion", json!(""))]))
        .expect("blank client");
    assert!(find_client_by_address(&store, "  ").expect("lookup").is_none());
}
