mod common;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use common::open_store;
use rserviceops::core::invoice::{
    InvoiceLogic, NewInvoice, PaidFilter, format_invoice_number, item_rate,
};
use rserviceops::models::invoice::{Invoice, InvoiceField, Letterhead};
use rserviceops::models::value::round2;
use rserviceops::store::{Collection, CollectionStore, INVOICE_COUNTER, fields};
use serde_json::json;

fn june_2025() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 6, 10, 9, 30, 0)
        .single()
        .expect("valid local time")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn invoice(store: &CollectionStore, id: &str) -> Invoice {
    store
        .require(Collection::Invoices, id)
        .expect("invoice")
        .to_model()
        .expect("model")
}

#[test]
fn test_invoice_number_format() {
    assert_eq!(format_invoice_number(42, day(2025, 6, 15)), "25060042");
    assert_eq!(format_invoice_number(1, day(2030, 12, 1)), "30120001");
}

#[test]
fn test_next_number_follows_counter() {
    let store = open_store("invoice_counter_41");
    store.set_counter(INVOICE_COUNTER, 41).expect("set counter");

    let n = InvoiceLogic::next_number(&store, day(2025, 6, 3)).expect("next");
    assert_eq!(n, "25060042");
    assert_eq!(store.counter_value(INVOICE_COUNTER).expect("read"), 42);
}

#[test]
fn test_create_uses_price_list() {
    let store = open_store("invoice_price_list");
    let rec = InvoiceLogic::create(
        &store,
        &NewInvoice {
            anombrede: Some("Juan Perez".into()),
            item: Some("hidrojet".into()),
            qty: 2.0,
            ..Default::default()
        },
        june_2025(),
    )
    .expect("create");

    let inv = invoice(&store, &rec.id);
    assert_eq!(inv.numerodefactura.as_deref(), Some("25060001"));
    assert_eq!(inv.rate, 250.0);
    assert_eq!(inv.amount, 500.0);
    assert!(!inv.pago);
    assert_eq!(inv.fechaemision.as_deref(), Some("10-06-2025"));
}

#[test]
fn test_explicit_rate_wins_over_price_list() {
    let store = open_store("invoice_explicit_rate");
    let rec = InvoiceLogic::create(
        &store,
        &NewInvoice {
            item: Some("Agua".into()),
            qty: 3.0,
            rate: Some(55.5),
            ..Default::default()
        },
        june_2025(),
    )
    .expect("create");

    let inv = invoice(&store, &rec.id);
    assert_eq!(inv.rate, 55.5);
    assert_eq!(inv.amount, 166.5);
}

#[test]
fn test_amount_follows_qty_rate_and_item() {
    let store = open_store("invoice_recompute");
    let rec = InvoiceLogic::create(
        &store,
        &NewInvoice {
            item: Some("Tuberia".into()),
            qty: 1.0,
            ..Default::default()
        },
        june_2025(),
    )
    .expect("create");
    let today = day(2025, 6, 11);

    InvoiceLogic::set_field(&store, &rec.id, InvoiceField::Qty, "3", today).expect("qty");
    assert_eq!(invoice(&store, &rec.id).amount, 300.0);

    InvoiceLogic::set_field(&store, &rec.id, InvoiceField::Rate, "99.99", today).expect("rate");
    assert_eq!(invoice(&store, &rec.id).amount, 299.97);

    // a price-list item brings its rate along
    InvoiceLogic::set_field(&store, &rec.id, InvoiceField::Item, "Agua", today).expect("item");
    let inv = invoice(&store, &rec.id);
    assert_eq!(inv.rate, 60.0);
    assert_eq!(inv.amount, 180.0);

    // a free-text item keeps the current rate
    InvoiceLogic::set_field(&store, &rec.id, InvoiceField::Item, "Limpieza especial", today)
        .expect("free item");
    let inv = invoice(&store, &rec.id);
    assert_eq!(inv.rate, 60.0);
    assert_eq!(inv.amount, round2(inv.qty * inv.rate));
}

#[test]
fn test_negative_quantity_is_rejected() {
    let store = open_store("invoice_negative_qty");
    let rec = InvoiceLogic::create(
        &store,
        &NewInvoice {
            qty: 1.0,
            rate: Some(10.0),
            ..Default::default()
        },
        june_2025(),
    )
    .expect("create");

    assert!(
        InvoiceLogic::set_field(&store, &rec.id, InvoiceField::Qty, "-1", day(2025, 6, 11))
            .is_err()
    );
    assert_eq!(invoice(&store, &rec.id).amount, 10.0);
}

#[test]
fn test_paying_stamps_date_and_clears_balance() {
    let store = open_store("invoice_pago");
    let rec = InvoiceLogic::create(
        &store,
        &NewInvoice {
            item: Some("Servicio de Poso".into()),
            qty: 1.0,
            ..Default::default()
        },
        june_2025(),
    )
    .expect("create");

    InvoiceLogic::set_field(&store, &rec.id, InvoiceField::Pago, "si", day(2025, 6, 20))
        .expect("pay");
    let inv = invoice(&store, &rec.id);
    assert!(inv.pago);
    assert_eq!(inv.fechapago.as_deref(), Some("20-06-2025"));
    assert_eq!(inv.amount, 80.0);
    assert_eq!(inv.balance_due(), 0.0);

    InvoiceLogic::set_field(&store, &rec.id, InvoiceField::Pago, "no", day(2025, 6, 21))
        .expect("unpay");
    let inv = invoice(&store, &rec.id);
    assert!(!inv.pago);
    assert_eq!(inv.fechapago, None);
    assert_eq!(inv.balance_due(), 80.0);
}

#[test]
fn test_invoice_from_job() {
    let store = open_store("invoice_from_job");
    store
        .write(
            Collection::Today,
            "j1",
            fields([
                ("direccion", json!("Palm St 5")),
                ("anombrede", json!("Rosa Diaz")),
                ("servicio", json!("Tuberia")),
                ("valor", json!(120)),
            ]),
        )
        .expect("job");

    let rec = InvoiceLogic::from_job(&store, Collection::Today, "j1", None, june_2025())
        .expect("from job");
    let inv = invoice(&store, &rec.id);
    assert_eq!(inv.bill_to(), "Rosa Diaz");
    assert_eq!(inv.item.as_deref(), Some("Tuberia"));
    assert_eq!(inv.rate, 120.0);
    assert_eq!(inv.amount, 120.0);
    assert_eq!(store.snapshot(Collection::Invoices).expect("all").len(), 1);
}

#[test]
fn test_list_filter_totals_and_resolve() {
    let store = open_store("invoice_list");
    let now = june_2025();
    let a = InvoiceLogic::create(
        &store,
        &NewInvoice {
            item: Some("Agua".into()),
            qty: 1.0,
            ..Default::default()
        },
        now,
    )
    .expect("a");
    InvoiceLogic::create(
        &store,
        &NewInvoice {
            item: Some("Hidrojet".into()),
            qty: 1.0,
            ..Default::default()
        },
        now,
    )
    .expect("b");
    InvoiceLogic::set_field(&store, &a.id, InvoiceField::Pago, "si", day(2025, 6, 12)).expect("pay");

    let all = InvoiceLogic::list(&store, PaidFilter::All).expect("all");
    assert_eq!(all.len(), 2);
    // newest number first
    assert_eq!(all[0].1.numerodefactura.as_deref(), Some("25060002"));

    let totals = InvoiceLogic::totals(&all);
    assert_eq!(totals.amount, 310.0);
    assert_eq!(totals.balance_due, 250.0);

    let unpaid = InvoiceLogic::list(&store, PaidFilter::Unpaid).expect("unpaid");
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].1.item.as_deref(), Some("Hidrojet"));

    let by_number = InvoiceLogic::resolve(&store, "25060001").expect("by number");
    assert_eq!(by_number.id, a.id);

    InvoiceLogic::delete(&store, "25060002").expect("delete");
    assert!(InvoiceLogic::resolve(&store, "25060002").is_err());
}

#[test]
fn test_letterhead_merge() {
    let store = open_store("invoice_letterhead");
    assert_eq!(InvoiceLogic::letterhead(&store).expect("empty"), Letterhead::default());

    InvoiceLogic::set_letterhead(
        &store,
        &Letterhead {
            nombre: Some("Septicos del Norte".into()),
            telefono: Some("809-555-0101".into()),
            ..Default::default()
        },
    )
    .expect("set");
    let lh = InvoiceLogic::set_letterhead(
        &store,
        &Letterhead {
            correo: Some("info@example.com".into()),
            ..Default::default()
        },
    )
    .expect("merge");

    assert_eq!(
        lh.lines(),
        vec![
            "Septicos del Norte".to_string(),
            "809-555-0101".to_string(),
            "info@example.com".to_string()
        ]
    );
}

#[test]
fn test_price_list_lookup() {
    assert_eq!(item_rate("Visita Tecnica"), Some(40.0));
    assert_eq!(item_rate("trampa de grasa"), Some(150.0));
    assert_eq!(item_rate("Otro"), None);
}
