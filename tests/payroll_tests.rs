mod common;
use chrono::NaiveDate;
use common::open_store;
use rserviceops::core::adjustments::{AdjustmentKind, AdjustmentsLogic};
use rserviceops::core::cash::CashLogic;
use rserviceops::core::employees::EmployeesLogic;
use rserviceops::core::payroll::{PayrollInputs, PayrollLogic, PayrollSheet, aggregate_for};
use rserviceops::errors::AppError;
use rserviceops::models::payroll::{PayrollField, PayrollRow};
use rserviceops::store::CollectionStore;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn employee(store: &CollectionStore, name: &str) -> String {
    EmployeesLogic::add(store, name, None).expect("employee").id
}

fn extra(store: &CollectionStore, emp: &str, valor: f64, fecha: &str) {
    AdjustmentsLogic::add(store, AdjustmentKind::Extra, emp, valor, Some(fecha), None)
        .expect("extra");
}

fn january(store: &CollectionStore) -> PayrollSheet {
    PayrollSheet::create(store, "01-01-2024", "31-01-2024", day(2024, 2, 1)).expect("run")
}

#[test]
fn test_extras_in_range_are_summed() {
    let store = open_store("payroll_extras_80");
    let e1 = employee(&store, "E1");
    extra(&store, &e1, 50.0, "10-01-2024");
    extra(&store, &e1, 30.0, "20-01-2024");
    // outside the period
    extra(&store, &e1, 100.0, "05-02-2024");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let row_id = sheet
        .add_row(store.create_id(), &inputs, Some(&e1), 0.0, 0.0)
        .expect("row");

    assert_eq!(sheet.row(&row_id).expect("row").extra, 80.0);
}

#[test]
fn test_row_totals_chain() {
    let store = open_store("payroll_totals");
    let e1 = employee(&store, "Luis");
    extra(&store, &e1, 80.0, "15-01-2024");
    AdjustmentsLogic::add(
        &store,
        AdjustmentKind::Deduction,
        &e1,
        20.0,
        Some("2024-01-16"),
        Some("anticipo"),
    )
    .expect("deduction");
    CashLogic::add(&store, &e1, 200.0, Some("12-01-2024"), None, None, None).expect("cash in");
    CashLogic::add(&store, &e1, -50.0, Some("13-01-2024"), None, None, None).expect("cash out");
    // not cash: leaves the balance alone
    CashLogic::add(&store, &e1, 999.0, Some("13-01-2024"), Some("transferencia"), None, None)
        .expect("transfer");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let row_id = sheet
        .add_row(store.create_id(), &inputs, Some(&e1), 15.0, 50.0)
        .expect("row");

    let row = sheet.row(&row_id).expect("row");
    assert_eq!(row.total_quincena, 750.0);
    assert_eq!(row.extra, 80.0);
    assert_eq!(row.deducciones, 20.0);
    assert_eq!(row.total_nomina, 810.0);
    assert_eq!(row.efectivo, 150.0);
    assert_eq!(row.total, 960.0);
}

#[test]
fn test_recompute_is_order_independent() {
    let mut a = PayrollRow::default();
    PayrollField::Dias.apply(&mut a, 12.0);
    PayrollField::Valor.apply(&mut a, 45.5);
    PayrollField::Extra.apply(&mut a, 30.0);
    PayrollField::Deducciones.apply(&mut a, 10.25);
    PayrollField::Efectivo.apply(&mut a, -40.0);

    let mut b = PayrollRow::default();
    PayrollField::Efectivo.apply(&mut b, -40.0);
    PayrollField::Deducciones.apply(&mut b, 10.25);
    PayrollField::Valor.apply(&mut b, 45.5);
    PayrollField::Extra.apply(&mut b, 30.0);
    PayrollField::Dias.apply(&mut b, 12.0);

    assert_eq!(a, b);
    assert_eq!(a.total_nomina, 565.75);
    assert_eq!(a.total, 525.75);

    // recomputing again changes nothing
    let before = a.clone();
    a.recompute();
    assert_eq!(a, before);
}

#[test]
fn test_reassign_recomputes_for_new_employee() {
    let store = open_store("payroll_reassign");
    let e1 = employee(&store, "Ana");
    let e2 = employee(&store, "Beto");
    extra(&store, &e1, 50.0, "10-01-2024");
    extra(&store, &e2, 70.0, "11-01-2024");
    CashLogic::add(&store, &e2, 25.0, Some("11-01-2024"), None, None, None).expect("cash");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let row_id = sheet
        .add_row(store.create_id(), &inputs, Some(&e1), 10.0, 40.0)
        .expect("row");

    assert!(sheet.set_employee(&inputs, &row_id, &e2).expect("assign"));

    let row = sheet.row(&row_id).expect("row");
    assert_eq!(row.nombre.as_deref(), Some(e2.as_str()));
    assert_eq!(row.extra, 70.0);
    assert_eq!(row.deducciones, 0.0);
    assert_eq!(row.efectivo, 25.0);
    assert_eq!(row.total, 400.0 + 70.0 + 25.0);
}

#[test]
fn test_locked_row_ignores_edits() {
    let store = open_store("payroll_locked");
    let e1 = employee(&store, "Ana");
    let e2 = employee(&store, "Beto");
    extra(&store, &e2, 70.0, "11-01-2024");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let row_id = sheet
        .add_row(store.create_id(), &inputs, Some(&e1), 10.0, 40.0)
        .expect("row");
    let before = sheet.row(&row_id).expect("row").clone();

    sheet.lock(&row_id).expect("lock");
    assert!(!sheet.set_employee(&inputs, &row_id, &e2).expect("assign"));
    assert!(!sheet.set_amount(&row_id, PayrollField::Dias, 1.0).expect("set"));
    assert!(!sheet.remove_row(&row_id).expect("remove"));
    assert_eq!(sheet.row(&row_id).expect("row"), &before);

    sheet.unlock(&row_id).expect("unlock");
    assert!(sheet.set_amount(&row_id, PayrollField::Dias, 1.0).expect("set"));
    assert_eq!(sheet.row(&row_id).expect("row").total_quincena, 40.0);
}

#[test]
fn test_reversed_range_is_rejected() {
    let store = open_store("payroll_reversed");
    let err = PayrollSheet::create(&store, "31-01-2024", "01-01-2024", day(2024, 2, 1))
        .expect_err("reversed range");
    assert!(matches!(err, AppError::InvalidRange(_)));
}

#[test]
fn test_duplicate_run_is_rejected() {
    let store = open_store("payroll_duplicate");
    january(&store);
    let err = PayrollSheet::create(&store, "2024-01-01", "2024-01-31", day(2024, 2, 1))
        .expect_err("duplicate");
    assert!(matches!(err, AppError::AlreadyExists(_)));
}

#[test]
fn test_refresh_run_keeps_listed_rows() {
    let store = open_store("payroll_refresh");
    let e1 = employee(&store, "Ana");
    let e2 = employee(&store, "Beto");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let r1 = sheet
        .add_row(store.create_id(), &inputs, Some(&e1), 10.0, 40.0)
        .expect("r1");
    let r2 = sheet
        .add_row(store.create_id(), &inputs, Some(&e2), 10.0, 40.0)
        .expect("r2");
    sheet.persist(&store).expect("persist");

    // new extras arrive after the run was drafted
    extra(&store, &e1, 15.0, "20-01-2024");
    extra(&store, &e2, 25.0, "20-01-2024");

    let refreshed =
        PayrollLogic::refresh_run(&store, &sheet.id, std::slice::from_ref(&r2)).expect("refresh");
    assert_eq!(refreshed.row(&r1).expect("r1").extra, 15.0);
    assert_eq!(refreshed.row(&r2).expect("r2").extra, 0.0);

    let reloaded = PayrollSheet::load(&store, &sheet.id).expect("reload");
    assert_eq!(reloaded.row(&r1).expect("r1").total, 415.0);
}

#[test]
fn test_all_employees_and_run_totals() {
    let store = open_store("payroll_all_employees");
    let e1 = employee(&store, "Ana");
    employee(&store, "Beto");
    let e3 = employee(&store, "Carla");
    EmployeesLogic::set_active(&store, &e3, false).expect("deactivate");
    extra(&store, &e1, 10.0, "05-01-2024");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let added = PayrollLogic::add_all_employees(&store, &mut sheet, &inputs, 15.0, 30.0)
        .expect("rows");
    assert_eq!(added, 2);

    // running it again adds nobody twice
    let again = PayrollLogic::add_all_employees(&store, &mut sheet, &inputs, 15.0, 30.0)
        .expect("rows");
    assert_eq!(again, 0);

    let totals = sheet.totals();
    assert_eq!(totals.total_quincena, 900.0);
    assert_eq!(totals.extra, 10.0);
    assert_eq!(totals.total, 910.0);
}

#[test]
fn test_aggregates_ignore_other_employees() {
    let store = open_store("payroll_aggregate_scope");
    let e1 = employee(&store, "Ana");
    let e2 = employee(&store, "Beto");
    extra(&store, &e2, 70.0, "11-01-2024");

    let inputs = PayrollInputs::load(&store).expect("inputs");
    let agg = aggregate_for(&inputs, &e1, day(2024, 1, 1), day(2024, 1, 31));
    assert_eq!(agg.extra, 0.0);
    assert_eq!(agg.deducciones, 0.0);
    assert_eq!(agg.efectivo, 0.0);
}

#[test]
fn test_cash_balance_spans_all_dates_but_extras_follow_the_period() {
    let store = open_store("payroll_cash_all_history");
    let e1 = employee(&store, "Ana");
    // cash is money still held, whatever its date
    CashLogic::add(&store, &e1, 100.0, Some("15-12-2023"), None, None, None).expect("before");
    CashLogic::add(&store, &e1, 40.0, Some("10-01-2024"), None, None, None).expect("inside");
    CashLogic::add(&store, &e1, -30.0, Some("05-02-2024"), None, None, None).expect("after");

    // extras on both boundaries count, one day outside does not
    extra(&store, &e1, 5.0, "31-12-2023");
    extra(&store, &e1, 10.0, "01-01-2024");
    extra(&store, &e1, 20.0, "31-01-2024");
    extra(&store, &e1, 50.0, "01-02-2024");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let row_id = sheet
        .add_row(store.create_id(), &inputs, Some(&e1), 0.0, 0.0)
        .expect("row");

    let row = sheet.row(&row_id).expect("row");
    assert_eq!(row.efectivo, 110.0);
    assert_eq!(row.extra, 30.0);
    assert_eq!(row.total, 140.0);
}

#[test]
fn test_refresh_replaces_manual_aggregate_overrides() {
    let store = open_store("payroll_override");
    let e1 = employee(&store, "Ana");
    extra(&store, &e1, 50.0, "10-01-2024");

    let mut sheet = january(&store);
    let inputs = PayrollInputs::load(&store).expect("inputs");
    let row_id = sheet
        .add_row(store.create_id(), &inputs, Some(&e1), 10.0, 10.0)
        .expect("row");

    assert!(PayrollField::Extra.is_derived());
    assert!(!PayrollField::Dias.is_derived());
    assert!(sheet.set_amount(&row_id, PayrollField::Extra, 999.0).expect("override"));
    assert_eq!(sheet.row(&row_id).expect("row").extra, 999.0);
    sheet.persist(&store).expect("persist");

    let refreshed = PayrollLogic::refresh_run(&store, &sheet.id, &[]).expect("refresh");
    let row = refreshed.row(&row_id).expect("row");
    assert_eq!(row.extra, 50.0);
    assert_eq!(row.total, 150.0);
}
