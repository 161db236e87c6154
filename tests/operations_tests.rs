mod common;
use chrono::NaiveDate;
use common::open_store;
use rserviceops::core::cash::{CashLogic, cash_balance};
use rserviceops::core::employees::EmployeesLogic;
use rserviceops::core::expenses::{ExpenseGrouping, ExpensesLogic, NO_METHOD};
use rserviceops::core::jobs::{JobListOptions, JobsLogic};
use rserviceops::core::paginate;
use rserviceops::core::reports::{NO_BANK, UNASSIGNED, services_by_worker, transfers};
use rserviceops::core::rollover::{ROLLOVER_ORIGIN, RolloverLogic, archived_jobs};
use rserviceops::errors::AppError;
use rserviceops::models::expense::Expense;
use rserviceops::models::job::JobField;
use rserviceops::store::{Collection, CollectionStore, fields};
use serde_json::json;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Two jobs today (one cash, one transfer), one tomorrow, one the day after.
fn seed_sheets(store: &CollectionStore, worker: &str) {
    store
        .replace(
            Collection::Today,
            "j1",
            fields([
                ("realizadopor", json!(worker)),
                ("direccion", json!("Palm St 5")),
                ("servicio", json!("Poso")),
                ("cubicos", json!(5)),
                ("valor", json!(100)),
                ("formadepago", json!("efectivo")),
                ("efectivo", json!(100)),
            ]),
        )
        .expect("j1");
    store
        .replace(
            Collection::Today,
            "j2",
            fields([
                ("realizadopor", json!("")),
                ("direccion", json!("Elm 1")),
                ("valor", json!(300)),
                ("formadepago", json!("transferencia")),
                ("banco", json!("BHD")),
            ]),
        )
        .expect("j2");
    store
        .replace(
            Collection::Tomorrow,
            "j3",
            fields([("direccion", json!("Oak 3")), ("fecha", json!("16-03-2025"))]),
        )
        .expect("j3");
    store
        .replace(
            Collection::DayAfter,
            "j4",
            fields([("direccion", json!("Pine 8"))]),
        )
        .expect("j4");
}

#[test]
fn test_rollover_archives_and_shifts_sheets() {
    let store = open_store("ops_rollover");
    let e1 = EmployeesLogic::add(&store, "Ana", None).expect("employee").id;
    seed_sheets(&store, &e1);

    let summary = RolloverLogic::apply(&store, day(2025, 3, 15)).expect("rollover");
    assert_eq!(summary.archived, 2);
    assert_eq!(summary.cash_entries, 1);
    assert_eq!(summary.moved_from_tomorrow, 1);
    assert_eq!(summary.moved_from_day_after, 1);

    let ids = |c: Collection| -> Vec<String> {
        store
            .snapshot(c)
            .expect("snapshot")
            .into_iter()
            .map(|r| r.id)
            .collect()
    };
    assert_eq!(ids(Collection::Today), vec!["j3".to_string()]);
    assert_eq!(ids(Collection::Tomorrow), vec!["j4".to_string()]);
    assert!(ids(Collection::DayAfter).is_empty());

    let archive = archived_jobs(&store).expect("archive");
    assert_eq!(archive.len(), 2);
    assert!(archive.iter().all(|a| a.fecha == "15-03-2025"));

    let ledger = CashLogic::ledger(&store, "Ana").expect("ledger");
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].entry.efectivo, 100.0);
    assert_eq!(ledger[0].entry.fecha.as_deref(), Some("15-03-2025"));
    assert_eq!(ledger[0].entry.origen.as_deref(), Some(ROLLOVER_ORIGIN));
}

#[test]
fn test_rollover_twice_on_same_day_merges_archive() {
    let store = open_store("ops_rollover_twice");
    store
        .replace(Collection::Today, "a", fields([("direccion", json!("A"))]))
        .expect("a");
    RolloverLogic::apply(&store, day(2025, 3, 15)).expect("first");

    store
        .replace(Collection::Today, "b", fields([("direccion", json!("B"))]))
        .expect("b");
    RolloverLogic::apply(&store, day(2025, 3, 15)).expect("second");

    let days = store.snapshot(Collection::ArchivedDays).expect("days");
    assert_eq!(days.len(), 1);
    assert_eq!(archived_jobs(&store).expect("archive").len(), 2);
}

#[test]
fn test_transfers_grouped_by_bank() {
    let store = open_store("ops_transfers");
    let e1 = EmployeesLogic::add(&store, "Ana", None).expect("employee").id;
    seed_sheets(&store, &e1);
    RolloverLogic::apply(&store, day(2025, 3, 15)).expect("rollover");

    store
        .write(
            Collection::Today,
            "j3",
            fields([("formadepago", json!("zelle")), ("valor", json!(50))]),
        )
        .expect("j3 paid by transfer");

    let all = transfers(&store, None, None).expect("transfers");
    let banks: Vec<&str> = all.iter().map(|g| g.banco.as_str()).collect();
    assert_eq!(banks, vec!["BHD", NO_BANK]);
    assert_eq!(all[0].total, 300.0);
    assert_eq!(all[1].total, 50.0);

    let march_15 = transfers(&store, Some((day(2025, 3, 15), day(2025, 3, 15))), None)
        .expect("one day");
    assert_eq!(march_15.len(), 1);

    let bhd = transfers(&store, None, Some("bhd")).expect("one bank");
    assert_eq!(bhd.len(), 1);
    assert_eq!(bhd[0].jobs[0].id, "j2");
}

#[test]
fn test_services_per_worker() {
    let store = open_store("ops_services");
    let e1 = EmployeesLogic::add(&store, "Ana", None).expect("employee").id;
    seed_sheets(&store, &e1);
    RolloverLogic::apply(&store, day(2025, 3, 15)).expect("rollover");

    let summary =
        services_by_worker(&store, Some((day(2025, 3, 15), day(2025, 3, 15)))).expect("services");
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].name, "Ana");
    assert_eq!(summary[0].services, 1);
    assert_eq!(summary[0].cubicos, 5.0);
    assert_eq!(summary[0].valor, 100.0);
    assert_eq!(summary[1].name, UNASSIGNED);
    assert_eq!(summary[1].valor, 300.0);
}

#[test]
fn test_cash_ledger_running_balance() {
    let store = open_store("ops_cash_ledger");
    let e1 = EmployeesLogic::add(&store, "Ana", None).expect("employee").id;

    CashLogic::add(&store, "Ana", -40.0, Some("03-01-2025"), None, None, None).expect("handed in");
    CashLogic::add(&store, "Ana", 100.0, Some("01-01-2025"), None, Some("Palm St 5"), None)
        .expect("collected");
    CashLogic::add(&store, "Ana", 70.0, Some("02-01-2025"), Some("tarjeta"), None, None)
        .expect("card");

    let ledger = CashLogic::ledger(&store, &e1).expect("ledger");
    let balances: Vec<f64> = ledger.iter().map(|l| l.balance).collect();
    assert_eq!(balances, vec![100.0, 100.0, 60.0]);

    let entries = CashLogic::load(&store).expect("entries");
    assert_eq!(cash_balance(&entries, &e1), 60.0);

    CashLogic::delete(&store, &ledger[2].id).expect("delete");
    let entries = CashLogic::load(&store).expect("entries");
    assert_eq!(cash_balance(&entries, &e1), 100.0);
}

#[test]
fn test_expenses_grouping_and_totals() {
    let store = open_store("ops_expenses");
    let add = |monto: f64, fecha: &str, metodo: Option<&str>| {
        ExpensesLogic::add(
            &store,
            Expense {
                monto,
                fecha: Some(fecha.to_string()),
                metodo_pago: metodo.map(str::to_string),
                categoria: Some("combustible".into()),
                ..Default::default()
            },
        )
        .expect("expense")
    };
    add(20.0, "01-03-2025", Some("transferencia"));
    add(10.0, "2025-03-01", Some("cash"));
    add(5.0, "02-03-2025", None);
    add(99.0, "01-04-2025", Some("efectivo"));

    let march = ExpensesLogic::list(&store, Some((day(2025, 3, 1), day(2025, 3, 31))))
        .expect("march");
    assert_eq!(march.len(), 3);
    assert_eq!(ExpensesLogic::grand_total(&march), 35.0);

    let by_date = ExpensesLogic::group(&march, ExpenseGrouping::Date);
    let keys: Vec<(&str, f64)> = by_date.iter().map(|g| (g.key.as_str(), g.total)).collect();
    assert_eq!(keys, vec![("01-03-2025", 30.0), ("02-03-2025", 5.0)]);

    let by_method = ExpensesLogic::group(&march, ExpenseGrouping::Method);
    let keys: Vec<&str> = by_method.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["efectivo", NO_METHOD, "transferencia"]);
}

#[test]
fn test_expense_without_amount_is_rejected() {
    let store = open_store("ops_expense_required");
    let err = ExpensesLogic::add(&store, Expense::default()).expect_err("no amount");
    assert!(matches!(err, AppError::Required(_)));
}

#[test]
fn test_jobs_listing_order_and_worker_filter() {
    let store = open_store("ops_jobs_list");
    EmployeesLogic::add(&store, "Ana", None).expect("employee");

    for (addr, worker) in [("Zeta 1", "Ana"), ("alpha 2", ""), ("Beta 3", "ana")] {
        let mut input = vec![(JobField::Direccion, addr.to_string())];
        if !worker.is_empty() {
            input.push((JobField::Realizadopor, worker.to_string()));
        }
        JobsLogic::add_express(&store, Collection::Tomorrow, &input).expect("job");
    }

    let opts = JobListOptions {
        page: 1,
        ..Default::default()
    };
    let page = JobsLogic::list(&store, Collection::Tomorrow, &opts).expect("list");
    let addrs: Vec<&str> = page
        .items
        .iter()
        .map(|(_, j)| j.direccion.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(addrs, vec!["Beta 3", "Zeta 1", "alpha 2"]);

    let unassigned_first = JobListOptions {
        unassigned_first: true,
        page: 1,
        ..Default::default()
    };
    let page = JobsLogic::list(&store, Collection::Tomorrow, &unassigned_first).expect("list");
    assert_eq!(page.items[0].1.direccion.as_deref(), Some("alpha 2"));

    let only_ana = JobListOptions {
        worker: Some("ANA".into()),
        page: 1,
        ..Default::default()
    };
    let page = JobsLogic::list(&store, Collection::Tomorrow, &only_ana).expect("list");
    assert_eq!(page.total, 2);
}

#[test]
fn test_jobs_need_a_day_sheet() {
    let store = open_store("ops_jobs_sheet");
    let err = JobsLogic::add_empty(&store, Collection::Clients).expect_err("not a sheet");
    assert!(matches!(err, AppError::UnknownCollection(_)));

    let err = JobsLogic::delete(&store, Collection::Today, "missing").expect_err("missing");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_assign_and_unassign() {
    let store = open_store("ops_assign");
    let e1 = EmployeesLogic::add(&store, "Ana", Some("chofer")).expect("employee").id;
    let job = JobsLogic::add_empty(&store, Collection::Today).expect("job");

    let rec = JobsLogic::assign(&store, Collection::Today, &job.id, Some("ana")).expect("assign");
    assert_eq!(rec.text("realizadopor"), Some(e1.as_str()));

    let rec = JobsLogic::assign(&store, Collection::Today, &job.id, None).expect("unassign");
    assert_eq!(rec.text("realizadopor"), None);
}

#[test]
fn test_employee_names_are_unique() {
    let store = open_store("ops_employee_unique");
    EmployeesLogic::add(&store, "Ana", None).expect("first");
    let err = EmployeesLogic::add(&store, " ana ", None).expect_err("duplicate");
    assert!(matches!(err, AppError::AlreadyExists(_)));

    let names = EmployeesLogic::names(&store).expect("names");
    let id = EmployeesLogic::resolve(&store, "ANA").expect("resolve").id;
    assert_eq!(EmployeesLogic::display(&names, Some(&id)), "Ana");
    assert_eq!(EmployeesLogic::display(&names, Some("gone")), "gone");
}

#[test]
fn test_paginate_clamps_page() {
    let page = paginate((1..=7).collect::<Vec<i32>>(), 9, 3);
    assert_eq!(page.page, 3);
    assert_eq!(page.pages, 3);
    assert_eq!(page.items, vec![7]);

    let all = paginate(vec![1, 2], 2, 0);
    assert_eq!(all.items, vec![1, 2]);
    assert_eq!(all.pages, 1);
}
