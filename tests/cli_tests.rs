use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db, rsops, setup_test_db, temp_out};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rsops()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());

    rsops()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"));
}

#[test]
fn test_users_add_and_list() {
    let db_path = setup_test_db("cli_users");
    init_db(&db_path);

    rsops()
        .args(["--db", &db_path, "user", "add", "Ana", "--role", "chofer"])
        .assert()
        .success();
    rsops()
        .args(["--db", &db_path, "user", "add", "ana"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
    rsops()
        .args(["--db", &db_path, "user", "deactivate", "Ana"])
        .assert()
        .success();

    rsops()
        .args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("No employees."));
    rsops()
        .args(["--db", &db_path, "user", "list", "--all"])
        .assert()
        .success()
        .stdout(contains("Ana").and(contains("chofer")));
}

#[test]
fn test_job_with_service_fills_directory() {
    let db_path = setup_test_db("cli_job_directory");
    init_db(&db_path);

    rsops()
        .args([
            "--db",
            &db_path,
            "job",
            "add",
            "--set",
            "direccion=Palm St 5",
            "--set",
            "servicio=Poso",
            "--set",
            "formadepago=cash",
        ])
        .assert()
        .success();

    rsops()
        .args(["--db", &db_path, "job", "list"])
        .assert()
        .success()
        .stdout(contains("Palm St 5").and(contains("efectivo")))
        .stdout(contains("(1 jobs)"));

    rsops()
        .args(["--db", &db_path, "client", "list"])
        .assert()
        .success()
        .stdout(contains("Palm St 5"));
}

#[test]
fn test_job_add_rejects_unknown_field() {
    let db_path = setup_test_db("cli_job_bad_field");
    init_db(&db_path);

    rsops()
        .args(["--db", &db_path, "job", "add", "--set", "color=red"])
        .assert()
        .failure()
        .stderr(contains("unknown job field"));
}

#[test]
fn test_invoice_numbers_follow_counter() {
    let db_path = setup_test_db("cli_invoice_counter");
    init_db(&db_path);

    rsops()
        .args(["--db", &db_path, "invoice", "create", "--nombre", "Juan", "--item", "Hidrojet"])
        .assert()
        .success()
        .stdout(contains("0001").and(contains("250.00")));

    rsops()
        .args(["--db", &db_path, "db", "--set-counter", "41"])
        .assert()
        .success();

    rsops()
        .args([
            "--db", &db_path, "invoice", "create", "--nombre", "Rosa", "--item", "Agua", "--qty",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("0042").and(contains("120.00")));

    rsops()
        .args(["--db", &db_path, "invoice", "list", "--status", "unpaid"])
        .assert()
        .success()
        .stdout(contains("Juan").and(contains("Rosa")));
}

#[test]
fn test_payroll_run_from_cli() {
    let db_path = setup_test_db("cli_payroll");
    init_db(&db_path);

    rsops()
        .args(["--db", &db_path, "user", "add", "Ana"])
        .assert()
        .success();
    for (valor, fecha) in [("50", "10-01-2024"), ("30", "20-01-2024")] {
        rsops()
            .args(["--db", &db_path, "extra", "add", "Ana", valor, "--fecha", fecha])
            .assert()
            .success();
    }

    rsops()
        .args([
            "--db",
            &db_path,
            "payroll",
            "create",
            "01-01-2024",
            "31-01-2024",
            "--all-employees",
            "--dias",
            "15",
            "--valor",
            "50",
        ])
        .assert()
        .success()
        .stdout(contains("Ana").and(contains("$80.00")).and(contains("$830.00")));

    rsops()
        .args(["--db", &db_path, "payroll", "create", "31-01-2024", "01-01-2024"])
        .assert()
        .failure()
        .stderr(contains("Invalid date range"));

    rsops()
        .args(["--db", &db_path, "payroll", "list"])
        .assert()
        .success()
        .stdout(contains("01-01-2024_31-01-2024"));
}

#[test]
fn test_history_records_acting_user() {
    let db_path = setup_test_db("cli_history");
    init_db(&db_path);

    rsops()
        .args([
            "--db",
            &db_path,
            "--user",
            "maria",
            "job",
            "add",
            "--set",
            "direccion=Elm 1",
        ])
        .assert()
        .success();

    rsops()
        .args(["--db", &db_path, "history", "list", "--action", "created"])
        .assert()
        .success()
        .stdout(contains("CREADO").and(contains("maria")));

    rsops()
        .args(["--db", &db_path, "--no-history", "job", "add"])
        .assert()
        .success();

    rsops()
        .args(["--db", &db_path, "history", "list", "--lugar", "data"])
        .assert()
        .success()
        .stdout(contains("desconocido").not());
}

#[test]
fn test_rollover_and_reports() {
    let db_path = setup_test_db("cli_rollover");
    init_db(&db_path);

    rsops()
        .args(["--db", &db_path, "user", "add", "Ana"])
        .assert()
        .success();
    rsops()
        .args([
            "--db",
            &db_path,
            "job",
            "add",
            "--set",
            "direccion=Palm St 5",
            "--set",
            "realizadopor=Ana",
            "--set",
            "valor=300",
            "--set",
            "formadepago=transferencia",
            "--set",
            "banco=BHD",
        ])
        .assert()
        .success();

    rsops()
        .args(["--db", &db_path, "day", "rollover", "--date", "15-03-2025", "--yes"])
        .assert()
        .success()
        .stdout(contains("1 jobs archived"));

    rsops()
        .args(["--db", &db_path, "report", "transfers", "--period", "2025-03"])
        .assert()
        .success()
        .stdout(contains("BHD").and(contains("$300.00")));

    rsops()
        .args(["--db", &db_path, "report", "services", "--period", "2025"])
        .assert()
        .success()
        .stdout(contains("Ana"));
}

#[test]
fn test_export_views_from_cli() {
    let db_path = setup_test_db("cli_export");
    init_db(&db_path);

    rsops()
        .args(["--db", &db_path, "client", "add", "Oak 3", "--nombre", "Luis", "--cubicos", "4"])
        .assert()
        .success();

    let out = temp_out("cli_export_clients", "csv");
    rsops()
        .args(["--db", &db_path, "export", "clients", "--file", &out])
        .assert()
        .success();
    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.contains("Oak 3,Luis,4"));

    let json = temp_out("cli_export_clients", "json");
    rsops()
        .args(["--db", &db_path, "export", "clients", "--format", "json", "--file", &json])
        .assert()
        .success();
    assert!(fs::read_to_string(&json).expect("read json").contains("\"Oak 3\""));

    // payroll needs a run
    rsops()
        .args(["--db", &db_path, "export", "payroll", "--file", &out, "--force"])
        .assert()
        .failure()
        .stderr(contains("--run"));
}

#[test]
fn test_unknown_record_fails() {
    let db_path = setup_test_db("cli_not_found");
    init_db(&db_path);

    rsops()
        .args(["--db", &db_path, "job", "set", "nope", "valor", "10"])
        .assert()
        .failure()
        .stderr(contains("Record not found"));
}
