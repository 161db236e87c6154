#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rserviceops::core::history::HistoryOptions;
use rserviceops::core::tracker::TrackedStore;
use rserviceops::store::CollectionStore;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rsops() -> Command {
    cargo_bin_cmd!("rserviceops")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// leftovers of a previous run (WAL files included)
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rserviceops.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    for suffix in ["", "-wal", "-shm"] {
        fs::remove_file(format!("{}{}", db_path, suffix)).ok();
    }
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the schema through the CLI
pub fn init_db(db_path: &str) {
    rsops()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Fresh store without history tracking
pub fn open_store(name: &str) -> CollectionStore {
    let db_path = setup_test_db(name);
    CollectionStore::open(&db_path).expect("open store")
}

/// Fresh store with the history tracker attached
pub fn open_tracked(name: &str, user: Option<&str>) -> TrackedStore {
    let db_path = setup_test_db(name);
    TrackedStore::open_with(
        &db_path,
        Some(HistoryOptions {
            user: user.map(str::to_string),
            full_created_summary: false,
        }),
    )
    .expect("open tracked store")
}
