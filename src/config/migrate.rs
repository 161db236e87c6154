use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

const VERSION: &str = "20250302_0004_config_history_keys";

/// Keys added to the config file after its first release, with the value a
/// missing key gets.
fn default_keys() -> Vec<(&'static str, Value)> {
    let mut history = Mapping::new();
    history.insert(Value::from("enabled"), Value::from(true));
    history.insert(Value::from("full_created_summary"), Value::from(false));

    vec![
        ("user", Value::from("")),
        ("currency_symbol", Value::from("$")),
        ("page_size", Value::from(50)),
        ("history", Value::Mapping(history)),
    ]
}

/// Keys of `content` that are missing compared to the current config layout.
pub fn check_config(content: &str) -> AppResult<Vec<String>> {
    let yaml: Value = serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
    let Some(map) = yaml.as_mapping() else {
        return Err(AppError::Config("config root is not a mapping".into()));
    };

    let mut missing = Vec::new();
    for (key, default) in default_keys() {
        match (map.get(key), &default) {
            (None, _) => missing.push(key.to_string()),
            (Some(Value::Mapping(have)), Value::Mapping(want)) => {
                for k in want.keys() {
                    if !have.contains_key(k) {
                        missing.push(format!("{}.{}", key, k.as_str().unwrap_or_default()));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(missing)
}

/// Fill the missing keys of `content`. Returns the new YAML text, or None
/// when nothing was missing.
pub fn migrate_config(content: &str) -> AppResult<Option<String>> {
    let mut yaml: Value =
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
    let Some(map) = yaml.as_mapping_mut() else {
        return Err(AppError::Config("config root is not a mapping".into()));
    };

    let mut changed = false;
    for (key, default) in default_keys() {
        let k = Value::from(key);
        match (map.get_mut(&k), default) {
            (None, default) => {
                map.insert(k, default);
                changed = true;
            }
            (Some(Value::Mapping(have)), Value::Mapping(want)) => {
                for (wk, wv) in want {
                    if !have.contains_key(&wk) {
                        have.insert(wk, wv);
                        changed = true;
                    }
                }
            }
            _ => {}
        }
    }

    if !changed {
        return Ok(None);
    }
    let text = serde_yaml::to_string(&yaml).map_err(|e| AppError::Config(e.to_string()))?;
    Ok(Some(text))
}

/// Upgrade the config file at `conf_file` once per database, recording the
/// migration in the log table.
pub fn run_config_migration(conn: &Connection, conf_file: &Path) -> AppResult<()> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log WHERE operation = 'migration_applied' AND target = ?1 LIMIT 1",
    )?;
    if chk.query_row([VERSION], |_| Ok(())).optional()?.is_some() {
        return Ok(());
    }

    if conf_file.exists() {
        let content = fs::read_to_string(conf_file)?;
        if let Some(updated) = migrate_config(&content)? {
            fs::write(conf_file, updated)?;
            success(format!(
                "Migration applied: {} - added missing keys to {:?}.",
                VERSION, conf_file
            ));
        }
    }

    ttlog(conn, "migration_applied", VERSION, "Config keys checked")?;
    Ok(())
}
