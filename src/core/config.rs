use crate::config::migrate::{check_config, migrate_config};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::fs;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &str) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        println!("{}", content);
        Ok(())
    }

    pub fn edit(path: &str, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| "nano".into());

        Command::new(ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(())
    }

    /// Report missing keys; with `fix`, write them back with defaults.
    /// Returns the keys that were missing.
    pub fn check(path: &str, fix: bool) -> AppResult<Vec<String>> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let missing = check_config(&content)?;

        if missing.is_empty() {
            success("Configuration is up to date.");
            return Ok(missing);
        }

        warning(format!("Missing configuration keys: {}", missing.join(", ")));
        if fix && let Some(updated) = migrate_config(&content)? {
            fs::write(path, updated)?;
            success(format!("Added defaults to {}.", path));
        }
        Ok(missing)
    }
}
