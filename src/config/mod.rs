use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Attach the change-history tracker to every command.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Describe created records with all their fields, not just three.
    #[serde(default)]
    pub full_created_summary: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            full_created_summary: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database: String,
    /// Name written as `usuario` on audit entries when a record has none.
    #[serde(default)]
    pub user: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Rows per page in listings.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_true() -> bool {
    true
}
fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_page_size() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            user: String::new(),
            currency_symbol: default_currency_symbol(),
            page_size: default_page_size(),
            history: HistoryConfig::default(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rserviceops")
        } else {
            let home = dirs::home_dir()
                .map(|h| h.to_string_lossy().to_string())
                .or_else(|| env::var("HOME").ok())
                .unwrap_or_else(|| ".".to_string());
            PathBuf::from(home).join(".rserviceops")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rserviceops.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rserviceops.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// The configured acting user, if any.
    pub fn acting_user(&self) -> Option<String> {
        let u = self.user.trim();
        (!u.is_empty()).then(|| u.to_string())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = crate::utils::path::expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            dir.join("rserviceops.sqlite")
        };

        let config = Config::with_database(db_path.clone());

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            success(format!("Config file: {:?}", Self::config_file()));
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        success(format!("Database:    {:?}", db_path));

        Ok(config)
    }
}
