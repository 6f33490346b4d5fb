//! Configuration management
//!
//! Settings live in `settings.json` in the state directory:
//! ```json
//! {
//!   "migrationsDir": "db/migrations",
//!   "connection": { "driver": "postgres", "host": "localhost", "port": "5432", ... }
//! }
//! ```
//! The password is never written to disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::{DatabaseConfig, Driver, DEFAULT_MIGRATIONS_DIR};

const SETTINGS_FILE: &str = "settings.json";

/// Env var overriding the migrations directory
pub const MIGRATIONS_DIR_ENV: &str = "MIGRAGO_MIGRATIONS_DIR";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    migrations_dir: Option<String>,
    #[serde(default)]
    connection: ConnectionDefaults,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Remembered answers for the connection prompts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// migrago configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub migrations_dir: PathBuf,
    pub connection: ConnectionDefaults,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from(DEFAULT_MIGRATIONS_DIR),
            connection: ConnectionDefaults::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the state directory
    ///
    /// The migrations directory comes from, in order: `MIGRAGO_MIGRATIONS_DIR`,
    /// the settings file, then `migrations`. A missing or unreadable
    /// settings file yields defaults.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let settings_path = state_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let migrations_dir = std::env::var(MIGRATIONS_DIR_ENV)
            .ok()
            .filter(|dir| !dir.is_empty())
            .or_else(|| raw.migrations_dir.clone())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MIGRATIONS_DIR));

        Ok(Self {
            migrations_dir,
            connection: raw.connection.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the state directory
    ///
    /// Only the connection defaults are written; fields this version doesn't
    /// know about are preserved.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(state_dir)?;
        let settings_path = state_dir.join(SETTINGS_FILE);

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.connection = self.connection.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Remember a connection's answers as defaults for next time
    pub fn remember_connection(&mut self, config: &DatabaseConfig) {
        self.connection = ConnectionDefaults {
            driver: Some(config.driver),
            host: Some(config.host.clone()),
            port: Some(config.port.clone()),
            database: Some(config.database.clone()),
            username: Some(config.username.clone()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_connection() -> DatabaseConfig {
        DatabaseConfig {
            driver: Driver::Mysql,
            host: "db.internal".to_string(),
            port: "3307".to_string(),
            database: "shop".to_string(),
            username: "deploy".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_load_defaults_without_settings() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.connection, ConnectionDefaults::default());
        if std::env::var(MIGRATIONS_DIR_ENV).is_err() {
            assert_eq!(config.migrations_dir, PathBuf::from("migrations"));
        }
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.connection, ConnectionDefaults::default());
    }

    #[test]
    fn test_remember_and_reload_connection() {
        let dir = tempdir().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.remember_connection(&sample_connection());
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.connection.driver, Some(Driver::Mysql));
        assert_eq!(reloaded.connection.host.as_deref(), Some("db.internal"));
        assert_eq!(reloaded.connection.port.as_deref(), Some("3307"));
        assert_eq!(reloaded.connection.username.as_deref(), Some("deploy"));
    }

    #[test]
    fn test_password_is_never_saved() {
        let dir = tempdir().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.remember_connection(&sample_connection());
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(!content.contains("hunter2"));
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"migrationsDir": "db/migrations", "theme": "dark"}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.remember_connection(&sample_connection());
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["migrationsDir"], "db/migrations");
        assert_eq!(value["connection"]["driver"], "mysql");
    }
}
