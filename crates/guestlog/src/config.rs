//! Configuration management for guestlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::autoclose::{AutoClosePolicy, DEFAULT_AUTO_CLOSE_HOURS, MAX_AUTO_CLOSE_HOURS};
use crate::error::{Error, Result};
use crate::store::DEFAULT_RECORDS_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "guestlog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "guestlog.db";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "GUESTLOG_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables prefixed with `GUESTLOG_`, sections separated by
///    a double underscore (`GUESTLOG_LEDGER__AUTO_CLOSE_HOURS=4`)
/// 2. TOML config file at `~/.config/guestlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Ledger configuration.
    pub ledger: LedgerConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/guestlog/guestlog.db`
    pub database_path: Option<PathBuf>,
    /// Key the guest log is stored under.
    pub records_key: String,
}

/// Ledger behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Hours after sign-in before an open visit is closed automatically.
    pub auto_close_hours: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            records_key: DEFAULT_RECORDS_KEY.to_string(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            auto_close_hours: DEFAULT_AUTO_CLOSE_HOURS,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.ledger.auto_close_hours == 0 {
            return Err(Error::ConfigValidation {
                message: "auto_close_hours must be greater than 0".to_string(),
            });
        }

        if self.ledger.auto_close_hours > MAX_AUTO_CLOSE_HOURS {
            return Err(Error::ConfigValidation {
                message: format!("auto_close_hours must be at most {MAX_AUTO_CLOSE_HOURS}"),
            });
        }

        if self.storage.records_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "records_key must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The auto-close policy described by this configuration.
    #[must_use]
    pub fn auto_close_policy(&self) -> AutoClosePolicy {
        AutoClosePolicy::from_hours(self.ledger.auto_close_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.records_key, "guestLog");
        assert_eq!(config.ledger.auto_close_hours, 8);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_auto_close() {
        let mut config = Config::default();
        config.ledger.auto_close_hours = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("auto_close_hours"));
    }

    #[test]
    fn test_validate_auto_close_upper_limit() {
        let mut config = Config::default();
        config.ledger.auto_close_hours = MAX_AUTO_CLOSE_HOURS;
        assert!(config.validate().is_ok());

        config.ledger.auto_close_hours = u32::MAX;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("at most"));
    }

    #[test]
    fn test_validate_blank_records_key() {
        let mut config = Config::default();
        config.storage.records_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("records_key"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("guestlog.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/kiosk/data/log.db"));

        assert_eq!(config.database_path(), PathBuf::from("/kiosk/data/log.db"));
    }

    #[test]
    fn test_auto_close_policy_from_config() {
        let mut config = Config::default();
        config.ledger.auto_close_hours = 4;

        assert_eq!(
            config.auto_close_policy().max_open(),
            chrono::Duration::hours(4)
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("guestlog"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("guestlog-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "[storage]\nrecords_key = \"lobby\"\n\n[ledger]\nauto_close_hours = 12\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.storage.records_key, "lobby");
        assert_eq!(config.ledger.auto_close_hours, 12);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = std::env::temp_dir().join(format!("guestlog-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[ledger]\nauto_close_hours = 0\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"records_key": "frontDesk"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.records_key, "frontDesk");
        assert!(storage.database_path.is_none());
    }
}
