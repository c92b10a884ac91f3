//! Configuration with YAML support.
//!
//! # Responsibility
//! - Load database, logging, source and sync settings.
//! - Fall back to defaults when no config file exists.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "daylog.yaml";
const USER_CONFIG_PATH: &str = "~/.config/daylog/daylog.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaylogConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,

    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// Absolute directory for rolling log files; logging stays off when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Advisory cadence for the external refresh timer.
    #[serde(default = "default_min_interval_minutes")]
    pub min_interval_minutes: u32,
}

fn default_database_path() -> String {
    "~/.local/share/daylog/daylog.db".to_string()
}

fn default_level() -> String {
    default_log_level().to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_min_interval_minutes() -> u32 {
    15
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            min_interval_minutes: default_min_interval_minutes(),
        }
    }
}

impl DaylogConfig {
    /// Loads configuration, searching in order:
    /// 1. the provided path
    /// 2. `./daylog.yaml`
    /// 3. `~/.config/daylog/daylog.yaml`
    ///
    /// Returns defaults when none of them exists.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let search_paths = [
            shellexpand::tilde(path).to_string(),
            CONFIG_FILE_NAME.to_string(),
            shellexpand::tilde(USER_CONFIG_PATH).to_string(),
        ];

        for search_path in &search_paths {
            let candidate = Path::new(search_path);
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }

        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database.path).to_string())
    }

    /// Log directory with `~` expanded, if configured.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .dir
            .as_ref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).to_string()))
    }

    /// Sources are enabled unless configured otherwise.
    pub fn is_source_enabled(&self, source_id: &str) -> bool {
        self.sources.get(source_id).map_or(true, |s| s.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_everything() {
        let config = DaylogConfig::default();
        assert!(config.is_source_enabled("apple_health"));
        assert_eq!(config.sync.min_interval_minutes, 15);
        assert!(config.log_dir().is_none());
    }

    #[test]
    fn yaml_parsing_fills_missing_sections_with_defaults() {
        let yaml = r#"
database:
  path: /tmp/daylog-test.db

sources:
  discord:
    enabled: false
  apple_health: {}
"#;
        let config: DaylogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/daylog-test.db"));
        assert!(!config.is_source_enabled("discord"));
        assert!(config.is_source_enabled("apple_health"));
        assert_eq!(config.logging.level, default_log_level());
        assert_eq!(config.sync, SyncConfig::default());
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "sync:\n  min_interval_minutes: 30\n").unwrap();

        let config = DaylogConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.sync.min_interval_minutes, 30);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "sync: [unclosed").unwrap();

        let err = DaylogConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
