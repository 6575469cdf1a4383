//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Archive retention and refresh settings.
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Retention and refresh-cooldown configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Age in days after which month shadow rows are purged.
    #[serde(default = "default_month_window_days")]
    pub month_window_days: i64,
    /// Minimum hours between two refreshes guarded by the same gate.
    #[serde(default = "default_refresh_cooldown_hours")]
    pub refresh_cooldown_hours: i64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            month_window_days: default_month_window_days(),
            refresh_cooldown_hours: default_refresh_cooldown_hours(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_month_window_days() -> i64 {
    30
}

const fn default_refresh_cooldown_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `FBARCHIVE_ENV`)
    /// 3. Environment variables with `FBARCHIVE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("FBARCHIVE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FBARCHIVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FBARCHIVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/fbarchive"
            "#,
        );

        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 2);
        assert_eq!(config.archive.month_window_days, 30);
        assert_eq!(config.archive.refresh_cooldown_hours, 24);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_overrides() {
        let config = parse(
            r#"
            [database]
            url = "postgres://db/archive"
            max_connections = 5

            [archive]
            month_window_days = 14

            [logging]
            level = "debug"
            json = true
            "#,
        );

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.archive.month_window_days, 14);
        assert_eq!(config.archive.refresh_cooldown_hours, 24);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_archive_config_from_json() {
        let archive: ArchiveConfig = serde_json::from_str(r#"{"refresh_cooldown_hours": 6}"#).unwrap();
        assert_eq!(archive.month_window_days, 30);
        assert_eq!(archive.refresh_cooldown_hours, 6);
    }
}
