//! Layered settings: defaults, then an optional TOML file, then
//! `TASKBOARD__*` environment variables.

use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "taskboard";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://taskboard.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSettings {
    /// Row cap applied when `--limit` is not given.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "taskboard=info".to_string()
}

impl Settings {
    /// Loads settings from `path`, or `taskboard.toml` in the working
    /// directory when no path is given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("TASKBOARD").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("");

        assert_eq!(settings.database.url, "sqlite://taskboard.db");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.report.limit, None);
        assert_eq!(settings.log.filter, "taskboard=info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = from_toml(
            r#"
            [database]
            url = "sqlite://reports.db"

            [report]
            limit = 10
            "#,
        );

        assert_eq!(settings.database.url, "sqlite://reports.db");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.report.limit, Some(10));
        assert_eq!(settings.log.filter, "taskboard=info");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load(Some(Path::new("does/not/exist.toml")));
        assert!(result.is_err());
    }
}
