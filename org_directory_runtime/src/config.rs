//! Runtime configuration with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`ORG_DIRECTORY_*`)
//! 2. TOML config file
//! 3. Compiled defaults

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use org_directory::{DirectoryOptions, Operator};

/// Environment variable naming the config file used by the console.
pub const CONFIG_PATH_VAR: &str = "ORG_DIRECTORY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value {value:?} for {var}")]
    InvalidOverride { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DirectoryConfig {
    pub operator: OperatorConfig,
    pub statistics: StatisticsConfig,
    pub seed: SeedConfig,
    pub logging: LoggingConfig,
}

/// Identity recorded on commands issued by this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    pub id: String,
    pub name: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        let system = Operator::system();
        Self {
            id: system.id,
            name: system.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Hours counted by the recent-operations statistic. Default: 24.
    pub recent_window_hours: u32,
    /// Entries shown in the recent-operations list. Default: 10.
    pub recent_log_limit: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            recent_window_hours: 24,
            recent_log_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON seed file. The built-in fixture is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset. Default: "info".
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl DirectoryConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load defaults, then `path` if given, then process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `ORG_DIRECTORY_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ORG_DIRECTORY_OPERATOR_ID") {
            self.operator.id = v;
        }
        if let Some(v) = lookup("ORG_DIRECTORY_OPERATOR_NAME") {
            self.operator.name = v;
        }
        if let Some(v) = lookup("ORG_DIRECTORY_RECENT_WINDOW_HOURS") {
            self.statistics.recent_window_hours = parse_override("ORG_DIRECTORY_RECENT_WINDOW_HOURS", v)?;
        }
        if let Some(v) = lookup("ORG_DIRECTORY_RECENT_LOG_LIMIT") {
            self.statistics.recent_log_limit = parse_override("ORG_DIRECTORY_RECENT_LOG_LIMIT", v)?;
        }
        if let Some(v) = lookup("ORG_DIRECTORY_SEED_PATH") {
            self.seed.path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("ORG_DIRECTORY_LOG_FILTER") {
            self.logging.filter = v;
        }
        if let Some(v) = lookup("ORG_DIRECTORY_LOG_JSON") {
            self.logging.json = parse_override("ORG_DIRECTORY_LOG_JSON", v)?;
        }
        Ok(())
    }

    pub fn operator(&self) -> Operator {
        Operator::new(self.operator.id.clone(), self.operator.name.clone())
    }

    pub fn directory_options(&self) -> DirectoryOptions {
        DirectoryOptions {
            recent_window: Duration::hours(i64::from(self.statistics.recent_window_hours)),
        }
    }
}

fn parse_override<T: std::str::FromStr>(var: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
        var: var.to_string(),
        value,
    })
}
