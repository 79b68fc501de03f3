//! Service configuration.
//!
//! # Responsibility
//! - Load settings from an optional TOML file.
//! - Apply `SIMPLE_*` environment overrides on top.
//!
//! # Invariants
//! - A loaded config always has a non-blank topic and a supported log level.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use crate::notify::SIMPLE_MODEL_TOPIC;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "SIMPLE_DB_PATH";
pub const ENV_TOPIC: &str = "SIMPLE_TOPIC";
pub const ENV_LOG_LEVEL: &str = "SIMPLE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SIMPLE_LOG_DIR";

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "simple.db";
/// `db_path` value selecting a throwaway in-memory database.
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Runtime settings for the service process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// SQLite file, relative to the working directory unless absolute.
    /// `:memory:` selects an in-memory database.
    pub db_path: PathBuf,
    /// Notification topic.
    pub topic: String,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            topic: SIMPLE_MODEL_TOPIC.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Loads `path` (if any), then applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Like [`ServiceConfig::load`] with an explicit variable lookup.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Whether `db_path` selects an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_DB_PATH
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_blank(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value);
        }
        if let Some(value) = non_blank(ENV_TOPIC) {
            self.topic = value;
        }
        if let Some(value) = non_blank(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = non_blank(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path must not be empty".to_string()));
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::Invalid("topic must not be blank".to_string()));
        }
        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::Invalid)?
            .to_string();
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
