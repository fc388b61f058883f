use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Which repository backend the composition root should construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Memory,
    Relational,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: BackendKind,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub backend: Option<BackendKind>,
    pub database_url: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig { backend: BackendKind::Memory },
            database: DatabaseConfig {
                url: "sqlite://vouchery.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "relational" => Ok(Self::Relational),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected memory|relational)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    database: Option<DatabasePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    backend: Option<BackendKind>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Merge order: defaults, then the config file, then environment
    /// variables, then programmatic overrides.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("vouchery.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(backend) = storage.backend {
                self.storage.backend = backend;
            }
        }

        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = env::var("VOUCHERY_STORAGE_BACKEND") {
            self.storage.backend =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "VOUCHERY_STORAGE_BACKEND".to_string(),
                    value,
                })?;
        }
        if let Ok(value) = env::var("VOUCHERY_DATABASE_URL") {
            self.database.url = value;
        }
        if let Ok(value) = env::var("VOUCHERY_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Ok(value) = env::var("VOUCHERY_LOG_FORMAT") {
            self.logging.format =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "VOUCHERY_LOG_FORMAT".to_string(),
                    value,
                })?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.backend {
            self.storage.backend = backend;
        }
        if let Some(url) = overrides.database_url {
            self.database.url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == BackendKind::Relational && self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database.url must be set for the relational backend".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => {
            let default = PathBuf::from("vouchery.toml");
            default.exists().then_some(default)
        }
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Installs a global `tracing` subscriber per the logging section. Meant
/// for the composition root; tests and library callers never need it.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::{AppConfig, BackendKind, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    #[test]
    fn defaults_select_the_memory_backend() {
        let config = AppConfig::default();

        assert_eq!(config.storage.backend, BackendKind::Memory);
        assert_eq!(config.database.url, "sqlite://vouchery.db");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(
            file,
            "[storage]\nbackend = \"relational\"\n\n[database]\nurl = \"sqlite::memory:\"\nmax_connections = 2\n"
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect("load config");

        assert_eq!(config.storage.backend, BackendKind::Relational);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 2);
        // Untouched sections keep their defaults.
        assert_eq!(config.database.timeout_secs, 30);
    }

    #[test]
    fn programmatic_overrides_win_over_the_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(file, "[storage]\nbackend = \"relational\"\n").expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides {
                backend: Some(BackendKind::Memory),
                ..ConfigOverrides::default()
            },
        })
        .expect("load config");

        assert_eq!(config.storage.backend, BackendKind::Memory);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/vouchery.toml");

        let err = AppConfig::load(LoadOptions {
            config_path: Some(missing.clone()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect_err("missing file");

        assert!(matches!(err, ConfigError::MissingConfigFile(path) if path == missing));
    }

    #[test]
    fn zero_max_connections_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(file, "[database]\nmax_connections = 0\n").expect("write config");

        let err = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect_err("invalid config");

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn backend_kind_parses_known_values() {
        assert_eq!("memory".parse::<BackendKind>().expect("memory"), BackendKind::Memory);
        assert_eq!(
            "Relational".parse::<BackendKind>().expect("relational"),
            BackendKind::Relational
        );
        assert!("postgres".parse::<BackendKind>().is_err());
    }
}
