//! Configuration loading for the `foodmap` binary.
//!
//! The configuration lives in `foodmap-config.yaml` in the working
//! directory. Every section is optional; a missing file means defaults
//! throughout. A handful of environment variables override the file so
//! the binary can be pointed at a different port or data directory
//! without editing YAML.

use std::path::{Path, PathBuf};

use foodmap_geo::GeoConfig;
use foodmap_server::ServerConfig;
use foodmap_store::DEFAULT_KEY;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid value for {name}: {message}")]
    Env {
        /// The variable name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `foodmap-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// API server address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Where the experience log is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Initial catalog and live search switch.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Geocoder and POI service endpoints.
    #[serde(default)]
    pub geo: GeoConfig,

    /// Log level and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FOODMAP_HOST` overrides `server.host`
    /// - `FOODMAP_PORT` overrides `server.port`
    /// - `FOODMAP_DATA_DIR` overrides `storage.data_dir`
    /// - `NOMINATIM_URL` overrides `geo.nominatim_url`
    /// - `OVERPASS_URL` overrides `geo.overpass_url`
    /// - `FOODMAP_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the YAML is malformed, or
    /// [`ConfigError::Env`] if an override does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up through `lookup`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("FOODMAP_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("FOODMAP_PORT") {
            self.server.port = val.trim().parse().map_err(|e| ConfigError::Env {
                name: "FOODMAP_PORT",
                message: format!("{val:?} is not a port number: {e}"),
            })?;
        }
        if let Some(val) = lookup("FOODMAP_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("NOMINATIM_URL") {
            self.geo.nominatim_url = val;
        }
        if let Some(val) = lookup("OVERPASS_URL") {
            self.geo.overpass_url = val;
        }
        if let Some(val) = lookup("FOODMAP_LOG_LEVEL") {
            self.logging.level = val;
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the store file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage key; the file is `<data_dir>/<key>.json`.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_storage_key(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_storage_key() -> String {
    DEFAULT_KEY.to_owned()
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Allow `POST /api/catalog/reload` to search cities over the network.
    #[serde(default = "default_live_search")]
    pub live_search: bool,

    /// City to load at startup in place of the seed list.
    #[serde(default)]
    pub initial_city: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            live_search: default_live_search(),
            initial_city: None,
        }
    }
}

const fn default_live_search() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    String::from("info")
}
