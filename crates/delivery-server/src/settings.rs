//! Service configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. YAML file at `config/delivery.yaml` (or the path in `DELIVERY_CONFIG`),
//!    skipped when absent
//! 3. environment variables prefixed `DELIVERY_`, with `__` between nested
//!    keys: `DELIVERY_SERVER__PORT=8080`, `DELIVERY_CACHE__BACKEND=memory`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use delivery_store::{MemoryCacheConfig, MongoConfig, RedisConfig};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "DELIVERY_CONFIG";

/// Configuration file used when `DELIVERY_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/delivery.yaml";

const ENV_PREFIX: &str = "DELIVERY";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub mongo: MongoConfig,
}

impl Settings {
    /// Loads the configuration from the file named by `DELIVERY_CONFIG` (or
    /// the default path) and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::from_sources(&path, environment())
    }

    /// Loads the configuration from an explicit file and environment source.
    pub fn from_sources(path: &Path, env: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.cache.ttl_seconds == 0 {
            return Err(SettingsError::Invalid(
                "cache.ttl_seconds must be greater than zero".to_string(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

/// The `DELIVERY_*` environment source.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_name")]
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_server_name() -> String {
    "delivery-service".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| SettingsError::Invalid(format!("server address: {}", e)))
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

/// Campaign cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Lifetime of a cached delivery result (default: 36000 = 10 horas)
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default)]
    pub backend: CacheBackend,
    /// Maximo numero de entries para el backend en memoria
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_ttl_seconds() -> u64 {
    36_000
}

fn default_max_capacity() -> u64 {
    10_000
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn memory_config(&self) -> MemoryCacheConfig {
        MemoryCacheConfig {
            max_capacity: self.max_capacity,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            backend: CacheBackend::default(),
            max_capacity: default_max_capacity(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    Memory,
}

/// Rule and campaign store settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    /// YAML seed loaded into the memory backend.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}
