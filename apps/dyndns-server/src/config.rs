//! Layered configuration (`SPEC_FULL.md` §6): defaults, then a YAML file,
//! then `APP__*` environment overrides, via `figment` — the teacher's
//! `AppConfig` loading pattern, narrowed to this daemon's own keys instead
//! of the source's flat TOML-only loader.

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub signing_key: String,
    /// Humantime string (`"24h"`); `"0s"` or `"0"` disables expiry.
    #[serde(default = "default_token_ttl", with = "humantime_serde")]
    pub token_ttl: std::time::Duration,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8888".to_string()
}

fn default_token_ttl() -> std::time::Duration {
    std::time::Duration::from_secs(24 * 3600)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    pub dsn: String,
}

fn default_driver() -> String {
    "sqlite".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfigEntry {
    pub host: Option<String>,
    pub apex: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionerEntry {
    pub name: String,
    #[serde(default)]
    pub config: HashMap<String, String>,
    pub domains: Vec<DomainConfigEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DaemonConfig {
    #[serde(default)]
    pub dns_provisioners: Vec<ProvisionerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Layered load: built-in defaults, then `config_path` (if given), then
    /// `APP__*` environment variables split on `__` (e.g.
    /// `APP__API__LISTEN_ADDR`), matching `SPEC_FULL.md` §6.
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` if the file is malformed or required keys
    /// (`api.signing_key`, `database.dsn`) are missing after merging.
    pub fn load(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(DefaultsOnly::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }

        figment = figment.merge(Env::prefixed("APP__").split("__"));
        figment.extract()
    }
}

/// The subset of config with sane built-in defaults, used as the bottom
/// layer of the figment stack so a minimal YAML file only needs to supply
/// `api.signing_key` and `database.dsn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefaultsOnly {
    api: DefaultsApi,
    database: DefaultsDatabase,
    daemon: DaemonConfig,
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefaultsApi {
    listen_addr: String,
    token_ttl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefaultsDatabase {
    driver: String,
}

impl Default for DefaultsOnly {
    fn default() -> Self {
        Self {
            api: DefaultsApi {
                listen_addr: default_listen_addr(),
                token_ttl: "24h".to_string(),
            },
            database: DefaultsDatabase {
                driver: default_driver(),
            },
            daemon: DaemonConfig {
                dns_provisioners: Vec::new(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
        }
    }
}
