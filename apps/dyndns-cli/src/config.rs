//! Client-side configuration (`spec.md` §6): `api_addr`, the stored bearer
//! `token`, the `aliases` synchronize-flag map, and the `ip_echo_urls`
//! fallback list (`SPEC_FULL.md` §4.9). Unlike the daemon's config, this
//! side is read-write: `login`, `register`, `rm`, and `set-synchronize` all
//! persist changes back to the same file.

use anyhow::{Context, Result};
use figment::providers::{Format, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AliasFlags {
    #[serde(default)]
    pub synchronize: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_addr: String,
    pub token: Option<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, AliasFlags>,
    #[serde(default)]
    pub ip_echo_urls: Vec<String>,
}

impl ClientConfig {
    /// Load from `path`, or fall back to an empty config if the file does
    /// not exist yet (a fresh install has no `login` history).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Figment::new()
            .merge(Yaml::file(path))
            .extract()
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Persist the full config back to `path` as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("failed to serialize client config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Default config path, relative to the current directory (`spec.md` §6
/// names no fixed location; the daemon's own `--config` flag sets the
/// precedent of an explicit, operator-chosen path).
#[must_use]
pub fn default_path() -> PathBuf {
    PathBuf::from("dyndns-client.yaml")
}
