//! Core entities (`spec.md` §3): `User`, `Alias`, `DomainConfig`,
//! `ProvisionerConfig`. These are plain value types — persistence shape
//! lives in `infra::storage::entity`, wire shape in `api::rest::dto`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// An operator-provisioned account. `id` is an opaque monotonic identifier;
/// never self-registered through the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A user-owned DNS record. The pair `(host, apex)` is globally unique;
/// `value` is stored opaquely once validated as an IP literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub id: i64,
    pub host: String,
    pub apex: String,
    pub value: String,
    pub owner_user_id: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Alias {
    /// The fully-qualified name exposed to users: `host.apex`.
    #[must_use]
    pub fn domain(&self) -> String {
        format!("{}.{}", self.host, self.apex)
    }
}

/// The user-facing projection of an `Alias`: `{domain, value}` (`spec.md`
/// §4.7 wire shape, also the `GetAliases` return shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasView {
    pub domain: String,
    pub value: String,
}

impl From<&Alias> for AliasView {
    fn from(alias: &Alias) -> Self {
        Self {
            domain: alias.domain(),
            value: alias.value.clone(),
        }
    }
}

/// An operator-configured binding of an apex (and optional sub-label
/// prefix) that users may create aliases under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    pub host: Option<String>,
    pub apex: String,
}

impl DomainConfig {
    /// The fully-qualified suffix this config claims: `apex` if `host` is
    /// empty, else `host + "." + apex`.
    #[must_use]
    pub fn string(&self) -> String {
        match &self.host {
            Some(host) if !host.is_empty() => format!("{host}.{}", self.apex),
            _ => self.apex.clone(),
        }
    }
}

/// An operator binding of a named provisioner implementation to the
/// domains it is authoritative for.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    pub name: String,
    pub options: HashMap<String, String>,
    pub domains: Vec<DomainConfig>,
}
