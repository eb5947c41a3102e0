//! Provisioner Registry (C5): resolves a fully-qualified alias name to the
//! `(Provisioner, DomainConfig)` pair authoritative for it. `spec.md` §4.5.

use super::error::EngineError;
use super::models::DomainConfig;
use super::provisioner::Provisioner;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A configuration-time error: two provisioners claim the same domain
/// suffix. Caught at load, never at request time.
#[derive(Debug, Error)]
#[error("domain `{domain}` is claimed by both `{first}` and `{second}`")]
pub struct DomainConflict {
    pub domain: String,
    pub first: String,
    pub second: String,
}

struct Binding {
    provisioner: Arc<dyn Provisioner>,
    domain: DomainConfig,
}

/// Holds every configured provisioner instance, constructed once at process
/// start and immutable thereafter (`spec.md` §5 "constructed under a
/// registry-internal lock, then immutable" — here the lock is the builder;
/// the registry itself never mutates after construction).
pub struct ProvisionerRegistry {
    bindings: Vec<Binding>,
}

impl ProvisionerRegistry {
    /// Build a registry from `(provisioner, domains)` pairs, one per
    /// configured `ProvisionerConfig`. Rejects configurations where two
    /// provisioners claim the same domain suffix.
    ///
    /// # Errors
    ///
    /// Returns [`DomainConflict`] on the first duplicate suffix found.
    pub fn build(
        configs: Vec<(String, Arc<dyn Provisioner>, Vec<DomainConfig>)>,
    ) -> Result<Self, DomainConflict> {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut bindings = Vec::new();

        for (name, provisioner, domains) in configs {
            for domain in domains {
                let suffix = domain.string();
                if let Some(owner) = seen.get(&suffix) {
                    return Err(DomainConflict {
                        domain: suffix,
                        first: owner.clone(),
                        second: name,
                    });
                }
                seen.insert(suffix, name.clone());
                bindings.push(Binding {
                    provisioner: provisioner.clone(),
                    domain,
                });
            }
        }

        Ok(Self { bindings })
    }

    /// Resolve `fqdn` to its authoritative `(Provisioner, host, apex)`,
    /// selecting the configured `DomainConfig` whose suffix is the
    /// *longest* match (`spec.md` §9 Open Questions: longest-suffix-match,
    /// not first-label — the historical first-label decomposition is not
    /// implemented here).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DomainNotFound` if no configured suffix
    /// matches.
    pub fn resolve(&self, fqdn: &str) -> Result<(Arc<dyn Provisioner>, String, String), EngineError> {
        let mut best: Option<&Binding> = None;

        for binding in &self.bindings {
            let suffix = binding.domain.string();
            if is_suffix_match(fqdn, &suffix) {
                let better = match best {
                    None => true,
                    Some(current) => suffix.len() > current.domain.string().len(),
                };
                if better {
                    best = Some(binding);
                }
            }
        }

        let binding = best.ok_or(EngineError::DomainNotFound)?;
        let suffix = binding.domain.string();
        let host = strip_suffix(fqdn, &binding.domain.apex).unwrap_or_else(|| fqdn.to_string());
        let _ = suffix; // suffix drove matching; apex drives the upstream zone.
        Ok((binding.provisioner.clone(), host, binding.domain.apex.clone()))
    }

    /// The list of fully-qualified suffixes users may create aliases under
    /// (`spec.md` §4.6 GetDomains).
    #[must_use]
    pub fn allowed_domains(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.domain.string()).collect()
    }
}

/// `fqdn` matches `suffix` iff they are equal or `fqdn` ends with
/// `"." + suffix`.
fn is_suffix_match(fqdn: &str, suffix: &str) -> bool {
    fqdn == suffix || fqdn.ends_with(&format!(".{suffix}"))
}

/// Remove the trailing `"." + apex` (or bare `apex`) from `fqdn`, returning
/// the remaining host label chain. `None` if `apex` is not actually a
/// suffix of `fqdn`.
fn strip_suffix(fqdn: &str, apex: &str) -> Option<String> {
    if fqdn == apex {
        return Some(String::new());
    }
    fqdn.strip_suffix(&format!(".{apex}")).map(str::to_string)
}
