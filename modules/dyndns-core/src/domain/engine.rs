//! Alias Engine (C6) — the heart of the core. `spec.md` §4.6.
//!
//! Every write path follows the same two-phase protocol: the upstream
//! provisioner mutation is issued first, and only on its success is the
//! local storage mutation attempted (`spec.md` §4.6 "Ordering and
//! tie-breaks"). There is no automatic rollback of the upstream mutation on
//! a subsequent storage failure — an accepted operator-repair case,
//! documented in `DESIGN.md`.

use super::error::EngineError;
use super::models::{AliasView, User};
use super::registry::ProvisionerRegistry;
use super::storage::StorageBackend;
use dyndns_auth::{hash, verify, TokenCodec};
use std::sync::Arc;

/// Depends on C1 (storage), C2/C3 (hashing + tokens, via `dyndns-auth`), and
/// C4/C5 (provisioners, via the registry). Safe to invoke concurrently from
/// independently-scheduled request tasks (`spec.md` §5) — it holds no
/// internal mutable state of its own.
pub struct AliasEngine {
    storage: Arc<dyn StorageBackend>,
    registry: Arc<ProvisionerRegistry>,
    tokens: TokenCodec,
}

impl AliasEngine {
    #[must_use]
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        registry: Arc<ProvisionerRegistry>,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            storage,
            registry,
            tokens,
        }
    }

    /// Verify credentials and mint a session token. Unknown email and wrong
    /// password both collapse to `InvalidParameters` (enumeration
    /// hardening, `spec.md` §9).
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, EngineError> {
        if email.is_empty() || password.is_empty() {
            return Err(EngineError::InvalidParameters);
        }

        let user = self
            .storage
            .find_user(email)
            .await?
            .ok_or(EngineError::InvalidParameters)?;

        if !verify(&user.password_hash, password) {
            return Err(EngineError::InvalidParameters);
        }

        tracing::debug!(user_id = user.id, "authenticated");
        self.issue_token(&user)
    }

    /// Admin-only path (not exposed over HTTP, `spec.md` §4.6): create a
    /// user and return their initial session token. A duplicate email is
    /// reported as `InvalidParameters`, deliberately not `conflict`.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<String, EngineError> {
        if email.is_empty() || password.is_empty() {
            return Err(EngineError::InvalidParameters);
        }

        if self.storage.find_user(email).await?.is_some() {
            return Err(EngineError::InvalidParameters);
        }

        let password_hash =
            hash(password).map_err(|e| EngineError::StorageFailure(e.to_string()))?;
        let user = self.storage.create_user(email, &password_hash).await?;

        tracing::info!(user_id = user.id, %email, "user created");
        self.issue_token(&user)
    }

    /// All aliases owned by `user_id`, projected to their wire shape.
    pub async fn get_aliases(&self, user_id: i64) -> Result<Vec<AliasView>, EngineError> {
        let aliases = self.storage.find_user_aliases(user_id).await?;
        Ok(aliases.iter().map(AliasView::from).collect())
    }

    /// Create a new alias: resolve its provisioner, check for local
    /// conflicts, mutate upstream, then commit locally.
    pub async fn register_alias(
        &self,
        user_id: i64,
        domain: &str,
        value: &str,
    ) -> Result<AliasView, EngineError> {
        validate_domain_and_value(domain, value)?;

        let (provisioner, host, apex) = self.registry.resolve(domain)?;

        if let Some(existing) = self.storage.find_alias(&host, &apex).await? {
            return Err(if existing.owner_user_id != user_id {
                EngineError::AliasTaken
            } else {
                EngineError::AliasAlreadyExist
            });
        }

        provisioner
            .add_record(&host, &apex, value)
            .await
            .map_err(|e| EngineError::RemoteMutationFailed(e.to_string()))?;

        let alias = self
            .storage
            .create_alias(&host, &apex, value, user_id)
            .await?;

        tracing::info!(%user_id, domain = %alias.domain(), "alias registered");
        Ok(AliasView::from(&alias))
    }

    /// Change an existing alias's target value: same upstream-before-local
    /// protocol as `register_alias`.
    pub async fn update_alias(
        &self,
        user_id: i64,
        domain: &str,
        value: &str,
    ) -> Result<AliasView, EngineError> {
        validate_domain_and_value(domain, value)?;

        let (provisioner, host, apex) = self.registry.resolve(domain)?;

        let existing = self
            .storage
            .find_alias(&host, &apex)
            .await?
            .filter(|a| a.owner_user_id == user_id)
            .ok_or(EngineError::AliasNotFound)?;
        let _ = existing;

        provisioner
            .update_record(&host, &apex, value)
            .await
            .map_err(|e| EngineError::RemoteMutationFailed(e.to_string()))?;

        let alias = self.storage.update_alias(&host, &apex, value).await?;

        tracing::info!(%user_id, domain = %alias.domain(), "alias updated");
        Ok(AliasView::from(&alias))
    }

    /// Remove an alias: ownership is checked against local storage first,
    /// before any upstream call, to avoid a needless `DeleteRecord` (and
    /// leaking existence) for a nonexistent or not-owned name (`spec.md`
    /// §9 Open Questions). Only once the record is confirmed to exist and
    /// be owned by `user_id` is the upstream delete issued; it is
    /// idempotent, so it is safe even if upstream is already clean.
    pub async fn delete_alias(&self, user_id: i64, domain: &str) -> Result<(), EngineError> {
        if domain.is_empty() {
            return Err(EngineError::InvalidParameters);
        }

        let (provisioner, host, apex) = self.registry.resolve(domain)?;

        self.storage
            .find_alias(&host, &apex)
            .await?
            .filter(|a| a.owner_user_id == user_id)
            .ok_or(EngineError::AliasNotFound)?;

        provisioner
            .delete_record(&host, &apex)
            .await
            .map_err(|e| EngineError::RemoteMutationFailed(e.to_string()))?;

        self.storage.delete_alias(&host, &apex, user_id).await?;

        tracing::info!(%user_id, %domain, "alias deleted");
        Ok(())
    }

    /// The fully-qualified suffixes the operator has configured — the
    /// universe of domains a user may register an alias under.
    #[must_use]
    pub fn get_domains(&self) -> Vec<String> {
        self.registry.allowed_domains()
    }

    fn issue_token(&self, user: &User) -> Result<String, EngineError> {
        self.tokens
            .issue(user.id)
            .map_err(|e| EngineError::StorageFailure(e.to_string()))
    }
}

/// `spec.md` §4.6: non-empty domain/value, and domain must have at least
/// two dots (minimum form `host.apex.tld`).
fn validate_domain_and_value(domain: &str, value: &str) -> Result<(), EngineError> {
    if domain.is_empty() || value.is_empty() {
        return Err(EngineError::InvalidParameters);
    }
    if domain.matches('.').count() < 2 {
        return Err(EngineError::InvalidParameters);
    }
    Ok(())
}
