//! Storage Port (C1): the persistence contract the Alias Engine depends on.
//! `spec.md` §4.1. One concrete backend ships — `infra::storage::SeaOrmStorage`
//! — but the engine is generic over any implementor, matching the teacher's
//! `UsersRepository` trait-as-seam convention.

use super::error::EngineError;
use super::models::{Alias, User};
use async_trait::async_trait;

/// CRUD over users and aliases, with uniqueness and foreign-key integrity
/// enforced by the implementor. Each method is atomic; the engine composes
/// multi-step workflows itself rather than relying on cross-call
/// transactions (`spec.md` §4.1 "Transactional guarantee").
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Create a user. Fails with `EngineError::InvalidParameters` if the
    /// email is already taken (`spec.md` §4.6 CreateUser: "same shape as
    /// empty", deliberately not a distinct conflict error).
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, EngineError>;

    /// Look up a user by email. Returns `Ok(None)` on no match — callers
    /// decide how to surface that (`Authenticate` collapses it into
    /// `invalid-parameters`, per enumeration hardening).
    async fn find_user(&self, email: &str) -> Result<Option<User>, EngineError>;

    /// All aliases owned by `user_id`. Empty list, never an error, when the
    /// user owns nothing.
    async fn find_user_aliases(&self, user_id: i64) -> Result<Vec<Alias>, EngineError>;

    /// Look up an alias by its `(host, apex)` key, regardless of owner.
    async fn find_alias(&self, host: &str, apex: &str) -> Result<Option<Alias>, EngineError>;

    /// Insert a new alias owned by `user_id`. Fails with
    /// `EngineError::StorageFailure` if the `(host, apex)` pair is already
    /// taken — callers are expected to have already probed with
    /// `find_alias` (`spec.md` §4.6 RegisterAlias).
    async fn create_alias(&self, host: &str, apex: &str, value: &str, owner_user_id: i64)
        -> Result<Alias, EngineError>;

    /// Update the `value` of the alias matching `(host, apex)`. Fails with
    /// `EngineError::AliasNotFound` if no such alias exists.
    async fn update_alias(&self, host: &str, apex: &str, value: &str) -> Result<Alias, EngineError>;

    /// Remove the alias matching `(host, apex)` IFF it is owned by
    /// `owner_user_id`. MUST return `EngineError::AliasNotFound` — never a
    /// distinct "forbidden" — when the record exists but belongs to someone
    /// else, to avoid leaking existence (`spec.md` §4.1).
    async fn delete_alias(&self, host: &str, apex: &str, owner_user_id: i64)
        -> Result<(), EngineError>;
}
