//! DNS Provisioner (C4): the contract a third-party DNS backend binding
//! must satisfy. `spec.md` §4.4.

use async_trait::async_trait;
use thiserror::Error;

/// Failure from an upstream DNS provider call. Bindings return this; the
/// Alias Engine wraps it into `EngineError::RemoteMutationFailed`.
#[derive(Debug, Error)]
pub enum ProvisionerError {
    #[error("upstream returned an error: {0}")]
    Upstream(String),

    #[error("expected exactly one matching record upstream, found {0}")]
    AmbiguousRecord(usize),

    #[error("transport error contacting upstream: {0}")]
    Transport(#[from] dyndns_http::HttpError),
}

/// A backend capable of mutating records in one or more DNS zones.
///
/// Implementations are stateless single-shot API callers: no retry logic
/// (the engine does not retry either — a failed mutation is surfaced to the
/// caller per `spec.md` §4.6), no caching of prior results beyond what is
/// needed to find a record's upstream id within one call.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create a new record. Behavior when the record already exists
    /// upstream is implementation-defined — the engine checks local state
    /// first and only calls this when it believes the record is new.
    async fn add_record(&self, host: &str, apex: &str, value: &str)
        -> Result<(), ProvisionerError>;

    /// Change the target of an existing record. Must fail if no matching
    /// record exists upstream.
    async fn update_record(
        &self,
        host: &str,
        apex: &str,
        value: &str,
    ) -> Result<(), ProvisionerError>;

    /// Remove a record if present. Idempotent: absence upstream is not an
    /// error, so the engine can purge local state even when upstream is
    /// already clean.
    async fn delete_record(&self, host: &str, apex: &str) -> Result<(), ProvisionerError>;

    /// A short name for logging.
    fn name(&self) -> &str;
}
