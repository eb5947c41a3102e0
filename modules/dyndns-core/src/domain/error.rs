//! The Alias Engine's (C6) typed error vocabulary. Every fallible engine
//! operation returns `Result<_, EngineError>`; `EngineError::kind` maps onto
//! the wire taxonomy in `dyndns_errors::ErrorKind` so the HTTP surface (C7)
//! and the CLI (C8) never have to pattern-match engine internals.

use dyndns_errors::ErrorKind;
use thiserror::Error;

/// The error taxonomy of `spec.md` §7, carried with enough context to log
/// usefully while still collapsing to the spec's required wire message for
/// security-sensitive cases (enumeration hardening, §9).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid request parameter(s)")]
    InvalidParameters,

    #[error("alias already taken")]
    AliasTaken,

    #[error("alias already exist")]
    AliasAlreadyExist,

    #[error("alias not found")]
    AliasNotFound,

    #[error("domain not found")]
    DomainNotFound,

    #[error("upstream DNS provisioner rejected the mutation: {0}")]
    RemoteMutationFailed(String),

    #[error("storage backend failure: {0}")]
    StorageFailure(String),

    #[error("public IP could not be determined: {0}")]
    RemoteIpUnavailable(String),

    #[error("authentication required")]
    AuthenticationRequired,

    #[error("authentication invalid")]
    AuthenticationInvalid,
}

impl EngineError {
    /// The wire-taxonomy kind this error maps onto.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameters => ErrorKind::InvalidParameters,
            Self::AliasTaken => ErrorKind::AliasTaken,
            Self::AliasAlreadyExist => ErrorKind::AliasAlreadyExist,
            Self::AliasNotFound => ErrorKind::AliasNotFound,
            Self::DomainNotFound => ErrorKind::DomainNotFound,
            Self::RemoteMutationFailed(_) => ErrorKind::RemoteMutationFailed,
            Self::StorageFailure(_) => ErrorKind::StorageFailure,
            Self::RemoteIpUnavailable(_) => ErrorKind::RemoteIpUnavailable,
            Self::AuthenticationRequired => ErrorKind::AuthenticationRequired,
            Self::AuthenticationInvalid => ErrorKind::AuthenticationInvalid,
        }
    }

    /// The message put on the wire. Internal-detail variants are collapsed
    /// to a generic message here; the detailed `Display` text is for logs
    /// only (`spec.md` §7: "never leaking backend error text").
    #[must_use]
    pub fn wire_message(&self) -> String {
        match self {
            Self::StorageFailure(_) => "storage backend failure".to_string(),
            other => other.kind().code().replace('-', " "),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_never_leaks_detail_on_the_wire() {
        let err = EngineError::StorageFailure("disk is full, see /var/log".to_string());
        assert!(!err.wire_message().contains("disk"));
    }

    #[test]
    fn kinds_round_trip_through_spec_codes() {
        assert_eq!(EngineError::AliasTaken.kind().code(), "alias-taken");
        assert_eq!(EngineError::DomainNotFound.kind().code(), "domain-not-found");
    }
}
