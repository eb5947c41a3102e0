//! Shared error vocabulary for the dynamic DNS control plane.
//!
//! This crate is a pure data crate: no HTTP framework, no database driver.
//! It gives the server (`dyndns-core`) and the client (`dyndns-client`,
//! `dyndns-cli`) a single definition of the wire error body and the status
//! code each error kind maps to, so the two sides never drift.

use serde::{Deserialize, Serialize};

/// The error taxonomy from the control plane specification. Each kind is
/// distinguishable by the consumer and maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Validation failure, or a not-found during authentication (prevents
    /// user enumeration).
    InvalidParameters,
    /// Registration conflict with a different owner.
    AliasTaken,
    /// Registration conflict with the same owner.
    AliasAlreadyExist,
    /// Read/update/delete target absent or not owned by the caller.
    AliasNotFound,
    /// No provisioner claims the requested apex.
    DomainNotFound,
    /// The upstream DNS provisioner rejected the mutation.
    RemoteMutationFailed,
    /// Backend storage I/O failure.
    StorageFailure,
    /// The public-IP echo endpoint returned nothing parseable.
    RemoteIpUnavailable,
    /// No bearer token was presented.
    AuthenticationRequired,
    /// The bearer token failed verification.
    AuthenticationInvalid,
}

impl ErrorKind {
    /// The HTTP status this error kind is surfaced as (`spec.md` §4.7/§7).
    #[must_use]
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidParameters => 400,
            Self::AliasTaken | Self::AliasAlreadyExist => 409,
            Self::AliasNotFound | Self::DomainNotFound => 404,
            Self::RemoteMutationFailed | Self::StorageFailure | Self::RemoteIpUnavailable => 502,
            Self::AuthenticationRequired | Self::AuthenticationInvalid => 401,
        }
    }

    /// A short machine-stable name, used in logs and test assertions.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidParameters => "invalid-parameters",
            Self::AliasTaken => "alias-taken",
            Self::AliasAlreadyExist => "alias-already-exist",
            Self::AliasNotFound => "alias-not-found",
            Self::DomainNotFound => "domain-not-found",
            Self::RemoteMutationFailed => "remote-mutation-failed",
            Self::StorageFailure => "storage-failure",
            Self::RemoteIpUnavailable => "remote-ip-unavailable",
            Self::AuthenticationRequired => "authentication-required",
            Self::AuthenticationInvalid => "authentication-invalid",
        }
    }
}

/// The JSON body every error response carries: `{"message": "..."}`
/// (`spec.md` §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
