//! Session Tokens (C3): mint and verify signed bearer tokens carrying a user
//! identifier and an optional expiry.
//!
//! Grounded on the teacher's `modkit-auth` `Claims`/`TokenValidator` split
//! (`libs/modkit-auth/src/claims.rs`, `src/traits.rs`), narrowed from
//! multi-provider OIDC/OAuth2 verification down to the single symmetric
//! HS256 scheme `spec.md` §6 calls for.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// The verified payload of a session token. `user_id` MUST only ever be
/// read from a [`Claims`] that came back from [`TokenCodec::verify`] — never
/// from an unverified token or a request body (`spec.md` §4.6 "Ordering and
/// tie-breaks").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Seconds since the epoch. Omitted iff the token was minted with a
    /// zero TTL (`spec.md` §4.3, §9 Open Questions: fixed as "omit").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature or structure is invalid: {0}")]
    Malformed(jsonwebtoken::errors::Error),

    #[error("token has expired")]
    Expired,
}

/// Mints and verifies HS256 session tokens signed with an operator-supplied
/// secret (`api.signing_key`).
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// `None` means tokens never expire (TTL configured as zero).
    ttl: Option<Duration>,
}

impl TokenCodec {
    /// Build a codec from the operator's signing key and configured TTL.
    /// `ttl == Some(Duration::ZERO)` and `ttl == None` are both treated as
    /// "never expires", matching the source's zero-TTL convention.
    #[must_use]
    pub fn new(signing_key: &[u8], ttl: Option<Duration>) -> Self {
        let ttl = ttl.filter(|d| *d > Duration::ZERO);
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            ttl,
        }
    }

    /// Issue a token carrying `user_id`, with `exp` set per the configured
    /// TTL (or omitted if the TTL is zero).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] only if the HS256 signer itself
    /// fails, which does not happen for well-formed secret material.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let exp = self
            .ttl
            .map(|ttl| (OffsetDateTime::now_utc() + ttl).unix_timestamp());
        let claims = Claims { user_id, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Malformed)
    }

    /// Verify `token`'s signature and algorithm, then check expiry against
    /// the current wall clock. The returned `Claims::user_id` is the only
    /// trustworthy source of caller identity for the rest of the request.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] for a bad signature, wrong
    /// algorithm, or unparseable payload, and [`TokenError::Expired`] once
    /// `exp` (if present) is in the past.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // We enforce expiry ourselves below, since `exp` is optional here
        // and jsonwebtoken's built-in check requires the claim to be present.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(TokenError::Malformed)?;

        if let Some(exp) = data.claims.exp {
            if OffsetDateTime::now_utc().unix_timestamp() >= exp {
                return Err(TokenError::Expired);
            }
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_user_id() {
        let codec = TokenCodec::new(b"super-secret", Some(Duration::hours(1)));
        let token = codec.issue(42).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert!(claims.exp.is_some());
    }

    #[test]
    fn zero_ttl_omits_exp_and_never_expires() {
        let codec = TokenCodec::new(b"super-secret", None);
        let token = codec.issue(7).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn expired_token_fails_verification() {
        let codec = TokenCodec::new(b"super-secret", Some(Duration::seconds(-1)));
        let token = codec.issue(1).unwrap();
        let err = codec.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn wrong_signing_key_fails_verification() {
        let minted = TokenCodec::new(b"key-a", Some(Duration::hours(1)));
        let verifier = TokenCodec::new(b"key-b", Some(Duration::hours(1)));
        let token = minted.issue(1).unwrap();
        assert!(verifier.verify(&token).is_err());
    }
}
