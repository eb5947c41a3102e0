//! Wire-shape request/response bodies for the HTTP Surface (C7).
//! `spec.md` §4.7.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct AliasRequest {
    pub domain: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct DomainResponse {
    pub domain: String,
}
