//! Daemon Client (C8): a typed wrapper mirroring the HTTP Surface (C7)
//! one-for-one. `spec.md` §4.8.

use async_trait::async_trait;
use dyndns_errors::ErrorBody;
use dyndns_http::HttpClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The wire projection of an alias: `{domain, value}` (`spec.md` §4.7).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AliasDto {
    pub domain: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDto {
    pub domain: String,
}

/// Failure calling the daemon. A non-empty server-returned error body is
/// [`ClientError::Remote`]; everything else (connection refused, timeout,
/// malformed JSON) is [`ClientError::Transport`] with no body to show.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Remote(String),

    #[error("transport error: {0}")]
    Transport(#[from] dyndns_http::HttpError),
}

/// Capability-set interface over the daemon's HTTP Surface, so CLI
/// commands and the Sync Engine (C9) can depend on a trait instead of a
/// concrete `reqwest` client — matching the teacher's convention of
/// injecting collaborators as trait objects rather than inheriting from a
/// base client.
#[async_trait]
pub trait DaemonClient: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, ClientError>;
    async fn get_aliases(&self, token: &str) -> Result<Vec<AliasDto>, ClientError>;
    async fn register_alias(&self, token: &str, alias: AliasDto) -> Result<AliasDto, ClientError>;
    async fn update_alias(&self, token: &str, alias: AliasDto) -> Result<AliasDto, ClientError>;
    async fn delete_alias(&self, token: &str, name: &str) -> Result<(), ClientError>;
    async fn get_domains(&self, token: &str) -> Result<Vec<DomainDto>, ClientError>;
}

/// The real implementation, talking to a live daemon over HTTP.
pub struct HttpDaemonClient {
    http: HttpClient,
    base_url: String,
}

impl HttpDaemonClient {
    #[must_use]
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn parse_or_error<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            response.json::<T>().await.map_err(|e| {
                ClientError::Transport(dyndns_http::HttpError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            })
        } else {
            let body = dyndns_http::read_text(url, response).await?;
            match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) if !err.message.is_empty() => Err(ClientError::Remote(err.message)),
                _ => Err(ClientError::Remote(body)),
            }
        }
    }
}

#[async_trait]
impl DaemonClient for HttpDaemonClient {
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, ClientError> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            email: &'a str,
            password: &'a str,
        }
        #[derive(Deserialize)]
        struct SessionResponse {
            token: String,
        }

        let url = self.url("/sessions");
        let request = self
            .http
            .post(&url)
            .json(&Credentials { email, password });
        let response = self.http.send(&url, request).await?;
        let session: SessionResponse = self.parse_or_error(&url, response).await?;
        Ok(session.token)
    }

    async fn get_aliases(&self, token: &str) -> Result<Vec<AliasDto>, ClientError> {
        let url = self.url("/aliases");
        let request = self.http.get(&url).bearer_auth(token);
        let response = self.http.send(&url, request).await?;
        self.parse_or_error(&url, response).await
    }

    async fn register_alias(&self, token: &str, alias: AliasDto) -> Result<AliasDto, ClientError> {
        let url = self.url("/aliases");
        let request = self.http.post(&url).bearer_auth(token).json(&alias);
        let response = self.http.send(&url, request).await?;
        self.parse_or_error(&url, response).await
    }

    async fn update_alias(&self, token: &str, alias: AliasDto) -> Result<AliasDto, ClientError> {
        let url = self.url("/aliases");
        let request = self.http.put(&url).bearer_auth(token).json(&alias);
        let response = self.http.send(&url, request).await?;
        self.parse_or_error(&url, response).await
    }

    async fn delete_alias(&self, token: &str, name: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("/aliases/{name}"));
        let request = self.http.delete(&url).bearer_auth(token);
        let response = self.http.send(&url, request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            let body = dyndns_http::read_text(&url, response).await?;
            Err(ClientError::Remote(body))
        }
    }

    async fn get_domains(&self, token: &str) -> Result<Vec<DomainDto>, ClientError> {
        let url = self.url("/domains");
        let request = self.http.get(&url).bearer_auth(token);
        let response = self.http.send(&url, request).await?;
        self.parse_or_error(&url, response).await
    }
}
