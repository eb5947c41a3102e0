//! A thin, timeout-enforcing HTTP client shared by the DNS provisioner
//! bindings, the public-IP echo fetcher, and the daemon client.
//!
//! The teacher crate this is generalized from (`modkit-http`) hand-rolls a
//! `hyper` + `tower` stack with retry/backoff middleware; that stack is out
//! of proportion for this repository's single outbound concern (a handful
//! of short-lived REST calls per alias mutation), so this wrapper is built
//! directly on `reqwest`, the shape the pack's own DDNS clients
//! (`lvillis-ddns-rs`, `Neycrol-ipv6ddns`) use for the same job. It keeps the
//! one property that matters from the teacher: every call carries an
//! explicit, sensible default timeout (`spec.md` §5).

mod error;

pub use error::HttpError;
pub use reqwest::{Method, StatusCode};

use std::time::Duration;

/// Default per-call timeout (`spec.md` §5: "Provisioner clients MUST
/// configure sensible per-call timeouts (default 30 s)").
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client. Cheap to clone (wraps `reqwest::Client`'s internal
/// `Arc`), safe to use concurrently from many tasks.
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client with the default 30s timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying TLS backend fails to initialize.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Build a client with an explicit per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying TLS backend fails to initialize.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| HttpError::Connect {
                url: "<client init>".to_string(),
                source,
            })?;
        Ok(Self { inner, timeout })
    }

    /// Start a request builder for `method url`.
    #[must_use]
    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    #[must_use]
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.get(url)
    }

    #[must_use]
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.post(url)
    }

    #[must_use]
    pub fn put(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.put(url)
    }

    #[must_use]
    pub fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.delete(url)
    }

    /// Send a pre-built request, translating transport failures into
    /// [`HttpError`] and tagging them with the request URL for logging.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Timeout`] or [`HttpError::Connect`] when the
    /// peer could not be reached within the configured timeout.
    pub async fn send(
        &self,
        url: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, HttpError> {
        builder
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(url, self.timeout.as_secs(), e))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        // The only failure mode is TLS backend init, which would already
        // have surfaced during earlier startup; a fresh default client is
        // safe to construct lazily in test code and CLI fast paths.
        #[allow(clippy::expect_used)]
        Self::new().expect("failed to initialize default HTTP client")
    }
}

/// Read the full response body as text, mapping decode failures into
/// [`HttpError::Decode`].
///
/// # Errors
///
/// Returns [`HttpError::Decode`] if the body cannot be read as UTF-8 text.
pub async fn read_text(url: &str, resp: reqwest::Response) -> Result<String, HttpError> {
    resp.text().await.map_err(|e| HttpError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn client_builds_with_custom_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }
}
