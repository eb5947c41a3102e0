use thiserror::Error;

/// Transport-level failure talking to an upstream HTTP peer (a DNS
/// provisioner's API, a public-IP echo service, or the daemon itself).
///
/// This is deliberately narrower than `reqwest::Error`: call sites never need
/// to match on `reqwest` internals, only on whether the peer was reached.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("could not reach {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16, body: String },

    #[error("malformed response body from {url}: {message}")]
    Decode { url: String, message: String },
}

impl HttpError {
    #[must_use]
    pub fn from_reqwest(url: &str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else {
            Self::Connect {
                url: url.to_string(),
                source: err,
            }
        }
    }
}
