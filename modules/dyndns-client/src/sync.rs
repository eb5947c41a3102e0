//! Sync Engine (C9): pushes the discovered public IP to every alias
//! flagged `synchronize == true`. `spec.md` §4.9.

use crate::client::{AliasDto, ClientError, DaemonClient};
use dyndns_http::HttpClient;
use std::collections::BTreeMap;
use std::net::IpAddr;
use thiserror::Error;

/// Failure discovering the current public IP.
#[derive(Debug, Error)]
pub enum IpDiscoveryError {
    /// None of the configured echo endpoints returned a parseable address
    /// (`spec.md` §4.9: "an unparseable response is an error of kind
    /// `remote-ip-unavailable`").
    #[error("remote-ip-unavailable: no echo endpoint returned a usable address")]
    RemoteIpUnavailable,
}

/// Tries each echo URL in order, first success wins (`SPEC_FULL.md` §4.9).
/// An endpoint's body is untrusted text: trailing whitespace is stripped,
/// then it must parse as an `IpAddr` or the endpoint is skipped.
pub async fn discover_public_ip(
    http: &HttpClient,
    echo_urls: &[String],
) -> Result<IpAddr, IpDiscoveryError> {
    for url in echo_urls {
        let Ok(response) = http.send(url, http.get(url)).await else {
            continue;
        };
        if !response.status().is_success() {
            continue;
        }
        let Ok(body) = dyndns_http::read_text(url, response).await else {
            continue;
        };
        if let Ok(ip) = body.trim_end().parse::<IpAddr>() {
            return Ok(ip);
        }
    }
    Err(IpDiscoveryError::RemoteIpUnavailable)
}

/// One outcome of a `synchronize` pass, kept for CLI reporting.
#[derive(Debug)]
pub struct SyncOutcome {
    pub domain: String,
    pub result: Result<(), ClientError>,
}

/// Drives `UpdateAlias` for every alias flagged for sync. Never aborts the
/// loop on a single alias's failure and never mutates the flag map
/// (`spec.md` §4.9): the caller owns `aliases` and passes it by reference.
pub async fn synchronize(
    client: &dyn DaemonClient,
    token: &str,
    aliases: &BTreeMap<String, bool>,
    current_ip: IpAddr,
) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::new();
    for (domain, &should_sync) in aliases {
        if !should_sync {
            continue;
        }
        let alias = AliasDto {
            domain: domain.clone(),
            value: current_ip.to_string(),
        };
        let result = client.update_alias(token, alias).await.map(|_| ());
        if let Err(ref e) = result {
            tracing::warn!(%domain, error = %e, "synchronize: update failed, continuing");
        }
        outcomes.push(SyncOutcome {
            domain: domain.clone(),
            result,
        });
    }
    outcomes
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::client::DomainDto;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeDaemonClient {
        fail_domain: Option<String>,
        update_calls: Mutex<Vec<String>>,
    }

    impl FakeDaemonClient {
        fn new(fail_domain: Option<&str>) -> Self {
            Self {
                fail_domain: fail_domain.map(str::to_string),
                update_calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.update_calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl DaemonClient for FakeDaemonClient {
        async fn authenticate(&self, _email: &str, _password: &str) -> Result<String, ClientError> {
            unimplemented!("not exercised by synchronize tests")
        }

        async fn get_aliases(&self, _token: &str) -> Result<Vec<AliasDto>, ClientError> {
            unimplemented!("not exercised by synchronize tests")
        }

        async fn register_alias(
            &self,
            _token: &str,
            _alias: AliasDto,
        ) -> Result<AliasDto, ClientError> {
            unimplemented!("not exercised by synchronize tests")
        }

        async fn update_alias(&self, _token: &str, alias: AliasDto) -> Result<AliasDto, ClientError> {
            self.update_calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(alias.domain.clone());
            if self.fail_domain.as_deref() == Some(alias.domain.as_str()) {
                return Err(ClientError::Remote("remote-mutation-failed".to_string()));
            }
            Ok(alias)
        }

        async fn delete_alias(&self, _token: &str, _name: &str) -> Result<(), ClientError> {
            unimplemented!("not exercised by synchronize tests")
        }

        async fn get_domains(&self, _token: &str) -> Result<Vec<DomainDto>, ClientError> {
            unimplemented!("not exercised by synchronize tests")
        }
    }

    #[tokio::test]
    async fn one_failing_alias_does_not_abort_the_others() {
        let client = FakeDaemonClient::new(Some("a3.example.org"));
        let mut aliases = BTreeMap::new();
        aliases.insert("a1.example.org".to_string(), true);
        aliases.insert("a2.example.org".to_string(), false);
        aliases.insert("a3.example.org".to_string(), true);

        let ip: IpAddr = "1.2.3.4".parse().unwrap();
        let outcomes = synchronize(&client, "token", &aliases, ip).await;

        assert_eq!(outcomes.len(), 2, "a2 (synchronize=false) is never called");
        assert_eq!(client.calls(), vec!["a1.example.org", "a3.example.org"]);

        let a1 = outcomes.iter().find(|o| o.domain == "a1.example.org").unwrap();
        assert!(a1.result.is_ok());

        let a3 = outcomes.iter().find(|o| o.domain == "a3.example.org").unwrap();
        assert!(a3.result.is_err());

        assert_eq!(aliases.get("a2.example.org"), Some(&false), "flags are never mutated");
    }

    #[test]
    fn ip_parses_after_stripping_trailing_whitespace() {
        let body = "203.0.113.9\n";
        let ip: IpAddr = body.trim_end().parse().unwrap();
        assert_eq!(ip.to_string(), "203.0.113.9");
    }
}
