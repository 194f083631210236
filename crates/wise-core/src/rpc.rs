//! HTTP implementation of the remote check collaborator.
//!
//! Delegator-operated confirmation endpoints speak plain JSON-RPC over
//! HTTP; this client posts the vote order and reads back a boolean
//! verdict. Surrounding tooling may substitute any other
//! [`RemoteCheckClient`] implementation.

use std::time::Duration;

use serde::Deserialize;

use crate::api::RemoteCheckClient;
use crate::error::{Error, Result};
use crate::protocol::VoteOrder;

/// Configuration for [`HttpRemoteCheck`].
#[derive(Debug, Clone)]
pub struct HttpRemoteCheckConfig {
    /// Per-call timeout. The core applies no other timers.
    pub timeout: Duration,
}

impl Default for HttpRemoteCheckConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl HttpRemoteCheckConfig {
    /// Set the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// JSON-RPC client for custom rule check endpoints.
pub struct HttpRemoteCheck {
    client: reqwest::Client,
}

impl HttpRemoteCheck {
    /// Build a client with the given configuration.
    pub fn new(config: HttpRemoteCheckConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Remote(e.to_string()))?;
        Ok(Self { client })
    }

    /// Build a client with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpRemoteCheckConfig::default())
    }
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    result: bool,
}

#[async_trait::async_trait]
impl RemoteCheckClient for HttpRemoteCheck {
    async fn call_remote(
        &self,
        host: &str,
        port: u16,
        path: &str,
        method: &str,
        order: &VoteOrder,
    ) -> Result<bool> {
        let url = format!("http://{}:{}/{}", host, port, path.trim_start_matches('/'));
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": [order],
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Remote(format!("remote check timed out: {url}"))
                } else if e.is_connect() {
                    Error::Remote(format!("failed to connect to {url}"))
                } else {
                    Error::Remote(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote(format!(
                "remote check {url} returned status {status}"
            )));
        }

        let reply: RpcReply = response
            .json()
            .await
            .map_err(|e| Error::Remote(format!("remote check {url} answered malformed: {e}")))?;
        Ok(reply.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpRemoteCheckConfig::default().with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_connect_failure_maps_to_remote_error() {
        let client = HttpRemoteCheck::new(
            HttpRemoteCheckConfig::default().with_timeout(Duration::from_millis(200)),
        )
        .unwrap();
        let order = VoteOrder {
            delegator: "noisy".to_string(),
            ruleset_name: "safe".to_string(),
            author: "pojan".to_string(),
            permlink: "a-post".to_string(),
            weight: 100,
        };

        // port 1 on localhost is closed; the call must fail as a Remote error
        let err = client
            .call_remote("127.0.0.1", 1, "/rpc", "confirm_vote", &order)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote(_)));
    }
}
