//! Custom RPC rule: delegates the verdict to a delegator-operated
//! endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::VoteOrder;
use crate::rules::ValidationContext;

/// Delegates the pass/fail decision for a vote order to a remote
/// endpoint operated by the delegator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRpcRule {
    /// Endpoint host.
    pub rpc_host: String,
    /// Endpoint port.
    pub rpc_port: u16,
    /// Request path on the endpoint.
    pub rpc_path: String,
    /// Method name the endpoint dispatches on.
    pub rpc_method: String,
}

impl CustomRpcRule {
    /// Build a custom RPC rule.
    #[must_use]
    pub fn new(
        rpc_host: impl Into<String>,
        rpc_port: u16,
        rpc_path: impl Into<String>,
        rpc_method: impl Into<String>,
    ) -> Self {
        Self {
            rpc_host: rpc_host.into(),
            rpc_port,
            rpc_path: rpc_path.into(),
            rpc_method: rpc_method.into(),
        }
    }

    /// Reject structurally defective endpoint definitions before calling
    /// anything.
    pub(crate) fn validate_config(&self) -> Result<()> {
        for (field, value) in [
            ("rpc_host", &self.rpc_host),
            ("rpc_path", &self.rpc_path),
            ("rpc_method", &self.rpc_method),
        ] {
            if value.is_empty() {
                return Err(Error::Validation(format!(
                    "custom_rpc rule: {field} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Ask the configured endpoint to confirm the vote order.
    pub async fn validate(
        &self,
        order: &VoteOrder,
        context: &mut ValidationContext<'_>,
    ) -> Result<()> {
        self.validate_config()?;

        let confirmed = context
            .remote()
            .call_remote(
                &self.rpc_host,
                self.rpc_port,
                &self.rpc_path,
                &self.rpc_method,
                order,
            )
            .await?;

        if confirmed {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "remote check {}:{}{} rejected the vote order",
                self.rpc_host, self.rpc_port, self.rpc_path
            )))
        }
    }

    /// One-line human-readable description.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "confirmed by {} at {}:{}{}",
            self.rpc_method, self.rpc_host, self.rpc_port, self.rpc_path
        )
    }
}
