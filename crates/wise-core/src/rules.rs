//! Rule variants and the validation engine.
//!
//! A [`Rule`] is a single delegator-defined predicate over a vote order
//! plus the content it targets. Rules come in a closed set of variants
//! dispatched by exhaustive matching; their serde form is the wire form,
//! discriminated by the `type` field.
//!
//! Validation is fail-closed: a structurally defective rule fails the
//! same way an unsatisfied one does, with a human-readable reason.

pub mod authors;
pub mod context;
pub mod custom_rpc;
pub mod payout;
pub mod tags;

pub use authors::{AuthorsMode, AuthorsRule};
pub use context::ValidationContext;
pub use custom_rpc::CustomRpcRule;
pub use payout::{PayoutMode, PayoutRule};
pub use tags::{TagsMode, TagsRule};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::VoteOrder;

/// A single delegator-defined predicate over a vote order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Constrain the tags of the targeted content.
    Tags(TagsRule),
    /// Constrain the author of the targeted content.
    Authors(AuthorsRule),
    /// Constrain the current payout of the targeted content.
    Payout(PayoutRule),
    /// Delegate the verdict to a remote endpoint.
    CustomRpc(CustomRpcRule),
}

impl Rule {
    /// Wire name of the rule kind, e.g. for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Tags(_) => "tags",
            Rule::Authors(_) => "authors",
            Rule::Payout(_) => "payout",
            Rule::CustomRpc(_) => "custom_rpc",
        }
    }

    /// One-line human-readable description of the rule.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Rule::Tags(rule) => rule.description(),
            Rule::Authors(rule) => rule.description(),
            Rule::Payout(rule) => rule.description(),
            Rule::CustomRpc(rule) => rule.description(),
        }
    }

    /// Validate a vote order against this rule.
    ///
    /// Returns `Err(Error::Validation)` with the failure reason when the
    /// rule is unsatisfied or structurally defective; transport faults
    /// pass through unchanged.
    pub async fn validate(
        &self,
        order: &VoteOrder,
        context: &mut ValidationContext<'_>,
    ) -> Result<()> {
        match self {
            Rule::Tags(rule) => rule.validate(order, context).await,
            Rule::Authors(rule) => rule.validate(order, context).await,
            Rule::Payout(rule) => rule.validate(order, context).await,
            Rule::CustomRpc(rule) => rule.validate(order, context).await,
        }
    }
}

/// Named, ordered collection of rules owned by a (delegator, voter)
/// pair. Replacing a ruleset with the same name for the same pair
/// supersedes it entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Name the voter references in vote orders.
    pub name: String,
    /// Rules that must all pass for an order to be allowed.
    pub rules: Vec<Rule>,
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::api::{LedgerApi, RemoteCheckClient};
    use crate::error::{Error, Result};
    use crate::ledger::{ContentItem, HistoryEntry};
    use crate::protocol::VoteOrder;

    /// Ledger fake serving a single content item (or none).
    pub(crate) struct StaticLedger {
        pub content: Option<ContentItem>,
        pub fail_content: bool,
    }

    impl StaticLedger {
        pub fn with_content(content: ContentItem) -> Self {
            Self {
                content: Some(content),
                fail_content: false,
            }
        }

        pub fn empty() -> Self {
            Self {
                content: None,
                fail_content: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl LedgerApi for StaticLedger {
        async fn fetch_history(
            &self,
            _account: &str,
            _from: Option<u64>,
            _limit: u32,
        ) -> Result<Vec<HistoryEntry>> {
            Ok(Vec::new())
        }

        async fn fetch_content(
            &self,
            _author: &str,
            _permlink: &str,
        ) -> Result<Option<ContentItem>> {
            if self.fail_content {
                return Err(Error::Transport("content node unreachable".to_string()));
            }
            Ok(self.content.clone())
        }
    }

    /// Remote check fake answering a fixed verdict.
    pub(crate) struct StaticRemote {
        pub answer: bool,
    }

    #[async_trait::async_trait]
    impl RemoteCheckClient for StaticRemote {
        async fn call_remote(
            &self,
            _host: &str,
            _port: u16,
            _path: &str,
            _method: &str,
            _order: &VoteOrder,
        ) -> Result<bool> {
            Ok(self.answer)
        }
    }

    pub(crate) fn post(tags: &[&str], payout: &str) -> ContentItem {
        ContentItem {
            author: "pojan".to_string(),
            permlink: "how-to-detect-potential-abusers".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            total_payout: payout.to_string(),
        }
    }

    pub(crate) fn order() -> VoteOrder {
        VoteOrder {
            delegator: "noisy".to_string(),
            ruleset_name: "safe".to_string(),
            author: "pojan".to_string(),
            permlink: "how-to-detect-potential-abusers".to_string(),
            weight: 1000,
        }
    }

    /// Reason carried by a validation failure; panics on any other error.
    pub(crate) fn reason(result: Result<()>) -> String {
        match result {
            Err(Error::Validation(reason)) => reason,
            other => panic!("expected a validation failure, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_rule() -> Vec<Rule> {
        vec![
            Rule::Tags(TagsRule {
                mode: TagsMode::Allow,
                tags: vec!["steemprojects".to_string(), "blog".to_string()],
            }),
            Rule::Tags(TagsRule {
                mode: TagsMode::Deny,
                tags: vec!["nsfw".to_string()],
            }),
            Rule::Tags(TagsRule {
                mode: TagsMode::Require,
                tags: vec!["steemprojects".to_string()],
            }),
            Rule::Tags(TagsRule {
                mode: TagsMode::Any,
                tags: vec!["blog".to_string()],
            }),
            Rule::Authors(AuthorsRule {
                mode: AuthorsMode::Allow,
                authors: vec!["noisy".to_string()],
            }),
            Rule::Authors(AuthorsRule {
                mode: AuthorsMode::Deny,
                authors: vec!["abuser".to_string()],
            }),
            Rule::Payout(PayoutRule {
                mode: PayoutMode::MoreThan,
                value: 73.0,
            }),
            Rule::Payout(PayoutRule {
                mode: PayoutMode::LessThan,
                value: 100.5,
            }),
            Rule::Payout(PayoutRule {
                mode: PayoutMode::Equal,
                value: 0.0,
            }),
            Rule::CustomRpc(CustomRpcRule {
                rpc_host: "confirmations.example.org".to_string(),
                rpc_port: 8080,
                rpc_path: "/rpc".to_string(),
                rpc_method: "confirm_vote".to_string(),
            }),
        ]
    }

    #[test]
    fn test_wire_round_trip_for_every_variant_and_mode() {
        for rule in every_rule() {
            let wire = serde_json::to_string(&rule).unwrap();
            let decoded: Rule = serde_json::from_str(&wire).unwrap();
            assert_eq!(decoded, rule, "round trip changed {wire}");

            // re-encoding the decoded value is byte-for-byte stable
            let rewire = serde_json::to_string(&decoded).unwrap();
            assert_eq!(rewire, wire);
        }
    }

    #[test]
    fn test_wire_form_is_type_tagged() {
        let wire = serde_json::to_string(&Rule::CustomRpc(CustomRpcRule {
            rpc_host: "h".to_string(),
            rpc_port: 80,
            rpc_path: "/".to_string(),
            rpc_method: "m".to_string(),
        }))
        .unwrap();
        assert!(wire.starts_with(r#"{"type":"custom_rpc""#), "got {wire}");
    }

    #[test]
    fn test_unknown_rule_type_is_rejected() {
        let wire = r#"{"type":"first_post","mode":"allow"}"#;
        assert!(serde_json::from_str::<Rule>(wire).is_err());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let wire = r#"{"type":"authors","mode":"maybe","authors":[]}"#;
        assert!(serde_json::from_str::<Rule>(wire).is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let wire = r#"{"type":"payout","mode":"equal"}"#;
        assert!(serde_json::from_str::<Rule>(wire).is_err());
    }
}
