//! Version 2 ("wise") wire format.
//!
//! The envelope is a `custom_json` operation with id [`CUSTOM_JSON_ID`]
//! authorized by exactly one posting authority. Its `json` field holds
//! one of two payload shapes, discriminated by `name`:
//!
//! ```json
//! { "name": "set_rules", "rulesets": [ { "voter": "...", "name": "...", "rules": [...] } ] }
//! { "name": "send_voteorder", "voteorder": { "delegator": "...", ... } }
//! ```
//!
//! Decoding is strictly typed: a payload that does not match the schema
//! is skipped, never an error.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::ledger::{CustomJsonOperation, OperationPayload, OperationPosition, RawTransaction};
use crate::protocol::{Command, DecodedOperation, VersionHandler, VoteOrder};
use crate::rules::{Rule, Ruleset};

/// Envelope id this version recognizes.
pub const CUSTOM_JSON_ID: &str = "wise";

/// Ledger height at which V2 activated. Operations at or below this
/// height are ignored even if their envelope happens to match.
pub const ACTIVATION_BLOCK: u64 = 22_710_498;

/// Decoder/encoder for the V2 wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct V2Handler;

impl V2Handler {
    /// Create the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Encode a decoded operation back into its `custom_json` envelope.
    ///
    /// The sender placed in `required_posting_auths` is the delegator
    /// for `SetRules` and the voter for `SendVoteorder`, matching what
    /// the decoder expects back.
    pub fn serialize(&self, op: &DecodedOperation) -> Result<CustomJsonOperation> {
        let (sender, payload) = match &op.command {
            Command::SetRules { rulesets } => (
                op.delegator.clone(),
                WisePayload::SetRules {
                    rulesets: rulesets
                        .iter()
                        .map(|ruleset| WireRuleset {
                            voter: op.voter.clone(),
                            name: ruleset.name.clone(),
                            rules: ruleset.rules.clone(),
                        })
                        .collect(),
                },
            ),
            Command::SendVoteorder(order) => (
                op.voter.clone(),
                WisePayload::SendVoteorder {
                    voteorder: WireVoteorder {
                        delegator: order.delegator.clone(),
                        ruleset_name: order.ruleset_name.clone(),
                        author: order.author.clone(),
                        permlink: order.permlink.clone(),
                        weight: order.weight.saturating_abs(),
                        vote_type: if order.weight < 0 {
                            VoteType::Flag
                        } else {
                            VoteType::Upvote
                        },
                    },
                },
            ),
        };

        let json = serde_json::to_string(&payload).map_err(|e| Error::Encode(e.to_string()))?;
        Ok(CustomJsonOperation {
            id: CUSTOM_JSON_ID.to_string(),
            json,
            required_posting_auths: vec![sender],
        })
    }

    fn split_set_rules(
        transaction: &RawTransaction,
        position: OperationPosition,
        delegator: &str,
        rulesets: Vec<WireRuleset>,
    ) -> Vec<DecodedOperation> {
        // Group by voter, preserving first-appearance order: one command
        // per distinct voter, each carrying only that voter's rulesets.
        let mut per_voter: Vec<(String, Vec<Ruleset>)> = Vec::new();
        for wire in rulesets {
            let WireRuleset { voter, name, rules } = wire;
            let ruleset = Ruleset { name, rules };
            match per_voter.iter_mut().find(|(v, _)| *v == voter) {
                Some((_, list)) => list.push(ruleset),
                None => per_voter.push((voter, vec![ruleset])),
            }
        }

        per_voter
            .into_iter()
            .map(|(voter, rulesets)| DecodedOperation {
                position,
                transaction_id: transaction.transaction_id.clone(),
                timestamp: transaction.timestamp,
                voter,
                delegator: delegator.to_string(),
                command: Command::SetRules { rulesets },
            })
            .collect()
    }

    fn voteorder_operation(
        transaction: &RawTransaction,
        position: OperationPosition,
        voter: &str,
        wire: WireVoteorder,
    ) -> DecodedOperation {
        let weight = match wire.vote_type {
            VoteType::Flag => -wire.weight,
            VoteType::Upvote => wire.weight,
        };
        DecodedOperation {
            position,
            transaction_id: transaction.transaction_id.clone(),
            timestamp: transaction.timestamp,
            voter: voter.to_string(),
            delegator: wire.delegator.clone(),
            command: Command::SendVoteorder(VoteOrder {
                delegator: wire.delegator,
                ruleset_name: wire.ruleset_name,
                author: wire.author,
                permlink: wire.permlink,
                weight,
            }),
        }
    }
}

impl VersionHandler for V2Handler {
    fn handle(
        &self,
        transaction: &RawTransaction,
        operation_num: u16,
        payload: &OperationPayload,
    ) -> Option<Vec<DecodedOperation>> {
        if transaction.block_num <= ACTIVATION_BLOCK {
            return None;
        }

        let OperationPayload::CustomJson(envelope) = payload else {
            return None;
        };
        if envelope.id != CUSTOM_JSON_ID {
            return None;
        }
        // Ambiguous authorization is unsafe to accept.
        if envelope.required_posting_auths.len() != 1 {
            return None;
        }
        let sender = &envelope.required_posting_auths[0];

        let parsed: WisePayload = match serde_json::from_str(&envelope.json) {
            Ok(payload) => payload,
            Err(err) => {
                trace!(%err, transaction_id = %transaction.transaction_id, "skipping malformed wise payload");
                return None;
            }
        };

        let position = transaction.position_of(operation_num);
        match parsed {
            WisePayload::SetRules { rulesets } => Some(Self::split_set_rules(
                transaction,
                position,
                sender,
                rulesets,
            )),
            WisePayload::SendVoteorder { voteorder } => Some(vec![Self::voteorder_operation(
                transaction,
                position,
                sender,
                voteorder,
            )]),
        }
    }
}

// ============================================================================
// Wire schema
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
enum WisePayload {
    SetRules { rulesets: Vec<WireRuleset> },
    SendVoteorder { voteorder: WireVoteorder },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireRuleset {
    voter: String,
    name: String,
    rules: Vec<Rule>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireVoteorder {
    delegator: String,
    ruleset_name: String,
    author: String,
    permlink: String,
    weight: i16,
    #[serde(rename = "type")]
    vote_type: VoteType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum VoteType {
    Upvote,
    Flag,
}
