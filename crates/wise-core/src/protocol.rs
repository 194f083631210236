//! Versioned protocol decoding: raw ledger envelopes to typed commands.
//!
//! Each protocol version knows how to recognize its own envelope inside
//! a generic `custom_json` operation and turn it into typed commands
//! with full ledger provenance. Operations that are not the protocol's
//! concern decode to nothing — malformed user input must never abort a
//! history walk.

pub mod v2;

pub use v2::V2Handler;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{OperationPayload, OperationPosition, Positioned, RawTransaction};
use crate::rules::Ruleset;

/// A voter's request to cast a vote on the delegator's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteOrder {
    /// Account whose voting authority is being exercised.
    pub delegator: String,
    /// Name of the ruleset the order claims to satisfy.
    pub ruleset_name: String,
    /// Author of the content to vote on.
    pub author: String,
    /// Permlink of the content to vote on.
    pub permlink: String,
    /// Signed vote weight; negative weight is a flag.
    pub weight: i16,
}

/// A decoded protocol command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the target voter's rulesets wholesale. Carries only one
    /// voter's rulesets; multi-voter envelopes are split by the decoder.
    SetRules {
        /// The rulesets now in force for the voter.
        rulesets: Vec<Ruleset>,
    },
    /// Ask the delegator to cast a vote, subject to rule validation.
    SendVoteorder(VoteOrder),
}

/// A decoded command together with its ledger provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedOperation {
    /// Where in the ledger the command was found.
    pub position: OperationPosition,
    /// Id of the transaction that carried it.
    pub transaction_id: String,
    /// Timestamp of the carrying block.
    pub timestamp: DateTime<Utc>,
    /// Account authorized to vote under the rules.
    pub voter: String,
    /// Account whose voting authority is delegated.
    pub delegator: String,
    /// The command itself.
    pub command: Command,
}

impl Positioned for DecodedOperation {
    fn position(&self) -> OperationPosition {
        self.position
    }
}

/// One protocol version's decoder.
pub trait VersionHandler: Send + Sync {
    /// Decode a single raw operation.
    ///
    /// `None` means the operation is not this version's concern — wrong
    /// envelope, pre-activation height, or a payload that fails the
    /// schema. It is never an error.
    fn handle(
        &self,
        transaction: &RawTransaction,
        operation_num: u16,
        payload: &OperationPayload,
    ) -> Option<Vec<DecodedOperation>>;
}

/// Ordered registry of protocol versions, newest first.
pub struct Protocol {
    handlers: Vec<Box<dyn VersionHandler>>,
}

impl Protocol {
    /// Registry with every supported version (currently V2).
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: vec![Box::new(V2Handler::new())],
        }
    }

    /// Decode every recognized command in a transaction, in operation
    /// order. Unrecognized operations are skipped.
    #[must_use]
    pub fn decode(&self, transaction: &RawTransaction) -> Vec<DecodedOperation> {
        let mut out = Vec::new();
        for (operation_num, payload) in &transaction.operations {
            for handler in &self.handlers {
                if let Some(mut ops) = handler.handle(transaction, *operation_num, payload) {
                    out.append(&mut ops);
                    break;
                }
            }
        }
        out
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::new()
    }
}
