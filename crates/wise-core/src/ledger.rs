//! Ledger primitives: positions, raw transactions, envelopes and content.
//!
//! These types mirror what the external ledger client hands back; the
//! decoder and pipeline operate on them without further I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Positions
// ============================================================================

/// Total-order coordinate of a single operation in the ledger.
///
/// Comparison is lexicographic in `(block_num, transaction_num,
/// operation_num)` order; the derived `Ord` relies on this exact field
/// order. Positions are strictly increasing within one account's
/// append-only history, which makes them usable both as a point-in-time
/// cutoff and as the ordering guarantee of the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct OperationPosition {
    /// Block number.
    pub block_num: u64,
    /// Transaction index within the block.
    pub transaction_num: u32,
    /// Operation index within the transaction.
    pub operation_num: u16,
}

impl OperationPosition {
    /// Create a position from its three coordinates.
    #[must_use]
    pub fn new(block_num: u64, transaction_num: u32, operation_num: u16) -> Self {
        Self {
            block_num,
            transaction_num,
            operation_num,
        }
    }
}

impl std::fmt::Display for OperationPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.block_num, self.transaction_num, self.operation_num
        )
    }
}

/// Anything that carries a ledger position.
///
/// Implemented by raw history items and decoded operations so position
/// filters can run on either side of the decode stage.
pub trait Positioned {
    /// The ledger position of this item.
    fn position(&self) -> OperationPosition;
}

// ============================================================================
// Raw history
// ============================================================================

/// A batch of operations sharing one transaction id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Ledger-assigned transaction id.
    pub transaction_id: String,
    /// Block the transaction was included in.
    pub block_num: u64,
    /// Transaction index within that block.
    pub transaction_num: u32,
    /// Block timestamp (UTC).
    pub timestamp: DateTime<Utc>,
    /// Operations carried by the transaction, ordered by operation index.
    pub operations: Vec<(u16, OperationPayload)>,
}

impl RawTransaction {
    /// Position of the operation at `operation_num` within this transaction.
    #[must_use]
    pub fn position_of(&self, operation_num: u16) -> OperationPosition {
        OperationPosition::new(self.block_num, self.transaction_num, operation_num)
    }
}

impl Positioned for RawTransaction {
    fn position(&self) -> OperationPosition {
        self.position_of(0)
    }
}

/// One account-history record: the scalar history index plus the
/// transaction recorded there.
///
/// `index` is the absolute position of the record in the account's
/// append-only history and is what pagination cursors count in;
/// [`OperationPosition`] stays the ordering coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Absolute index of this record in the account's history.
    pub index: u64,
    /// The transaction recorded at this index.
    pub transaction: RawTransaction,
}

impl Positioned for HistoryEntry {
    fn position(&self) -> OperationPosition {
        self.transaction.position()
    }
}

/// Payload of a single ledger operation, keyed by its operation-type
/// string. Only `custom_json` is ever decoded; every other type is
/// carried through as [`OperationPayload::Other`] and skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OperationPayload {
    /// A `custom_json` operation carrying an opaque JSON envelope.
    CustomJson(CustomJsonOperation),
    /// Any other operation type.
    #[serde(other)]
    Other,
}

/// The generic `custom_json` envelope carried inside a ledger operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomJsonOperation {
    /// Protocol identifier the envelope is addressed to.
    pub id: String,
    /// Serialized protocol payload.
    pub json: String,
    /// Accounts whose posting authority signed the operation. The
    /// protocol only accepts envelopes with exactly one entry.
    pub required_posting_auths: Vec<String>,
}

// ============================================================================
// Content
// ============================================================================

/// The post/item a vote order targets, fetched by author + permlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Author account of the content.
    pub author: String,
    /// Permlink identifying the content under its author.
    pub permlink: String,
    /// Tags attached to the content.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw total payout, a decimal followed by a currency suffix,
    /// e.g. `"73.054 SBD"`.
    pub total_payout: String,
}
