//! Ruleset store: position-ordered `SetRules` state per delegation
//! pair, with as-of resolution.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::ledger::OperationPosition;
use crate::protocol::{Command, DecodedOperation};
use crate::rules::Ruleset;

/// One applied `SetRules` command for a pair.
#[derive(Debug, Clone)]
struct StoredSetRules {
    position: OperationPosition,
    rulesets: Vec<Ruleset>,
}

/// In-memory ruleset state derived from decoded `SetRules` commands.
///
/// Entries are keyed by `(delegator, voter)` and kept ordered by ledger
/// position. Writes are serialized by the lock while an in-flight
/// validation reads a snapshot frozen at its own position, so a later
/// `SetRules` never affects an earlier vote order.
#[derive(Debug, Default)]
pub struct RulesetStore {
    entries: RwLock<HashMap<(String, String), Vec<StoredSetRules>>>,
}

impl RulesetStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a decoded `SetRules` command.
    ///
    /// Commands arriving out of ledger order are inserted at their
    /// position; re-applying the same position replaces the previous
    /// entry (last writer wins). Non-`SetRules` commands are ignored.
    pub async fn apply(&self, op: &DecodedOperation) {
        let Command::SetRules { rulesets } = &op.command else {
            return;
        };

        let mut entries = self.entries.write().await;
        let log = entries
            .entry((op.delegator.clone(), op.voter.clone()))
            .or_default();
        let entry = StoredSetRules {
            position: op.position,
            rulesets: rulesets.clone(),
        };
        match log.binary_search_by(|existing| existing.position.cmp(&op.position)) {
            Ok(i) => log[i] = entry,
            Err(i) => log.insert(i, entry),
        }
        debug!(
            delegator = %op.delegator,
            voter = %op.voter,
            position = %op.position,
            rulesets = rulesets.len(),
            "applied set_rules"
        );
    }

    /// Resolve the ruleset named `name` for `(delegator, voter)` as of
    /// position `at`: the newest `SetRules` at or before `at` decides,
    /// never a later one. `None` when the pair has no rules yet or the
    /// name is absent from the deciding entry.
    pub async fn resolve(
        &self,
        delegator: &str,
        voter: &str,
        name: &str,
        at: OperationPosition,
    ) -> Option<Ruleset> {
        let entries = self.entries.read().await;
        let log = entries.get(&(delegator.to_string(), voter.to_string()))?;
        log.iter()
            .rev()
            .find(|entry| entry.position <= at)
            .and_then(|entry| entry.rulesets.iter().find(|ruleset| ruleset.name == name))
            .cloned()
    }

    /// All rulesets in force for `(delegator, voter)` as of `at`.
    pub async fn rulesets_at(
        &self,
        delegator: &str,
        voter: &str,
        at: OperationPosition,
    ) -> Vec<Ruleset> {
        let entries = self.entries.read().await;
        entries
            .get(&(delegator.to_string(), voter.to_string()))
            .and_then(|log| log.iter().rev().find(|entry| entry.position <= at))
            .map(|entry| entry.rulesets.clone())
            .unwrap_or_default()
    }
}
