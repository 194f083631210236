//! Vote-order validation against the ruleset in force.

use tracing::{debug, instrument};

use crate::api::{LedgerApi, RemoteCheckClient};
use crate::error::{Error, Result};
use crate::ledger::OperationPosition;
use crate::protocol::VoteOrder;
use crate::rules::ValidationContext;
use crate::store::RulesetStore;

/// Native vote-weight magnitude bound of the ledger.
pub const MAX_WEIGHT: i16 = 10_000;

/// Outcome of validating one vote order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every rule of the resolved ruleset passed.
    Passed,
    /// Validation failed; carries the first failure's reason.
    Failed {
        /// Human-readable reason for the failure.
        reason: String,
    },
}

impl Verdict {
    /// Whether the vote order is permitted.
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    fn failed(reason: impl Into<String>) -> Self {
        Verdict::Failed {
            reason: reason.into(),
        }
    }
}

/// Validates vote orders against the store's state as of a ledger
/// position.
///
/// Each validation owns a fresh [`ValidationContext`], so independent
/// validations may run concurrently; the store is only read.
pub struct Validator<'a> {
    api: &'a dyn LedgerApi,
    remote: &'a dyn RemoteCheckClient,
    store: &'a RulesetStore,
}

impl<'a> Validator<'a> {
    /// Validator over `store` using the given collaborators.
    #[must_use]
    pub fn new(
        api: &'a dyn LedgerApi,
        remote: &'a dyn RemoteCheckClient,
        store: &'a RulesetStore,
    ) -> Self {
        Self { api, remote, store }
    }

    /// Validate `order` sent by `voter`, as of ledger position `at`.
    ///
    /// Every expected negative — out-of-range weight, unknown ruleset,
    /// failing rule, missing content — comes back as a
    /// [`Verdict::Failed`]; `Err` is reserved for transport and remote
    /// faults.
    #[instrument(skip(self, order), fields(delegator = %order.delegator, ruleset = %order.ruleset_name))]
    pub async fn validate(
        &self,
        voter: &str,
        order: &VoteOrder,
        at: OperationPosition,
    ) -> Result<Verdict> {
        if order.weight.saturating_abs() > MAX_WEIGHT {
            return Ok(Verdict::failed(format!(
                "weight {} exceeds the ledger bound of {MAX_WEIGHT}",
                order.weight
            )));
        }

        let Some(ruleset) = self
            .store
            .resolve(&order.delegator, voter, &order.ruleset_name, at)
            .await
        else {
            return Ok(Verdict::failed(format!(
                "no ruleset \"{}\" for voter {voter} from delegator {}",
                order.ruleset_name, order.delegator
            )));
        };

        let mut context = ValidationContext::new(self.api, self.remote, order);
        for rule in &ruleset.rules {
            match rule.validate(order, &mut context).await {
                Ok(()) => {}
                Err(Error::Validation(reason)) => {
                    debug!(rule = rule.kind(), %reason, "rule failed");
                    return Ok(Verdict::Failed { reason });
                }
                Err(other) => return Err(other),
            }
        }

        debug!(rules = ruleset.rules.len(), "vote order passed");
        Ok(Verdict::Passed)
    }
}
