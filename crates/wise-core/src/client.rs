//! High-level facade tying supplier, decoder, store and validator
//! together.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::{LedgerApi, RemoteCheckClient, SupplierConfig};
use crate::error::Result;
use crate::ledger::OperationPosition;
use crate::pipeline::{
    Control, DecodeStage, HistorySupplier, Limiter, PositionCutoffFilter, PositionFilterMode,
    TakerSink,
};
use crate::protocol::{Command, DecodedOperation, Protocol, VoteOrder};
use crate::store::RulesetStore;
use crate::validator::{Validator, Verdict};

/// Entry point for the delegated-voting core.
///
/// Owns the protocol registry and the ruleset store; the ledger and
/// remote check collaborators are injected at construction.
pub struct Wise {
    api: Arc<dyn LedgerApi>,
    remote: Arc<dyn RemoteCheckClient>,
    protocol: Arc<Protocol>,
    store: RulesetStore,
    supplier_config: SupplierConfig,
}

impl Wise {
    /// Build the core around the injected collaborators.
    #[must_use]
    pub fn new(api: Arc<dyn LedgerApi>, remote: Arc<dyn RemoteCheckClient>) -> Self {
        Self {
            api,
            remote,
            protocol: Arc::new(Protocol::new()),
            store: RulesetStore::new(),
            supplier_config: SupplierConfig::default(),
        }
    }

    /// Override the history paging configuration.
    #[must_use]
    pub fn with_supplier_config(mut self, config: SupplierConfig) -> Self {
        self.supplier_config = config;
        self
    }

    /// The ruleset store backing validations.
    #[must_use]
    pub fn store(&self) -> &RulesetStore {
        &self.store
    }

    /// The protocol registry used for decoding.
    #[must_use]
    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Load an account's decoded protocol operations, newest first.
    ///
    /// The walk stops early once it reaches `until` (exclusive — the
    /// operation at `until` itself is not emitted) or after `limit`
    /// decoded operations.
    #[instrument(skip(self))]
    pub async fn load_operations(
        &self,
        account: &str,
        until: Option<OperationPosition>,
        limit: Option<usize>,
    ) -> Result<Vec<DecodedOperation>> {
        let mut out: Vec<DecodedOperation> = Vec::new();
        {
            let taker = TakerSink::new(|op: DecodedOperation| {
                out.push(op);
                Ok(Control::Continue)
            });
            let limiter = Limiter::new(limit.unwrap_or(usize::MAX), taker);
            let decode = DecodeStage::new(Arc::clone(&self.protocol), limiter);
            let mut head = PositionCutoffFilter::new(
                PositionFilterMode::Above,
                until.unwrap_or_default(),
                decode,
            );

            HistorySupplier::new(
                Arc::clone(&self.api),
                account,
                self.supplier_config.clone(),
            )
            .run(&mut head)
            .await?;
        }
        debug!(count = out.len(), "loaded decoded operations");
        Ok(out)
    }

    /// Stream a delegator's history and apply every decoded `SetRules`
    /// to the store, oldest first. Returns the number of applied
    /// commands.
    ///
    /// Pass the position of the last already-synced operation as
    /// `until` to make the walk incremental.
    #[instrument(skip(self))]
    pub async fn sync_rules(
        &self,
        delegator: &str,
        until: Option<OperationPosition>,
    ) -> Result<usize> {
        let operations = self.load_operations(delegator, until, None).await?;

        let mut applied = 0;
        for op in operations.iter().rev() {
            if matches!(op.command, Command::SetRules { .. }) {
                self.store.apply(op).await;
                applied += 1;
            }
        }
        debug!(applied, "synced rulesets");
        Ok(applied)
    }

    /// Validate a vote order sent by `voter` as of ledger position `at`.
    pub async fn validate_vote_order(
        &self,
        voter: &str,
        order: &VoteOrder,
        at: OperationPosition,
    ) -> Result<Verdict> {
        Validator::new(self.api.as_ref(), self.remote.as_ref(), &self.store)
            .validate(voter, order, at)
            .await
    }
}
