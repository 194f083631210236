//! Per-validation content access with a single lazy cache slot.

use crate::api::{LedgerApi, RemoteCheckClient};
use crate::error::{Error, Result};
use crate::ledger::ContentItem;
use crate::protocol::VoteOrder;

/// Scoped accessor used by every rule during one validation attempt.
///
/// A context is created per vote order and discarded with the verdict;
/// it exclusively owns the one cache slot for the fetched content item,
/// so the content is fetched at most once no matter how many rules need
/// it, and nothing is ever shared across vote orders.
pub struct ValidationContext<'a> {
    api: &'a dyn LedgerApi,
    remote: &'a dyn RemoteCheckClient,
    order: &'a VoteOrder,
    content: Option<ContentItem>,
}

impl<'a> ValidationContext<'a> {
    /// Context for validating `order`.
    #[must_use]
    pub fn new(
        api: &'a dyn LedgerApi,
        remote: &'a dyn RemoteCheckClient,
        order: &'a VoteOrder,
    ) -> Self {
        Self {
            api,
            remote,
            order,
            content: None,
        }
    }

    /// The vote order under validation.
    #[must_use]
    pub fn order(&self) -> &VoteOrder {
        self.order
    }

    /// The remote check client, for rules that delegate their verdict.
    #[must_use]
    pub fn remote(&self) -> &dyn RemoteCheckClient {
        self.remote
    }

    /// Fetch (once) and cache the content item the vote order targets.
    ///
    /// A missing content item is a validation failure — a rule about a
    /// nonexistent post cannot be satisfied — while transport faults
    /// propagate unchanged.
    pub async fn content(&mut self) -> Result<&ContentItem> {
        match &mut self.content {
            Some(item) => Ok(item),
            slot => {
                let fetched = self
                    .api
                    .fetch_content(&self.order.author, &self.order.permlink)
                    .await?;
                let item = fetched.ok_or_else(|| {
                    Error::Validation(format!(
                        "content @{}/{} does not exist",
                        self.order.author, self.order.permlink
                    ))
                })?;
                Ok(slot.insert(item))
            }
        }
    }
}
