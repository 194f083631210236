//! History supplier: paginated backward walk over an account's history.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::{LedgerApi, SupplierConfig};
use crate::error::Result;
use crate::ledger::HistoryEntry;
use crate::pipeline::Sink;

/// Streams an account's ledger history, newest to oldest, into a sink.
///
/// Pages are requested backward from the most recent entry. Each page
/// arrives oldest-to-newest and is replayed in reverse, so downstream
/// stages observe strictly descending operation positions with no
/// duplicates across page boundaries. The walk ends when history is
/// exhausted, when the sink signals stop, or with an error when the
/// underlying fetch fails; fetched-but-unprocessed items are discarded,
/// not replayed.
pub struct HistorySupplier {
    api: Arc<dyn LedgerApi>,
    account: String,
    config: SupplierConfig,
}

impl HistorySupplier {
    /// Supplier for `account` backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn LedgerApi>, account: impl Into<String>, config: SupplierConfig) -> Self {
        Self {
            api,
            account: account.into(),
            config,
        }
    }

    /// Run the walk, feeding every history entry into `sink`.
    ///
    /// The next page is only fetched after the current page has fully
    /// drained through the chain.
    #[instrument(skip(self, sink), fields(account = %self.account))]
    pub async fn run<S>(&self, sink: &mut S) -> Result<()>
    where
        S: Sink<HistoryEntry>,
    {
        let mut cursor: Option<u64> = None;
        loop {
            // Never request past the start of history: with the cursor at
            // index c there are exactly c + 1 entries left.
            let limit = match cursor {
                None => self.config.page_size,
                Some(c) => self
                    .config
                    .page_size
                    .min(u32::try_from(c + 1).unwrap_or(u32::MAX)),
            };

            let page = self
                .api
                .fetch_history(&self.account, cursor, limit)
                .await?;
            if page.is_empty() {
                debug!("history exhausted (empty page)");
                return Ok(());
            }

            let fetched = page.len();
            let oldest = page[0].index;
            debug!(fetched, oldest, "fetched history page");

            for entry in page.into_iter().rev() {
                if sink.feed(entry)?.is_stop() {
                    debug!("downstream requested stop");
                    return Ok(());
                }
            }

            if fetched < limit as usize {
                debug!("history exhausted (short page)");
                return Ok(());
            }
            if oldest == 0 {
                debug!("history exhausted (reached first entry)");
                return Ok(());
            }
            cursor = Some(oldest - 1);
        }
    }
}
