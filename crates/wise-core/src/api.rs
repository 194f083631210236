//! Injected collaborator interfaces to the external ledger.
//!
//! The core performs no I/O of its own: the raw RPC client, content
//! lookups and remote rule checks are supplied through these traits,
//! which also makes every async path substitutable with deterministic
//! fakes in tests.

use crate::error::Result;
use crate::ledger::{ContentItem, HistoryEntry};
use crate::protocol::VoteOrder;

/// Protocol-fixed cap on the number of history entries one page may
/// request.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Read access to the ledger.
#[async_trait::async_trait]
pub trait LedgerApi: Send + Sync {
    /// Fetch one page of account history.
    ///
    /// The page ends at history index `from` (inclusive), or at the most
    /// recent entry when `from` is `None`, and holds at most `limit`
    /// entries ordered oldest to newest.
    async fn fetch_history(
        &self,
        account: &str,
        from: Option<u64>,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>>;

    /// Fetch the content item a vote order targets.
    ///
    /// Returns `Ok(None)` when no such content exists; `Err` is reserved
    /// for transport failures.
    async fn fetch_content(&self, author: &str, permlink: &str) -> Result<Option<ContentItem>>;
}

/// Outbound calls to delegator-operated rule check endpoints.
#[async_trait::async_trait]
pub trait RemoteCheckClient: Send + Sync {
    /// Ask the endpoint at `host:port` to confirm a vote order.
    ///
    /// Returns the endpoint's boolean verdict; `Err` means the call
    /// itself failed and aborts the validation.
    async fn call_remote(
        &self,
        host: &str,
        port: u16,
        path: &str,
        method: &str,
        order: &VoteOrder,
    ) -> Result<bool>;
}

/// Paging configuration for the history supplier.
#[derive(Debug, Clone)]
pub struct SupplierConfig {
    /// Page size to request, capped at [`MAX_PAGE_SIZE`].
    pub page_size: u32,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl SupplierConfig {
    /// Set the page size, clamping to [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(SupplierConfig::default().page_size, MAX_PAGE_SIZE);
        assert_eq!(
            SupplierConfig::default().with_page_size(5000).page_size,
            MAX_PAGE_SIZE
        );
        assert_eq!(SupplierConfig::default().with_page_size(0).page_size, 1);
        assert_eq!(SupplierConfig::default().with_page_size(50).page_size, 50);
    }
}
