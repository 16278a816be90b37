use async_trait::async_trait;

use super::event_model::VaultEvent;
use crate::errors::Result;

/// Read-only access to the vault event store. Implemented by the
/// persistence layer; the engine never writes back through it.
#[async_trait]
pub trait VaultLedgerTrait: Send + Sync {
    /// Returns all recorded events for a vault, in no particular order.
    /// An unknown vault yields `LedgerError::VaultNotFound`; a known vault
    /// with no activity yields an empty list.
    async fn list_events(&self, vault: &str) -> Result<Vec<VaultEvent>>;

    /// Names of all vaults known to the ledger.
    async fn list_vaults(&self) -> Result<Vec<String>>;
}
