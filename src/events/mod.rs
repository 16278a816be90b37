pub mod event_model;
pub mod ledger_errors;
pub mod ledger_traits;

pub use event_model::{sort_events, AssetRef, AssetType, EventKind, VaultEvent};
pub use ledger_errors::LedgerError;
pub use ledger_traits::VaultLedgerTrait;
