use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Vault '{0}' not found")]
    VaultNotFound(String),

    #[error("Ledger read failed: {0}")]
    ReadFailed(String),
}
