use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::events::AssetRef;

/// One held asset position inside a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub asset: AssetRef,
    pub units: Decimal,
}

// Represents the derived state of a vault after replaying its ledger.
// Ephemeral: rebuilt per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultState {
    pub vault: String,

    /// asset symbol -> position
    #[serde(default)]
    pub positions: HashMap<String, Position>,

    #[serde(default)]
    pub deposited_cum_usd: Decimal,
    #[serde(default)]
    pub withdrawn_cum_usd: Decimal,

    /// Last externally asserted USD valuation, if any.
    pub last_valuation_usd: Option<Decimal>,
    /// Net deposits minus withdrawals processed after the last valuation.
    #[serde(default)]
    pub net_flow_since_valuation_usd: Decimal,

    pub first_deposit_date: Option<NaiveDate>,
}

impl VaultState {
    pub fn new(vault: &str) -> Self {
        VaultState {
            vault: vault.to_string(),
            positions: HashMap::new(),
            deposited_cum_usd: Decimal::ZERO,
            withdrawn_cum_usd: Decimal::ZERO,
            last_valuation_usd: None,
            net_flow_since_valuation_usd: Decimal::ZERO,
            first_deposit_date: None,
        }
    }

    /// Capital currently contributed: cumulative deposits minus withdrawals.
    pub fn net_contributed_usd(&self) -> Decimal {
        self.deposited_cum_usd - self.withdrawn_cum_usd
    }
}
