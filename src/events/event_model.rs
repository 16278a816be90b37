use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad asset category, part of the composite price-cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Currency,
    Crypto,
    Stock,
    Other,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Currency => "CURRENCY",
            AssetType::Crypto => "CRYPTO",
            AssetType::Stock => "STOCK",
            AssetType::Other => "OTHER",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to a priceable asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub symbol: String,
}

impl AssetRef {
    pub fn new(asset_type: AssetType, symbol: &str) -> Self {
        Self {
            asset_type,
            symbol: symbol.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Deposit,
    Withdraw,
    Valuation,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Deposit => "DEPOSIT",
            EventKind::Withdraw => "WITHDRAW",
            EventKind::Valuation => "VALUATION",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Ok(EventKind::Deposit),
            "WITHDRAW" => Ok(EventKind::Withdraw),
            "VALUATION" => Ok(EventKind::Valuation),
            other => Err(format!("Unknown event kind: {}", other)),
        }
    }
}

/// One immutable ledger entry for a vault. Produced by the recording layer,
/// consumed only by replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEvent {
    pub id: String,
    pub vault: String,
    pub kind: EventKind,
    pub asset: AssetRef,
    /// Asset units moved by this event. Missing or malformed values are
    /// coerced to zero at replay time.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// USD value of this event at recording time.
    #[serde(default)]
    pub usd_value: Option<Decimal>,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl VaultEvent {
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    pub fn usd_value_or_zero(&self) -> Decimal {
        self.usd_value.unwrap_or(Decimal::ZERO)
    }

    pub fn date(&self) -> NaiveDate {
        self.at.date_naive()
    }
}

/// Sorts events ascending by timestamp. The sort is stable, so ledger
/// ordering breaks ties.
pub fn sort_events(events: &mut [VaultEvent]) {
    events.sort_by_key(|e| e.at);
}
