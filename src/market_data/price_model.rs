use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A resolved USD rate for one asset at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// USD per one unit of the asset.
    pub rate_usd: Decimal,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}
