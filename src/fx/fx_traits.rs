use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Converts a USD amount to VND. Never fails: an unresolvable rate
    /// falls back to the fixed `FALLBACK_USD_VND_RATE`.
    async fn usd_to_vnd(&self, amount: Decimal, at: Option<DateTime<Utc>>) -> Decimal;
}
