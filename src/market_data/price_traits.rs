use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::price_model::PriceQuote;
use crate::errors::Result;
use crate::events::AssetRef;

/// External price resolution service. The only operation in the engine
/// that crosses a process boundary.
#[async_trait]
pub trait PriceOracleTrait: Send + Sync {
    /// Resolves the USD rate for an asset. A missing `at` means "now".
    async fn get_usd_rate(
        &self,
        asset: &AssetRef,
        at: Option<DateTime<Utc>>,
    ) -> Result<PriceQuote>;
}
