use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::fx_traits::FxServiceTrait;
use crate::constants::FALLBACK_USD_VND_RATE;
use crate::events::{AssetRef, AssetType};
use crate::market_data::PriceOracleTrait;

pub struct FxService {
    oracle: Arc<dyn PriceOracleTrait>,
}

impl FxService {
    pub fn new(oracle: Arc<dyn PriceOracleTrait>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn usd_to_vnd(&self, amount: Decimal, at: Option<DateTime<Utc>>) -> Decimal {
        let vnd = AssetRef::new(AssetType::Currency, "VND");
        match self.oracle.get_usd_rate(&vnd, at).await {
            Ok(quote) if quote.rate_usd > Decimal::ZERO => amount / quote.rate_usd,
            Ok(quote) => {
                warn!(
                    "Oracle returned non-positive USD rate {} for VND, using fallback rate",
                    quote.rate_usd
                );
                amount * FALLBACK_USD_VND_RATE
            }
            Err(e) => {
                warn!("USD->VND rate lookup failed ({}), using fallback rate", e);
                amount * FALLBACK_USD_VND_RATE
            }
        }
    }
}
