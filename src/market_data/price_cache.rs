use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::events::{AssetRef, AssetType};

/// Composite cache key. Prices are treated as time-invariant once fetched
/// for a given day, so entries are never invalidated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceKey {
    pub asset_type: AssetType,
    pub symbol: String,
    pub date: NaiveDate,
}

impl PriceKey {
    pub fn new(asset: &AssetRef, date: NaiveDate) -> Self {
        Self {
            asset_type: asset.asset_type,
            symbol: asset.symbol.clone(),
            date,
        }
    }
}

/// Process-wide, read-mostly cache of daily USD rates. Writes are
/// idempotent per key, so concurrent duplicate inserts are harmless.
#[derive(Debug, Default)]
pub struct PriceCache {
    rates: DashMap<PriceKey, Decimal>,
    last_rates: DashMap<(AssetType, String), Decimal>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PriceKey) -> Option<Decimal> {
        self.rates.get(key).map(|r| *r.value())
    }

    pub fn insert(&self, key: PriceKey, rate: Decimal) {
        self.last_rates
            .insert((key.asset_type, key.symbol.clone()), rate);
        self.rates.insert(key, rate);
    }

    /// Last successfully cached rate for an asset, regardless of date.
    /// Used when a lookup fails mid-series.
    pub fn last_rate(&self, asset: &AssetRef) -> Option<Decimal> {
        self.last_rates
            .get(&(asset.asset_type, asset.symbol.clone()))
            .map(|r| *r.value())
    }
}
