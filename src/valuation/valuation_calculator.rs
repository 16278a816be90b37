use chrono::{NaiveDate, TimeZone, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::UNIT_EPSILON;
use crate::market_data::{PriceCache, PriceKey, PriceOracleTrait};
use crate::snapshot::VaultState;

/// Computes a vault's USD value at the end of `as_of`.
///
/// When a valuation anchor exists the value is the rolling formula
/// `last_valuation + net_flow_since_valuation` and no prices are fetched.
/// Otherwise positions are marked to market through the shared price
/// cache, one oracle lookup per `(asset, day)` at most.
///
/// Price failures are never fatal: the last cached rate for the asset is
/// reused when available, otherwise the position contributes zero.
pub async fn compute_aum(
    state: &VaultState,
    as_of: NaiveDate,
    oracle: &dyn PriceOracleTrait,
    cache: &PriceCache,
) -> Decimal {
    if let Some(anchor) = state.last_valuation_usd {
        return anchor + state.net_flow_since_valuation_usd;
    }

    let day_end = Utc.from_utc_datetime(
        &as_of
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| as_of.and_hms_opt(0, 0, 0).unwrap()),
    );

    let mut total = Decimal::ZERO;
    for position in state.positions.values() {
        if position.units.abs() < UNIT_EPSILON {
            continue;
        }

        let key = PriceKey::new(&position.asset, as_of);
        let rate = match cache.get(&key) {
            Some(rate) => rate,
            None => match oracle.get_usd_rate(&position.asset, Some(day_end)).await {
                Ok(quote) => {
                    cache.insert(key, quote.rate_usd);
                    quote.rate_usd
                }
                Err(e) => match cache.last_rate(&position.asset) {
                    Some(stale) => {
                        warn!(
                            "Price lookup failed for {} on {} ({}). Reusing last cached rate.",
                            position.asset.symbol, as_of, e
                        );
                        stale
                    }
                    None => {
                        debug!(
                            "No price available for {} on {}. Position valued at zero.",
                            position.asset.symbol, as_of
                        );
                        Decimal::ZERO
                    }
                },
            },
        };

        total += position.units * rate;
    }

    total
}
