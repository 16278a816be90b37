use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::apr::{clamp_apr, compute_apr};
use super::cashflow::CashFlowExtractor;
use crate::constants::{UNIT_EPSILON, USD_EPSILON};
use crate::events::VaultEvent;
use crate::market_data::{PriceCache, PriceOracleTrait};
use crate::snapshot::{apply_event, state_as_of, VaultState};
use crate::valuation::compute_aum;

/// A vault is liquidated when its net contributed capital has returned to
/// zero and its economic value is zero: the anchor formula when a
/// valuation anchor exists, otherwise all position units ~0.
pub fn is_liquidated(state: &VaultState) -> bool {
    if state.net_contributed_usd() >= USD_EPSILON {
        return false;
    }
    match state.last_valuation_usd {
        Some(anchor) => (anchor + state.net_flow_since_valuation_usd).abs() < USD_EPSILON,
        None => state
            .positions
            .values()
            .all(|p| p.units.abs() < UNIT_EPSILON),
    }
}

/// Scans state transitions date-by-date and returns the first date at
/// whose close the vault flips to liquidated, provided capital had been
/// contributed before that point.
pub fn detect_liquidation_date(vault: &str, events: &[VaultEvent]) -> Option<NaiveDate> {
    let mut state = VaultState::new(vault);
    let mut idx = 0;

    while idx < events.len() {
        let date = events[idx].date();
        while idx < events.len() && events[idx].date() == date {
            state = apply_event(state, &events[idx]);
            idx += 1;
        }
        if state.deposited_cum_usd > USD_EPSILON && is_liquidated(&state) {
            return Some(date);
        }
    }

    None
}

/// Recomputes APR from the state exactly one day before the liquidation
/// date: the last economically active snapshot. With no valuation anchor
/// this falls back to mark-to-market at that day's end using cached
/// prices.
pub async fn apr_before_liquidation(
    vault: &str,
    events: &[VaultEvent],
    liquidation_date: NaiveDate,
    oracle: &dyn PriceOracleTrait,
    cache: &PriceCache,
) -> Decimal {
    let day_before = match liquidation_date.pred_opt() {
        Some(d) => d,
        None => return Decimal::ZERO,
    };

    let state = state_as_of(vault, events, liquidation_date);
    let aum = compute_aum(&state, day_before, oracle, cache).await;

    let extractor = CashFlowExtractor::from_events(
        events.iter().take_while(|e| e.date() < liquidation_date),
    );

    let net_contributed = state.net_contributed_usd();
    let pnl = aum + state.withdrawn_cum_usd - state.deposited_cum_usd;
    let roi = if net_contributed > USD_EPSILON {
        pnl / net_contributed
    } else {
        Decimal::ZERO
    };

    let flows = extractor.with_terminal(aum, day_before);
    let elapsed = extractor.days_elapsed(day_before);
    clamp_apr(compute_apr(&flows, elapsed, roi))
}
