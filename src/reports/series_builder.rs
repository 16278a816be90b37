use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::series_model::DailySeriesPoint;
use crate::constants::{DECIMAL_PRECISION, USD_EPSILON};
use crate::events::VaultEvent;
use crate::market_data::{PriceCache, PriceOracleTrait};
use crate::performance::{clamp_apr, compute_apr, CashFlowExtractor, TwrrChain};
use crate::snapshot::{apply_event, VaultState};
use crate::valuation::compute_aum;

/// Builds one vault's daily series from its first event through `end`,
/// one point per calendar day.
///
/// Events must be pre-sorted ascending by timestamp. The series always
/// starts at the vault's inception; callers slice the result when a
/// narrower window was requested, so APR stays anchored to the true
/// first deposit.
pub async fn build_daily_series(
    vault: &str,
    events: &[VaultEvent],
    oracle: &dyn PriceOracleTrait,
    cache: &PriceCache,
    end: NaiveDate,
) -> Vec<DailySeriesPoint> {
    let start = match events.first() {
        Some(first) => first.date(),
        None => return Vec::new(),
    };
    if start > end {
        return Vec::new();
    }

    let mut state = VaultState::new(vault);
    let mut extractor = CashFlowExtractor::new();
    let mut chain = TwrrChain::new();
    let mut series: Vec<DailySeriesPoint> = Vec::new();
    let mut prev_apr = Decimal::ZERO;
    let mut idx = 0;
    let mut day = start;

    loop {
        while idx < events.len() && events[idx].date() <= day {
            state = apply_event(state, &events[idx]);
            extractor.absorb(&events[idx]);
            idx += 1;
        }

        let aum = compute_aum(&state, day, oracle, cache).await;
        let deposits_cum = state.deposited_cum_usd;
        let withdrawals_cum = state.withdrawn_cum_usd;
        let pnl = aum + withdrawals_cum - deposits_cum;
        let net_contributed = deposits_cum - withdrawals_cum;
        let roi_percent = if net_contributed > USD_EPSILON {
            pnl / net_contributed * dec!(100)
        } else {
            Decimal::ZERO
        };

        // After a full liquidation the IRR problem is degenerate; the APR
        // line stays flat until a new deposit arrives.
        let apr_percent = if aum.abs() < USD_EPSILON
            && net_contributed < USD_EPSILON
            && !series.is_empty()
        {
            prev_apr
        } else {
            let flows = extractor.with_terminal(aum, day);
            let elapsed = extractor.days_elapsed(day);
            clamp_apr(compute_apr(&flows, elapsed, roi_percent / dec!(100)))
        };
        prev_apr = apr_percent;

        chain.update(aum, deposits_cum, withdrawals_cum);

        series.push(DailySeriesPoint {
            date: day,
            aum_usd: aum.round_dp(DECIMAL_PRECISION),
            deposits_cum_usd: deposits_cum.round_dp(DECIMAL_PRECISION),
            withdrawals_cum_usd: withdrawals_cum.round_dp(DECIMAL_PRECISION),
            pnl_usd: pnl.round_dp(DECIMAL_PRECISION),
            roi_percent: roi_percent.round_dp(DECIMAL_PRECISION),
            apr_percent: apr_percent.round_dp(DECIMAL_PRECISION),
            twrr_percent: chain.percent().round_dp(DECIMAL_PRECISION),
        });

        if day >= end {
            break;
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    series
}
