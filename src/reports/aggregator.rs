use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::series_model::{AggregateReport, AggregateSummary, DailySeriesPoint};
use crate::constants::{DECIMAL_PRECISION, USD_EPSILON};
use crate::events::{sort_events, VaultEvent};
use crate::performance::{
    calculate_max_drawdown, calculate_volatility, clamp_apr, compute_apr, CashFlowEntry,
    CashFlowExtractor, TwrrChain,
};

/// One vault's contribution to an aggregate report: its sorted events and
/// its inception-to-date daily series.
pub struct AggregateInput {
    pub vault: String,
    pub events: Vec<VaultEvent>,
    pub series: Vec<DailySeriesPoint>,
}

/// Unions per-vault series by date and recomputes ROI/APR/TWRR over the
/// combined whole.
///
/// The combined cash-flow list is rebuilt from true inception across all
/// vaults: the requested `start`/`end` slice which dates are returned,
/// never which flows are counted, so APR does not reset when a caller
/// requests a narrower window.
pub fn aggregate_series(
    inputs: &[AggregateInput],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> AggregateReport {
    let non_empty: Vec<&AggregateInput> =
        inputs.iter().filter(|i| !i.series.is_empty()).collect();
    if non_empty.is_empty() {
        return AggregateReport {
            series: Vec::new(),
            summary: AggregateSummary::default(),
        };
    }

    let union_start = non_empty
        .iter()
        .map(|i| i.series[0].date)
        .min()
        .expect("non-empty inputs");
    let union_end = non_empty
        .iter()
        .map(|i| i.series[i.series.len() - 1].date)
        .max()
        .expect("non-empty inputs");

    let mut all_events: Vec<VaultEvent> = inputs
        .iter()
        .flat_map(|i| i.events.iter().cloned())
        .collect();
    sort_events(&mut all_events);

    let mut extractor = CashFlowExtractor::new();
    let mut chain = TwrrChain::new();
    let mut series: Vec<DailySeriesPoint> = Vec::new();
    let mut prev_apr = Decimal::ZERO;
    let mut ev_idx = 0;
    let mut day = union_start;

    loop {
        while ev_idx < all_events.len() && all_events[ev_idx].date() <= day {
            extractor.absorb(&all_events[ev_idx]);
            ev_idx += 1;
        }

        let mut aum = Decimal::ZERO;
        let mut deposits_cum = Decimal::ZERO;
        let mut withdrawals_cum = Decimal::ZERO;
        for input in &non_empty {
            if let Some(point) = point_at(&input.series, day) {
                aum += point.aum_usd;
                deposits_cum += point.deposits_cum_usd;
                withdrawals_cum += point.withdrawals_cum_usd;
            }
        }

        let pnl = aum + withdrawals_cum - deposits_cum;
        let net_contributed = deposits_cum - withdrawals_cum;
        let roi_percent = if net_contributed > USD_EPSILON {
            pnl / net_contributed * dec!(100)
        } else {
            Decimal::ZERO
        };

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

        if day >= union_end {
            break;
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let slice_start = start.unwrap_or(union_start);
    let slice_end = end.unwrap_or(union_end);
    let sliced: Vec<DailySeriesPoint> = series
        .into_iter()
        .filter(|p| p.date >= slice_start && p.date <= slice_end)
        .collect();

    let summary = build_summary(&sliced);

    AggregateReport {
        series: sliced,
        summary,
    }
}

/// The vault's point for a date, if its series covers it. Per-vault series
/// are contiguous daily runs, so a date offsets directly into the vector.
fn point_at(series: &[DailySeriesPoint], date: NaiveDate) -> Option<&DailySeriesPoint> {
    let offset = (date - series[0].date).num_days();
    if offset < 0 {
        return None;
    }
    match series.get(offset as usize) {
        Some(point) => Some(point),
        // Past the series end: cumulative figures persist from the last point.
        None => series.last(),
    }
}

fn build_summary(series: &[DailySeriesPoint]) -> AggregateSummary {
    let last = match series.last() {
        Some(last) => last,
        None => return AggregateSummary::default(),
    };
    let first = series.first().expect("non-empty series");

    let mut summary = AggregateSummary {
        as_of: Some(last.date),
        aum_usd: last.aum_usd,
        pnl_usd: last.pnl_usd,
        roi_percent: last.roi_percent,
        apr_percent: last.apr_percent,
        twrr_percent: last.twrr_percent,
        ..AggregateSummary::default()
    };

    // Day-over-day deltas against the previous point.
    if series.len() >= 2 {
        let prev = &series[series.len() - 2];
        let day_flow = (last.deposits_cum_usd - prev.deposits_cum_usd)
            - (last.withdrawals_cum_usd - prev.withdrawals_cum_usd);
        let gain = last.aum_usd - prev.aum_usd - day_flow;

        summary.day_aum_change_usd = Some(last.aum_usd - prev.aum_usd);
        summary.day_gain_loss_usd = Some(gain.round_dp(DECIMAL_PRECISION));

        let dietz_denominator = prev.aum_usd + day_flow / dec!(2);
        summary.day_return_percent = if !dietz_denominator.is_zero() {
            Some((gain / dietz_denominator * dec!(100)).round_dp(DECIMAL_PRECISION))
        } else if gain.is_zero() {
            Some(Decimal::ZERO)
        } else {
            None
        };
    }

    // Window-scoped money-weighted return: the slice bootstrapped as its
    // own IRR problem.
    let mut flows: Vec<CashFlowEntry> = Vec::new();
    let mut total_in = first.aum_usd;
    let mut total_out = Decimal::ZERO;
    flows.push(CashFlowEntry {
        amount_usd: -first.aum_usd,
        days_from_start: 0,
        date: first.date,
    });

    let mut range_chain = TwrrChain::new();
    let mut sub_returns: Vec<Decimal> = Vec::new();
    range_chain.update(first.aum_usd, first.deposits_cum_usd, first.withdrawals_cum_usd);

    for window in series.windows(2) {
        let prev = &window[0];
        let curr = &window[1];
        let days = (curr.date - first.date).num_days();

        let deposit_delta = curr.deposits_cum_usd - prev.deposits_cum_usd;
        if deposit_delta > USD_EPSILON {
            flows.push(CashFlowEntry {
                amount_usd: -deposit_delta,
                days_from_start: days,
                date: curr.date,
            });
            total_in += deposit_delta;
        }

        let withdrawal_delta = curr.withdrawals_cum_usd - prev.withdrawals_cum_usd;
        if withdrawal_delta > USD_EPSILON {
            flows.push(CashFlowEntry {
                amount_usd: withdrawal_delta,
                days_from_start: days,
                date: curr.date,
            });
            total_out += withdrawal_delta;
        }

        if let Some(r) =
            range_chain.update(curr.aum_usd, curr.deposits_cum_usd, curr.withdrawals_cum_usd)
        {
            sub_returns.push(r);
        }
    }

    let elapsed = (last.date - first.date).num_days();
    flows.push(CashFlowEntry {
        amount_usd: last.aum_usd,
        days_from_start: (elapsed - 1).max(0),
        date: last.date,
    });
    total_out += last.aum_usd;

    let slice_return = if total_in > USD_EPSILON {
        (total_out - total_in) / total_in
    } else {
        Decimal::ZERO
    };
    summary.range_return_percent =
        clamp_apr(compute_apr(&flows, elapsed, slice_return)).round_dp(DECIMAL_PRECISION);
    summary.range_twrr_percent = range_chain.percent().round_dp(DECIMAL_PRECISION);
    summary.volatility = calculate_volatility(&sub_returns).round_dp(DECIMAL_PRECISION);
    summary.max_drawdown = calculate_max_drawdown(&sub_returns).round_dp(DECIMAL_PRECISION);

    summary
}
