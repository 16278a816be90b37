use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::cashflow::CashFlowEntry;
use crate::constants::{
    DAYS_PER_YEAR, IRR_DERIVATIVE_EPSILON, IRR_MAX_ITERATIONS, IRR_RATE_CEILING, IRR_RATE_FLOOR,
    IRR_TOLERANCE, USD_EPSILON,
};

/// Solves for the money-weighted internal rate of return of a cash-flow
/// list, as an annual rate in decimal form (0.10 = 10%/year).
///
/// Two-flow lists are solved in closed form; the general case runs
/// Newton-Raphson on `NPV(r) = sum CF_i / (1+r)^(days_i/365)`, falling
/// back to a simple annualized return when the iteration degenerates.
pub fn solve_irr(flows: &[CashFlowEntry]) -> Decimal {
    if flows.is_empty() {
        return Decimal::ZERO;
    }

    let total_in: Decimal = flows
        .iter()
        .filter(|f| f.amount_usd < Decimal::ZERO)
        .map(|f| -f.amount_usd)
        .sum();
    let total_out: Decimal = flows
        .iter()
        .filter(|f| f.amount_usd > Decimal::ZERO)
        .map(|f| f.amount_usd)
        .sum();

    // No meaningful capital at risk.
    if total_in < USD_EPSILON {
        return Decimal::ZERO;
    }

    if flows.len() == 2 && flows[0].amount_usd < Decimal::ZERO {
        return solve_two_flow(&flows[0], &flows[1])
            .unwrap_or_else(|| fallback_rate(flows, total_in, total_out));
    }

    let mut rate = clamp_rate((total_out - total_in) / total_in);

    for _ in 0..IRR_MAX_ITERATIONS {
        let (npv, derivative) = match npv_and_derivative(flows, rate) {
            Some(values) => values,
            None => return fallback_rate(flows, total_in, total_out),
        };

        if derivative.abs() < IRR_DERIVATIVE_EPSILON {
            return fallback_rate(flows, total_in, total_out);
        }

        let next = clamp_rate(rate - npv / derivative);
        if (next - rate).abs() < IRR_TOLERANCE {
            return next;
        }
        rate = next;
    }

    fallback_rate(flows, total_in, total_out)
}

/// Closed form for `[deposit, terminal]`. `None` means the power overflowed
/// and the caller should use the fallback.
fn solve_two_flow(deposit: &CashFlowEntry, terminal: &CashFlowEntry) -> Option<Decimal> {
    let ratio = terminal.amount_usd / deposit.amount_usd.abs();
    if ratio <= Decimal::ZERO {
        // Total loss.
        return Some(dec!(-1));
    }

    let days = terminal.days_from_start - deposit.days_from_start;
    if days <= 0 {
        return Some(Decimal::ZERO);
    }

    let exponent = DAYS_PER_YEAR / Decimal::from(days);
    ratio.checked_powd(exponent).map(|p| p - Decimal::ONE)
}

fn npv_and_derivative(flows: &[CashFlowEntry], rate: Decimal) -> Option<(Decimal, Decimal)> {
    // rate is clamped above -0.999, so the base is strictly positive.
    let base = Decimal::ONE + rate;
    let mut npv = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;

    for flow in flows {
        let t = Decimal::from(flow.days_from_start) / DAYS_PER_YEAR;
        let discount = base.checked_powd(t)?;
        if discount.is_zero() {
            return None;
        }
        npv += flow.amount_usd / discount;

        let discount_next = discount.checked_mul(base)?;
        if discount_next.is_zero() {
            return None;
        }
        derivative -= flow.amount_usd * t / discount_next;
    }

    Some((npv, derivative))
}

/// Simple annualized return over the whole span. Used when Newton-Raphson
/// cannot converge or the arithmetic leaves Decimal's range.
fn fallback_rate(flows: &[CashFlowEntry], total_in: Decimal, total_out: Decimal) -> Decimal {
    let total_days = flows.iter().map(|f| f.days_from_start).max().unwrap_or(0);
    if total_days <= 0 || total_in < USD_EPSILON {
        return Decimal::ZERO;
    }

    let simple_return = (total_out - total_in) / total_in;
    let base = Decimal::ONE + simple_return;
    if base <= Decimal::ZERO {
        return dec!(-1);
    }

    debug!(
        "IRR solver fell back to simple annualization over {} days",
        total_days
    );

    let exponent = DAYS_PER_YEAR / Decimal::from(total_days);
    match base.checked_powd(exponent) {
        Some(p) => p - Decimal::ONE,
        None => Decimal::ZERO,
    }
}

fn clamp_rate(rate: Decimal) -> Decimal {
    rate.clamp(IRR_RATE_FLOOR, IRR_RATE_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn flow(amount: Decimal, days: i64) -> CashFlowEntry {
        CashFlowEntry {
            amount_usd: amount,
            days_from_start: days,
            date: NaiveDate::from_str("2024-01-01").unwrap() + chrono::Duration::days(days),
        }
    }

    #[test]
    fn empty_flows_yield_zero() {
        assert_eq!(solve_irr(&[]), Decimal::ZERO);
    }

    #[test]
    fn negligible_capital_yields_zero() {
        let flows = vec![flow(dec!(-0.000000001), 0), flow(dec!(100), 365)];
        assert_eq!(solve_irr(&flows), Decimal::ZERO);
    }

    #[test]
    fn closed_form_one_year_ten_percent() {
        let flows = vec![flow(dec!(-1000), 0), flow(dec!(1100), 365)];
        let rate = solve_irr(&flows);
        assert!((rate - dec!(0.10)).abs() < dec!(0.000001));
    }

    #[test]
    fn closed_form_annualizes_partial_year() {
        let flows = vec![flow(dec!(-1000), 0), flow(dec!(1200), 89)];
        let rate = solve_irr(&flows);
        let expected = dec!(1.2).powd(dec!(365) / dec!(89)) - Decimal::ONE;
        assert!((rate - expected).abs() < dec!(0.000001));
    }

    #[test]
    fn total_loss_returns_minus_one() {
        let flows = vec![flow(dec!(-1000), 0), flow(Decimal::ZERO, 200)];
        assert_eq!(solve_irr(&flows), dec!(-1));
    }

    #[test]
    fn zero_day_span_returns_zero() {
        let flows = vec![flow(dec!(-1000), 0), flow(dec!(1100), 0)];
        assert_eq!(solve_irr(&flows), Decimal::ZERO);
    }

    #[test]
    fn newton_raphson_zeroes_the_npv() {
        let flows = vec![
            flow(dec!(-1000), 0),
            flow(dec!(-1000), 100),
            flow(dec!(2300), 364),
        ];
        let rate = solve_irr(&flows);

        let (npv, _) = npv_and_derivative(&flows, rate).unwrap();
        assert!(npv.abs() < dec!(0.001), "npv at solution was {}", npv);
    }

    #[test]
    fn newton_raphson_matches_closed_form_on_three_trivial_flows() {
        // Two deposits at the same instant are economically one deposit.
        let flows = vec![
            flow(dec!(-500), 0),
            flow(dec!(-500), 0),
            flow(dec!(1100), 365),
        ];
        let rate = solve_irr(&flows);
        assert!((rate - dec!(0.10)).abs() < dec!(0.0001));
    }
}
