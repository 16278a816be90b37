use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::cashflow::CashFlowEntry;
use super::irr::solve_irr;
use crate::constants::{
    APR_MAX_PERCENT, APR_MIN_PERCENT, APR_NEAR_TOTAL_LOSS_ROI, APR_SHORT_PERIOD_DAYS,
    APR_UNSTABLE_IRR_THRESHOLD,
};

/// Reported APR in percent for a cash-flow list, applying the policy
/// overrides in order of precedence:
///
/// 1. Short windows report plain ROI (no annualization extrapolation).
/// 2. Near-total losses report plain ROI (annualized IRR is misleading).
/// 3. A strongly positive IRR against a negative ROI indicates an
///    unstable root; report ROI.
/// 4. Otherwise report the IRR.
///
/// `roi` is a decimal fraction (0.05 = 5%). Callers clamp the result
/// via [`clamp_apr`] before storing.
pub fn compute_apr(flows: &[CashFlowEntry], total_days_elapsed: i64, roi: Decimal) -> Decimal {
    let hundred = dec!(100);

    if total_days_elapsed < APR_SHORT_PERIOD_DAYS {
        return roi * hundred;
    }

    if roi < APR_NEAR_TOTAL_LOSS_ROI {
        return roi * hundred;
    }

    let irr = solve_irr(flows);
    if roi < Decimal::ZERO && irr > APR_UNSTABLE_IRR_THRESHOLD {
        return roi * hundred;
    }

    irr * hundred
}

pub fn clamp_apr(apr_percent: Decimal) -> Decimal {
    apr_percent.clamp(APR_MIN_PERCENT, APR_MAX_PERCENT)
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
    fn short_period_reports_plain_roi() {
        let flows = vec![flow(dec!(-1000), 0), flow(dec!(1050), 9)];
        let apr = compute_apr(&flows, 10, dec!(0.05));
        assert_eq!(apr, dec!(5.0));
    }

    #[test]
    fn near_total_loss_reports_plain_roi() {
        let flows = vec![flow(dec!(-1000), 0), flow(dec!(50), 364)];
        let apr = compute_apr(&flows, 365, dec!(-0.95));
        assert_eq!(apr, dec!(-95.0));
    }

    #[test]
    fn healthy_window_reports_annualized_irr() {
        let flows = vec![flow(dec!(-1000), 0), flow(dec!(1100), 365)];
        let apr = compute_apr(&flows, 366, dec!(0.10));
        assert!((apr - dec!(10)).abs() < dec!(0.0001));
    }

    #[test]
    fn unstable_root_falls_back_to_roi() {
        // A mildly negative ROI must never report a strongly positive APR.
        // Early large withdrawal followed by a small residual loss can push
        // the root finder to a spurious positive rate.
        let flows = vec![
            flow(dec!(-1000), 0),
            flow(dec!(990), 30),
            flow(dec!(-500), 60),
            flow(dec!(460), 364),
        ];
        let apr = compute_apr(&flows, 365, dec!(-0.03));
        assert!(
            apr <= dec!(50),
            "unstable positive root leaked through: {}",
            apr
        );
    }

    #[test]
    fn clamp_bounds_apr() {
        assert_eq!(clamp_apr(dec!(5000)), dec!(1000));
        assert_eq!(clamp_apr(dec!(-150)), dec!(-100));
        assert_eq!(clamp_apr(dec!(42)), dec!(42));
    }
}
