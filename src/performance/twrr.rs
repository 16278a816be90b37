use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::USD_EPSILON;

/// Chain-links per-sub-period returns into a time-weighted rate of return.
///
/// The statistic is independent of deposit/withdrawal timing and size,
/// unlike ROI and APR. A sub-period return of -100% or worse zeroes the
/// chain permanently, modeling a total wipeout.
#[derive(Debug, Clone)]
pub struct TwrrChain {
    factor: Decimal,
    prev: Option<(Decimal, Decimal, Decimal)>, // (aum, deposits_cum, withdrawals_cum)
}

impl TwrrChain {
    pub fn new() -> Self {
        Self {
            factor: Decimal::ONE,
            prev: None,
        }
    }

    /// Feeds the next daily point. Returns the sub-period return when one
    /// could be computed (a previous point with meaningful AUM existed).
    pub fn update(
        &mut self,
        aum: Decimal,
        deposits_cum: Decimal,
        withdrawals_cum: Decimal,
    ) -> Option<Decimal> {
        let sub_return = match self.prev {
            Some((prev_aum, prev_dep, prev_wdr)) if prev_aum > USD_EPSILON => {
                let net_flow = (deposits_cum - prev_dep) - (withdrawals_cum - prev_wdr);
                let r = (aum - prev_aum - net_flow) / prev_aum;
                self.factor *= (Decimal::ONE + r).max(Decimal::ZERO);
                Some(r)
            }
            _ => None,
        };

        self.prev = Some((aum, deposits_cum, withdrawals_cum));
        sub_return
    }

    pub fn percent(&self) -> Decimal {
        (self.factor - Decimal::ONE) * dec!(100)
    }
}

impl Default for TwrrChain {
    fn default() -> Self {
        Self::new()
    }
}
