use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::USD_EPSILON;
use crate::events::{EventKind, VaultEvent};

/// One signed cash flow, day-indexed from the first deposit.
/// Negative = money into the vault (deposit), positive = money out
/// (withdrawal, or the synthetic terminal value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEntry {
    pub amount_usd: Decimal,
    pub days_from_start: i64,
    pub date: NaiveDate,
}

/// Incrementally turns deposit/withdrawal events into a cash-flow list
/// anchored at the first deposit date. Valuation events emit nothing.
#[derive(Debug, Default)]
pub struct CashFlowExtractor {
    flows: Vec<CashFlowEntry>,
    first_deposit_date: Option<NaiveDate>,
}

impl CashFlowExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot extraction over pre-sorted events.
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a VaultEvent>,
    {
        let mut extractor = Self::new();
        for event in events {
            extractor.absorb(event);
        }
        extractor
    }

    /// Absorbs one event. Events must arrive in ascending date order so
    /// the resulting list stays naturally sorted.
    pub fn absorb(&mut self, event: &VaultEvent) {
        let usd = event.usd_value_or_zero();
        match event.kind {
            EventKind::Deposit if usd > USD_EPSILON => {
                let anchor = *self.first_deposit_date.get_or_insert_with(|| event.date());
                self.flows.push(CashFlowEntry {
                    amount_usd: -usd,
                    days_from_start: (event.date() - anchor).num_days(),
                    date: event.date(),
                });
            }
            EventKind::Withdraw if usd > USD_EPSILON => {
                // Withdrawals before any deposit carry no capital out.
                if let Some(anchor) = self.first_deposit_date {
                    self.flows.push(CashFlowEntry {
                        amount_usd: usd,
                        days_from_start: (event.date() - anchor).num_days(),
                        date: event.date(),
                    });
                }
            }
            _ => {}
        }
    }

    pub fn flows(&self) -> &[CashFlowEntry] {
        &self.flows
    }

    pub fn first_deposit_date(&self) -> Option<NaiveDate> {
        self.first_deposit_date
    }

    /// Days elapsed between the first deposit and `as_of`.
    pub fn days_elapsed(&self, as_of: NaiveDate) -> i64 {
        match self.first_deposit_date {
            Some(anchor) => (as_of - anchor).num_days().max(0),
            None => 0,
        }
    }

    /// Flow list with a synthetic terminal entry appended: the current AUM
    /// positioned one day before the elapsed span. Required before any
    /// IRR/APR evaluation.
    pub fn with_terminal(&self, aum: Decimal, as_of: NaiveDate) -> Vec<CashFlowEntry> {
        let mut flows = self.flows.clone();
        if self.first_deposit_date.is_some() {
            let elapsed = self.days_elapsed(as_of);
            flows.push(CashFlowEntry {
                amount_usd: aum,
                days_from_start: (elapsed - 1).max(0),
                date: as_of,
            });
        }
        flows
    }
}
