use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use super::snapshot_model::{Position, VaultState};
use crate::events::{EventKind, VaultEvent};

/// Applies one event to a state, returning the next state. Events must be
/// fed in ascending timestamp order (ties in original ledger order).
/// Malformed numeric fields are coerced to zero; there is no error path.
pub fn apply_event(state: VaultState, event: &VaultEvent) -> VaultState {
    let mut next = state;
    let units = event.amount_or_zero();
    let usd = event.usd_value_or_zero();

    match event.kind {
        EventKind::Deposit => {
            let position = next
                .positions
                .entry(event.asset.symbol.clone())
                .or_insert_with(|| Position {
                    asset: event.asset.clone(),
                    units: Decimal::ZERO,
                });
            position.units += units;
            next.deposited_cum_usd += usd;
            next.net_flow_since_valuation_usd += usd;
            if next.first_deposit_date.is_none() {
                next.first_deposit_date = Some(event.date());
            }
        }
        EventKind::Withdraw => {
            let position = next
                .positions
                .entry(event.asset.symbol.clone())
                .or_insert_with(|| Position {
                    asset: event.asset.clone(),
                    units: Decimal::ZERO,
                });
            position.units -= units;
            next.withdrawn_cum_usd += usd;
            next.net_flow_since_valuation_usd -= usd;
        }
        EventKind::Valuation => match event.usd_value {
            // A numeric valuation anchors AUM and resets the rolling flow.
            Some(value) => {
                next.last_valuation_usd = Some(value);
                next.net_flow_since_valuation_usd = Decimal::ZERO;
            }
            None => {
                warn!(
                    "Valuation event {} for vault {} has no USD value. Ignoring.",
                    event.id, next.vault
                );
            }
        },
    }

    next
}

/// Replays a full, pre-sorted event list into a fresh state.
pub fn replay(vault: &str, events: &[VaultEvent]) -> VaultState {
    events
        .iter()
        .fold(VaultState::new(vault), |state, event| {
            apply_event(state, event)
        })
}

/// Replays only events dated strictly before `cutoff`. Used to reconstruct
/// the state one day before a liquidation.
pub fn state_as_of(vault: &str, events: &[VaultEvent], cutoff: NaiveDate) -> VaultState {
    events
        .iter()
        .take_while(|e| e.date() < cutoff)
        .fold(VaultState::new(vault), |state, event| {
            apply_event(state, event)
        })
}
