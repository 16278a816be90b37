use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calendar day of a vault's (or the combined) reporting series.
/// Read-only once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeriesPoint {
    pub date: NaiveDate,
    pub aum_usd: Decimal,
    pub deposits_cum_usd: Decimal,
    pub withdrawals_cum_usd: Decimal,
    pub pnl_usd: Decimal,
    pub roi_percent: Decimal,
    pub apr_percent: Decimal,
    pub twrr_percent: Decimal,
}

/// Latest headline metrics for one vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderMetrics {
    pub vault: String,
    pub aum_usd: Decimal,
    pub pnl_usd: Decimal,
    pub roi_percent: Decimal,
    pub apr_percent: Decimal,
    pub twrr_percent: Decimal,
    pub last_valuation_usd: Option<Decimal>,
    pub net_flow_since_valuation_usd: Decimal,
    pub deposits_cum_usd: Decimal,
    pub withdrawals_cum_usd: Decimal,
    pub as_of: NaiveDate,
}

impl HeaderMetrics {
    pub fn empty(vault: &str, as_of: NaiveDate) -> Self {
        Self {
            vault: vault.to_string(),
            aum_usd: Decimal::ZERO,
            pnl_usd: Decimal::ZERO,
            roi_percent: Decimal::ZERO,
            apr_percent: Decimal::ZERO,
            twrr_percent: Decimal::ZERO,
            last_valuation_usd: None,
            net_flow_since_valuation_usd: Decimal::ZERO,
            deposits_cum_usd: Decimal::ZERO,
            withdrawals_cum_usd: Decimal::ZERO,
            as_of,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSummaryRow {
    pub vault: String,
    pub aum_usd: Decimal,
    pub pnl_usd: Decimal,
    pub roi_percent: Decimal,
    pub apr_percent: Decimal,
    pub twrr_percent: Decimal,
}

impl VaultSummaryRow {
    pub fn empty(vault: &str) -> Self {
        Self {
            vault: vault.to_string(),
            aum_usd: Decimal::ZERO,
            pnl_usd: Decimal::ZERO,
            roi_percent: Decimal::ZERO,
            apr_percent: Decimal::ZERO,
            twrr_percent: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultsSummary {
    pub rows: Vec<VaultSummaryRow>,
    pub totals: VaultSummaryRow,
}

/// Summary block of an aggregate report: today's combined metrics,
/// day-over-day deltas, and two statistics scoped to the requested
/// window only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub as_of: Option<NaiveDate>,
    pub aum_usd: Decimal,
    pub pnl_usd: Decimal,
    pub roi_percent: Decimal,
    pub apr_percent: Decimal,
    pub twrr_percent: Decimal,

    pub day_aum_change_usd: Option<Decimal>,
    pub day_gain_loss_usd: Option<Decimal>,
    /// Modified-Dietz single-day return: gain / (prev AUM + half the
    /// day's net flow).
    pub day_return_percent: Option<Decimal>,

    /// Money-weighted return of the requested slice, bootstrapped as its
    /// own IRR problem (initial AUM out, final AUM in).
    pub range_return_percent: Decimal,
    /// TWRR chain-linked within the requested slice only.
    pub range_twrr_percent: Decimal,

    pub volatility: Decimal,
    pub max_drawdown: Decimal,
}

impl Default for AggregateSummary {
    fn default() -> Self {
        Self {
            as_of: None,
            aum_usd: Decimal::ZERO,
            pnl_usd: Decimal::ZERO,
            roi_percent: Decimal::ZERO,
            apr_percent: Decimal::ZERO,
            twrr_percent: Decimal::ZERO,
            day_aum_change_usd: None,
            day_gain_loss_usd: None,
            day_return_percent: None,
            range_return_percent: Decimal::ZERO,
            range_twrr_percent: Decimal::ZERO,
            volatility: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub series: Vec<DailySeriesPoint>,
    pub summary: AggregateSummary,
}
