use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use std::sync::Arc;

use super::aggregator::{aggregate_series, AggregateInput};
use super::series_builder::build_daily_series;
use super::series_model::{
    AggregateReport, DailySeriesPoint, HeaderMetrics, VaultSummaryRow, VaultsSummary,
};
use crate::constants::{USD_EPSILON, VAULTS_TOTAL_ID};
use crate::errors::Result;
use crate::events::{sort_events, VaultEvent, VaultLedgerTrait};
use crate::market_data::{PriceCache, PriceOracleTrait};
use crate::performance::{apr_before_liquidation, detect_liquidation_date, is_liquidated};
use crate::snapshot::replay;

/// Reporting facade consumed by the HTTP layer.
#[async_trait]
pub trait ReportServiceTrait: Send + Sync {
    async fn get_header_metrics(&self, vault: &str) -> Result<HeaderMetrics>;

    async fn get_daily_series(
        &self,
        vault: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailySeriesPoint>>;

    async fn get_vaults_summary(&self) -> Result<VaultsSummary>;

    async fn get_aggregate_series(
        &self,
        vaults: Option<Vec<String>>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<AggregateReport>;
}

pub struct ReportService {
    ledger: Arc<dyn VaultLedgerTrait>,
    oracle: Arc<dyn PriceOracleTrait>,
    cache: Arc<PriceCache>,
}

impl ReportService {
    pub fn new(
        ledger: Arc<dyn VaultLedgerTrait>,
        oracle: Arc<dyn PriceOracleTrait>,
        cache: Arc<PriceCache>,
    ) -> Self {
        Self {
            ledger,
            oracle,
            cache,
        }
    }

    async fn load_sorted_events(&self, vault: &str) -> Result<Vec<VaultEvent>> {
        let mut events = self.ledger.list_events(vault).await?;
        sort_events(&mut events);
        Ok(events)
    }

    /// Builds each vault's inception-to-`end` series as independent
    /// concurrent futures. Each future touches only its own vault's
    /// events; the price cache is the only shared structure and is safe
    /// under concurrent idempotent writes.
    async fn build_inputs(&self, vaults: &[String], end: NaiveDate) -> Result<Vec<AggregateInput>> {
        let builds = vaults.iter().map(|vault| async move {
            let events = self.load_sorted_events(vault).await?;
            let series = build_daily_series(
                vault,
                &events,
                self.oracle.as_ref(),
                self.cache.as_ref(),
                end,
            )
            .await;
            Ok(AggregateInput {
                vault: vault.clone(),
                events,
                series,
            })
        });

        let mut inputs = futures::future::join_all(builds)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        inputs.sort_by(|a, b| a.vault.cmp(&b.vault));
        Ok(inputs)
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[async_trait]
impl ReportServiceTrait for ReportService {
    async fn get_header_metrics(&self, vault: &str) -> Result<HeaderMetrics> {
        let events = self.load_sorted_events(vault).await?;
        let today = Self::today();
        if events.is_empty() {
            return Ok(HeaderMetrics::empty(vault, today));
        }

        let series =
            build_daily_series(vault, &events, self.oracle.as_ref(), self.cache.as_ref(), today)
                .await;
        let last = match series.last() {
            Some(last) => last,
            None => return Ok(HeaderMetrics::empty(vault, today)),
        };

        let state = replay(vault, &events);
        let net_contributed = state.net_contributed_usd();

        let apr_percent = if last.aum_usd.abs() < USD_EPSILON && net_contributed > USD_EPSILON {
            // Full realized loss: annualizing is meaningless, report ROI.
            last.roi_percent
        } else if is_liquidated(&state) {
            match detect_liquidation_date(vault, &events) {
                Some(date) => {
                    debug!("Vault {} liquidated on {}, recomputing pre-liquidation APR", vault, date);
                    apr_before_liquidation(
                        vault,
                        &events,
                        date,
                        self.oracle.as_ref(),
                        self.cache.as_ref(),
                    )
                    .await
                }
                None => last.apr_percent,
            }
        } else {
            last.apr_percent
        };

        Ok(HeaderMetrics {
            vault: vault.to_string(),
            aum_usd: last.aum_usd,
            pnl_usd: last.pnl_usd,
            roi_percent: last.roi_percent,
            apr_percent,
            twrr_percent: last.twrr_percent,
            last_valuation_usd: state.last_valuation_usd,
            net_flow_since_valuation_usd: state.net_flow_since_valuation_usd,
            deposits_cum_usd: state.deposited_cum_usd,
            withdrawals_cum_usd: state.withdrawn_cum_usd,
            as_of: last.date,
        })
    }

    async fn get_daily_series(
        &self,
        vault: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailySeriesPoint>> {
        let events = self.load_sorted_events(vault).await?;
        if events.is_empty() {
            return Ok(Vec::new());
        }

        // Always build from inception so APR and TWRR stay anchored to the
        // true first deposit; the window only slices the output.
        let build_end = end.unwrap_or_else(Self::today).min(Self::today());
        let series =
            build_daily_series(vault, &events, self.oracle.as_ref(), self.cache.as_ref(), build_end)
                .await;

        Ok(match start {
            Some(start) => series.into_iter().filter(|p| p.date >= start).collect(),
            None => series,
        })
    }

    async fn get_vaults_summary(&self) -> Result<VaultsSummary> {
        let vaults = self.ledger.list_vaults().await?;
        let inputs = self.build_inputs(&vaults, Self::today()).await?;

        let rows: Vec<VaultSummaryRow> = inputs
            .iter()
            .map(|input| match input.series.last() {
                Some(p) => VaultSummaryRow {
                    vault: input.vault.clone(),
                    aum_usd: p.aum_usd,
                    pnl_usd: p.pnl_usd,
                    roi_percent: p.roi_percent,
                    apr_percent: p.apr_percent,
                    twrr_percent: p.twrr_percent,
                },
                None => VaultSummaryRow::empty(&input.vault),
            })
            .collect();

        let report = aggregate_series(&inputs, None, None);
        let totals = match report.series.last() {
            Some(p) => VaultSummaryRow {
                vault: VAULTS_TOTAL_ID.to_string(),
                aum_usd: p.aum_usd,
                pnl_usd: p.pnl_usd,
                roi_percent: p.roi_percent,
                apr_percent: p.apr_percent,
                twrr_percent: p.twrr_percent,
            },
            None => VaultSummaryRow::empty(VAULTS_TOTAL_ID),
        };

        Ok(VaultsSummary { rows, totals })
    }

    async fn get_aggregate_series(
        &self,
        vaults: Option<Vec<String>>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<AggregateReport> {
        let names = match vaults {
            Some(names) if !names.is_empty() => names,
            _ => self.ledger.list_vaults().await?,
        };

        let build_end = end.unwrap_or_else(Self::today).min(Self::today());
        let inputs = self.build_inputs(&names, build_end).await?;

        Ok(aggregate_series(&inputs, start, end))
    }
}
