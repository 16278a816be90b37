// Test cases for the daily series builder.
#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::events::{AssetRef, AssetType, EventKind, VaultEvent};
    use crate::market_data::{PriceCache, PriceError, PriceOracleTrait, PriceQuote};
    use crate::reports::series_builder::build_daily_series;

    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rust_decimal::{Decimal, MathematicalOps};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::str::FromStr;

    struct MockOracle {
        rates: HashMap<String, Decimal>,
    }

    impl MockOracle {
        fn new(rates: &[(&str, Decimal)]) -> Self {
            Self {
                rates: rates.iter().map(|(s, r)| (s.to_string(), *r)).collect(),
            }
        }
    }

    #[async_trait]
    impl PriceOracleTrait for MockOracle {
        async fn get_usd_rate(
            &self,
            asset: &AssetRef,
            _at: Option<DateTime<Utc>>,
        ) -> Result<PriceQuote> {
            match self.rates.get(&asset.symbol) {
                Some(rate) => Ok(PriceQuote {
                    rate_usd: *rate,
                    timestamp: Utc::now(),
                    source: "mock".to_string(),
                }),
                None => Err(Error::Price(PriceError::RateUnavailable(
                    asset.asset_type.to_string(),
                    asset.symbol.clone(),
                ))),
            }
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn event(kind: EventKind, units: Decimal, usd: Decimal, date: NaiveDate) -> VaultEvent {
        VaultEvent {
            id: "e".to_string(),
            vault: "main".to_string(),
            kind,
            asset: AssetRef::new(AssetType::Crypto, "USDT"),
            amount: Some(units),
            usd_value: Some(usd),
            at: Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()),
            account: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn empty_events_yield_empty_series() {
        let oracle = MockOracle::new(&[]);
        let cache = PriceCache::new();
        let series = build_daily_series("main", &[], &oracle, &cache, day("2024-03-31")).await;
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_deposit_then_valuation() {
        // Deposit $1000 of USDT on day 0; an external valuation asserts
        // $1200 on day 90.
        let events = vec![
            event(EventKind::Deposit, dec!(1000), dec!(1000), day("2024-01-01")),
            event(EventKind::Valuation, Decimal::ZERO, dec!(1200), day("2024-03-31")),
        ];
        let oracle = MockOracle::new(&[("USDT", dec!(1))]);
        let cache = PriceCache::new();

        let series =
            build_daily_series("main", &events, &oracle, &cache, day("2024-03-31")).await;

        assert_eq!(series.len(), 91);
        let last = series.last().unwrap();
        assert_eq!(last.aum_usd, dec!(1200));
        assert_eq!(last.pnl_usd, dec!(200));
        assert_eq!(last.roi_percent, dec!(20.0));

        // APR comes from the IRR of [{-1000, day 0}, {1200, day 89}], not
        // from naively scaling the 90-day ROI.
        let expected_rate = dec!(1.2).powd(dec!(365) / dec!(89)) - Decimal::ONE;
        let expected_apr = expected_rate * dec!(100);
        assert!(
            (last.apr_percent - expected_apr).abs() < dec!(0.01),
            "apr {} vs expected {}",
            last.apr_percent,
            expected_apr
        );
        let naive_annualization = dec!(20.0) * dec!(365) / dec!(90);
        assert!((last.apr_percent - naive_annualization).abs() > dec!(1));
    }

    #[tokio::test]
    async fn short_window_apr_equals_roi() {
        let events = vec![
            event(EventKind::Deposit, dec!(1000), dec!(1000), day("2024-01-01")),
            event(EventKind::Valuation, Decimal::ZERO, dec!(1050), day("2024-01-06")),
        ];
        let oracle = MockOracle::new(&[("USDT", dec!(1))]);
        let cache = PriceCache::new();

        let series =
            build_daily_series("main", &events, &oracle, &cache, day("2024-01-11")).await;

        // Inside the 30-day window APR is plain ROI, whatever the flows.
        assert_eq!(series[5].apr_percent, dec!(5.0));
        assert_eq!(series[10].apr_percent, dec!(5.0));
    }

    #[tokio::test]
    async fn liquidation_freezes_apr() {
        let events = vec![
            event(EventKind::Deposit, dec!(1000), dec!(1000), day("2024-01-01")),
            event(EventKind::Withdraw, dec!(1000), dec!(1000), day("2024-02-10")),
        ];
        let oracle = MockOracle::new(&[("USDT", dec!(1))]);
        let cache = PriceCache::new();

        let series =
            build_daily_series("main", &events, &oracle, &cache, day("2024-03-01")).await;

        // 2024-02-10 is index 40.
        let frozen = series[40].apr_percent;
        assert_eq!(frozen, series[39].apr_percent);
        for point in &series[40..] {
            assert_eq!(point.aum_usd, Decimal::ZERO);
            assert_eq!(point.apr_percent, frozen);
        }
    }

    #[tokio::test]
    async fn extreme_gains_are_clamped() {
        let events = vec![
            event(EventKind::Deposit, dec!(100), dec!(100), day("2024-01-01")),
            event(EventKind::Valuation, Decimal::ZERO, dec!(10000), day("2024-02-10")),
        ];
        let oracle = MockOracle::new(&[("USDT", dec!(1))]);
        let cache = PriceCache::new();

        let series =
            build_daily_series("main", &events, &oracle, &cache, day("2024-02-10")).await;

        assert_eq!(series.last().unwrap().apr_percent, dec!(1000));
    }

    #[tokio::test]
    async fn total_loss_reports_roi_not_annualized_irr() {
        let events = vec![
            event(EventKind::Deposit, dec!(1000), dec!(1000), day("2024-01-01")),
            event(EventKind::Valuation, Decimal::ZERO, Decimal::ZERO, day("2024-03-01")),
        ];
        let oracle = MockOracle::new(&[("USDT", dec!(1))]);
        let cache = PriceCache::new();

        let series =
            build_daily_series("main", &events, &oracle, &cache, day("2024-03-01")).await;

        let last = series.last().unwrap();
        assert_eq!(last.aum_usd, Decimal::ZERO);
        assert_eq!(last.roi_percent, dec!(-100));
        assert_eq!(last.apr_percent, dec!(-100));
    }

    #[tokio::test]
    async fn twrr_ignores_flow_timing() {
        // Anchor at 1000, deposit 500 with no market movement: ROI dilutes
        // but TWRR stays where the market put it.
        let events = vec![
            event(EventKind::Deposit, dec!(1000), dec!(1000), day("2024-01-01")),
            event(EventKind::Valuation, Decimal::ZERO, dec!(1100), day("2024-01-10")),
            event(EventKind::Deposit, dec!(500), dec!(500), day("2024-01-20")),
        ];
        let oracle = MockOracle::new(&[("USDT", dec!(1))]);
        let cache = PriceCache::new();

        let series =
            build_daily_series("main", &events, &oracle, &cache, day("2024-01-25")).await;

        let last = series.last().unwrap();
        assert_eq!(last.aum_usd, dec!(1600));
        assert!((last.twrr_percent - dec!(10)).abs() < dec!(0.000001));
        assert!(last.roi_percent < dec!(10));
    }
}
