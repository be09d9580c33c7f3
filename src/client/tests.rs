//! Unit tests for the market-data client

#[cfg(test)]
mod tests {
    use super::super::alphavantage::{decode_daily, parse_listing_csv, DailyEnvelope};
    use super::super::{MarketDataSource, SymbolCache};
    use crate::error::{DashboardError, Result};
    use crate::types::{DailySeries, DateFooting, SymbolListing};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const DAILY_BODY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Time Series with Splits and Dividend Events",
            "2. Symbol": "IBM",
            "3. Last Refreshed": "2024-01-02",
            "4. Output Size": "Compact",
            "5. Time Zone": "US/Eastern"
        },
        "Time Series (Daily)": {
            "2024-01-02": {
                "1. open": "189.33",
                "2. high": "190.10",
                "3. low": "188.02",
                "4. close": "189.70",
                "5. adjusted close": "189.70",
                "6. volume": "3200000"
            },
            "2024-01-01": {
                "1. open": "187.15",
                "2. high": "188.00",
                "3. low": "186.50",
                "4. close": "187.90",
                "5. adjusted close": "187.90",
                "6. volume": "2100000"
            }
        }
    }"#;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_decode_daily_envelope() {
        let envelope: DailyEnvelope = serde_json::from_str(DAILY_BODY).unwrap();
        let series = decode_daily("IBM", envelope).unwrap();

        assert_eq!(series.symbol, "IBM");
        assert_eq!(series.footing, DateFooting::Naive);
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[&day("2024-01-02")].open, "189.33");
        assert_eq!(series.bars[&day("2024-01-01")].volume, "2100000");
    }

    #[test]
    fn test_decode_daily_error_message() {
        let body = r#"{"Error Message": "Invalid API call for symbol NOPE."}"#;
        let envelope: DailyEnvelope = serde_json::from_str(body).unwrap();
        let err = decode_daily("NOPE", envelope).unwrap_err();
        match err {
            DashboardError::UpstreamShape { symbol, detail } => {
                assert_eq!(symbol, "NOPE");
                assert!(detail.contains("Invalid API call"));
            }
            other => panic!("expected UpstreamShape, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_daily_throttle_note() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
        let envelope: DailyEnvelope = serde_json::from_str(body).unwrap();
        let err = decode_daily("IBM", envelope).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::UpstreamShape { ref detail, .. } if detail.starts_with("throttled")
        ));
    }

    #[test]
    fn test_decode_daily_missing_series_section() {
        let body = r#"{"Meta Data": {"2. Symbol": "IBM"}}"#;
        let envelope: DailyEnvelope = serde_json::from_str(body).unwrap();
        let err = decode_daily("IBM", envelope).unwrap_err();
        assert!(matches!(err, DashboardError::UpstreamShape { .. }));
    }

    #[test]
    fn test_decode_daily_unparseable_date_key() {
        let body = r#"{
            "Time Series (Daily)": {
                "soon": {
                    "1. open": "1", "2. high": "1", "3. low": "1",
                    "4. close": "1", "5. adjusted close": "1", "6. volume": "1"
                }
            }
        }"#;
        let envelope: DailyEnvelope = serde_json::from_str(body).unwrap();
        let err = decode_daily("IBM", envelope).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::UpstreamShape { ref detail, .. } if detail.contains("soon")
        ));
    }

    #[test]
    fn test_parse_listing_csv_skips_blank_symbols() {
        let body = "symbol,name,exchange,assetType,ipoDate,delistingDate,status\n\
                    IBM,International Business Machines Corp,NYSE,Stock,1962-01-02,null,Active\n\
                    ,Orphan Row,NYSE,Stock,2000-01-01,null,Active\n\
                    MSFT,Microsoft Corporation,NASDAQ,Stock,1986-03-13,null,Active\n";
        let listings = parse_listing_csv(body).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].symbol, "IBM");
        assert_eq!(listings[0].label(), "IBM -- International Business Machines Corp");
        assert_eq!(listings[1].exchange, "NASDAQ");
    }

    struct StaticSource {
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for StaticSource {
        async fn list_symbols(&self) -> Result<Vec<SymbolListing>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![SymbolListing {
                symbol: "IBM".to_string(),
                name: "International Business Machines Corp".to_string(),
                exchange: "NYSE".to_string(),
            }])
        }

        async fn daily_series(&self, symbol: &str) -> Result<DailySeries> {
            Err(DashboardError::SymbolNotFound(symbol.to_string()))
        }
    }

    #[tokio::test]
    async fn test_cache_serves_within_ttl() {
        let source = StaticSource::new();
        let mut cache = SymbolCache::new(Duration::from_secs(3600));

        let first = cache.get_or_fetch(&source).await.unwrap().len();
        let second = cache.get_or_fetch(&source).await.unwrap().len();
        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_refetches_when_stale() {
        let source = StaticSource::new();
        let mut cache = SymbolCache::new(Duration::ZERO);

        cache.get_or_fetch(&source).await.unwrap();
        cache.get_or_fetch(&source).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_invalidate_forces_refetch() {
        let source = StaticSource::new();
        let mut cache = SymbolCache::new(Duration::from_secs(3600));

        cache.get_or_fetch(&source).await.unwrap();
        assert!(!cache.is_stale());
        cache.invalidate();
        assert!(cache.is_stale());
        cache.get_or_fetch(&source).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
