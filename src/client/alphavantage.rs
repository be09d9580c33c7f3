//! Alpha Vantage API client for market data
//!
//! Fetches the exchange symbol listing (CSV) and daily price series (JSON).

use std::collections::BTreeMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{DashboardError, Result};
use crate::types::{parse_date, DailySeries, DateFooting, RawBar, SymbolListing};

/// Alpha Vantage client. The key and endpoint come from an explicit config
/// object handed over at construction.
#[derive(Clone)]
pub struct AlphaVantageClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    /// Create a new client
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.key.clone(),
        })
    }

    /// Fetch the full listing of active symbols
    pub async fn list_symbols(&self) -> Result<Vec<SymbolListing>> {
        let url = format!("{}/query", self.base_url);
        let body = self
            .http
            .get(&url)
            .query(&[("function", "LISTING_STATUS"), ("apikey", &self.api_key)])
            .send()
            .await?
            .text()
            .await?;

        let listings = parse_listing_csv(&body)?;
        debug!("fetched {} symbol listings", listings.len());
        Ok(listings)
    }

    /// Fetch a symbol's daily price history
    pub async fn daily_series(&self, symbol: &str) -> Result<DailySeries> {
        let url = format!("{}/query", self.base_url);
        let envelope: DailyEnvelope = self
            .http
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                ("symbol", symbol),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await?;

        let series = decode_daily(symbol, envelope)?;
        debug!("fetched {} daily bars for {}", series.len(), symbol);
        Ok(series)
    }
}

/// Parse the LISTING_STATUS CSV body, skipping rows without a symbol
pub(crate) fn parse_listing_csv(body: &str) -> Result<Vec<SymbolListing>> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut listings = Vec::new();
    for record in reader.deserialize() {
        let listing: SymbolListing = record?;
        if listing.symbol.trim().is_empty() {
            continue;
        }
        listings.push(listing);
    }
    Ok(listings)
}

/// Turn a daily envelope into a [`DailySeries`].
///
/// API-level failures (error message, throttle note, missing series
/// section) surface as typed errors naming the symbol instead of being
/// caught and printed.
pub(crate) fn decode_daily(symbol: &str, envelope: DailyEnvelope) -> Result<DailySeries> {
    if let Some(message) = envelope.error_message {
        return Err(DashboardError::upstream(symbol, message));
    }
    if let Some(note) = envelope.note {
        return Err(DashboardError::upstream(symbol, format!("throttled: {note}")));
    }
    let bars = envelope.series.ok_or_else(|| {
        DashboardError::upstream(symbol, "missing \"Time Series (Daily)\" section")
    })?;

    let mut footing: Option<DateFooting> = None;
    let mut series = DailySeries::new(symbol, DateFooting::Naive);
    for (raw_date, bar) in bars {
        let (date, date_footing) = parse_date(&raw_date).ok_or_else(|| {
            DashboardError::upstream(symbol, format!("unparseable series date {raw_date:?}"))
        })?;
        match footing {
            None => {
                footing = Some(date_footing);
                series.footing = date_footing;
            }
            Some(expected) if expected != date_footing => {
                return Err(DashboardError::upstream(
                    symbol,
                    format!("mixed date footings within one series ({raw_date:?})"),
                ));
            }
            Some(_) => {}
        }
        series.insert(date, bar);
    }
    Ok(series)
}

/// Response envelope for the daily-series endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct DailyEnvelope {
    #[serde(rename = "Meta Data")]
    #[allow(dead_code)]
    meta: Option<MetaData>,
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, RawBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "2. Symbol")]
    #[allow(dead_code)]
    symbol: Option<String>,
    #[serde(rename = "5. Time Zone")]
    #[allow(dead_code)]
    time_zone: Option<String>,
}
