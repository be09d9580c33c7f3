//! Core market-data types shared across the dashboard

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Whether a source's dates carried an explicit UTC offset.
///
/// Plain `YYYY-MM-DD` keys parse as `Naive`; RFC 3339 timestamps are
/// normalized to UTC and parse as `Utc`. The engine refuses to compare a
/// purchase date against a series on a different footing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFooting {
    Naive,
    Utc,
}

/// Parse an upstream date string, detecting its footing.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (both naive) and RFC 3339
/// timestamps (normalized to the UTC calendar date). Returns `None` for
/// anything else.
pub fn parse_date(raw: &str) -> Option<(NaiveDate, DateFooting)> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some((d, DateFooting::Naive));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some((dt.date(), DateFooting::Naive));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some((dt.with_timezone(&Utc).date_naive(), DateFooting::Utc));
    }
    None
}

/// One day's quote exactly as the upstream API delivers it.
///
/// Numeric fields arrive as text; coercion happens when the series is
/// decoded or while the evolution engine runs, so a bad value can be
/// reported against the holding it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. adjusted close")]
    pub adjusted_close: String,
    #[serde(rename = "6. volume")]
    pub volume: String,
}

impl RawBar {
    /// Coerce the fields the dashboard consumes. `high`/`low`/`close` are
    /// carried through untouched for the renderer's benefit.
    pub fn decode(&self) -> std::result::Result<Bar, String> {
        let open = parse_decimal(&self.open)
            .ok_or_else(|| format!("open value {:?} is not numeric", self.open))?;
        let volume = parse_decimal(&self.volume)
            .ok_or_else(|| format!("volume value {:?} is not numeric", self.volume))?;
        Ok(Bar { open, volume })
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    raw.trim().parse::<Decimal>().ok()
}

/// A decoded daily quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub open: Decimal,
    pub volume: Decimal,
}

/// A symbol's daily history as fetched: text-valued bars keyed by date.
///
/// Dates are unique and chronological by construction of the map. Two
/// series for different symbols never share a date set (holidays, IPO
/// dates and missing trading days differ).
#[derive(Debug, Clone)]
pub struct DailySeries {
    pub symbol: String,
    pub footing: DateFooting,
    pub bars: BTreeMap<NaiveDate, RawBar>,
}

impl DailySeries {
    pub fn new(symbol: impl Into<String>, footing: DateFooting) -> Self {
        Self {
            symbol: symbol.into(),
            footing,
            bars: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, date: NaiveDate, bar: RawBar) {
        self.bars.insert(date, bar);
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Decode every bar, failing on the first non-numeric value.
    pub fn decode(&self) -> Result<PriceSeries> {
        let mut bars = BTreeMap::new();
        for (date, raw) in &self.bars {
            let bar = raw.decode().map_err(|detail| {
                DashboardError::malformed(&self.symbol, format!("{date}: {detail}"))
            })?;
            bars.insert(*date, bar);
        }
        Ok(PriceSeries {
            symbol: self.symbol.clone(),
            footing: self.footing,
            bars,
        })
    }
}

/// A fully decoded price series, ready for chart preparation
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub symbol: String,
    pub footing: DateFooting,
    pub bars: BTreeMap<NaiveDate, Bar>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// One row of the exchange's listing-status CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolListing {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub exchange: String,
}

impl SymbolListing {
    /// Display label used by the UI's symbol picker
    pub fn label(&self) -> String {
        format!("{} -- {}", self.symbol, self.name)
    }
}

/// A simulated buy: symbol, date and share count
#[derive(Debug, Clone)]
pub struct PurchaseEvent {
    pub symbol: String,
    /// Display name shown in legends and annotations
    pub name: String,
    pub date: NaiveDate,
    pub footing: DateFooting,
    /// Fractional shares are allowed; must be strictly positive
    pub shares: Decimal,
}

impl PurchaseEvent {
    /// Build a purchase event from an upstream date string.
    ///
    /// The footing is detected from the string so the engine can verify it
    /// against the series footing instead of silently stripping offsets.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        raw_date: &str,
        shares: Decimal,
    ) -> Result<Self> {
        let symbol = symbol.into();
        let (date, footing) = parse_date(raw_date).ok_or_else(|| {
            DashboardError::malformed(&symbol, format!("purchase date {raw_date:?} is not a date"))
        })?;
        Ok(Self {
            symbol,
            name: name.into(),
            date,
            footing,
            shares,
        })
    }
}
