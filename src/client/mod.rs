//! Market-data collaborator
//!
//! The only part of the dashboard that performs I/O. The core consumes the
//! structures this module produces; it never sees HTTP, JSON envelopes or
//! API keys.

mod alphavantage;

#[cfg(test)]
mod tests;

pub use alphavantage::AlphaVantageClient;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::types::{DailySeries, SymbolListing};

/// The seam between the dashboard and whatever serves market data
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// All listed symbols, for the UI's picker
    async fn list_symbols(&self) -> Result<Vec<SymbolListing>>;

    /// One symbol's daily price history
    async fn daily_series(&self, symbol: &str) -> Result<DailySeries>;
}

#[async_trait]
impl MarketDataSource for AlphaVantageClient {
    async fn list_symbols(&self) -> Result<Vec<SymbolListing>> {
        AlphaVantageClient::list_symbols(self).await
    }

    async fn daily_series(&self, symbol: &str) -> Result<DailySeries> {
        AlphaVantageClient::daily_series(self, symbol).await
    }
}

/// TTL cache for the symbol listing.
///
/// Owned by the caller, not the client: the eviction policy is visible
/// here instead of hiding behind the fetch function.
pub struct SymbolCache {
    ttl: Duration,
    fetched_at: Option<Instant>,
    listings: Vec<SymbolListing>,
}

impl SymbolCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            fetched_at: None,
            listings: Vec::new(),
        }
    }

    /// True when the cache has never been filled or its TTL has elapsed
    pub fn is_stale(&self) -> bool {
        match self.fetched_at {
            None => true,
            Some(at) => at.elapsed() >= self.ttl,
        }
    }

    /// Return the cached listing, refreshing from the source when stale
    pub async fn get_or_fetch(&mut self, source: &dyn MarketDataSource) -> Result<&[SymbolListing]> {
        if self.is_stale() {
            let listings = source.list_symbols().await?;
            debug!("symbol cache refreshed: {} listings", listings.len());
            self.listings = listings;
            self.fetched_at = Some(Instant::now());
        }
        Ok(&self.listings)
    }

    /// Drop the cached listing; the next access refetches
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
        self.listings.clear();
    }
}
