//! Configuration
//!
//! Loaded from a TOML file with environment overrides. Every section
//! deserializes from an empty document via its defaults, so a config file
//! is optional for everything except the API key.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::Result;

/// Environment variable consulted when the config file carries no API key
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Market-data API access. Passed to the client at construction; there is
/// no module-level key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Alpha Vantage API key
    pub key: String,
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: "https://www.alphavantage.co".to_string(),
        }
    }
}

/// Constraints the UI layer applies to simulation inputs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Minimum share count accepted per purchase
    pub min_shares: Decimal,
    /// Number of purchase slots offered
    pub max_holdings: usize,
    /// Default purchase-date window shown by the UI, in days back from today
    pub default_lookback_days: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_shares: dec!(1),
            max_holdings: 3,
            default_lookback_days: 90,
        }
    }
}

/// Caching policy for the symbol listing. The cache itself is owned by the
/// caller, not the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub symbols_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            symbols_ttl_secs: 900,
        }
    }
}

impl Config {
    /// Load from a TOML file (optional) with `FINDASH__`-prefixed
    /// environment overrides, then fall back to [`API_KEY_ENV`] for the key.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("FINDASH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        if cfg.api.key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                cfg.api.key = key;
            }
        }
        Ok(cfg)
    }
}
