//! Error types for the dashboard core

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::DateFooting;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors surfaced by the dashboard core and its data-fetch boundary
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A holding's series is missing a required field or a value could not
    /// be coerced to a number. Retrying a pure transform on the same data
    /// cannot help, so this is terminal for the request.
    #[error("malformed series for holding {holding}: {detail}")]
    MalformedInput { holding: String, detail: String },

    /// Purchase date and series dates are not on a comparable footing.
    /// The caller must normalize both sides and resubmit.
    #[error(
        "holding {holding}: purchase date footing {purchase:?} does not match series footing {series:?}"
    )]
    TimezoneMismatch {
        holding: String,
        purchase: DateFooting,
        series: DateFooting,
    },

    /// The UI layer enforces a minimum share count, but the engine rejects
    /// non-positive counts on its own as well.
    #[error("holding {holding}: share count must be positive, got {shares}")]
    NonPositiveShares { holding: String, shares: Decimal },

    /// The upstream API response did not have the expected shape
    /// (missing envelope section, error message, throttle note).
    #[error("unexpected response shape for {symbol}: {detail}")]
    UpstreamShape { symbol: String, detail: String },

    /// No listing matched the requested symbol
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl DashboardError {
    /// Convenience constructor for coercion failures inside the engine
    pub fn malformed(holding: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedInput {
            holding: holding.into(),
            detail: detail.into(),
        }
    }

    /// Convenience constructor for envelope problems at the client boundary
    pub fn upstream(symbol: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UpstreamShape {
            symbol: symbol.into(),
            detail: detail.into(),
        }
    }
}
