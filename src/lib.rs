//! Financial Dashboard Core
//!
//! A Rust library for preparing market-data dashboards: single-stock
//! open/volume charts and a simulated multi-stock portfolio valued over
//! time from independent purchase events.
//!
//! ## Architecture
//!
//! ```text
//! Client (Alpha Vantage) → DailySeries ─┬→ Portfolio Engine → PortfolioTable
//!                                       │                          ↓
//!                                       └→ Chart (quote view)   Hover Text
//!                                                  ↓                ↓
//!                                            Renderer (external collaborator)
//! ```
//!
//! The engine and formatter are pure and synchronous; only the client
//! performs I/O. Rendering, widgets and styling belong to external
//! collaborators that consume the `chart` payloads.

pub mod chart;
pub mod client;
pub mod config;
pub mod error;
pub mod hover;
pub mod portfolio;
pub mod types;
