//! # Portfolio Evolution Engine
//!
//! Values a simulated portfolio over time from independent purchase events:
//! - filters each holding's daily series to dates after its purchase
//! - aligns all holdings on the union of their dates (outer join)
//! - computes per-holding value and an aggregate position per date
//!
//! ```rust,ignore
//! use findash::portfolio::{compute_evolution, Holding};
//!
//! let table = compute_evolution(&[Holding { series, purchase }])?;
//! let hover = table.annotations();
//! ```
//!
//! The engine is a pure, synchronous, single-pass transform over data that
//! is already resident in memory. It performs no I/O and no retries.


use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::hover::{annotate_rows, CellValue};
use crate::types::{DailySeries, PurchaseEvent};

/// Identifies one holding slot within a simulation request.
///
/// Cells are keyed by this id rather than by prefixed column names, so two
/// purchases of the same symbol stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HoldingId(pub usize);

impl fmt::Display for HoldingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One holding's input: a fetched series plus the purchase that opened it
#[derive(Debug, Clone)]
pub struct Holding {
    pub series: DailySeries,
    pub purchase: PurchaseEvent,
}

/// One holding's contribution on one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingCell {
    /// Constant across the holding's rows
    pub shares: Decimal,
    /// Opening price on this date
    pub open: Decimal,
    /// shares x open
    pub value: Decimal,
    /// Display name, constant across the holding's rows
    pub name: String,
}

/// Per-holding metadata for the whole request
#[derive(Debug, Clone)]
pub struct HoldingSummary {
    pub id: HoldingId,
    pub symbol: String,
    pub name: String,
    pub shares: Decimal,
    pub purchased: NaiveDate,
    /// True when the series had no dates after the purchase date. The
    /// holding contributes no cells; the rest of the table still renders.
    pub empty: bool,
}

/// One date of the combined table
#[derive(Debug, Clone)]
pub struct PortfolioRow {
    pub date: NaiveDate,
    /// Holdings with data on this date. Absence means the holding has no
    /// row here yet, never a zero value.
    pub cells: BTreeMap<HoldingId, HoldingCell>,
    /// Current position: the sum of the present cells' values. Holdings
    /// without data on this date are omitted from the sum, not zeroed.
    pub position: Decimal,
}

/// The combined, date-aligned evolution of all holdings
#[derive(Debug, Clone)]
pub struct PortfolioTable {
    pub holdings: Vec<HoldingSummary>,
    /// Chronological; one row per date in the union of the holdings' dates
    pub rows: Vec<PortfolioRow>,
}

impl PortfolioTable {
    /// Hover annotation per row, positional with [`Self::rows`].
    ///
    /// Column order: each holding's shares/open/value/name in id order
    /// (labelled `<id>.<column>`), then the aggregate `position`.
    pub fn annotations(&self) -> Vec<String> {
        let hover_rows: Vec<Vec<(String, CellValue)>> =
            self.rows.iter().map(|row| self.hover_columns(row)).collect();
        annotate_rows(&hover_rows)
    }

    fn hover_columns(&self, row: &PortfolioRow) -> Vec<(String, CellValue)> {
        let mut pairs = Vec::with_capacity(self.holdings.len() * 4 + 1);
        for summary in &self.holdings {
            let id = summary.id;
            match row.cells.get(&id) {
                Some(cell) => {
                    pairs.push((format!("{id}.shares"), CellValue::Float(cell.shares)));
                    pairs.push((format!("{id}.open"), CellValue::Float(cell.open)));
                    pairs.push((format!("{id}.value"), CellValue::Float(cell.value)));
                    pairs.push((format!("{id}.name"), CellValue::Text(cell.name.clone())));
                }
                None => {
                    pairs.push((format!("{id}.shares"), CellValue::Missing));
                    pairs.push((format!("{id}.open"), CellValue::Missing));
                    pairs.push((format!("{id}.value"), CellValue::Missing));
                    pairs.push((format!("{id}.name"), CellValue::Missing));
                }
            }
        }
        pairs.push(("position".to_string(), CellValue::Float(row.position)));
        pairs
    }
}

/// Compute the portfolio's evolution from up to N independent purchases.
///
/// Per holding: dates at or before the purchase date are excluded (the
/// holding contributes nothing before it is bought), then value = shares x
/// open for every retained date. The combine step is a union-of-dates
/// alignment; the aggregate sums only the holdings present on each date.
///
/// Fails fast, with no partial table visible to the caller, when a purchase
/// date and series are on different footings, when a share count is not
/// positive, or when a retained bar's open cannot be coerced to a number.
pub fn compute_evolution(holdings: &[Holding]) -> Result<PortfolioTable> {
    let mut summaries = Vec::with_capacity(holdings.len());
    let mut contributions: Vec<BTreeMap<NaiveDate, HoldingCell>> =
        Vec::with_capacity(holdings.len());

    for (index, holding) in holdings.iter().enumerate() {
        let id = HoldingId(index);
        let purchase = &holding.purchase;
        let series = &holding.series;

        if purchase.footing != series.footing {
            return Err(DashboardError::TimezoneMismatch {
                holding: purchase.symbol.clone(),
                purchase: purchase.footing,
                series: series.footing,
            });
        }
        if purchase.shares <= Decimal::ZERO {
            return Err(DashboardError::NonPositiveShares {
                holding: purchase.symbol.clone(),
                shares: purchase.shares,
            });
        }

        // Strictly after the purchase date; the purchase day itself is out.
        let retained = series
            .bars
            .range((Bound::Excluded(purchase.date), Bound::Unbounded));

        let mut cells = BTreeMap::new();
        for (date, raw) in retained {
            let bar = raw.decode().map_err(|detail| {
                DashboardError::malformed(&purchase.symbol, format!("{date}: {detail}"))
            })?;
            cells.insert(
                *date,
                HoldingCell {
                    shares: purchase.shares,
                    open: bar.open,
                    value: purchase.shares * bar.open,
                    name: purchase.name.clone(),
                },
            );
        }

        summaries.push(HoldingSummary {
            id,
            symbol: purchase.symbol.clone(),
            name: purchase.name.clone(),
            shares: purchase.shares,
            purchased: purchase.date,
            empty: cells.is_empty(),
        });
        contributions.push(cells);
    }

    // Union of every holding's retained dates
    let dates: BTreeSet<NaiveDate> = contributions
        .iter()
        .flat_map(|cells| cells.keys().copied())
        .collect();

    let rows = dates
        .into_iter()
        .map(|date| {
            let mut cells = BTreeMap::new();
            let mut position = Decimal::ZERO;
            for (index, contribution) in contributions.iter().enumerate() {
                if let Some(cell) = contribution.get(&date) {
                    position += cell.value;
                    cells.insert(HoldingId(index), cell.clone());
                }
            }
            PortfolioRow {
                date,
                cells,
                position,
            }
        })
        .collect();

    Ok(PortfolioTable {
        holdings: summaries,
        rows,
    })
}
