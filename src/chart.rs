//! Renderer-agnostic chart payloads
//!
//! The core generates these; the rendering collaborator draws them. No
//! colors, axes or legends live here, only the data and the per-point
//! hover annotations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::hover::{annotate_rows, CellValue};
use crate::portfolio::{HoldingId, PortfolioTable};
use crate::types::PriceSeries;

/// One day of the single-stock view
#[derive(Debug, Clone, Serialize)]
pub struct QuotePoint {
    pub date: NaiveDate,
    pub open: Decimal,
    pub volume: Decimal,
}

/// Single-stock chart: opening price plus traded volume per day
#[derive(Debug, Clone, Serialize)]
pub struct QuoteChart {
    pub title: String,
    /// Chronological
    pub points: Vec<QuotePoint>,
    /// One annotation per point, same order
    pub annotations: Vec<String>,
}

impl QuoteChart {
    pub fn build(series: &PriceSeries, title: impl Into<String>) -> Self {
        let points: Vec<QuotePoint> = series
            .bars
            .iter()
            .map(|(date, bar)| QuotePoint {
                date: *date,
                open: bar.open,
                volume: bar.volume,
            })
            .collect();

        let hover_rows: Vec<Vec<(String, CellValue)>> = points
            .iter()
            .map(|p| {
                vec![
                    ("open".to_string(), CellValue::Float(p.open)),
                    ("volume".to_string(), CellValue::Float(p.volume)),
                ]
            })
            .collect();

        Self {
            title: title.into(),
            annotations: annotate_rows(&hover_rows),
            points,
        }
    }
}

/// One holding's value line across the portfolio's date axis.
///
/// `None` marks a date where the holding has no data yet; the renderer
/// leaves a gap rather than drawing zero.
#[derive(Debug, Clone, Serialize)]
pub struct HoldingLine {
    pub id: HoldingId,
    /// Legend name
    pub name: String,
    pub values: Vec<Option<Decimal>>,
}

/// Portfolio chart: one line per holding plus the aggregate position line
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioChart {
    pub title: String,
    /// Shared x axis, chronological
    pub dates: Vec<NaiveDate>,
    /// Aggregate position per date
    pub position: Vec<Decimal>,
    pub lines: Vec<HoldingLine>,
    /// One annotation per date, same order
    pub annotations: Vec<String>,
}

impl PortfolioChart {
    pub fn build(table: &PortfolioTable, title: impl Into<String>) -> Self {
        let dates: Vec<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
        let position: Vec<Decimal> = table.rows.iter().map(|r| r.position).collect();

        let lines = table
            .holdings
            .iter()
            .map(|summary| HoldingLine {
                id: summary.id,
                name: summary.name.clone(),
                values: table
                    .rows
                    .iter()
                    .map(|row| row.cells.get(&summary.id).map(|cell| cell.value))
                    .collect(),
            })
            .collect();

        Self {
            title: title.into(),
            dates,
            position,
            lines,
            annotations: table.annotations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{compute_evolution, Holding};
    use crate::types::{DailySeries, DateFooting, PurchaseEvent, RawBar};
    use rust_decimal_macros::dec;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn raw_bar(open: &str, volume: &str) -> RawBar {
        RawBar {
            open: open.to_string(),
            high: "0".to_string(),
            low: "0".to_string(),
            close: "0".to_string(),
            adjusted_close: "0".to_string(),
            volume: volume.to_string(),
        }
    }

    fn sample_series() -> DailySeries {
        let mut series = DailySeries::new("IBM", DateFooting::Naive);
        series.insert(day("2024-01-02"), raw_bar("189.33", "3200000"));
        series.insert(day("2024-01-01"), raw_bar("187.15", "2100000"));
        series
    }

    #[test]
    fn quote_chart_is_chronological_with_matching_annotations() {
        let decoded = sample_series().decode().unwrap();
        let chart = QuoteChart::build(&decoded, "IBM -- IBM Corp");

        assert_eq!(chart.title, "IBM -- IBM Corp");
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[0].date, day("2024-01-01"));
        assert_eq!(chart.points[1].open, dec!(189.33));
        assert_eq!(chart.annotations.len(), chart.points.len());
        assert_eq!(chart.annotations[1], "open = 189.33\nvolume = 3200000.00");
    }

    #[test]
    fn portfolio_chart_keeps_gaps_as_none() {
        let holdings = vec![
            Holding {
                series: sample_series(),
                purchase: PurchaseEvent::new("IBM", "IBM -- IBM Corp", "2023-12-31", dec!(2))
                    .unwrap(),
            },
            Holding {
                series: {
                    let mut s = DailySeries::new("MSFT", DateFooting::Naive);
                    s.insert(day("2024-01-02"), raw_bar("370.00", "900000"));
                    s
                },
                purchase: PurchaseEvent::new("MSFT", "MSFT -- Microsoft", "2024-01-01", dec!(1))
                    .unwrap(),
            },
        ];

        let table = compute_evolution(&holdings).unwrap();
        let chart = PortfolioChart::build(&table, "Portfolio");

        assert_eq!(chart.dates, vec![day("2024-01-01"), day("2024-01-02")]);
        assert_eq!(chart.lines.len(), 2);
        assert_eq!(chart.lines[1].name, "MSFT -- Microsoft");
        assert_eq!(chart.lines[1].values, vec![None, Some(dec!(370.00))]);
        assert_eq!(chart.position, vec![dec!(374.30), dec!(748.66)]);
        assert_eq!(chart.annotations.len(), 2);
    }
}
