//! Hover-text formatting
//!
//! Turns table cells into display strings for chart annotations. Fractional
//! numbers are clamped to two decimal places so hover boxes do not show a
//! gazillion digits; every other kind passes through in its natural form.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Delimiter between `name = value` pairs within one annotation.
///
/// Renderer-agnostic: an HTML renderer maps this to `<br />`.
pub const LINE_BREAK: &str = "\n";

/// A table cell as seen by the formatter.
///
/// One variant per scalar kind, one formatting rule per variant. `Missing`
/// renders as the empty string everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Fractional number, rendered with exactly two decimal places using
    /// banker's rounding (round half to even)
    Float(Decimal),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Float(v) => write!(f, "{:.2}", v.round_dp(2)),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Missing => Ok(()),
        }
    }
}

/// Build one composite annotation per table row.
///
/// Each row is a sequence of `(column name, value)` pairs; the result is
/// positional: exactly one string per input row, in the same order, with
/// column order preserved inside each string.
pub fn annotate_rows(rows: &[Vec<(String, CellValue)>]) -> Vec<String> {
    rows.iter()
        .map(|pairs| {
            pairs
                .iter()
                .map(|(name, value)| format!("{name} = {value}"))
                .collect::<Vec<_>>()
                .join(LINE_BREAK)
        })
        .collect()
}
