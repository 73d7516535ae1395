use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::{RawCell, RawRow};
use crate::config::LedgerSettings;

/// Largest magnitude accepted for a single debit or credit. Anything bigger
/// is treated as unreadable so that summing a whole ledger stays far inside
/// `Decimal` range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// A typed ledger line. `credit` marks an invoice, `debit` a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub line: usize,
    pub account_name: String,
    pub doc_no: Option<String>,
    pub doc_date: Option<NaiveDate>,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
}

/// What the normalizer kept and threw away
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub kept: usize,
    pub dropped_blank: usize,
    pub dropped_subtotal: usize,
    /// Non-empty dates that did not parse
    pub bad_dates: usize,
    /// Non-empty debit/credit values that did not parse or exceed `MAX_AMOUNT`
    pub bad_amounts: usize,
    pub both_sides: usize,
}

/// Clean and type raw ledger rows.
///
/// Rows without an account name and subtotal lines are dropped. Dates and
/// amounts that fail to parse become `None`; nothing here is fatal.
pub fn normalize(rows: Vec<RawRow>, settings: &LedgerSettings) -> (Vec<LedgerRow>, NormalizeStats) {
    let mut stats = NormalizeStats::default();
    let mut out = Vec::with_capacity(rows.len());
    let marker = settings.subtotal_marker.trim();
    if marker.is_empty() {
        tracing::warn!("empty subtotal marker; no rows are treated as subtotals");
    }

    for row in rows {
        let Some(account_name) = cell_text(&row.account_name) else {
            stats.dropped_blank += 1;
            continue;
        };
        if !marker.is_empty() && account_name.contains(marker) {
            stats.dropped_subtotal += 1;
            continue;
        }

        let doc_date = parse_date(&row.doc_date, &settings.date_formats);
        if doc_date.is_none() && !row.doc_date.is_empty() {
            tracing::debug!(line = row.line, cell = ?row.doc_date, "unparseable document date");
            stats.bad_dates += 1;
        }

        let debit = parse_amount(&row.debit);
        let credit = parse_amount(&row.credit);
        for (value, cell) in [(&debit, &row.debit), (&credit, &row.credit)] {
            if value.is_none() && !cell.is_empty() {
                tracing::debug!(line = row.line, cell = ?cell, "unparseable amount");
                stats.bad_amounts += 1;
            }
        }

        if debit.is_some() && credit.is_some() {
            tracing::warn!(
                line = row.line,
                account = %account_name,
                "row carries both debit and credit; counted as an invoice and a payment"
            );
            stats.both_sides += 1;
        }

        out.push(LedgerRow {
            line: row.line,
            account_name,
            doc_no: cell_text(&row.doc_no),
            doc_date,
            debit,
            credit,
        });
    }

    stats.kept = out.len();
    tracing::debug!(?stats, "normalized ledger");
    (out, stats)
}

fn cell_text(cell: &RawCell) -> Option<String> {
    match cell {
        RawCell::Empty => None,
        RawCell::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
        RawCell::Number(n) => Some(n.to_string()),
        RawCell::DateTime(dt) => Some(dt.to_string()),
    }
}

/// Coerce a cell to a date; `None` when it cannot be read as one
pub fn parse_date(cell: &RawCell, formats: &[String]) -> Option<NaiveDate> {
    match cell {
        RawCell::Empty => None,
        RawCell::DateTime(dt) => Some(dt.date()),
        RawCell::Number(serial) => excel_serial_to_date(*serial),
        RawCell::Text(s) => {
            let s = s.trim();
            formats.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(s, fmt).ok().or_else(|| {
                    NaiveDateTime::parse_from_str(s, &format!("{fmt} %H:%M:%S"))
                        .ok()
                        .map(|dt| dt.date())
                })
            })
        }
    }
}

/// Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 || serial >= 2_958_466.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Coerce a cell to an amount. Absent, unparseable and out-of-range values
/// are `None`, never zero.
pub fn parse_amount(cell: &RawCell) -> Option<Decimal> {
    let amount = match cell {
        RawCell::Number(n) => Decimal::try_from(*n).ok(),
        RawCell::Text(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        RawCell::Empty | RawCell::DateTime(_) => None,
    }?;
    (amount.abs() <= Decimal::from(MAX_AMOUNT)).then_some(amount)
}
