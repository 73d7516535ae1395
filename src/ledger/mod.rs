mod normalizer;
mod source;

pub use normalizer::{normalize, parse_amount, parse_date, LedgerRow, NormalizeStats, MAX_AMOUNT};
pub use source::{read_ledger, read_ledger_bytes, read_ledger_csv};

use chrono::NaiveDateTime;

use crate::error::{AgeingError, Result};

/// Positional width of a ledger export: serial number, account name,
/// document number, document date, narration, debit, credit, running balance.
pub const LEDGER_COLUMNS: usize = 8;

/// A spreadsheet cell before any typing has been applied
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value.to_string())
        }
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

/// One ledger line as it sits in the file, columns mapped by position
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row number in the source file
    pub line: usize,
    pub serial: RawCell,
    pub account_name: RawCell,
    pub doc_no: RawCell,
    pub doc_date: RawCell,
    pub narration: RawCell,
    pub debit: RawCell,
    pub credit: RawCell,
    pub balance: RawCell,
}

impl RawRow {
    pub fn from_cells(line: usize, cells: Vec<RawCell>) -> Result<Self> {
        let found = cells.len();
        let Ok([serial, account_name, doc_no, doc_date, narration, debit, credit, balance]) =
            <[RawCell; LEDGER_COLUMNS]>::try_from(cells)
        else {
            return Err(AgeingError::LedgerShape {
                row: line,
                expected: LEDGER_COLUMNS,
                found,
            });
        };

        Ok(Self {
            line,
            serial,
            account_name,
            doc_no,
            doc_date,
            narration,
            debit,
            credit,
            balance,
        })
    }
}
