use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};

use super::{RawCell, RawRow, LEDGER_COLUMNS};
use crate::config::LedgerSettings;
use crate::error::{AgeingError, Result};

/// Read a ledger export from disk, picking the reader by file extension
pub fn read_ledger(path: &Path, settings: &LedgerSettings) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(AgeingError::LedgerNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            let workbook = open_workbook_auto(path)?;
            read_workbook(workbook, settings)
        }
        "csv" => {
            let file = File::open(path).map_err(|source| AgeingError::LedgerRead {
                path: path.to_path_buf(),
                source,
            })?;
            read_ledger_csv(file, settings)
        }
        other => Err(AgeingError::UnsupportedFormat(other.to_string())),
    }
}

/// Read a ledger workbook held in memory, e.g. an uploaded file
pub fn read_ledger_bytes(bytes: Vec<u8>, settings: &LedgerSettings) -> Result<Vec<RawRow>> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_workbook(workbook, settings)
}

/// Read a headerless CSV ledger. Every field arrives as text.
pub fn read_ledger_csv<R: Read>(reader: R, settings: &LedgerSettings) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        if idx < settings.skip_rows {
            continue;
        }
        let cells: Vec<RawCell> = record.iter().map(RawCell::from).collect();
        if cells.iter().all(RawCell::is_empty) {
            continue;
        }
        rows.push(RawRow::from_cells(idx + 1, cells)?);
    }

    tracing::debug!(rows = rows.len(), "read csv ledger");
    Ok(rows)
}

fn read_workbook<RS: Read + Seek>(
    mut workbook: Sheets<RS>,
    settings: &LedgerSettings,
) -> Result<Vec<RawRow>> {
    let range = match &settings.sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(AgeingError::SheetNotFound(name.clone()));
            }
            workbook.worksheet_range(name)?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or(AgeingError::EmptyWorkbook)??,
    };

    let rows = range_rows(&range, settings.skip_rows)?;
    tracing::debug!(rows = rows.len(), "read workbook ledger");
    Ok(rows)
}

/// Map a worksheet range onto ledger rows by absolute sheet position.
///
/// calamine trims leading empty rows and columns from a range, so both are
/// padded back before the header rows are skipped and the width is checked.
fn range_rows(range: &Range<Data>, skip_rows: usize) -> Result<Vec<RawRow>> {
    let (Some((start_row, start_col)), Some((_, end_col))) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };
    let start_row = start_row as usize;
    let start_col = start_col as usize;
    let width = end_col as usize + 1;

    let mut rows = Vec::new();
    for (offset, row) in range.rows().enumerate() {
        let line = start_row + offset;
        if line < skip_rows {
            continue;
        }
        if width != LEDGER_COLUMNS {
            return Err(AgeingError::LedgerShape {
                row: line + 1,
                expected: LEDGER_COLUMNS,
                found: width,
            });
        }

        let mut cells = vec![RawCell::Empty; start_col];
        cells.extend(row.iter().map(RawCell::from));
        if cells.iter().all(RawCell::is_empty) {
            continue;
        }
        rows.push(RawRow::from_cells(line + 1, cells)?);
    }

    Ok(rows)
}

impl From<&Data> for RawCell {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => RawCell::Empty,
            Data::String(s) | Data::DurationIso(s) => RawCell::from(s.as_str()),
            Data::Float(f) => RawCell::Number(*f),
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Bool(b) => RawCell::Text(b.to_string()),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(RawCell::DateTime)
                .unwrap_or(RawCell::Empty),
            Data::DateTimeIso(s) => s
                .parse::<NaiveDateTime>()
                .ok()
                .or_else(|| {
                    s.parse::<NaiveDate>()
                        .ok()
                        .map(|d| d.and_time(chrono::NaiveTime::MIN))
                })
                .map(RawCell::DateTime)
                .unwrap_or_else(|| RawCell::from(s.as_str())),
        }
    }
}
