use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};

use crate::ageing::AgeingReport;
use crate::error::Result;

const SHEET_NAME: &str = "Ageing";
const MONEY_FORMAT: &str = "#,##0.00";

fn to_number(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

/// Lay the report out as a single worksheet: header row, one row per account
pub fn build_workbook(report: &AgeingReport) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(MONEY_FORMAT);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let columns = report.columns();
    for (col, title) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, &header)?;
    }

    for (idx, row) in report.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, &row.account_name)?;
        for (offset, amount) in report.bucket_cells(row).enumerate() {
            sheet.write_number_with_format(r, offset as u16 + 1, to_number(amount), &money)?;
        }
        let total_col = columns.len() as u16 - 1;
        sheet.write_number_with_format(r, total_col, to_number(row.total), &money)?;
    }

    sheet.set_column_width(0, 40)?;
    for col in 1..columns.len() as u16 {
        sheet.set_column_width(col, 16)?;
    }

    Ok(workbook)
}

/// Save the report as an .xlsx file
pub fn write_xlsx(report: &AgeingReport, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook.save(path)?;
    Ok(())
}

/// The .xlsx file as bytes, for handing to a download
pub fn to_xlsx_bytes(report: &AgeingReport) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}
