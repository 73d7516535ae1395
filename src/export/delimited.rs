use std::io::Write;

use crate::ageing::AgeingReport;
use crate::error::Result;

/// Write the report as CSV with the same columns as the spreadsheet
pub fn write_csv<W: Write>(report: &AgeingReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(report.columns())?;

    for row in &report.rows {
        let mut record = vec![row.account_name.clone()];
        record.extend(report.bucket_cells(row).map(|a| format!("{:.2}", a)));
        record.push(format!("{:.2}", row.total));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
