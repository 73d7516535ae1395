mod delimited;
mod json;
mod xlsx;

pub use delimited::write_csv;
pub use json::{to_json, ReportView};
pub use xlsx::{build_workbook, to_xlsx_bytes, write_xlsx};

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use crate::ageing::AgeingReport;
use crate::error::{AgeingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    /// Format implied by a file name, if its extension names one
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl FromStr for ReportFormat {
    type Err = AgeingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            _ => Err(AgeingError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write the finished report to `path` in the given format
pub fn write_report(report: &AgeingReport, format: ReportFormat, path: &Path) -> Result<()> {
    match format {
        ReportFormat::Xlsx => write_xlsx(report, path),
        ReportFormat::Csv => write_csv(report, File::create(path)?),
        ReportFormat::Json => {
            std::fs::write(path, to_json(report)?)?;
            Ok(())
        }
    }
}
