use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgeingError {
    #[error("Config directory not found at {0}. Run 'ageing init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Ledger file not found: {0}")]
    LedgerNotFound(PathBuf),

    #[error("Failed to read ledger {path}: {source}")]
    LedgerRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported ledger format '{0}'. Use .xlsx, .xlsm, .xls, .ods or .csv")]
    UnsupportedFormat(String),

    #[error("Worksheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Ledger must have exactly {expected} columns after the header rows, found {found} (row {row})")]
    LedgerShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid --as-of date '{0}'. Expected YYYY-MM-DD")]
    InvalidAsOf(String),

    #[error("Invalid output format '{0}'. Use 'xlsx', 'csv' or 'json'.")]
    InvalidFormat(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgeingError {
    /// Errors raised while reading or computing a report, as opposed to
    /// configuration or argument mistakes.
    pub fn is_processing(&self) -> bool {
        matches!(
            self,
            AgeingError::LedgerNotFound(_)
                | AgeingError::LedgerRead { .. }
                | AgeingError::UnsupportedFormat(_)
                | AgeingError::SheetNotFound(_)
                | AgeingError::EmptyWorkbook
                | AgeingError::LedgerShape { .. }
                | AgeingError::Spreadsheet(_)
                | AgeingError::Xlsx(_)
                | AgeingError::Csv(_)
                | AgeingError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AgeingError>;
