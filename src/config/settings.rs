use serde::{Deserialize, Serialize};

/// Literal text the ledger export puts in the account column of subtotal lines.
pub const DEFAULT_SUBTOTAL_MARKER: &str = "ACCOUNT Wise Totals";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub ledger: LedgerSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LedgerSettings {
    /// Decoration rows above the data (title, column headings)
    pub skip_rows: usize,
    pub subtotal_marker: String,
    /// Worksheet to read; the first sheet when unset
    pub sheet: Option<String>,
    /// chrono formats tried in order for text dates
    pub date_formats: Vec<String>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            skip_rows: 2,
            subtotal_marker: DEFAULT_SUBTOTAL_MARKER.to_string(),
            sheet: None,
            date_formats: [
                "%d-%m-%Y",
                "%d/%m/%Y",
                "%d.%m.%Y",
                "%Y-%m-%d",
                "%Y/%m/%d",
                "%d-%b-%Y",
                "%d %b %Y",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    pub output_dir: String,
    pub file_name: String,
    pub currency_symbol: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            file_name: "Debtors_Ageing_FIFO.xlsx".to_string(),
            currency_symbol: String::new(),
        }
    }
}
