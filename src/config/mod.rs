mod settings;

pub use settings::{Config, LedgerSettings, ReportSettings, DEFAULT_SUBTOTAL_MARKER};

use crate::error::{AgeingError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.ageing/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "ageing") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.ageing/
    let home = dirs_home().ok_or_else(|| {
        AgeingError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".ageing"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("config.toml")
}

/// Load config.toml, falling back to built-in defaults when it is absent
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_file(config_dir);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| AgeingError::ConfigParse { path, source: e })
}

/// Directory the report file goes to when no explicit output path is given
pub fn resolve_output_dir(report: &ReportSettings) -> PathBuf {
    expand_path(&report.output_dir)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[ledger]
skip_rows = 2                           # title and heading rows above the data
subtotal_marker = "ACCOUNT Wise Totals" # rows whose account contains this are dropped
# sheet = "Ledger"                      # optional, defaults to the first worksheet
date_formats = [
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d %b %Y",
]

[report]
output_dir = "."
file_name = "Debtors_Ageing_FIFO.xlsx"
currency_symbol = ""                    # e.g. "₹" or "$" for terminal output
"#;
