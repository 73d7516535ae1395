pub mod ageing;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;

use std::path::Path;

pub use ageing::{AgeingReport, AgeingRun, Bucket, Overpayment, ReferenceTime, UnsettledItem};
pub use config::{Config, LedgerSettings, ReportSettings};
pub use error::{AgeingError, Result};
pub use export::ReportFormat;
pub use ledger::{LedgerRow, NormalizeStats, RawCell, RawRow};

/// Normalize raw ledger rows and build the FIFO ageing report from them
pub fn generate_ageing(
    raw_rows: Vec<RawRow>,
    settings: &LedgerSettings,
    reference: ReferenceTime,
) -> AgeingRun {
    let (rows, stats) = ledger::normalize(raw_rows, settings);
    ageing::age_ledger(&rows, reference, stats)
}

/// Read a ledger file and build its ageing report
pub fn process_ledger(
    path: &Path,
    settings: &LedgerSettings,
    reference: ReferenceTime,
) -> Result<AgeingRun> {
    let raw_rows = ledger::read_ledger(path, settings)?;
    Ok(generate_ageing(raw_rows, settings, reference))
}
