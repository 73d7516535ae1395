mod bucket;
mod fifo;
mod report;

pub use bucket::Bucket;
pub use fifo::{
    settle_account, AccountSettlement, BillEntry, BillQueue, ReferenceTime, UnsettledItem,
};
pub use report::{AgeingReport, ReportRow, ACCOUNT_NAME_COLUMN, TOTAL_OUTSTANDING_COLUMN};

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ledger::{LedgerRow, NormalizeStats};

/// Payment money left over after an account's invoices were all cleared
#[derive(Debug, Clone, PartialEq)]
pub struct Overpayment {
    pub account_name: String,
    pub amount: Decimal,
}

/// Everything one report generation produced
#[derive(Debug, Clone)]
pub struct AgeingRun {
    pub reference: ReferenceTime,
    pub report: AgeingReport,
    pub unsettled: Vec<UnsettledItem>,
    pub overpayments: Vec<Overpayment>,
    pub stats: NormalizeStats,
}

/// Settle every account independently, in account name order
pub fn settle_ledger(rows: &[LedgerRow], reference: ReferenceTime) -> Vec<AccountSettlement> {
    let mut accounts: BTreeMap<&str, Vec<&LedgerRow>> = BTreeMap::new();
    for row in rows {
        accounts
            .entry(row.account_name.as_str())
            .or_default()
            .push(row);
    }

    accounts
        .into_iter()
        .map(|(account_name, rows)| settle_account(account_name, rows, reference))
        .collect()
}

/// FIFO-settle a normalized ledger and pivot what remains unpaid
pub fn age_ledger(rows: &[LedgerRow], reference: ReferenceTime, stats: NormalizeStats) -> AgeingRun {
    let mut unsettled = Vec::new();
    let mut overpayments = Vec::new();

    for settlement in settle_ledger(rows, reference) {
        if settlement.unapplied > Decimal::ZERO {
            overpayments.push(Overpayment {
                account_name: settlement.account_name,
                amount: settlement.unapplied,
            });
        }
        unsettled.extend(settlement.unsettled);
    }

    let report = AgeingReport::from_items(&unsettled);
    tracing::info!(
        accounts = report.rows.len(),
        items = unsettled.len(),
        total = %report.total_outstanding(),
        "ageing report built"
    );

    AgeingRun {
        reference,
        report,
        unsettled,
        overpayments,
        stats,
    }
}
