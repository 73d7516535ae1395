use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use super::{Bucket, UnsettledItem};

pub const ACCOUNT_NAME_COLUMN: &str = "Account Name";
pub const TOTAL_OUTSTANDING_COLUMN: &str = "Total Outstanding";

/// One account's outstanding balance split by age bucket
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub account_name: String,
    pub amounts: BTreeMap<Bucket, Decimal>,
    pub total: Decimal,
}

impl ReportRow {
    /// Amount in a bucket, zero when the account has nothing there
    pub fn amount(&self, bucket: Bucket) -> Decimal {
        self.amounts.get(&bucket).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Pivoted ageing summary: accounts as rows, buckets as columns.
///
/// Only buckets that occur somewhere in the data become columns, and only
/// accounts with something still unpaid become rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgeingReport {
    pub buckets: Vec<Bucket>,
    pub rows: Vec<ReportRow>,
}

impl AgeingReport {
    pub fn from_items(items: &[UnsettledItem]) -> Self {
        let mut grouped: BTreeMap<&str, BTreeMap<Bucket, Decimal>> = BTreeMap::new();
        let mut present = BTreeSet::new();

        for item in items {
            *grouped
                .entry(item.account_name.as_str())
                .or_default()
                .entry(item.bucket)
                .or_default() += item.unpaid_amount;
            present.insert(item.bucket);
        }

        let rows = grouped
            .into_iter()
            .map(|(account_name, amounts)| ReportRow {
                account_name: account_name.to_string(),
                total: amounts.values().sum(),
                amounts,
            })
            .collect();

        Self {
            buckets: present.into_iter().collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row: account, the buckets present, total
    pub fn columns(&self) -> Vec<String> {
        std::iter::once(ACCOUNT_NAME_COLUMN)
            .chain(self.buckets.iter().map(|b| b.label()))
            .chain(std::iter::once(TOTAL_OUTSTANDING_COLUMN))
            .map(str::to_string)
            .collect()
    }

    /// Bucket amounts of a row in column order, zero-filled
    pub fn bucket_cells<'a>(&'a self, row: &'a ReportRow) -> impl Iterator<Item = Decimal> + 'a {
        self.buckets.iter().map(move |b| row.amount(*b))
    }

    /// Column sums per bucket
    pub fn bucket_totals(&self) -> Vec<Decimal> {
        self.buckets
            .iter()
            .map(|b| self.rows.iter().map(|r| r.amount(*b)).sum())
            .collect()
    }

    pub fn total_outstanding(&self) -> Decimal {
        self.rows.iter().map(|r| r.total).sum()
    }

    pub fn row(&self, account_name: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.account_name == account_name)
    }
}
