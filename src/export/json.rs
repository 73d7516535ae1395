use rust_decimal::Decimal;
use serde::Serialize;

use crate::ageing::{AgeingReport, Bucket};
use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub columns: Vec<String>,
    pub rows: Vec<RowView<'a>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_outstanding: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RowView<'a> {
    pub account_name: &'a str,
    pub buckets: Vec<BucketAmount>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_outstanding: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BucketAmount {
    pub bucket: Bucket,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a AgeingReport) -> Self {
        let rows = report
            .rows
            .iter()
            .map(|row| RowView {
                account_name: &row.account_name,
                buckets: report
                    .buckets
                    .iter()
                    .map(|&bucket| BucketAmount {
                        bucket,
                        amount: row.amount(bucket),
                    })
                    .collect(),
                total_outstanding: row.total,
            })
            .collect();

        Self {
            columns: report.columns(),
            rows,
            total_outstanding: report.total_outstanding(),
        }
    }
}

/// Pretty-printed JSON table of the report
pub fn to_json(report: &AgeingReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ReportView::new(report))?)
}
