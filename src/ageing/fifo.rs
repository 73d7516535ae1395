use std::collections::VecDeque;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::Bucket;
use crate::ledger::LedgerRow;

const SECONDS_PER_DAY: i64 = 86_400;

/// The instant every age in one report is measured from. Captured once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTime(NaiveDateTime);

impl ReferenceTime {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    /// Start of the given day
    pub fn as_of(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }

    pub fn at(timestamp: NaiveDateTime) -> Self {
        Self(timestamp)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    /// Whole days from `date` to the reference, rounded down
    pub fn age_days(&self, date: NaiveDate) -> i64 {
        let elapsed = self.0 - date.and_time(NaiveTime::MIN);
        elapsed.num_seconds().div_euclid(SECONDS_PER_DAY)
    }
}

/// An invoice amount not yet fully paid
#[derive(Debug, Clone, PartialEq)]
pub struct BillEntry {
    pub date: Option<NaiveDate>,
    pub doc_no: Option<String>,
    pub remaining: Decimal,
}

/// Invoices of one account, oldest at the front
#[derive(Debug, Default)]
pub struct BillQueue {
    bills: VecDeque<BillEntry>,
}

impl BillQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bill: BillEntry) {
        self.bills.push_back(bill);
    }

    /// Settle invoices oldest-first. Returns whatever part of the payment
    /// was left over once the queue ran dry.
    pub fn apply_payment(&mut self, amount: Decimal) -> Decimal {
        let mut payment = amount;
        while payment > Decimal::ZERO {
            let Some(head) = self.bills.front_mut() else {
                break;
            };
            if payment >= head.remaining {
                payment -= head.remaining;
                self.bills.pop_front();
            } else {
                head.remaining -= payment;
                payment = Decimal::ZERO;
            }
        }
        payment
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BillEntry> {
        self.bills.iter()
    }

    pub fn into_entries(self) -> Vec<BillEntry> {
        self.bills.into()
    }
}

/// The unpaid remainder of one invoice after all payments were applied
#[derive(Debug, Clone, PartialEq)]
pub struct UnsettledItem {
    pub account_name: String,
    pub doc_no: Option<String>,
    pub date: Option<NaiveDate>,
    pub unpaid_amount: Decimal,
    /// `None` when the invoice date could not be read
    pub age_days: Option<i64>,
    pub bucket: Bucket,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountSettlement {
    pub account_name: String,
    pub unsettled: Vec<UnsettledItem>,
    /// Payments received after every invoice was cleared. Not carried forward.
    pub unapplied: Decimal,
}

/// Run FIFO matching for a single account.
///
/// Invoices and payments are each taken in document date order; undated
/// rows come after dated ones and otherwise keep their ledger order.
pub fn settle_account<'a, I>(
    account_name: &str,
    rows: I,
    reference: ReferenceTime,
) -> AccountSettlement
where
    I: IntoIterator<Item = &'a LedgerRow>,
{
    let mut rows: Vec<&LedgerRow> = rows.into_iter().collect();
    rows.sort_by_key(|row| (row.doc_date.is_none(), row.doc_date));

    let mut queue = BillQueue::new();
    for row in &rows {
        if let Some(credit) = row.credit {
            queue.push(BillEntry {
                date: row.doc_date,
                doc_no: row.doc_no.clone(),
                remaining: credit,
            });
        }
    }

    let mut unapplied = Decimal::ZERO;
    for debit in rows.iter().filter_map(|row| row.debit) {
        unapplied += queue.apply_payment(debit);
    }

    if unapplied > Decimal::ZERO {
        tracing::warn!(
            account = account_name,
            %unapplied,
            "payments exceed invoices; excess is not carried forward"
        );
    }

    let unsettled = queue
        .into_entries()
        .into_iter()
        .filter(|bill| !bill.remaining.is_zero())
        .map(|bill| {
            let age_days = bill.date.map(|d| reference.age_days(d));
            if age_days.is_none() {
                tracing::warn!(
                    account = account_name,
                    doc_no = ?bill.doc_no,
                    "undated invoice left unpaid; reported as oldest"
                );
            }
            UnsettledItem {
                account_name: account_name.to_string(),
                doc_no: bill.doc_no,
                date: bill.date,
                unpaid_amount: bill.remaining,
                age_days,
                bucket: Bucket::classify(age_days),
            }
        })
        .collect();

    AccountSettlement {
        account_name: account_name.to_string(),
        unsettled,
        unapplied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(n: i64) -> Decimal {
        Decimal::from_i64(n).unwrap()
    }

    fn bill(remaining: i64) -> BillEntry {
        BillEntry {
            date: None,
            doc_no: None,
            remaining: dec(remaining),
        }
    }

    #[test]
    fn payment_settles_oldest_first() {
        let mut queue = BillQueue::new();
        queue.push(bill(50));
        queue.push(bill(80));

        let left = queue.apply_payment(dec(60));

        assert_eq!(left, Decimal::ZERO);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().unwrap().remaining, dec(70));
    }

    #[test]
    fn exact_payment_removes_bill() {
        let mut queue = BillQueue::new();
        queue.push(bill(100));

        assert_eq!(queue.apply_payment(dec(100)), Decimal::ZERO);
        assert!(queue.is_empty());
    }

    #[test]
    fn overpayment_is_returned() {
        let mut queue = BillQueue::new();
        queue.push(bill(30));

        assert_eq!(queue.apply_payment(dec(45)), dec(15));
        assert!(queue.is_empty());
        assert_eq!(queue.apply_payment(dec(5)), dec(5));
    }

    #[test]
    fn zero_payment_touches_nothing() {
        let mut queue = BillQueue::new();
        queue.push(bill(30));

        assert_eq!(queue.apply_payment(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(queue.iter().next().unwrap().remaining, dec(30));
    }

    #[test]
    fn age_is_floored_days() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let noon = ReferenceTime::at(day.and_hms_opt(12, 0, 0).unwrap());

        assert_eq!(noon.age_days(day), 0);
        assert_eq!(noon.age_days(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()), 1);
        // half a day in the future floors to -1
        assert_eq!(noon.age_days(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()), -1);
        assert_eq!(ReferenceTime::as_of(day).age_days(day), 0);
    }
}
