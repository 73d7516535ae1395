use std::fmt;

use serde::{Serialize, Serializer};

/// Age range an unpaid invoice remainder is reported under.
///
/// Variants are declared oldest-last so the derived `Ord` is the column order
/// of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    OneMonth,
    TwoMonths,
    ThreeMonths,
    FourMonths,
    FiveMonths,
    SixMonths,
    SevenMonths,
    EightMonths,
    NineMonthsPlus,
}

impl Bucket {
    pub const ALL: [Bucket; 9] = [
        Bucket::OneMonth,
        Bucket::TwoMonths,
        Bucket::ThreeMonths,
        Bucket::FourMonths,
        Bucket::FiveMonths,
        Bucket::SixMonths,
        Bucket::SevenMonths,
        Bucket::EightMonths,
        Bucket::NineMonthsPlus,
    ];

    /// Classify by whole days outstanding. Upper bounds are inclusive;
    /// future-dated invoices (negative ages) land in the first bucket.
    pub fn for_age(days: i64) -> Self {
        match days {
            i64::MIN..=30 => Bucket::OneMonth,
            31..=60 => Bucket::TwoMonths,
            61..=90 => Bucket::ThreeMonths,
            91..=120 => Bucket::FourMonths,
            121..=150 => Bucket::FiveMonths,
            151..=180 => Bucket::SixMonths,
            181..=210 => Bucket::SevenMonths,
            211..=240 => Bucket::EightMonths,
            _ => Bucket::NineMonthsPlus,
        }
    }

    /// Like [`Bucket::for_age`], with an unknown age treated as the oldest bucket
    pub fn classify(age_days: Option<i64>) -> Self {
        age_days.map_or(Bucket::NineMonthsPlus, Bucket::for_age)
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::OneMonth => "1 Month",
            Bucket::TwoMonths => "2 Months",
            Bucket::ThreeMonths => "3 Months",
            Bucket::FourMonths => "4 Months",
            Bucket::FiveMonths => "5 Months",
            Bucket::SixMonths => "6 Months",
            Bucket::SevenMonths => "7 Months",
            Bucket::EightMonths => "8 Months",
            Bucket::NineMonthsPlus => "9+ Months",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            Bucket::OneMonth => "up to 30",
            Bucket::TwoMonths => "31 - 60",
            Bucket::ThreeMonths => "61 - 90",
            Bucket::FourMonths => "91 - 120",
            Bucket::FiveMonths => "121 - 150",
            Bucket::SixMonths => "151 - 180",
            Bucket::SevenMonths => "181 - 210",
            Bucket::EightMonths => "211 - 240",
            Bucket::NineMonthsPlus => "over 240",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}
