use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::transaction::TransactionRecord;
use crate::error::FinwiseError;
use crate::types::Money;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month. Orders chronologically; displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Display label, e.g. "Mar 2024".
    pub fn label(&self) -> String {
        let idx = (self.month.clamp(1, 12) - 1) as usize;
        format!("{} {}", MONTH_ABBREVIATIONS[idx], self.year)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = FinwiseError;

    /// Accepts `YYYY-MM` or any longer ISO date (only the first 7 chars count).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FinwiseError::DateError(format!("'{s}' is not a YYYY-MM month"));
        let head = s.get(..7).ok_or_else(bad)?;
        let (y, m) = head.split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        if !(1..=12).contains(&month) {
            return Err(bad());
        }
        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month_key: MonthKey,
    /// Display label such as "Mar 2024"; never used for ordering
    pub label: String,
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
}

/// Group transactions by calendar month, oldest month first.
pub fn aggregate_by_month(transactions: &[TransactionRecord]) -> Vec<MonthSummary> {
    let mut months: BTreeMap<MonthKey, (Money, Money)> = BTreeMap::new();

    for t in transactions {
        let entry = months
            .entry(MonthKey::of(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if t.is_income() {
            entry.0 += t.amount;
        } else {
            entry.1 += t.amount;
        }
    }

    months
        .into_iter()
        .map(|(key, (income, expenses))| MonthSummary {
            month_key: key,
            label: key.label(),
            income,
            expenses,
            net: income - expenses,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::transaction::TransactionType;
    use rust_decimal_macros::dec;

    fn tx(date: &str, amount: Decimal, kind: TransactionType) -> TransactionRecord {
        TransactionRecord {
            id: None,
            amount,
            kind,
            date: date.parse().unwrap(),
            description: None,
            category_name: None,
            category_color: None,
        }
    }

    #[test]
    fn test_month_key_display_and_label() {
        let key: MonthKey = "2024-03-15".parse().unwrap();
        assert_eq!(key.to_string(), "2024-03");
        assert_eq!(key.label(), "Mar 2024");
    }

    #[test]
    fn test_month_key_rejects_garbage() {
        assert!("2024".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("March-24".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_sums_and_net() {
        let txs = vec![
            tx("2024-03-01", dec!(5000), TransactionType::Income),
            tx("2024-03-10", dec!(1200), TransactionType::Expense),
            tx("2024-03-28", dec!(300), TransactionType::Expense),
        ];
        let out = aggregate_by_month(&txs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].income, dec!(5000));
        assert_eq!(out[0].expenses, dec!(1500));
        assert_eq!(out[0].net, dec!(3500));
    }

    #[test]
    fn test_chronological_across_year_boundary() {
        // Label order would put "Apr 2024" before "Dec 2023" and "Jan 2024"
        let txs = vec![
            tx("2024-04-02", dec!(10), TransactionType::Expense),
            tx("2023-12-20", dec!(10), TransactionType::Expense),
            tx("2024-01-05", dec!(10), TransactionType::Expense),
        ];
        let labels: Vec<String> = aggregate_by_month(&txs).into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["Dec 2023", "Jan 2024", "Apr 2024"]);
    }

    #[test]
    fn test_month_key_serde_round_trip_format() {
        let key = MonthKey { year: 2024, month: 7 };
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-07\"");
    }
}
