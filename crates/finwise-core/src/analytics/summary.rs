use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use super::category::{aggregate_by_category, CategorySummary};
use super::monthly::{aggregate_by_month, MonthKey, MonthSummary};
use super::transaction::{TransactionRecord, TypeFilter};
use crate::error::FinwiseError;
use crate::types::{percent_of, with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Time ranges
// ---------------------------------------------------------------------------

/// Look-back window for the analytics view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "3m")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl TimeRange {
    fn months(self) -> u32 {
        match self {
            TimeRange::ThreeMonths => 3,
            TimeRange::SixMonths => 6,
            TimeRange::OneYear => 12,
        }
    }

    /// First day included in the window. Calendar months are subtracted,
    /// so 31 May minus three months is 28/29 February.
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for TimeRange {
    type Err = FinwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "3m" => Ok(TimeRange::ThreeMonths),
            "6m" => Ok(TimeRange::SixMonths),
            "1y" | "12m" => Ok(TimeRange::OneYear),
            other => Err(FinwiseError::InvalidInput {
                field: "range".into(),
                reason: format!("unknown range '{other}', use 3m, 6m or 1y"),
            }),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeRange::ThreeMonths => "3m",
            TimeRange::SixMonths => "6m",
            TimeRange::OneYear => "1y",
        };
        f.write_str(s)
    }
}

/// Transactions dated on or after `start`, in input order.
pub fn filter_since(transactions: &[TransactionRecord], start: NaiveDate) -> Vec<TransactionRecord> {
    transactions
        .iter()
        .filter(|t| t.date >= start)
        .cloned()
        .collect()
}

/// Transactions of the selected type whose description or category name
/// contains `search`, ignoring case. An empty or absent search matches
/// everything; a missing description or category never matches a
/// non-empty search. Input order is kept.
pub fn filter_transactions(
    transactions: &[TransactionRecord],
    search: Option<&str>,
    filter: TypeFilter,
) -> Vec<TransactionRecord> {
    let needle = search.unwrap_or_default().to_lowercase();
    let contains = |field: Option<&String>| {
        field.is_some_and(|text| text.to_lowercase().contains(&needle))
    };

    transactions
        .iter()
        .filter(|t| filter.matches(t.kind))
        .filter(|t| {
            needle.is_empty()
                || contains(t.description.as_ref())
                || contains(t.category_name.as_ref())
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Period totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_income: Money,
}

pub fn period_totals(transactions: &[TransactionRecord]) -> PeriodTotals {
    let (income, expenses) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(inc, exp), t| {
            if t.is_income() {
                (inc + t.amount, exp)
            } else {
                (inc, exp + t.amount)
            }
        },
    );
    PeriodTotals {
        total_income: income,
        total_expenses: expenses,
        net_income: income - expenses,
    }
}

/// Totals for transactions dated from the first of `today`'s month.
pub fn month_to_date(transactions: &[TransactionRecord], today: NaiveDate) -> PeriodTotals {
    let start = MonthKey::of(today).first_day().unwrap_or(today);
    let in_month: Vec<TransactionRecord> = filter_since(transactions, start);
    period_totals(&in_month)
}

/// Newest transactions first, at most `limit`. Same-day order is kept.
pub fn recent_transactions(transactions: &[TransactionRecord], limit: usize) -> Vec<TransactionRecord> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

// ---------------------------------------------------------------------------
// Analytics summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub view: TypeFilter,
    pub categories: Vec<CategorySummary>,
    pub months: Vec<MonthSummary>,
    /// Sum of the category totals for the selected view
    pub total_spending: Money,
    pub avg_monthly_income: Money,
    pub avg_monthly_expenses: Money,
    /// Share of average income kept, as a percentage. Not clamped: a
    /// month spending more than it earns goes negative.
    pub savings_rate: Percent,
}

/// Category breakdown, monthly series and headline averages.
///
/// Averages divide by the number of months that have transactions (or by
/// one when there are none).
pub fn summarize(transactions: &[TransactionRecord], view: TypeFilter) -> AnalyticsSummary {
    let categories = aggregate_by_category(transactions, view);
    let months = aggregate_by_month(transactions);

    let total_spending: Money = categories.iter().map(|c| c.total_amount).sum();
    let month_count = Decimal::from(months.len().max(1) as u64);
    let avg_monthly_income = months.iter().map(|m| m.income).sum::<Money>() / month_count;
    let avg_monthly_expenses = months.iter().map(|m| m.expenses).sum::<Money>() / month_count;
    let savings_rate = percent_of(avg_monthly_income - avg_monthly_expenses, avg_monthly_income);

    AnalyticsSummary {
        view,
        categories,
        months,
        total_spending,
        avg_monthly_income,
        avg_monthly_expenses,
        savings_rate,
    }
}

#[derive(Debug, Clone, Serialize)]
struct AnalyticsAssumptions {
    range: TimeRange,
    view: TypeFilter,
    today: NaiveDate,
    start_date: NaiveDate,
}

/// Apply the look-back window, then summarize, inside the standard envelope.
pub fn analytics_report(
    transactions: &[TransactionRecord],
    range: TimeRange,
    view: TypeFilter,
    today: NaiveDate,
) -> ComputationOutput<AnalyticsSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let start_date = range.start_date(today);
    let window = filter_since(transactions, start_date);
    if window.is_empty() {
        warnings.push(format!("No transactions since {start_date}"));
    }
    let result = summarize(&window, view);
    if result.avg_monthly_income.is_zero() && !window.is_empty() {
        warnings.push("No income in range; savings rate shown as 0%".into());
    }

    let assumptions = AnalyticsAssumptions {
        range,
        view,
        today,
        start_date,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Category and calendar-month rollups over the look-back window",
        &assumptions,
        warnings,
        elapsed,
        result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::transaction::TransactionType;
    use rust_decimal_macros::dec;

    fn tx(date: &str, amount: Decimal, kind: TransactionType) -> TransactionRecord {
        TransactionRecord {
            id: Some(format!("{date}-{amount}")),
            amount,
            kind,
            date: date.parse().unwrap(),
            description: None,
            category_name: None,
            category_color: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_date_clamps_to_month_end() {
        assert_eq!(TimeRange::ThreeMonths.start_date(date("2024-05-31")), date("2024-02-29"));
        assert_eq!(TimeRange::OneYear.start_date(date("2024-10-15")), date("2023-10-15"));
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("6m".parse::<TimeRange>().unwrap(), TimeRange::SixMonths);
        assert_eq!("1Y".parse::<TimeRange>().unwrap(), TimeRange::OneYear);
        assert!("2w".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_savings_rate_from_monthly_averages() {
        let txs = vec![
            tx("2024-01-01", dec!(4000), TransactionType::Income),
            tx("2024-01-15", dec!(3000), TransactionType::Expense),
            tx("2024-02-01", dec!(6000), TransactionType::Income),
            tx("2024-02-15", dec!(2000), TransactionType::Expense),
        ];
        let s = summarize(&txs, TypeFilter::Expenses);
        assert_eq!(s.avg_monthly_income, dec!(5000));
        assert_eq!(s.avg_monthly_expenses, dec!(2500));
        assert_eq!(s.savings_rate, dec!(50));
        assert_eq!(s.total_spending, dec!(5000));
    }

    #[test]
    fn test_savings_rate_negative_when_overspending() {
        let txs = vec![
            tx("2024-01-01", dec!(1000), TransactionType::Income),
            tx("2024-01-15", dec!(1500), TransactionType::Expense),
        ];
        assert_eq!(summarize(&txs, TypeFilter::Both).savings_rate, dec!(-50));
    }

    #[test]
    fn test_empty_summary_is_all_zero() {
        let s = summarize(&[], TypeFilter::Expenses);
        assert!(s.categories.is_empty());
        assert_eq!(s.avg_monthly_income, Decimal::ZERO);
        assert_eq!(s.savings_rate, Decimal::ZERO);
    }

    #[test]
    fn test_month_to_date() {
        let txs = vec![
            tx("2024-02-28", dec!(999), TransactionType::Expense),
            tx("2024-03-01", dec!(5000), TransactionType::Income),
            tx("2024-03-05", dec!(800), TransactionType::Expense),
        ];
        let totals = month_to_date(&txs, date("2024-03-20"));
        assert_eq!(totals.total_income, dec!(5000));
        assert_eq!(totals.total_expenses, dec!(800));
        assert_eq!(totals.net_income, dec!(4200));
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let txs = vec![
            tx("2024-01-01", dec!(1), TransactionType::Expense),
            tx("2024-03-01", dec!(2), TransactionType::Expense),
            tx("2024-02-01", dec!(3), TransactionType::Expense),
        ];
        let recent = recent_transactions(&txs, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount, dec!(2));
        assert_eq!(recent[1].amount, dec!(3));
    }

    #[test]
    fn test_report_applies_window() {
        let txs = vec![
            tx("2023-01-01", dec!(100), TransactionType::Expense),
            tx("2024-09-01", dec!(40), TransactionType::Expense),
        ];
        let out = analytics_report(&txs, TimeRange::ThreeMonths, TypeFilter::Expenses, date("2024-10-15"));
        assert_eq!(out.result.total_spending, dec!(40));
        assert_eq!(out.result.months.len(), 1);
    }

    fn described(kind: TransactionType, description: Option<&str>, category: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            description: description.map(str::to_string),
            category_name: category.map(str::to_string),
            ..tx("2024-03-05", dec!(100), kind)
        }
    }

    fn ledger() -> Vec<TransactionRecord> {
        vec![
            described(TransactionType::Expense, Some("Weekly GROCERIES run"), Some("Food")),
            described(TransactionType::Expense, Some("Metro card"), Some("Transport")),
            described(TransactionType::Income, Some("March salary"), Some("Salary")),
            described(TransactionType::Expense, Some("Cash withdrawal"), None),
            described(TransactionType::Expense, None, None),
        ]
    }

    #[test]
    fn test_search_matches_description_ignoring_case() {
        let found = filter_transactions(&ledger(), Some("groceries"), TypeFilter::Both);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description.as_deref(), Some("Weekly GROCERIES run"));
    }

    #[test]
    fn test_search_matches_category_name() {
        let found = filter_transactions(&ledger(), Some("TRANS"), TypeFilter::Both);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category_name.as_deref(), Some("Transport"));
    }

    #[test]
    fn test_search_skips_records_without_category_or_description() {
        // "cash" hits only the uncategorised withdrawal; the bare record has nothing to match
        let found = filter_transactions(&ledger(), Some("cash"), TypeFilter::Both);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category_name, None);
        assert!(filter_transactions(&ledger(), Some("uncategorized"), TypeFilter::Both).is_empty());
    }

    #[test]
    fn test_type_only_filtering() {
        assert_eq!(filter_transactions(&ledger(), None, TypeFilter::Both).len(), 5);
        assert_eq!(filter_transactions(&ledger(), Some(""), TypeFilter::Expenses).len(), 4);
        let income = filter_transactions(&ledger(), None, TypeFilter::Income);
        assert_eq!(income.len(), 1);
        assert!(income[0].is_income());
    }

    #[test]
    fn test_search_and_type_combine() {
        assert!(filter_transactions(&ledger(), Some("salary"), TypeFilter::Expenses).is_empty());
        assert_eq!(filter_transactions(&ledger(), Some("salary"), TypeFilter::Income).len(), 1);
    }
}
