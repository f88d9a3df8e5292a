use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analytics::transaction::TransactionRecord;
use crate::types::{clamp_percent, percent_of, with_metadata, ComputationOutput, Money, Percent};

/// Share of the limit at which a budget turns "warning".
pub const WARNING_THRESHOLD: Percent = dec!(80);
/// Share of the limit at which a budget is "over".
pub const OVER_THRESHOLD: Percent = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
}

/// A spending limit on one category over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Spending limit
    pub amount: Money,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetClassification {
    Good,
    Warning,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub spent: Money,
    pub limit: Money,
    /// spent / limit * 100, unclamped
    pub percentage_used: Percent,
    /// percentage_used capped at 100 for progress bars
    pub display_percentage: Percent,
    pub remaining: Money,
    /// How far spending is past the limit; zero while within it
    pub over_by: Money,
    pub classification: BudgetClassification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub budget: BudgetRecord,
    pub status: BudgetStatus,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Classify spending against a limit.
///
/// 80% and 100% are inclusive boundaries for "warning" and "over". A
/// non-positive limit reports 0% used and is "over" as soon as anything
/// is spent.
pub fn budget_status(spent: Money, limit: Money) -> BudgetStatus {
    let (percentage_used, classification) = if limit <= Decimal::ZERO {
        let class = if spent > Decimal::ZERO {
            BudgetClassification::Over
        } else {
            BudgetClassification::Good
        };
        (Decimal::ZERO, class)
    } else {
        let pct = percent_of(spent, limit);
        let class = if pct >= OVER_THRESHOLD {
            BudgetClassification::Over
        } else if pct >= WARNING_THRESHOLD {
            BudgetClassification::Warning
        } else {
            BudgetClassification::Good
        };
        (pct, class)
    };

    BudgetStatus {
        spent,
        limit,
        percentage_used,
        display_percentage: clamp_percent(percentage_used),
        remaining: limit.saturating_sub(spent).max(Decimal::ZERO),
        over_by: spent.saturating_sub(limit).max(Decimal::ZERO),
        classification,
    }
}

/// Expense total counted against `budget`.
///
/// Matches expense transactions in the budget's category (an uncategorized
/// budget collects uncategorized transactions) dated within
/// `start_date..=end_date`.
pub fn budget_spent(budget: &BudgetRecord, transactions: &[TransactionRecord]) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .filter(|t| t.category_name == budget.category_name)
        .filter(|t| t.date >= budget.start_date && t.date <= budget.end_date)
        .map(|t| t.amount)
        .sum()
}

/// Status for every active budget, in input order.
pub fn evaluate_budgets(
    budgets: &[BudgetRecord],
    transactions: &[TransactionRecord],
) -> Vec<BudgetReport> {
    budgets
        .iter()
        .filter(|b| b.is_active)
        .map(|b| BudgetReport {
            budget: b.clone(),
            status: budget_status(budget_spent(b, transactions), b.amount),
        })
        .collect()
}

/// `evaluate_budgets` inside the standard envelope, warning on over-limit
/// and inverted date ranges.
pub fn budget_report(
    budgets: &[BudgetRecord],
    transactions: &[TransactionRecord],
) -> ComputationOutput<Vec<BudgetReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for b in budgets.iter().filter(|b| b.is_active) {
        if b.end_date < b.start_date {
            warnings.push(format!(
                "Budget '{}' ends ({}) before it starts ({}); nothing can match",
                b.name, b.end_date, b.start_date
            ));
        }
    }

    let result = evaluate_budgets(budgets, transactions);
    for report in &result {
        if report.status.classification == BudgetClassification::Over {
            warnings.push(format!(
                "Budget '{}' is over its limit ({}% used)",
                report.budget.name,
                report.status.percentage_used.round_dp(1)
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Expense totals per budget category within the budget dates; warning at 80%, over at 100%",
        &serde_json::json!({ "active_budgets": result.len() }),
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::transaction::TransactionType;

    fn tx(date: &str, amount: Decimal, kind: TransactionType, category: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            id: None,
            amount,
            kind,
            date: date.parse().unwrap(),
            description: None,
            category_name: category.map(str::to_string),
            category_color: None,
        }
    }

    fn groceries_budget() -> BudgetRecord {
        BudgetRecord {
            id: Some("b1".into()),
            name: "Groceries".into(),
            amount: dec!(10_000),
            period: BudgetPeriod::Monthly,
            start_date: "2024-03-01".parse().unwrap(),
            end_date: "2024-03-31".parse().unwrap(),
            category_name: Some("Food".into()),
            category_color: None,
            is_active: true,
        }
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(budget_status(dec!(50), dec!(100)).classification, BudgetClassification::Good);
        assert_eq!(budget_status(dec!(79.99), dec!(100)).classification, BudgetClassification::Good);
        assert_eq!(budget_status(dec!(80), dec!(100)).classification, BudgetClassification::Warning);
        assert_eq!(budget_status(dec!(100), dec!(100)).classification, BudgetClassification::Over);
        assert_eq!(budget_status(dec!(250), dec!(100)).classification, BudgetClassification::Over);
    }

    #[test]
    fn test_display_percentage_clamped_raw_not() {
        let s = budget_status(dec!(150), dec!(100));
        assert_eq!(s.percentage_used, dec!(150));
        assert_eq!(s.display_percentage, dec!(100));
        assert_eq!(s.remaining, Decimal::ZERO);
        assert_eq!(s.over_by, dec!(50));
    }

    #[test]
    fn test_over_by_zero_within_limit() {
        let s = budget_status(dec!(8200), dec!(10_000));
        assert_eq!(s.remaining, dec!(1800));
        assert_eq!(s.over_by, Decimal::ZERO);
    }

    #[test]
    fn test_huge_spend_against_tiny_limit_does_not_panic() {
        let spent = dec!(1_000_000_000_000_000_000_000);
        let s = budget_status(spent, dec!(0.000001));
        assert_eq!(s.classification, BudgetClassification::Over);
        assert_eq!(s.display_percentage, dec!(100));
        assert_eq!(s.remaining, Decimal::ZERO);
        assert!(s.over_by > Decimal::ZERO);
    }

    #[test]
    fn test_zero_limit() {
        let s = budget_status(dec!(10), Decimal::ZERO);
        assert_eq!(s.percentage_used, Decimal::ZERO);
        assert_eq!(s.classification, BudgetClassification::Over);
        assert_eq!(budget_status(Decimal::ZERO, Decimal::ZERO).classification, BudgetClassification::Good);
    }

    #[test]
    fn test_spent_inclusive_dates_and_category() {
        let txs = vec![
            tx("2024-03-01", dec!(1000), TransactionType::Expense, Some("Food")),
            tx("2024-03-31", dec!(2000), TransactionType::Expense, Some("Food")),
            tx("2024-04-01", dec!(4000), TransactionType::Expense, Some("Food")),
            tx("2024-03-15", dec!(8000), TransactionType::Expense, Some("Rent")),
            tx("2024-03-15", dec!(500), TransactionType::Income, Some("Food")),
        ];
        assert_eq!(budget_spent(&groceries_budget(), &txs), dec!(3000));
    }

    #[test]
    fn test_uncategorized_budget_matches_uncategorized_spend() {
        let mut budget = groceries_budget();
        budget.category_name = None;
        let txs = vec![
            tx("2024-03-10", dec!(70), TransactionType::Expense, None),
            tx("2024-03-10", dec!(30), TransactionType::Expense, Some("Food")),
        ];
        assert_eq!(budget_spent(&budget, &txs), dec!(70));
    }

    #[test]
    fn test_evaluate_skips_inactive() {
        let mut inactive = groceries_budget();
        inactive.is_active = false;
        let reports = evaluate_budgets(&[groceries_budget(), inactive], &[]);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status.classification, BudgetClassification::Good);
    }

    #[test]
    fn test_report_warns_when_over() {
        let txs = vec![tx("2024-03-05", dec!(12_000), TransactionType::Expense, Some("Food"))];
        let out = budget_report(&[groceries_budget()], &txs);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("120"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "name": "Fun",
            "amount": "2000",
            "start_date": "2024-03-01",
            "end_date": "2024-03-31"
        }"#;
        let b: BudgetRecord = serde_json::from_str(json).unwrap();
        assert!(b.is_active);
        assert_eq!(b.period, BudgetPeriod::Monthly);
    }
}
