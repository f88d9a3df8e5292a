use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analytics::summary::{month_to_date, recent_transactions, PeriodTotals};
use crate::analytics::transaction::TransactionRecord;
use crate::snapshot::FinanceSnapshot;
use crate::types::{with_metadata, ComputationOutput};

/// Number of transactions shown on the dashboard by default.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub month_to_date: PeriodTotals,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub active_budgets: usize,
    pub recent_transactions: Vec<TransactionRecord>,
}

/// Headline numbers for the landing page.
pub fn dashboard(snapshot: &FinanceSnapshot, today: NaiveDate, recent_limit: usize) -> DashboardSummary {
    let completed_goals = snapshot.goals.iter().filter(|g| g.is_completed).count();
    DashboardSummary {
        month_to_date: month_to_date(&snapshot.transactions, today),
        active_goals: snapshot.goals.len() - completed_goals,
        completed_goals,
        active_budgets: snapshot.budgets.iter().filter(|b| b.is_active).count(),
        recent_transactions: recent_transactions(&snapshot.transactions, recent_limit),
    }
}

pub fn dashboard_report(
    snapshot: &FinanceSnapshot,
    today: NaiveDate,
    recent_limit: usize,
) -> ComputationOutput<DashboardSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = dashboard(snapshot, today, recent_limit);
    if result.month_to_date.net_income < Decimal::ZERO {
        warnings.push(format!(
            "Spending exceeds income this month by {}",
            result.month_to_date.net_income.abs()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Month-to-date totals, goal and budget counts, most recent transactions",
        &serde_json::json!({ "today": today, "recent_limit": recent_limit }),
        warnings,
        elapsed,
        result,
    )
}
