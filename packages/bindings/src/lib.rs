use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use finwise_core::analytics::summary::TimeRange;
use finwise_core::analytics::{TransactionRecord, TypeFilter};
use finwise_core::snapshot::FinanceSnapshot;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct TransactionsInput {
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    view: TypeFilter,
}

#[derive(Deserialize)]
struct SearchInput {
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default = "all_types")]
    filter: TypeFilter,
}

fn all_types() -> TypeFilter {
    TypeFilter::Both
}

#[derive(Deserialize)]
struct AnalyticsInput {
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    range: TimeRange,
    #[serde(default)]
    view: TypeFilter,
    today: NaiveDate,
}

#[derive(Deserialize)]
struct SnapshotInput {
    #[serde(flatten)]
    snapshot: FinanceSnapshot,
    today: NaiveDate,
    #[serde(default)]
    recent_limit: Option<usize>,
}

#[derive(Deserialize)]
struct BudgetStatusInput {
    spent: Decimal,
    limit: Decimal,
}

#[derive(Deserialize)]
struct GoalProgressInput {
    current_amount: Decimal,
    target_amount: Decimal,
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_emi(input_json: String) -> NapiResult<String> {
    let input: finwise_core::calculators::emi::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::calculators::emi::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_sip(input_json: String) -> NapiResult<String> {
    let input: finwise_core::calculators::sip::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::calculators::sip::calculate_sip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_swp(input_json: String) -> NapiResult<String> {
    let input: finwise_core::calculators::swp::WithdrawalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::calculators::swp::calculate_swp(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn swp_schedule(input_json: String) -> NapiResult<String> {
    let input: finwise_core::calculators::swp::WithdrawalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::calculators::swp::swp_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[napi]
pub fn filter_transactions(input_json: String) -> NapiResult<String> {
    let input: SearchInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::analytics::summary::filter_transactions(
        &input.transactions,
        input.search.as_deref(),
        input.filter,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn aggregate_by_category(input_json: String) -> NapiResult<String> {
    let input: TransactionsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        finwise_core::analytics::category::aggregate_by_category(&input.transactions, input.view);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn aggregate_by_month(input_json: String) -> NapiResult<String> {
    let input: TransactionsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::analytics::monthly::aggregate_by_month(&input.transactions);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analytics_summary(input_json: String) -> NapiResult<String> {
    let input: AnalyticsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::analytics::summary::analytics_report(
        &input.transactions,
        input.range,
        input.view,
        input.today,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Budgets and goals
// ---------------------------------------------------------------------------

#[napi]
pub fn budget_status(input_json: String) -> NapiResult<String> {
    let input: BudgetStatusInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::metrics::budget::budget_status(input.spent, input.limit);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_budgets(input_json: String) -> NapiResult<String> {
    let input: FinanceSnapshot = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::metrics::budget::budget_report(&input.budgets, &input.transactions);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn goal_progress(input_json: String) -> NapiResult<String> {
    let input: GoalProgressInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        finwise_core::metrics::goal::goal_progress(input.current_amount, input.target_amount);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn goal_summary(input_json: String) -> NapiResult<String> {
    let input: SnapshotInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finwise_core::metrics::goal::goal_report(&input.snapshot.goals, input.today);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn dashboard_summary(input_json: String) -> NapiResult<String> {
    let input: SnapshotInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let limit = input
        .recent_limit
        .unwrap_or(finwise_core::metrics::dashboard::DEFAULT_RECENT_LIMIT);
    let output =
        finwise_core::metrics::dashboard::dashboard_report(&input.snapshot, input.today, limit);
    serde_json::to_string(&output).map_err(to_napi_error)
}
