use clap::Args;
use serde_json::Value;

use finwise_core::input::parse_decimal_lenient;
use finwise_core::metrics::budget::{budget_report, budget_status};
use finwise_core::metrics::goal::{goal_progress, goal_report};

use super::SnapshotArgs;

/// Arguments for checking a single spend against a limit.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BudgetStatusArgs {
    /// Amount spent so far
    #[arg(long)]
    pub spent: String,

    /// Budget limit
    #[arg(long)]
    pub limit: String,
}

/// Arguments for checking a single goal's progress.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GoalProgressArgs {
    /// Amount saved so far
    #[arg(long)]
    pub current: String,

    /// Target amount
    #[arg(long)]
    pub target: String,
}

pub fn run_budgets(args: SnapshotArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.load()?;
    let output = budget_report(&snapshot.budgets, &snapshot.transactions);
    Ok(serde_json::to_value(output)?)
}

pub fn run_goals(args: SnapshotArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.load()?;
    let output = goal_report(&snapshot.goals, args.today());
    Ok(serde_json::to_value(output)?)
}

pub fn run_budget_status(args: BudgetStatusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let status = budget_status(parse_decimal_lenient(&args.spent), parse_decimal_lenient(&args.limit));
    Ok(serde_json::to_value(status)?)
}

pub fn run_goal_progress(args: GoalProgressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let percentage = goal_progress(parse_decimal_lenient(&args.current), parse_decimal_lenient(&args.target));
    Ok(serde_json::json!({ "percentage": percentage }))
}
