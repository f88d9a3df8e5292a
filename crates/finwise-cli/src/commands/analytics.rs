use clap::Args;
use serde_json::Value;

use finwise_core::analytics::category::aggregate_by_category;
use finwise_core::analytics::monthly::aggregate_by_month;
use finwise_core::analytics::summary::{analytics_report, filter_since, filter_transactions, TimeRange};
use finwise_core::analytics::TypeFilter;

use super::SnapshotArgs;
use crate::config::Settings;

/// Arguments shared by the transaction analytics commands.
#[derive(Args)]
pub struct AnalyticsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Transaction types to include: expenses, income or both
    #[arg(long)]
    pub view: Option<TypeFilter>,

    /// Look-back window: 3m, 6m or 1y
    #[arg(long)]
    pub range: Option<TimeRange>,

    /// Use every transaction instead of the look-back window
    #[arg(long, conflicts_with = "range")]
    pub all: bool,
}

impl AnalyticsArgs {
    fn view(&self, settings: &Settings) -> TypeFilter {
        self.view.unwrap_or(settings.analytics_view)
    }

    fn range(&self, settings: &Settings) -> TimeRange {
        self.range.unwrap_or(settings.analytics_range)
    }
}

/// Arguments for searching the transaction list.
#[derive(Args)]
pub struct TransactionsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Case-insensitive text matched against description or category name
    #[arg(long)]
    pub search: Option<String>,

    /// Transaction types to list: expenses, income or both
    #[arg(long = "type", default_value = "both")]
    pub kind: TypeFilter,
}

/// Matching transactions in snapshot order.
pub fn run_transactions(args: TransactionsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.snapshot.load()?;
    let found = filter_transactions(&snapshot.transactions, args.search.as_deref(), args.kind);
    tracing::debug!(matched = found.len(), total = snapshot.transactions.len(), "filtered transactions");
    Ok(serde_json::to_value(found)?)
}

/// Category breakdown for the selected view.
pub fn run_categories(args: AnalyticsArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.snapshot.load()?;
    let transactions = if args.all {
        snapshot.transactions
    } else {
        filter_since(&snapshot.transactions, args.range(settings).start_date(args.snapshot.today()))
    };
    let categories = aggregate_by_category(&transactions, args.view(settings));
    Ok(serde_json::to_value(categories)?)
}

/// Income, expenses and net per calendar month, oldest first.
pub fn run_monthly(args: AnalyticsArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.snapshot.load()?;
    let transactions = if args.all {
        snapshot.transactions
    } else {
        filter_since(&snapshot.transactions, args.range(settings).start_date(args.snapshot.today()))
    };
    Ok(serde_json::to_value(aggregate_by_month(&transactions))?)
}

/// Full analytics view: categories, months and headline averages.
pub fn run_analytics(args: AnalyticsArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.snapshot.load()?;
    let output = analytics_report(
        &snapshot.transactions,
        args.range(settings),
        args.view(settings),
        args.snapshot.today(),
    );
    Ok(serde_json::to_value(output)?)
}
