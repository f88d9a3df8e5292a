use clap::Args;
use serde_json::Value;

use finwise_core::metrics::dashboard::dashboard_report;

use super::SnapshotArgs;
use crate::config::Settings;

#[derive(Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Number of recent transactions to list
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run_dashboard(args: DashboardArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = args.snapshot.load()?;
    let limit = args.limit.unwrap_or(settings.recent_transactions);
    let output = dashboard_report(&snapshot, args.snapshot.today(), limit);
    Ok(serde_json::to_value(output)?)
}
