pub mod analytics;
pub mod calculators;
pub mod dashboard;
pub mod planning;

use chrono::{Local, NaiveDate};
use clap::Args;

use finwise_core::snapshot::FinanceSnapshot;

use crate::input;

/// Where the finance snapshot comes from.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Path to a JSON snapshot with `transactions`, `budgets` and `goals`
    /// (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

impl SnapshotArgs {
    pub fn load(&self) -> Result<FinanceSnapshot, Box<dyn std::error::Error>> {
        let snapshot: FinanceSnapshot = if let Some(ref path) = self.input {
            input::file::read_json(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            return Err("no snapshot: pass --input <file> or pipe JSON on stdin".into());
        };
        tracing::debug!(
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            goals = snapshot.goals.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}
