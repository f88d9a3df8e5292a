mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

use commands::analytics::{AnalyticsArgs, TransactionsArgs};
use commands::calculators::{EmiArgs, SipArgs, SwpArgs};
use commands::dashboard::DashboardArgs;
use commands::planning::{BudgetStatusArgs, GoalProgressArgs};
use commands::SnapshotArgs;
use config::Settings;
use output::OutputFormat;

/// Personal-finance calculators and transaction analytics
#[derive(Parser)]
#[command(
    name = "finwise",
    version,
    about = "Personal-finance calculators and transaction analytics",
    long_about = "Loan EMI, SIP maturity and SWP sustainability calculators with decimal \
                  precision, plus category and monthly rollups, budget status, goal \
                  progress and a dashboard over a JSON snapshot of your records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to the configured one, else json)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Path to a YAML settings file (else `FINWISE_CONFIG`, if that file exists)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log debug detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Equated monthly installment for a loan
    Emi(EmiArgs),
    /// Maturity value of a monthly SIP
    Sip(SipArgs),
    /// How long a corpus lasts under monthly withdrawals
    Swp(SwpArgs),
    /// Search transactions by text and type
    Transactions(TransactionsArgs),
    /// Spending or income by category
    Categories(AnalyticsArgs),
    /// Income, expenses and net by calendar month
    Monthly(AnalyticsArgs),
    /// Category breakdown, monthly trend and savings rate
    Analytics(AnalyticsArgs),
    /// Status of every active budget
    Budgets(SnapshotArgs),
    /// Progress of every goal
    Goals(SnapshotArgs),
    /// Classify a single spend against a limit
    BudgetStatus(BudgetStatusArgs),
    /// Progress percentage for a single goal
    GoalProgress(GoalProgressArgs),
    /// Month-to-date totals, counts and recent transactions
    Dashboard(DashboardArgs),
    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    logging::init_tracing(cli.verbose, settings.log_format);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::calculators::run_emi(args),
        Commands::Sip(args) => commands::calculators::run_sip(args),
        Commands::Swp(args) => commands::calculators::run_swp(args),
        Commands::Transactions(args) => commands::analytics::run_transactions(args),
        Commands::Categories(args) => commands::analytics::run_categories(args, &settings),
        Commands::Monthly(args) => commands::analytics::run_monthly(args, &settings),
        Commands::Analytics(args) => commands::analytics::run_analytics(args, &settings),
        Commands::Budgets(args) => commands::planning::run_budgets(args),
        Commands::Goals(args) => commands::planning::run_goals(args),
        Commands::BudgetStatus(args) => commands::planning::run_budget_status(args),
        Commands::GoalProgress(args) => commands::planning::run_goal_progress(args),
        Commands::Dashboard(args) => commands::dashboard::run_dashboard(args, &settings),
        Commands::Version => {
            println!("finwise {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            let format = cli.output.unwrap_or(settings.default_output);
            output::format_output(format, &value, &settings.currency_symbol);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
