use clap::Args;
use serde_json::Value;

use finwise_core::calculators::emi::{self, LoanInput};
use finwise_core::calculators::sip::{self, InvestmentInput};
use finwise_core::calculators::swp::{self, WithdrawalInput};

use crate::input;

/// Arguments for the loan EMI calculator.
///
/// Amounts are taken as text and parsed leniently, the way a form field
/// would be: `12,00,000` is 1200000 and `abc` is zero.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, default_value = "1000000")]
    pub principal: String,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate", default_value = "9.5")]
    pub annual_rate: String,

    /// Tenure in years
    #[arg(long, alias = "tenure", default_value = "20")]
    pub years: String,

    /// Report unrounded figures
    #[arg(long)]
    pub exact: bool,
}

/// Arguments for the SIP maturity calculator.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SipArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly contribution
    #[arg(long, alias = "monthly", default_value = "5000")]
    pub monthly_contribution: String,

    /// Expected annual return in percent
    #[arg(long, aliases = ["rate", "return"], default_value = "12")]
    pub annual_return: String,

    /// Investment horizon in years
    #[arg(long, default_value = "10")]
    pub years: String,

    /// Report unrounded figures
    #[arg(long)]
    pub exact: bool,
}

/// Arguments for the SWP sustainability calculator.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SwpArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Starting corpus
    #[arg(long, alias = "corpus", default_value = "1000000")]
    pub initial_corpus: String,

    /// Amount withdrawn each month
    #[arg(long, alias = "withdrawal", default_value = "8000")]
    pub monthly_withdrawal: String,

    /// Expected annual return in percent
    #[arg(long, aliases = ["rate", "return"], default_value = "10")]
    pub annual_return: String,

    /// Withdrawal horizon in years
    #[arg(long, default_value = "15")]
    pub years: String,

    /// Report unrounded figures
    #[arg(long)]
    pub exact: bool,

    /// Print the month-by-month balance table instead of the summary
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        LoanInput::from_fields(&args.principal, &args.annual_rate, &args.years)
    };

    if args.exact {
        let result = emi::compute_emi_exact(&loan)?;
        return Ok(serde_json::to_value(result)?);
    }
    let output = emi::calculate_emi(&loan)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: InvestmentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        InvestmentInput::from_fields(&args.monthly_contribution, &args.annual_return, &args.years)
    };

    if args.exact {
        let result = sip::compute_sip_exact(&plan)?;
        return Ok(serde_json::to_value(result)?);
    }
    let output = sip::calculate_sip(&plan)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_swp(args: SwpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: WithdrawalInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        WithdrawalInput::from_fields(
            &args.initial_corpus,
            &args.monthly_withdrawal,
            &args.annual_return,
            &args.years,
        )
    };

    if args.schedule {
        let rows = swp::swp_schedule(&plan)?;
        return Ok(serde_json::to_value(rows)?);
    }
    if args.exact {
        let result = swp::compute_swp_exact(&plan)?;
        return Ok(serde_json::to_value(result)?);
    }
    let output = swp::calculate_swp(&plan)?;
    Ok(serde_json::to_value(output)?)
}
