use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinwiseError;
use crate::input::parse_decimal_lenient;
use crate::time_value::{fv_annuity_due, month_count, monthly_rate, round_currency};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::FinwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Systematic investment plan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInput {
    pub monthly_contribution: Money,
    /// Expected annual return as a percentage (12 = 12%)
    pub annual_return_percent: Percent,
    pub years: Years,
}

impl InvestmentInput {
    /// Build from raw form fields; unparseable text becomes zero.
    pub fn from_fields(monthly_contribution: &str, annual_return_percent: &str, years: &str) -> Self {
        Self {
            monthly_contribution: parse_decimal_lenient(monthly_contribution),
            annual_return_percent: parse_decimal_lenient(annual_return_percent),
            years: parse_decimal_lenient(years),
        }
    }

    fn degenerate_field(&self) -> Option<&'static str> {
        if self.monthly_contribution <= Decimal::ZERO {
            Some("monthly_contribution")
        } else if self.annual_return_percent <= Decimal::ZERO {
            Some("annual_return_percent")
        } else if self.years <= Decimal::ZERO {
            Some("years")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipOutput {
    pub maturity_amount: Money,
    pub total_invested: Money,
    pub total_returns: Money,
    /// maturity / invested (1.94 = money grew 1.94x)
    pub wealth_multiple: Decimal,
    /// (wealth_multiple - 1) * 100
    pub return_percent: Percent,
}

impl SipOutput {
    fn zero() -> Self {
        Self {
            maturity_amount: Decimal::ZERO,
            total_invested: Decimal::ZERO,
            total_returns: Decimal::ZERO,
            wealth_multiple: Decimal::ZERO,
            return_percent: Decimal::ZERO,
        }
    }

    fn from_amounts(maturity_amount: Money, total_invested: Money, total_returns: Money) -> Self {
        let wealth_multiple = if total_invested > Decimal::ZERO {
            maturity_amount / total_invested
        } else {
            Decimal::ZERO
        };
        let return_percent = if wealth_multiple.is_zero() {
            Decimal::ZERO
        } else {
            (wealth_multiple - Decimal::ONE) * Decimal::ONE_HUNDRED
        };
        Self {
            maturity_amount,
            total_invested,
            total_returns,
            wealth_multiple,
            return_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// SIP maturity with monetary fields rounded to whole currency units.
///
/// Contributions are made at the start of each month (annuity-due).
pub fn compute_sip(input: &InvestmentInput) -> FinwiseResult<SipOutput> {
    let exact = compute_sip_exact(input)?;
    if input.degenerate_field().is_some() {
        return Ok(exact);
    }
    Ok(SipOutput::from_amounts(
        round_currency(exact.maturity_amount),
        round_currency(exact.total_invested),
        round_currency(exact.total_returns),
    ))
}

/// Unrounded SIP maturity.
pub fn compute_sip_exact(input: &InvestmentInput) -> FinwiseResult<SipOutput> {
    if let Some(field) = input.degenerate_field() {
        tracing::debug!(field, "degenerate SIP input, returning zero maturity");
        return Ok(SipOutput::zero());
    }

    let r = monthly_rate(input.annual_return_percent);
    let n = month_count(input.years);

    let maturity_amount = fv_annuity_due(input.monthly_contribution, r, n)?;
    let total_invested = input
        .monthly_contribution
        .checked_mul(n)
        .ok_or_else(|| FinwiseError::Overflow {
            context: "SIP total invested".into(),
        })?;
    let total_returns = maturity_amount - total_invested;

    Ok(SipOutput::from_amounts(
        maturity_amount,
        total_invested,
        total_returns,
    ))
}

/// Rounded SIP maturity wrapped in the standard computation envelope.
pub fn calculate_sip(input: &InvestmentInput) -> FinwiseResult<ComputationOutput<SipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(field) = input.degenerate_field() {
        warnings.push(format!("{field} must be > 0; showing a zero result"));
    } else if !month_count(input.years).fract().is_zero() {
        warnings.push(format!(
            "Period of {} years is a fractional number of months; the formula uses it unrounded",
            input.years
        ));
    }

    let result = compute_sip(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP future value (annuity-due): P * ((1+r)^n - 1) / r * (1+r), r = annual%/1200, n = years*12",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
