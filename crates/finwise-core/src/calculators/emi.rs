use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinwiseError;
use crate::input::parse_decimal_lenient;
use crate::time_value::{amortizing_payment, month_count, monthly_rate, round_currency};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::FinwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan parameters for an equated monthly installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Annual interest rate as a percentage (9.5 = 9.5%)
    pub annual_rate_percent: Percent,
    /// Loan term in years, fractional allowed
    pub tenure_years: Years,
}

impl LoanInput {
    /// Build from raw form fields; unparseable text becomes zero.
    pub fn from_fields(principal: &str, annual_rate_percent: &str, tenure_years: &str) -> Self {
        Self {
            principal: parse_decimal_lenient(principal),
            annual_rate_percent: parse_decimal_lenient(annual_rate_percent),
            tenure_years: parse_decimal_lenient(tenure_years),
        }
    }

    fn degenerate_field(&self) -> Option<&'static str> {
        if self.principal <= Decimal::ZERO {
            Some("principal")
        } else if self.annual_rate_percent <= Decimal::ZERO {
            Some("annual_rate_percent")
        } else if self.tenure_years <= Decimal::ZERO {
            Some("tenure_years")
        } else {
            None
        }
    }
}

/// EMI breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiOutput {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Monthly periodic rate as a percentage, never rounded
    pub monthly_rate_percent: Percent,
    /// total_interest / principal as a raw ratio (0.45 = 45%)
    pub interest_to_principal_ratio: Decimal,
}

impl EmiOutput {
    fn zero() -> Self {
        Self {
            monthly_payment: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            monthly_rate_percent: Decimal::ZERO,
            interest_to_principal_ratio: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// EMI with every monetary field rounded to whole currency units.
///
/// Any non-positive principal, rate or tenure returns an all-zero result.
/// The interest ratio is taken against the rounded total interest, so it
/// matches what a user would compute from the displayed figures.
pub fn compute_emi(input: &LoanInput) -> FinwiseResult<EmiOutput> {
    let exact = compute_emi_exact(input)?;
    if input.degenerate_field().is_some() {
        return Ok(exact);
    }

    let total_interest = round_currency(exact.total_interest);
    Ok(EmiOutput {
        monthly_payment: round_currency(exact.monthly_payment),
        total_payment: round_currency(exact.total_payment),
        total_interest,
        monthly_rate_percent: exact.monthly_rate_percent,
        interest_to_principal_ratio: total_interest / input.principal,
    })
}

/// Unrounded EMI, for callers deriving further ratios.
pub fn compute_emi_exact(input: &LoanInput) -> FinwiseResult<EmiOutput> {
    if let Some(field) = input.degenerate_field() {
        tracing::debug!(field, "degenerate loan input, returning zero EMI");
        return Ok(EmiOutput::zero());
    }

    let r = monthly_rate(input.annual_rate_percent);
    let n = month_count(input.tenure_years);

    let monthly_payment = amortizing_payment(input.principal, r, n)?;
    let total_payment = monthly_payment
        .checked_mul(n)
        .ok_or_else(|| FinwiseError::Overflow {
            context: "EMI total payment".into(),
        })?;
    let total_interest = total_payment - input.principal;

    Ok(EmiOutput {
        monthly_payment,
        total_payment,
        total_interest,
        monthly_rate_percent: r * Decimal::ONE_HUNDRED,
        interest_to_principal_ratio: total_interest / input.principal,
    })
}

/// Rounded EMI wrapped in the standard computation envelope.
pub fn calculate_emi(input: &LoanInput) -> FinwiseResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(field) = input.degenerate_field() {
        warnings.push(format!("{field} must be > 0; showing a zero result"));
    } else if !month_count(input.tenure_years).fract().is_zero() {
        warnings.push(format!(
            "Tenure of {} years is a fractional number of months; the formula uses it unrounded",
            input.tenure_years
        ));
    }

    let result = compute_emi(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equated monthly installment: P*r*(1+r)^n / ((1+r)^n - 1), r = annual%/1200, n = years*12",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
