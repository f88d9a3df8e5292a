use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinwiseError;
use crate::input::parse_decimal_lenient;
use crate::time_value::{monthly_rate, round_currency, whole_months};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::FinwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Systematic withdrawal plan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalInput {
    pub initial_corpus: Money,
    pub monthly_withdrawal: Money,
    /// Expected annual return on the corpus as a percentage
    pub annual_return_percent: Percent,
    pub years: Years,
}

impl WithdrawalInput {
    /// Build from raw form fields; unparseable text becomes zero.
    pub fn from_fields(
        initial_corpus: &str,
        monthly_withdrawal: &str,
        annual_return_percent: &str,
        years: &str,
    ) -> Self {
        Self {
            initial_corpus: parse_decimal_lenient(initial_corpus),
            monthly_withdrawal: parse_decimal_lenient(monthly_withdrawal),
            annual_return_percent: parse_decimal_lenient(annual_return_percent),
            years: parse_decimal_lenient(years),
        }
    }

    fn degenerate_field(&self) -> Option<&'static str> {
        if self.initial_corpus <= Decimal::ZERO {
            Some("initial_corpus")
        } else if self.monthly_withdrawal <= Decimal::ZERO {
            Some("monthly_withdrawal")
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
pub struct SwpOutput {
    /// Corpus at simulation end: after the last withdrawal, or grown but
    /// untouched in the month the withdrawal could not be covered
    pub remaining_amount: Money,
    pub total_withdrawn: Money,
    pub months_sustained: u32,
    pub sustained_full_term: bool,
    /// Simulated term, `round(years * 12)`
    pub total_months: u32,
    /// months_sustained split for "lasts X years Y months"
    pub duration_years: u32,
    pub duration_months: u32,
}

impl SwpOutput {
    fn zero() -> Self {
        Self {
            remaining_amount: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
            months_sustained: 0,
            sustained_full_term: false,
            total_months: 0,
            duration_years: 0,
            duration_months: 0,
        }
    }
}

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwpMonth {
    pub month: u32,
    pub opening_balance: Money,
    pub growth: Money,
    /// Zero in the month the corpus runs short
    pub withdrawal: Money,
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

struct Simulation {
    output: SwpOutput,
    schedule: Vec<SwpMonth>,
}

/// Month-by-month: grow, then withdraw only if the grown balance covers the
/// full amount. The first month that cannot be covered ends the run with
/// nothing withdrawn that month.
fn simulate(input: &WithdrawalInput, keep_schedule: bool) -> FinwiseResult<Simulation> {
    if let Some(field) = input.degenerate_field() {
        tracing::debug!(field, "degenerate SWP input, returning zero result");
        return Ok(Simulation {
            output: SwpOutput::zero(),
            schedule: Vec::new(),
        });
    }

    let n = whole_months(input.years)?;
    if n == 0 {
        tracing::debug!(years = %input.years, "SWP term rounds to zero months");
        return Ok(Simulation {
            output: SwpOutput::zero(),
            schedule: Vec::new(),
        });
    }

    let growth_factor = Decimal::ONE + monthly_rate(input.annual_return_percent);
    let withdrawal = input.monthly_withdrawal;

    let mut corpus = input.initial_corpus;
    let mut total_withdrawn = Decimal::ZERO;
    let mut months_sustained: u32 = 0;
    let mut schedule = Vec::new();

    for month in 1..=n {
        let opening = corpus;
        corpus = corpus
            .checked_mul(growth_factor)
            .ok_or_else(|| FinwiseError::Overflow {
                context: format!("SWP corpus growth in month {month}"),
            })?;

        let covered = corpus >= withdrawal;
        if covered {
            corpus -= withdrawal;
            total_withdrawn += withdrawal;
            months_sustained = month;
        }

        if keep_schedule {
            schedule.push(SwpMonth {
                month,
                opening_balance: opening,
                growth: if covered {
                    corpus + withdrawal - opening
                } else {
                    corpus - opening
                },
                withdrawal: if covered { withdrawal } else { Decimal::ZERO },
                closing_balance: corpus,
            });
        }

        if !covered {
            tracing::debug!(month, balance = %corpus, "SWP corpus depleted");
            break;
        }
    }

    Ok(Simulation {
        output: SwpOutput {
            remaining_amount: corpus,
            total_withdrawn,
            months_sustained,
            sustained_full_term: months_sustained >= n,
            total_months: n,
            duration_years: months_sustained / 12,
            duration_months: months_sustained % 12,
        },
        schedule,
    })
}

/// SWP outcome with monetary fields rounded to whole currency units.
pub fn compute_swp(input: &WithdrawalInput) -> FinwiseResult<SwpOutput> {
    let mut out = compute_swp_exact(input)?;
    out.remaining_amount = round_currency(out.remaining_amount);
    out.total_withdrawn = round_currency(out.total_withdrawn);
    Ok(out)
}

/// Unrounded SWP outcome.
pub fn compute_swp_exact(input: &WithdrawalInput) -> FinwiseResult<SwpOutput> {
    Ok(simulate(input, false)?.output)
}

/// Full month-by-month schedule, unrounded. Empty for degenerate input.
pub fn swp_schedule(input: &WithdrawalInput) -> FinwiseResult<Vec<SwpMonth>> {
    Ok(simulate(input, true)?.schedule)
}

/// Rounded SWP outcome wrapped in the standard computation envelope.
pub fn calculate_swp(input: &WithdrawalInput) -> FinwiseResult<ComputationOutput<SwpOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(field) = input.degenerate_field() {
        warnings.push(format!("{field} must be > 0; showing a zero result"));
    }

    let result = compute_swp(input)?;

    if input.degenerate_field().is_none() {
        if result.total_months == 0 {
            warnings.push(format!(
                "{} years rounds to zero whole months; nothing to simulate",
                input.years
            ));
        } else if !result.sustained_full_term {
            warnings.push(format!(
                "Corpus runs out after {} years {} months, before the {}-month term",
                result.duration_years, result.duration_months, result.total_months
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SWP month-by-month simulation: grow by (1 + annual%/1200), then withdraw if the balance covers it",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn retirement_plan() -> WithdrawalInput {
        WithdrawalInput {
            initial_corpus: dec!(1_000_000),
            monthly_withdrawal: dec!(8000),
            annual_return_percent: dec!(10),
            years: dec!(15),
        }
    }

    #[test]
    fn test_sustainable_plan() {
        let out = compute_swp(&retirement_plan()).unwrap();
        assert_eq!(out.months_sustained, 180);
        assert!(out.sustained_full_term);
        assert_eq!(out.total_withdrawn, dec!(1_440_000));
        assert_eq!(out.remaining_amount, dec!(1_138_157));
        assert_eq!(out.duration_years, 15);
        assert_eq!(out.duration_months, 0);
    }

    #[test]
    fn test_depleting_plan_stops_early() {
        let mut input = retirement_plan();
        input.monthly_withdrawal = dec!(20_000);
        let out = compute_swp(&input).unwrap();
        assert_eq!(out.months_sustained, 64);
        assert!(!out.sustained_full_term);
        assert_eq!(out.total_withdrawn, dec!(1_280_000));
        // Grown balance left behind in month 65, never partially withdrawn
        assert_eq!(out.remaining_amount, dec!(18_978));
        assert!(out.remaining_amount < input.monthly_withdrawal);
        assert_eq!(out.duration_years, 5);
        assert_eq!(out.duration_months, 4);
    }

    #[test]
    fn test_first_month_shortfall() {
        let input = WithdrawalInput::from_fields("1000", "2000", "12", "1");
        let out = compute_swp_exact(&input).unwrap();
        assert_eq!(out.months_sustained, 0);
        assert!(!out.sustained_full_term);
        assert_eq!(out.total_withdrawn, Decimal::ZERO);
        assert_eq!(out.remaining_amount, dec!(1010));
    }

    #[test]
    fn test_exact_withdrawal_equal_to_grown_balance_is_allowed() {
        // 1000 grows to 1010; withdrawing exactly 1010 is covered
        let input = WithdrawalInput::from_fields("1000", "1010", "12", "1");
        let out = compute_swp_exact(&input).unwrap();
        assert_eq!(out.months_sustained, 1);
        assert_eq!(out.remaining_amount, Decimal::ZERO);
        // month 2: 0 grows to 0, cannot cover 1010
        assert!(!out.sustained_full_term);
    }

    #[test]
    fn test_fractional_term_rounds_to_whole_months() {
        let mut input = retirement_plan();
        input.years = dec!(1.04); // 12.48 months
        assert_eq!(compute_swp(&input).unwrap().total_months, 12);
        input.years = dec!(0.125); // 1.5 months
        assert_eq!(compute_swp(&input).unwrap().total_months, 2);
    }

    #[test]
    fn test_term_rounding_to_zero_months_is_degenerate() {
        let mut input = retirement_plan();
        input.years = dec!(0.01);
        assert_eq!(compute_swp(&input).unwrap(), SwpOutput::zero());
    }

    #[test]
    fn test_degenerate_inputs() {
        for input in [
            WithdrawalInput::from_fields("0", "8000", "10", "15"),
            WithdrawalInput::from_fields("1000000", "", "10", "15"),
            WithdrawalInput::from_fields("1000000", "8000", "0", "15"),
            WithdrawalInput::from_fields("1000000", "8000", "10", "-2"),
        ] {
            assert_eq!(compute_swp(&input).unwrap(), SwpOutput::zero());
        }
    }

    #[test]
    fn test_schedule_matches_summary() {
        let mut input = retirement_plan();
        input.monthly_withdrawal = dec!(20_000);
        let schedule = swp_schedule(&input).unwrap();
        let summary = compute_swp_exact(&input).unwrap();

        // 64 covered months plus the month that ran short
        assert_eq!(schedule.len(), 65);
        let last = schedule.last().unwrap();
        assert_eq!(last.withdrawal, Decimal::ZERO);
        assert_eq!(last.closing_balance, summary.remaining_amount);
        let withdrawn: Decimal = schedule.iter().map(|m| m.withdrawal).sum();
        assert_eq!(withdrawn, summary.total_withdrawn);
    }

    #[test]
    fn test_envelope_warns_on_depletion() {
        let mut input = retirement_plan();
        input.monthly_withdrawal = dec!(20_000);
        let out = calculate_swp(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("5 years 4 months"));
    }
}
