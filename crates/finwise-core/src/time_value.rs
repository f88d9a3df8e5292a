use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::FinwiseError;
use crate::types::{Money, Percent, Rate, Years};
use crate::FinwiseResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Monthly periodic rate from an annual percentage (9.5 -> 0.0079166...).
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
}

/// Number of monthly periods in `years`. Fractional years give a
/// fractional month count, which the closed-form formulas accept as-is.
pub fn month_count(years: Years) -> Decimal {
    years * MONTHS_PER_YEAR
}

/// Integer month count for period-by-period simulation.
///
/// Rounds `years * 12` half away from zero: 1.04 years (12.48 months)
/// simulates 12 months, 1.0417 years (12.5 months) simulates 13.
pub fn whole_months(years: Years) -> FinwiseResult<u32> {
    month_count(years)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .ok_or_else(|| FinwiseError::InvalidInput {
            field: "years".into(),
            reason: format!("{years} years is outside the simulable month range"),
        })
}

/// Compound growth factor (1 + r)^n.
///
/// Whole-number exponents use exact repeated squaring; fractional ones fall
/// back to `exp(n * ln(1 + r))`.
pub fn growth_factor(rate: Rate, periods: Decimal) -> FinwiseResult<Decimal> {
    let base = Decimal::ONE + rate;
    let factor = if periods.fract().is_zero() {
        periods.to_i64().and_then(|n| base.checked_powi(n))
    } else {
        base.checked_powd(periods)
    };
    factor.ok_or_else(|| FinwiseError::Overflow {
        context: format!("growth factor (1 + {rate})^{periods}"),
    })
}

/// Future value of an annuity-due: payments at the start of each period.
///
/// `P * ((1 + r)^n - 1) / r * (1 + r)`. Caller guarantees `rate > 0`.
pub fn fv_annuity_due(payment: Money, rate: Rate, periods: Decimal) -> FinwiseResult<Money> {
    if rate.is_zero() {
        return Err(FinwiseError::DivisionByZero {
            context: "annuity-due future value".into(),
        });
    }
    let factor = growth_factor(rate, periods)?;
    (factor - Decimal::ONE)
        .checked_div(rate)
        .and_then(|v| v.checked_mul(Decimal::ONE + rate))
        .and_then(|accumulation| payment.checked_mul(accumulation))
        .ok_or_else(|| FinwiseError::Overflow {
            context: "annuity-due future value".into(),
        })
}

/// Level payment that amortises `principal` over `periods` at `rate`.
///
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)`. Caller guarantees `rate > 0`.
pub fn amortizing_payment(principal: Money, rate: Rate, periods: Decimal) -> FinwiseResult<Money> {
    let factor = growth_factor(rate, periods)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinwiseError::DivisionByZero {
            context: "amortizing payment".into(),
        });
    }
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| FinwiseError::Overflow {
            context: "amortizing payment".into(),
        })
}

/// Round to the nearest whole currency unit, halves away from zero.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_whole_months_rounds_half_up() {
        assert_eq!(whole_months(dec!(15)).unwrap(), 180);
        assert_eq!(whole_months(dec!(1.04)).unwrap(), 12);
        assert_eq!(whole_months(dec!(0.125)).unwrap(), 2);
    }

    #[test]
    fn test_growth_factor_integer_exponent() {
        assert_eq!(growth_factor(dec!(0.1), dec!(2)).unwrap(), dec!(1.21));
        assert_eq!(growth_factor(dec!(0.05), Decimal::ZERO).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_growth_factor_fractional_exponent() {
        // 1.21^0.5 = 1.1
        let f = growth_factor(dec!(0.21), dec!(0.5)).unwrap();
        assert!((f - dec!(1.1)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_growth_factor_overflow_is_error() {
        let err = growth_factor(dec!(1), dec!(1000)).unwrap_err();
        assert!(matches!(err, FinwiseError::Overflow { .. }));
    }

    #[test]
    fn test_fv_annuity_due_single_period() {
        // One payment of 100 at the start of a 10% period grows to 110
        assert_eq!(fv_annuity_due(dec!(100), dec!(0.1), dec!(1)).unwrap(), dec!(110));
    }

    #[test]
    fn test_amortizing_payment_single_period() {
        // Repay 1000 in one period at 10%: 1100
        assert_eq!(
            amortizing_payment(dec!(1000), dec!(0.1), dec!(1)).unwrap(),
            dec!(1100)
        );
    }

    #[test]
    fn test_round_currency_half_away_from_zero() {
        assert_eq!(round_currency(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(2.49)), dec!(2));
        assert_eq!(round_currency(dec!(9321.3118)), dec!(9321));
    }
}
