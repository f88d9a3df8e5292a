use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Percentages on a 0..100 scale (45.5 = 45.5%).
pub type Percent = Decimal;

/// Year counts, fractional allowed
pub type Years = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// `part / whole * 100`, or zero when `whole` is not positive.
///
/// A ratio too large for `Decimal` saturates to `Decimal::MAX` (or `MIN`
/// for a negative part), which `clamp_percent` then pins to the band.
pub fn percent_of(part: Decimal, whole: Decimal) -> Percent {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// Clamp a percentage into the 0..=100 band used by progress bars.
pub fn clamp_percent(value: Percent) -> Percent {
    value.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of_zero_whole_is_zero() {
        assert_eq!(percent_of(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec!(50), dec!(-10)), Decimal::ZERO);
    }

    #[test]
    fn test_percent_of_is_unclamped() {
        assert_eq!(percent_of(dec!(150), dec!(100)), dec!(150));
    }

    #[test]
    fn test_percent_of_saturates_instead_of_overflowing() {
        let huge = dec!(1_000_000_000_000_000_000_000_000_000);
        assert_eq!(percent_of(huge, Decimal::ONE), Decimal::MAX);
        assert_eq!(percent_of(-huge, Decimal::ONE), Decimal::MIN);
        assert_eq!(clamp_percent(percent_of(huge, dec!(0.000001))), dec!(100));
    }

    #[test]
    fn test_clamp_percent_bounds() {
        assert_eq!(clamp_percent(dec!(150)), dec!(100));
        assert_eq!(clamp_percent(dec!(-5)), Decimal::ZERO);
        assert_eq!(clamp_percent(dec!(42.5)), dec!(42.5));
    }
}
