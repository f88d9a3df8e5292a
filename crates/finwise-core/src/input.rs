//! Form-field parsing at the input boundary.
//!
//! Calculator fields arrive as free text. Anything that is not a number
//! parses to zero, which the calculators treat as degenerate input and
//! answer with an all-zero result instead of an error.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a numeric form field by its longest numeric prefix.
///
/// Surrounding whitespace is trimmed and every `,` and `_` is dropped
/// first, so grouped amounts read whole (`"1,00,000"` -> 100000, where a
/// plain prefix parse would stop at 1). The remaining text is read up to
/// the first character that cannot continue `[+-]digits[.digits][e[+-]digits]`:
/// `"12.5%"` -> 12.5. Empty or non-numeric input yields zero.
pub fn parse_decimal_lenient(raw: &str) -> Decimal {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let prefix = numeric_prefix(&cleaned);
    if prefix.is_empty() {
        return Decimal::ZERO;
    }

    // Decimal's parser wants a leading digit and no explicit plus sign
    let unsigned = prefix.strip_prefix('+').unwrap_or(prefix);
    let normalized = match unsigned.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{rest}"),
        _ if unsigned.starts_with('.') => format!("0{unsigned}"),
        _ => unsigned.to_string(),
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or_else(|_| {
            tracing::debug!(input = raw, "unparseable numeric field, using zero");
            Decimal::ZERO
        })
}

/// Longest prefix matching `[+-]?digits[.digits][(e|E)[+-]?digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut has_digits = i > int_start;
    if has_digits {
        end = i;
    }

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i > frac_start {
            has_digits = true;
            end = i;
        }
    }
    if !has_digits {
        return "";
    }

    if i == end && i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    // "5." keeps only "5"
    let prefix = &s[..end];
    prefix.strip_suffix('.').unwrap_or(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_decimal_lenient("1000000"), dec!(1000000));
        assert_eq!(parse_decimal_lenient(" 9.5 "), dec!(9.5));
        assert_eq!(parse_decimal_lenient("-3"), dec!(-3));
        assert_eq!(parse_decimal_lenient(".5"), dec!(0.5));
        assert_eq!(parse_decimal_lenient("-.25"), dec!(-0.25));
        assert_eq!(parse_decimal_lenient("+7"), dec!(7));
    }

    #[test]
    fn test_empty_and_garbage_is_zero() {
        assert_eq!(parse_decimal_lenient(""), Decimal::ZERO);
        assert_eq!(parse_decimal_lenient("   "), Decimal::ZERO);
        assert_eq!(parse_decimal_lenient("abc"), Decimal::ZERO);
        assert_eq!(parse_decimal_lenient("-"), Decimal::ZERO);
        assert_eq!(parse_decimal_lenient("."), Decimal::ZERO);
    }

    #[test]
    fn test_numeric_prefix_wins() {
        assert_eq!(parse_decimal_lenient("12.5%"), dec!(12.5));
        assert_eq!(parse_decimal_lenient("20 years"), dec!(20));
        assert_eq!(parse_decimal_lenient("5."), dec!(5));
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(parse_decimal_lenient("1,00,000"), dec!(100000));
        assert_eq!(parse_decimal_lenient("1_000"), dec!(1000));
    }

    #[test]
    fn test_exponent() {
        assert_eq!(parse_decimal_lenient("1e3"), dec!(1000));
        assert_eq!(parse_decimal_lenient("2.5E-1"), dec!(0.25));
        assert_eq!(parse_decimal_lenient("7e"), dec!(7));
    }
}
