use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine};

/// Parses a user-typed nominal.
///
/// Accepts plain decimals (`150000`, `-2.5`, `+10.25`) and scientific notation
/// (`1e5`). Anything else, including the empty string and thousand separators,
/// is rejected with [`EngineError::InvalidNominal`].
///
/// # Examples
///
/// ```rust
/// use engine::parse_nominal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_nominal(" 150000 ").unwrap(), Decimal::new(150000, 0));
/// assert_eq!(parse_nominal("1e3").unwrap(), Decimal::new(1000, 0));
/// assert!(parse_nominal("abc").is_err());
/// ```
pub fn parse_nominal(input: &str) -> ResultEngine<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidNominal);
    }
    if !is_decimal_literal(trimmed) {
        return Err(EngineError::InvalidNominal);
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if let Ok(value) = unsigned.parse::<Decimal>() {
        return Ok(value);
    }
    if unsigned.contains(['e', 'E']) {
        return Decimal::from_scientific(unsigned).map_err(|_| EngineError::InvalidNominal);
    }
    Err(EngineError::InvalidNominal)
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with digits on at least one side of
/// the point. `Decimal::from_str` alone also takes `_` separators.
fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }
    match exponent {
        None => true,
        Some(exponent) => {
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            !digits.is_empty() && all_digits(digits)
        }
    }
}

/// Formats an amount as Indonesian rupiah: `.` groups thousands, `,` separates
/// decimals, trailing zero decimals are dropped.
///
/// ```rust
/// use engine::format_rupiah;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_rupiah(Decimal::new(1234567, 0)), "Rp 1.234.567");
/// assert_eq!(format_rupiah(Decimal::new(150050, 2)), "Rp 1.500,5");
/// ```
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp(2).normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("Rp {sign}{grouped},{frac}"),
        None => format!("Rp {sign}{grouped}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_non_numbers() {
        for input in [
            "", "   ", "abc", "12abc", "1.000.000", "--5", "+-5", "1,5", "1_000", "1_0_0", "5_",
            ".", "1e", "1e_3",
        ] {
            assert_eq!(
                parse_nominal(input),
                Err(EngineError::InvalidNominal),
                "{input:?}"
            );
        }
    }

    #[test]
    fn parse_accepts_signs_and_decimals() {
        assert_eq!(parse_nominal("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_nominal("-2.5").unwrap(), Decimal::new(-25, 1));
        assert_eq!(parse_nominal("+10.25").unwrap(), Decimal::new(1025, 2));
        assert_eq!(parse_nominal("2.5E2").unwrap(), Decimal::new(250, 0));
    }

    #[test]
    fn format_groups_thousands() {
        assert_eq!(format_rupiah(Decimal::ZERO), "Rp 0");
        assert_eq!(format_rupiah(Decimal::new(999, 0)), "Rp 999");
        assert_eq!(format_rupiah(Decimal::new(1000, 0)), "Rp 1.000");
        assert_eq!(format_rupiah(Decimal::new(15000000, 2)), "Rp 150.000");
        assert_eq!(format_rupiah(Decimal::new(-250000, 0)), "Rp -250.000");
        assert_eq!(format_rupiah(Decimal::new(1234, 3)), "Rp 1,23");
    }
}
