//! Numbers wider than `Decimal`
//!
//! Stream numbers carry up to 38 significant digits with magnitudes from
//! 1E-130 to 1E+125; `Decimal` holds 28 digits and about 7.9E+28. Values that
//! do not fit are kept exactly as sign, significant digits and exponent.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Smallest adjusted exponent a stream number can carry
pub const MIN_ADJUSTED_EXPONENT: i64 = -130;
/// Largest adjusted exponent a stream number can carry
pub const MAX_ADJUSTED_EXPONENT: i64 = 125;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseNumberError {
    #[error("not a numeric literal")]
    NotNumeric,
    #[error("magnitude outside 1E-130..1E+125")]
    OutOfRange,
}

/// Exact decimal value of arbitrary width
///
/// Value is `digits * 10^exponent`, negated when `negative`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideNumber {
    negative: bool,
    /// Significant digits, no leading or trailing zeros; empty for zero
    digits: String,
    exponent: i64,
}

impl WideNumber {
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_integral(&self) -> bool {
        self.exponent >= 0
    }

    /// Exact integer literal, `None` when the value has a fractional part
    pub fn integer_literal(&self) -> Option<String> {
        if !self.is_integral() {
            return None;
        }
        if self.is_zero() {
            return Some("0".to_string());
        }
        let zeros = usize::try_from(self.exponent).ok()?;
        let mut out = String::with_capacity(self.digits.len() + zeros + 1);
        if self.negative {
            out.push('-');
        }
        out.push_str(&self.digits);
        out.extend(std::iter::repeat('0').take(zeros));
        Some(out)
    }

    /// Nearest `f64`
    pub fn to_f64(&self) -> Option<f64> {
        if self.is_zero() {
            return Some(0.0);
        }
        let sign = if self.negative { "-" } else { "" };
        format!("{sign}{}e{}", self.digits, self.exponent)
            .parse()
            .ok()
    }
}

impl FromStr for WideNumber {
    type Err = ParseNumberError;

    /// Plain (`12.5`) or scientific (`1.25E1`) notation, optional sign
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(idx) => (&unsigned[..idx], parse_exponent(&unsigned[idx + 1..])?),
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseNumberError::NotNumeric);
        }
        if !is_digits(int_part) || !is_digits(frac_part) {
            return Err(ParseNumberError::NotNumeric);
        }

        let all_digits = format!("{int_part}{frac_part}");
        let significant = all_digits.trim_start_matches('0');
        let trimmed = significant.trim_end_matches('0');
        let trailing_zeros = (significant.len() - trimmed.len()) as i64;

        if trimmed.is_empty() {
            return Ok(Self {
                negative: false,
                digits: String::new(),
                exponent: 0,
            });
        }

        let exponent = exponent
            .saturating_sub(frac_part.len() as i64)
            .saturating_add(trailing_zeros);
        let adjusted = exponent.saturating_add(trimmed.len() as i64 - 1);
        if !(MIN_ADJUSTED_EXPONENT..=MAX_ADJUSTED_EXPONENT).contains(&adjusted) {
            return Err(ParseNumberError::OutOfRange);
        }

        Ok(Self {
            negative,
            digits: trimmed.to_string(),
            exponent,
        })
    }
}

fn parse_exponent(raw: &str) -> Result<i64, ParseNumberError> {
    let unsigned = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    if unsigned.is_empty() || !is_digits(unsigned) {
        return Err(ParseNumberError::NotNumeric);
    }
    raw.parse().map_err(|_| ParseNumberError::OutOfRange)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Canonical `N` form: digits, with `E<exp>` when the exponent is non-zero
impl fmt::Display for WideNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)?;
        if self.exponent != 0 {
            write!(f, "E{}", self.exponent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(s: &str) -> WideNumber {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_38_digit_integer() {
        let n = wide("12345678901234567890123456789012345678");
        assert!(n.is_integral());
        assert_eq!(
            n.integer_literal().as_deref(),
            Some("12345678901234567890123456789012345678")
        );
    }

    #[test]
    fn test_parse_scientific() {
        let n = wide("1E+30");
        assert_eq!(n.to_string(), "1E30");
        assert_eq!(
            n.integer_literal().as_deref(),
            Some("1000000000000000000000000000000")
        );

        let tiny = wide("-1.5e-130");
        assert!(!tiny.is_integral());
        assert_eq!(tiny.to_f64(), Some(-1.5e-130));
    }

    #[test]
    fn test_trailing_zeros_and_sign() {
        assert_eq!(wide("-00120.500").to_string(), "-1205E-1");
        assert_eq!(wide("+4.0e2").integer_literal().as_deref(), Some("400"));
        assert!(wide("0.000").is_zero());
    }

    #[test]
    fn test_rejects_non_numeric() {
        for raw in ["", "abc", "1.2.3", "e5", "1e", "1e+", "NaN", "inf", "0x10", "1 2"] {
            assert_eq!(
                raw.parse::<WideNumber>(),
                Err(ParseNumberError::NotNumeric),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn test_range_limits() {
        assert!("1E-130".parse::<WideNumber>().is_ok());
        assert!("9.99E+125".parse::<WideNumber>().is_ok());
        assert_eq!(
            "1E-131".parse::<WideNumber>(),
            Err(ParseNumberError::OutOfRange)
        );
        assert_eq!(
            "1E+126".parse::<WideNumber>(),
            Err(ParseNumberError::OutOfRange)
        );
        assert_eq!(
            "1E99999999999999999999".parse::<WideNumber>(),
            Err(ParseNumberError::OutOfRange)
        );
    }
}
