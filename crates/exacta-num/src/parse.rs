//! Parsing of canonical numeric literals.
//!
//! Every [`NumericValue`] renders to a canonical literal through `Display`
//! (`0`, `-1`, `5/3`, `√2`, `5/3·√2`, `(2 - 3·i)`, `3.0`, `NaN`,
//! `PositiveInfinity`, `~oo`, …) and parses back to a value-equal result via
//! `FromStr`, staying in the same family wherever exactness is preserved:
//! plain integers, rationals and radicals come back exact (big past `i64`),
//! decimal components come back machine.

use dashu::base::UnsignedAbs;
use dashu::integer::IBig;
use dashu::rational::RBig;
use std::str::FromStr;
use thiserror::Error;

use crate::big::BigValue;
use crate::value::NumericValue;

/// Errors from parsing a numeric literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNumericError {
    /// The input was empty or all whitespace.
    #[error("empty numeric literal")]
    Empty,
    /// A component had invalid digits.
    #[error("invalid digits in numeric literal: `{0}`")]
    InvalidDigits(String),
    /// A `√` was not followed by a positive integer radical.
    #[error("malformed radical in numeric literal: `{0}`")]
    MalformedRadical(String),
    /// A parenthesized complex literal did not have the `(re ± im·i)` shape.
    #[error("malformed complex literal: `{0}`")]
    MalformedComplex(String),
    /// The denominator of a rational literal was zero.
    #[error("denominator cannot be zero")]
    ZeroDenominator,
}

impl FromStr for NumericValue {
    type Err = ParseNumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => Err(ParseNumericError::Empty),
            "NaN" => Ok(Self::nan()),
            "PositiveInfinity" => Ok(Self::infinity()),
            "NegativeInfinity" => Ok(Self::neg_infinity()),
            "~oo" => Ok(Self::complex_infinity()),
            _ if s.starts_with('(') => parse_complex(s),
            _ => parse_real(s),
        }
    }
}

fn parse_complex(s: &str) -> Result<NumericValue, ParseNumericError> {
    let malformed = || ParseNumericError::MalformedComplex(s.to_string());
    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(malformed)?;
    let (split, negative_im) = match (inner.find(" + "), inner.find(" - ")) {
        (Some(at), _) => (at, false),
        (None, Some(at)) => (at, true),
        (None, None) => return Err(malformed()),
    };
    let re_text = &inner[..split];
    let im_text = inner[split + 3..].strip_suffix("·i").ok_or_else(malformed)?;

    let re = parse_real(re_text)?;
    let im = parse_real(im_text)?;
    let im = if negative_im { im.neg() } else { im };

    let gaussian = |v: &NumericValue| match v {
        NumericValue::Exact(e) if e.is_integer() => Some(e.numerator()),
        _ => None,
    };
    if let (Some(re_int), Some(im_int)) = (gaussian(&re), gaussian(&im)) {
        return Ok(NumericValue::exact_gaussian(re_int, im_int));
    }
    Ok(NumericValue::complex(re.re(), im.re()))
}

fn parse_real(s: &str) -> Result<NumericValue, ParseNumericError> {
    if s.is_empty() {
        return Err(ParseNumericError::Empty);
    }
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let value = parse_unsigned_real(body)?;
    Ok(if negative { value.neg() } else { value })
}

fn parse_unsigned_real(s: &str) -> Result<NumericValue, ParseNumericError> {
    if let Some(radical_text) = s.strip_prefix('√') {
        let radical = parse_radical(s, radical_text)?;
        return Ok(NumericValue::exact(1, 1, radical));
    }
    if let Some((coefficient_text, radical_text)) = s.split_once("·√") {
        let radical = parse_radical(s, radical_text)?;
        let (numerator, denominator) = parse_small_rational(coefficient_text)?;
        return Ok(NumericValue::exact(numerator, denominator, radical));
    }
    parse_rational(s)
}

fn parse_radical(whole: &str, text: &str) -> Result<i64, ParseNumericError> {
    text.parse::<i64>()
        .ok()
        .filter(|r| *r > 0)
        .ok_or_else(|| ParseNumericError::MalformedRadical(whole.to_string()))
}

/// A radical coefficient: canonical serializations keep it within `i64`.
fn parse_small_rational(s: &str) -> Result<(i64, i64), ParseNumericError> {
    let (numerator_text, denominator_text) = match s.split_once('/') {
        Some((n, d)) => (n, d),
        None => (s, "1"),
    };
    let numerator = numerator_text
        .parse::<i64>()
        .map_err(|_| ParseNumericError::InvalidDigits(numerator_text.to_string()))?;
    let denominator = denominator_text
        .parse::<i64>()
        .map_err(|_| ParseNumericError::InvalidDigits(denominator_text.to_string()))?;
    if denominator == 0 {
        return Err(ParseNumericError::ZeroDenominator);
    }
    Ok((numerator, denominator))
}

fn parse_rational(s: &str) -> Result<NumericValue, ParseNumericError> {
    // Infinite components only occur inside complex literals; bare
    // infinities use their named forms.
    if s == "inf" {
        return Ok(NumericValue::machine(f64::INFINITY));
    }
    if s.contains(['.', 'e', 'E']) {
        let value = s
            .parse::<f64>()
            .map_err(|_| ParseNumericError::InvalidDigits(s.to_string()))?;
        return Ok(NumericValue::machine(value));
    }
    match s.split_once('/') {
        None => parse_integer(s),
        Some((numerator_text, denominator_text)) => {
            let numerator = parse_ibig(numerator_text)?;
            let denominator = parse_ibig(denominator_text)?;
            if denominator == IBig::ZERO {
                return Err(ParseNumericError::ZeroDenominator);
            }
            let big = BigValue::from_rbig(RBig::from_parts(numerator, denominator.unsigned_abs()));
            Ok(match big.to_exact_if_small() {
                Some(small) => NumericValue::Exact(small),
                None => NumericValue::Big(big),
            })
        }
    }
}

fn parse_integer(s: &str) -> Result<NumericValue, ParseNumericError> {
    if let Ok(n) = s.parse::<i64>() {
        return Ok(NumericValue::integer(n));
    }
    let big = parse_ibig(s)?;
    Ok(NumericValue::Big(BigValue::from_ibig(big)))
}

fn parse_ibig(s: &str) -> Result<IBig, ParseNumericError> {
    IBig::from_str_radix(s, 10).map_err(|_| ParseNumericError::InvalidDigits(s.to_string()))
}

#[cfg(feature = "serde")]
impl serde::Serialize for NumericValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NumericValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
