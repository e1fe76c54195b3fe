//! Arbitrary-precision numeric values.
//!
//! [`BigValue`] wraps a `dashu` big rational. It is the overflow tier of the
//! exact family: checked native arithmetic promotes here instead of wrapping,
//! and the value stays mathematically exact (`2^10000` is the real integer,
//! not an approximation). Irrational or transcendental results degrade to the
//! machine family.

use dashu::base::{Abs, BitTest, Gcd, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::IBig;
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;

use crate::machine::MachineValue;
use crate::value::NumericValue;

/// An exact big-rational value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BigValue(RBig);

impl BigValue {
    /// Creates a big rational from native numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn from_ratio(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "denominator cannot be zero");
        Self(RBig::from_parts(
            IBig::from(numerator) * sign_of(denominator),
            IBig::from(denominator).unsigned_abs(),
        ))
    }

    /// Creates a big rational from a big integer.
    #[must_use]
    pub fn from_ibig(value: IBig) -> Self {
        Self(RBig::from(value))
    }

    /// Creates a big value from an `RBig`.
    #[must_use]
    pub fn from_rbig(value: RBig) -> Self {
        Self(value)
    }

    /// Returns the inner `RBig`.
    #[must_use]
    pub fn into_inner(self) -> RBig {
        self.0
    }

    /// Returns a reference to the inner `RBig`.
    #[must_use]
    pub fn as_inner(&self) -> &RBig {
        &self.0
    }

    /// The numerator.
    #[must_use]
    pub fn numerator(&self) -> IBig {
        self.0.numerator().clone()
    }

    /// The denominator, always positive.
    #[must_use]
    pub fn denominator(&self) -> IBig {
        IBig::from(self.0.denominator().clone())
    }

    /// True for zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }

    /// True for exactly negative one.
    #[must_use]
    pub fn is_negative_one(&self) -> bool {
        self.0 == -RBig::ONE
    }

    /// True when the denominator is one.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Sign of the value: `-1`, `0`, or `1`.
    #[must_use]
    pub fn sgn(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Nearest machine float.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    /// Demotes to the native exact family when both components fit `i64`.
    #[must_use]
    pub fn to_exact_if_small(&self) -> Option<crate::exact::ExactValue> {
        let n: i64 = self.numerator().try_into().ok()?;
        let d: i64 = self.denominator().try_into().ok()?;
        Some(crate::exact::ExactValue::rational(n, d))
    }

    // === Arithmetic ===

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self(-&self.0)
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Multiplicative inverse; `0⁻¹` is the machine positive infinity.
    #[must_use]
    pub fn inv(&self) -> NumericValue {
        if self.is_zero() {
            return NumericValue::infinity();
        }
        NumericValue::Big(Self(self.0.clone().inv()))
    }

    /// Addition; always exact.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    /// Subtraction; always exact.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    /// Multiplication; always exact.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    /// Division; a zero divisor follows the machine zero-division policy.
    #[must_use]
    pub fn div(&self, other: &Self) -> NumericValue {
        if other.is_zero() {
            if self.is_zero() {
                return NumericValue::nan();
            }
            return if self.sgn() < 0 {
                NumericValue::neg_infinity()
            } else {
                NumericValue::infinity()
            };
        }
        NumericValue::Big(Self(&self.0 / &other.0))
    }

    /// Integer power; stays exact for any exponent magnitude a big rational
    /// can reasonably hold, otherwise degrades to machine form.
    #[must_use]
    pub fn pow_i64(&self, exp: i64) -> NumericValue {
        const MAX_EXACT_EXP: i64 = 1_000_000;
        if exp == 0 {
            return NumericValue::Big(Self(RBig::ONE));
        }
        if exp < 0 {
            return self.pow_i64(-exp).inv();
        }
        if exp > MAX_EXACT_EXP {
            return NumericValue::Machine(self.to_machine().powi(exp));
        }
        NumericValue::Big(Self(self.0.pow(exp as usize)))
    }

    /// Exact n-th root attempt; integer roots of both components, with the
    /// real branch for odd roots of negatives. Everything else degrades to
    /// machine form.
    #[must_use]
    pub fn root(&self, n: u32) -> NumericValue {
        if n == 1 {
            return NumericValue::Big(self.clone());
        }
        let negative = self.sgn() < 0;
        if negative && n % 2 == 0 {
            return NumericValue::Machine(self.to_machine().root(i64::from(n)));
        }
        let magnitude = self.abs();
        let roots = nth_root_exact(&magnitude.numerator(), n)
            .zip(nth_root_exact(&magnitude.denominator(), n));
        if let Some((rn, rd)) = roots {
            let root = Self(RBig::from_parts(rn, rd.unsigned_abs()));
            return NumericValue::Big(if negative { root.neg() } else { root });
        }
        NumericValue::Machine(self.to_machine().root(i64::from(n)))
    }

    /// Square root; exact when both components are perfect squares.
    #[must_use]
    pub fn sqrt(&self) -> NumericValue {
        if self.sgn() < 0 {
            return NumericValue::Machine(self.to_machine().sqrt());
        }
        self.root(2)
    }

    /// Floor to a big integer.
    #[must_use]
    pub fn floor(&self) -> Self {
        let (trunc, remainder) = self.trunc_rem();
        if remainder.is_zero() || self.sgn() >= 0 {
            Self(RBig::from(trunc))
        } else {
            Self(RBig::from(trunc - IBig::ONE))
        }
    }

    /// Ceiling to a big integer.
    #[must_use]
    pub fn ceil(&self) -> Self {
        let (trunc, remainder) = self.trunc_rem();
        if remainder.is_zero() || self.sgn() <= 0 {
            Self(RBig::from(trunc))
        } else {
            Self(RBig::from(trunc + IBig::ONE))
        }
    }

    /// Nearest big integer, ties away from zero.
    #[must_use]
    pub fn round(&self) -> Self {
        let (trunc, remainder) = self.trunc_rem();
        let denominator = self.denominator();
        let doubled = remainder.abs() * IBig::from(2);
        if doubled < denominator {
            return Self(RBig::from(trunc));
        }
        let step = IBig::from(i64::from(self.sgn()));
        Self(RBig::from(trunc + step))
    }

    fn trunc_rem(&self) -> (IBig, IBig) {
        let n = self.numerator();
        let d = self.denominator();
        (&n / &d, &n % &d)
    }

    /// Greatest common divisor; integers only, anything else yields 1.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        if self.is_integer() && other.is_integer() {
            let g = self.numerator().gcd(other.numerator());
            return Self::from_ibig(IBig::from(g));
        }
        Self(RBig::ONE)
    }

    /// Ordering; big rationals are totally ordered.
    #[must_use]
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    pub(crate) fn to_machine(&self) -> MachineValue {
        MachineValue::real(self.to_f64())
    }
}

fn sign_of(value: i64) -> IBig {
    if value < 0 {
        IBig::from(-1)
    } else {
        IBig::from(1)
    }
}

/// Exact integer n-th root of a non-negative big integer, if one exists.
fn nth_root_exact(x: &IBig, n: u32) -> Option<IBig> {
    debug_assert!(!DashuSigned::is_negative(x), "radicand must be non-negative");
    if x.is_zero() || *x == IBig::ONE {
        return Some(x.clone());
    }
    let n = n as usize;
    let mut lo = IBig::ONE;
    let mut hi = IBig::from(2).pow(x.bit_len() / n + 1);
    // Binary search for the integer root, then demand exactness.
    while lo < hi {
        let mid = (&lo + &hi + IBig::ONE) / IBig::from(2);
        if mid.clone().pow(n) <= *x {
            lo = mid;
        } else {
            hi = mid - IBig::ONE;
        }
    }
    if lo.clone().pow(n) == *x {
        Some(lo)
    } else {
        None
    }
}

impl fmt::Debug for BigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Big({})", self.0)
    }
}

impl fmt::Display for BigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_is_exact_past_native_range() {
        let two = BigValue::from_ratio(2, 1);
        let v = two.pow_i64(10_000);
        let NumericValue::Big(big) = v else {
            panic!("2^10000 stays in the big family");
        };
        assert!(big.is_integer());
        // 2^10000 has 10001 bits.
        assert_eq!(big.numerator().bit_len(), 10_001);
    }

    #[test]
    fn exact_root_of_big_power() {
        let two = BigValue::from_ratio(2, 1);
        let NumericValue::Big(big) = two.pow_i64(100) else {
            panic!("2^100 stays big");
        };
        let NumericValue::Big(root) = big.root(10) else {
            panic!("10th root of 2^100 is exact");
        };
        assert_eq!(root.numerator(), IBig::from(1024));
    }

    #[test]
    fn inexact_root_degrades_to_machine() {
        let three = BigValue::from_ratio(3, 1);
        let NumericValue::Machine(m) = three.sqrt() else {
            panic!("sqrt(3) is machine");
        };
        assert!((m.re() - 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn floor_ceil_round_negative() {
        let v = BigValue::from_ratio(-7, 2); // -3.5
        assert_eq!(v.floor().numerator(), IBig::from(-4));
        assert_eq!(v.ceil().numerator(), IBig::from(-3));
        assert_eq!(v.round().numerator(), IBig::from(-4));
    }

    #[test]
    fn division_by_zero_policy() {
        let v = BigValue::from_ratio(3, 1);
        let zero = BigValue::from_ratio(0, 1);
        assert!(v.div(&zero).is_positive_infinity());
        assert!(zero.div(&zero).is_nan());
    }

    #[test]
    fn display_reduces() {
        assert_eq!(BigValue::from_ratio(4, 6).to_string(), "2/3");
        assert_eq!(BigValue::from_ratio(-8, 2).to_string(), "-4");
    }
}
