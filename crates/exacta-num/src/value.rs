//! The polymorphic numeric value.
//!
//! [`NumericValue`] is a closed sum type over the three representations the
//! kernel knows: native exact (`rational × √radical + Gaussian i`), exact
//! big rational, and machine floating complex. Canonicalization code never
//! branches on the variant; the full arithmetic surface dispatches here,
//! promoting representations exactly when exactness cannot be preserved.
//!
//! `NaN` is the sole in-band error sentinel: it absorbs through every
//! operation instead of being thrown.

use hashbrown::HashMap;
use num_rational::Ratio;
use num_traits::{CheckedAdd, One, Zero};
use std::cmp::Ordering;
use std::fmt;

use crate::big::BigValue;
use crate::exact::ExactValue;
use crate::machine::MachineValue;

/// Magnitude bound below which radicals are factored and kept in the native
/// exact family; larger radicals go to machine form at construction.
pub const SMALL_INTEGER: i64 = 1_000_000;

/// A numeric value: exact, big, or machine.
///
/// Immutable — every operation returns a new value. Structural equality and
/// hashing (floats by bit pattern) exist so values can be interned in an
/// expression arena; *numeric* comparison is [`num_eq`](Self::num_eq) and
/// [`num_cmp`](Self::num_cmp).
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum NumericValue {
    /// Native exact value: `rational × √radical + im·i`.
    Exact(ExactValue),
    /// Exact big rational, the overflow tier.
    Big(BigValue),
    /// Machine floating complex pair.
    Machine(MachineValue),
}

impl NumericValue {
    // === Constructors ===

    /// An exact integer.
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::Exact(ExactValue::integer(n))
    }

    /// An exact rational; a zero denominator collapses to `NaN`.
    #[must_use]
    pub fn rational(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Self::nan();
        }
        Self::Exact(ExactValue::rational(numerator, denominator))
    }

    /// An exact `(numerator/denominator)·√radical` literal. Radicals past
    /// [`SMALL_INTEGER`] and zero denominators leave the exact family at
    /// once.
    #[must_use]
    pub fn exact(numerator: i64, denominator: i64, radical: i64) -> Self {
        debug_assert!(radical >= 0, "radical cannot be negative");
        if denominator == 0 {
            return Self::nan();
        }
        if !(0..=SMALL_INTEGER).contains(&radical) {
            let value =
                (numerator as f64 / denominator as f64) * (radical as f64).sqrt();
            return Self::Machine(MachineValue::real(value));
        }
        match ExactValue::normalized(Ratio::new(numerator, denominator), radical, 0) {
            Some(v) => Self::Exact(v),
            None => Self::Machine(MachineValue::real(
                (numerator as f64 / denominator as f64) * (radical as f64).sqrt(),
            )),
        }
    }

    /// An exact Gaussian integer `re + im·i`.
    #[must_use]
    pub fn exact_gaussian(re: i64, im: i64) -> Self {
        Self::Exact(ExactValue::gaussian(re, im))
    }

    pub(crate) fn from_ratio(ratio: Ratio<i64>) -> Self {
        Self::Exact(
            ExactValue::normalized(ratio, 1, 0).unwrap_or_else(|| {
                unreachable!("a bare rational cannot overflow normalization")
            }),
        )
    }

    /// A machine real.
    #[must_use]
    pub fn machine(re: f64) -> Self {
        Self::Machine(MachineValue::real(re))
    }

    /// A machine complex pair.
    #[must_use]
    pub fn complex(re: f64, im: f64) -> Self {
        Self::Machine(MachineValue::new(re, im))
    }

    /// The canonical NaN sentinel.
    #[must_use]
    pub fn nan() -> Self {
        Self::Machine(MachineValue::nan())
    }

    /// Positive real infinity.
    #[must_use]
    pub fn infinity() -> Self {
        Self::Machine(MachineValue::infinity())
    }

    /// Negative real infinity.
    #[must_use]
    pub fn neg_infinity() -> Self {
        Self::Machine(MachineValue::neg_infinity())
    }

    /// Complex infinity.
    #[must_use]
    pub fn complex_infinity() -> Self {
        Self::Machine(MachineValue::complex_infinity())
    }

    /// Exact zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::Exact(ExactValue::zero())
    }

    /// Exact one.
    #[must_use]
    pub fn one() -> Self {
        Self::Exact(ExactValue::one())
    }

    /// Machine rendition of Euler's number.
    #[must_use]
    pub fn machine_e() -> Self {
        Self::Machine(MachineValue::real(std::f64::consts::E))
    }

    /// Machine rendition of π.
    #[must_use]
    pub fn machine_pi() -> Self {
        Self::Machine(MachineValue::real(std::f64::consts::PI))
    }

    // === Queries ===

    /// True for the NaN sentinel.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Machine(m) if m.is_nan())
    }

    /// True for zero in any representation.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exact(a) => a.is_zero(),
            Self::Big(b) => b.is_zero(),
            Self::Machine(m) => m.is_zero(),
        }
    }

    /// True for one in any representation.
    #[must_use]
    pub fn is_one(&self) -> bool {
        match self {
            Self::Exact(a) => a.is_one(),
            Self::Big(b) => b.is_one(),
            Self::Machine(m) => m.is_one(),
        }
    }

    /// True for negative one in any representation.
    #[must_use]
    pub fn is_negative_one(&self) -> bool {
        match self {
            Self::Exact(a) => a.is_negative_one(),
            Self::Big(b) => b.is_negative_one(),
            Self::Machine(m) => m.is_negative_one(),
        }
    }

    /// True for positive real infinity.
    #[must_use]
    pub fn is_positive_infinity(&self) -> bool {
        matches!(self, Self::Machine(m) if m.is_positive_infinity())
    }

    /// True for negative real infinity.
    #[must_use]
    pub fn is_negative_infinity(&self) -> bool {
        matches!(self, Self::Machine(m) if m.is_negative_infinity())
    }

    /// True for complex infinity.
    #[must_use]
    pub fn is_complex_infinity(&self) -> bool {
        matches!(self, Self::Machine(m) if m.is_complex_infinity())
    }

    /// True when the value is finite (exact and big values always are).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Exact(_) | Self::Big(_) => true,
            Self::Machine(m) => m.is_finite(),
        }
    }

    /// True when the value lies on the real line.
    #[must_use]
    pub fn is_real(&self) -> bool {
        match self {
            Self::Exact(a) => a.is_real(),
            Self::Big(_) => true,
            Self::Machine(m) => m.is_real(),
        }
    }

    /// Whether the value is exact: always for the exact and big families,
    /// and for integral or infinite machine values. A machine value never
    /// re-enters the exact family regardless.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        match self {
            Self::Exact(_) | Self::Big(_) => true,
            Self::Machine(m) => m.is_exact(),
        }
    }

    /// True when the representation itself is exact (native or big).
    #[must_use]
    pub fn is_exact_family(&self) -> bool {
        matches!(self, Self::Exact(_) | Self::Big(_))
    }

    /// The native exact representation, if that is what this is.
    #[must_use]
    pub fn as_exact(&self) -> Option<&ExactValue> {
        match self {
            Self::Exact(a) => Some(a),
            _ => None,
        }
    }

    /// Sign of a real value; `None` for NaN and complex values.
    #[must_use]
    pub fn sgn(&self) -> Option<i8> {
        match self {
            Self::Exact(a) => a.sgn(),
            Self::Big(b) => Some(b.sgn()),
            Self::Machine(m) => m.sgn(),
        }
    }

    // === Accessors ===

    /// Real part as a machine float.
    #[must_use]
    pub fn re(&self) -> f64 {
        match self {
            Self::Exact(a) => a.re(),
            Self::Big(b) => b.to_f64(),
            Self::Machine(m) => m.re(),
        }
    }

    /// Imaginary part as a machine float.
    #[must_use]
    pub fn im(&self) -> f64 {
        match self {
            Self::Exact(a) => a.imag() as f64,
            Self::Big(_) => 0.0,
            Self::Machine(m) => m.im(),
        }
    }

    /// The numerator of the value; a machine value is its own numerator.
    #[must_use]
    pub fn numerator(&self) -> Self {
        match self {
            Self::Exact(a) => Self::integer(a.numerator()),
            Self::Big(b) => Self::Big(BigValue::from_ibig(b.numerator())),
            Self::Machine(_) => self.clone(),
        }
    }

    /// The denominator of the value; 1 for machine values.
    #[must_use]
    pub fn denominator(&self) -> Self {
        match self {
            Self::Exact(a) => Self::integer(a.denominator()),
            Self::Big(b) => Self::Big(BigValue::from_ibig(b.denominator())),
            Self::Machine(_) => Self::one(),
        }
    }

    pub(crate) fn to_machine(&self) -> MachineValue {
        match self {
            Self::Exact(a) => a.to_machine(),
            Self::Big(b) => b.to_machine(),
            Self::Machine(m) => *m,
        }
    }

    fn as_big(&self) -> Option<BigValue> {
        match self {
            Self::Exact(a) if a.is_rational() => Some(a.to_big_rational()),
            Self::Big(b) => Some(b.clone()),
            _ => None,
        }
    }

    /// Attempts to read the value as an `i64` integer: exact integers,
    /// integral big values in range, and integral machine reals within the
    /// float-precise window.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Exact(a) if a.is_integer() => Some(a.numerator()),
            Self::Big(b) if b.is_integer() => b.numerator().try_into().ok(),
            Self::Machine(m)
                if m.is_real()
                    && m.re().is_finite()
                    && m.re().fract() == 0.0
                    && m.re().abs() < 9_007_199_254_740_992.0 =>
            {
                Some(m.re() as i64)
            }
            _ => None,
        }
    }

    fn as_small_rational(&self) -> Option<(i64, i64)> {
        match self {
            Self::Exact(a) if a.is_rational() => Some((a.numerator(), a.denominator())),
            _ => None,
        }
    }

    fn magnitude(&self) -> f64 {
        self.re().hypot(self.im())
    }

    // === Arithmetic ===

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Exact(a) => Self::Exact(a.neg()),
            Self::Big(b) => Self::Big(b.neg()),
            Self::Machine(m) => Self::Machine(m.neg()),
        }
    }

    /// Multiplicative inverse.
    #[must_use]
    pub fn inv(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        match self {
            Self::Exact(a) => a.inv(),
            Self::Big(b) => b.inv(),
            Self::Machine(m) => Self::Machine(m.inv()),
        }
    }

    /// Addition, staying exact whenever both operands allow it.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a.add(b),
            (Self::Machine(a), b) => Self::Machine(a.add(&b.to_machine())),
            (a, Self::Machine(b)) => Self::Machine(a.to_machine().add(b)),
            (a, b) => match (a.as_big(), b.as_big()) {
                (Some(x), Some(y)) => Self::Big(x.add(&y)),
                _ => Self::Machine(a.to_machine().add(&b.to_machine())),
            },
        }
    }

    /// Subtraction.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplication.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a.mul(b),
            (Self::Machine(a), b) => Self::Machine(a.mul(&b.to_machine())),
            (a, Self::Machine(b)) => Self::Machine(a.to_machine().mul(b)),
            (a, b) => match (a.as_big(), b.as_big()) {
                (Some(x), Some(y)) => Self::Big(x.mul(&y)),
                _ => Self::Machine(a.to_machine().mul(&b.to_machine())),
            },
        }
    }

    /// Division. A zero divisor yields NaN when the dividend is also zero,
    /// otherwise a signed or complex infinity.
    #[must_use]
    pub fn div(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        if other.is_zero() {
            if self.is_zero() {
                return Self::nan();
            }
            return match self.sgn() {
                Some(s) if s < 0 => Self::neg_infinity(),
                Some(_) => Self::infinity(),
                None => Self::complex_infinity(),
            };
        }
        self.mul(&other.inv())
    }

    /// Raises to an arbitrary numeric exponent, applying the undefined-form
    /// policy (`0^0`, `1^∞`, `(-1)^∞`, …) before dispatching.
    #[must_use]
    pub fn pow(&self, exp: &Self) -> Self {
        if self.is_nan() || exp.is_nan() {
            return Self::nan();
        }
        if exp.is_zero() {
            // 0^0 is undefined; a^0 is 1 for finite a.
            if self.is_zero() || !self.is_finite() {
                return Self::nan();
            }
            return Self::one();
        }
        if self.is_zero() {
            if !exp.is_real() {
                return Self::nan();
            }
            return match exp.sgn() {
                Some(s) if s > 0 => Self::zero(),
                _ => Self::complex_infinity(),
            };
        }
        if self.is_one() {
            return if exp.is_finite() { Self::one() } else { Self::nan() };
        }
        if exp.is_one() {
            return self.clone();
        }
        if exp.is_negative_one() {
            return self.inv();
        }
        if exp.is_complex_infinity() {
            return Self::nan();
        }
        if exp.is_positive_infinity() {
            if self.is_negative_one() {
                return Self::nan();
            }
            if !self.is_finite() {
                return Self::complex_infinity();
            }
            let magnitude = self.magnitude();
            return if magnitude > 1.0 {
                Self::infinity()
            } else if magnitude < 1.0 {
                Self::zero()
            } else {
                Self::nan()
            };
        }
        if exp.is_negative_infinity() {
            if self.is_negative_one() {
                return Self::nan();
            }
            if !self.is_finite() {
                return Self::zero();
            }
            let magnitude = self.magnitude();
            return if magnitude > 1.0 {
                Self::zero()
            } else if magnitude < 1.0 {
                Self::infinity()
            } else {
                Self::nan()
            };
        }
        if !self.is_finite() {
            if !exp.is_real() {
                // Pure imaginary exponent oscillates; a complex one picks a
                // direction from its real part.
                if exp.re() == 0.0 {
                    return Self::nan();
                }
                return if exp.re() > 0.0 {
                    Self::complex_infinity()
                } else {
                    Self::zero()
                };
            }
            if matches!(exp.sgn(), Some(s) if s < 0) {
                return Self::zero();
            }
            if self.is_complex_infinity() {
                return Self::complex_infinity();
            }
            if self.is_positive_infinity() {
                return Self::infinity();
            }
            // (-∞)^positive: parity decides, non-integers leave the axis.
            return match exp.to_i64() {
                Some(n) if n % 2 == 0 => Self::infinity(),
                Some(_) => Self::neg_infinity(),
                None => Self::complex_infinity(),
            };
        }
        if let Some(n) = exp.to_i64() {
            return self.powi(n);
        }
        if let Some((p, q)) = exp.as_small_rational() {
            // x^(p/q) = (x^p)^(1/q), exact when both steps are.
            if self.is_exact_family() && p.unsigned_abs() <= 512 && q <= 512 {
                return self.powi(p).root(q);
            }
        }
        Self::Machine(self.to_machine().pow(&exp.to_machine()))
    }

    /// Raises to an integer exponent.
    #[must_use]
    pub fn powi(&self, exp: i64) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.is_zero() {
            return match exp.cmp(&0) {
                Ordering::Greater => Self::zero(),
                Ordering::Equal => Self::nan(),
                Ordering::Less => Self::complex_infinity(),
            };
        }
        if exp < 0 {
            let magnitude = exp.unsigned_abs();
            if magnitude > u64::from(u32::MAX) {
                return Self::Machine(self.to_machine().powi(exp));
            }
            return self.inv().powi_unsigned(magnitude as u32);
        }
        let magnitude = exp.unsigned_abs();
        if magnitude > u64::from(u32::MAX) {
            return Self::Machine(self.to_machine().powi(exp));
        }
        self.powi_unsigned(magnitude as u32)
    }

    fn powi_unsigned(&self, exp: u32) -> Self {
        match self {
            Self::Exact(a) => a.pow_unsigned(exp),
            Self::Big(b) => b.pow_i64(i64::from(exp)),
            Self::Machine(m) => Self::Machine(m.powi(i64::from(exp))),
        }
    }

    /// Integer n-th root; exact when one exists, machine otherwise. Odd
    /// roots of negative reals follow the real branch.
    #[must_use]
    pub fn root(&self, degree: i64) -> Self {
        if self.is_nan() || degree == 0 {
            return Self::nan();
        }
        if degree == 1 {
            return self.clone();
        }
        if degree < 0 {
            let magnitude = degree.unsigned_abs();
            if magnitude > u64::from(u32::MAX) {
                return Self::Machine(self.to_machine().root(degree));
            }
            return self.root(magnitude as i64).inv();
        }
        if degree > i64::from(u32::MAX) {
            return Self::Machine(self.to_machine().root(degree));
        }
        match self {
            Self::Exact(a) => a.root(degree as u32),
            Self::Big(b) => b.root(degree as u32),
            Self::Machine(m) => Self::Machine(m.root(degree)),
        }
    }

    /// Square root.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        match self {
            Self::Exact(a) => a.sqrt(),
            Self::Big(b) => b.sqrt(),
            Self::Machine(m) => Self::Machine(m.sqrt()),
        }
    }

    /// Absolute value (complex modulus).
    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Self::Exact(a) => a.abs(),
            Self::Big(b) => Self::Big(b.abs()),
            Self::Machine(m) => Self::Machine(m.abs()),
        }
    }

    /// Natural logarithm.
    #[must_use]
    pub fn ln(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.is_one() {
            return Self::zero();
        }
        match self {
            Self::Exact(a) => a.ln(),
            Self::Big(b) => Self::Machine(b.to_machine().ln()),
            Self::Machine(m) => Self::Machine(m.ln()),
        }
    }

    /// Exponential.
    #[must_use]
    pub fn exp(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.is_zero() {
            return Self::one();
        }
        match self {
            Self::Exact(a) => a.exp(),
            Self::Big(b) => Self::Machine(b.to_machine().exp()),
            Self::Machine(m) => Self::Machine(m.exp()),
        }
    }

    /// Floor.
    #[must_use]
    pub fn floor(&self) -> Self {
        match self {
            Self::Exact(a) => a.floor(),
            Self::Big(b) => Self::Big(b.floor()),
            Self::Machine(m) => Self::Machine(m.floor()),
        }
    }

    /// Ceiling.
    #[must_use]
    pub fn ceil(&self) -> Self {
        match self {
            Self::Exact(a) => a.ceil(),
            Self::Big(b) => Self::Big(b.ceil()),
            Self::Machine(m) => Self::Machine(m.ceil()),
        }
    }

    /// Nearest integer, ties away from zero.
    #[must_use]
    pub fn round(&self) -> Self {
        match self {
            Self::Exact(a) => a.round(),
            Self::Big(b) => Self::Big(b.round()),
            Self::Machine(m) => Self::Machine(m.round()),
        }
    }

    /// Greatest common divisor; meaningful only for non-complex integers,
    /// anything else yields 1, NaN propagates.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a.gcd(b)),
            (Self::Machine(a), b) => Self::Machine(a.gcd(&b.to_machine())),
            (a, Self::Machine(b)) => Self::Machine(a.to_machine().gcd(b)),
            (a, b) => match (a.as_big(), b.as_big()) {
                (Some(x), Some(y)) => Self::Big(x.gcd(&y)),
                _ => Self::one(),
            },
        }
    }

    // === Comparison ===

    /// Numeric value equality, across families. Same-family exact values
    /// compare exactly; anything involving a machine value compares by
    /// magnitude.
    #[must_use]
    pub fn num_eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Big(a), Self::Big(b)) => a == b,
            (Self::Exact(a), Self::Big(b)) | (Self::Big(b), Self::Exact(a)) => {
                a.is_rational() && a.to_big_rational() == *b
            }
            _ => self.re() == other.re() && self.im() == other.im(),
        }
    }

    /// Numeric ordering of real values; `None` for NaN or complex operands.
    #[must_use]
    pub fn num_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a.cmp_real(b),
            (Self::Big(a), Self::Big(b)) => Some(a.cmp_value(b)),
            (Self::Exact(a), Self::Big(b)) if a.is_rational() => {
                Some(a.to_big_rational().cmp_value(b))
            }
            (Self::Big(a), Self::Exact(b)) if b.is_rational() => {
                Some(a.cmp_value(&b.to_big_rational()))
            }
            _ => {
                if !self.is_real() || !other.is_real() {
                    return None;
                }
                self.re().partial_cmp(&other.re())
            }
        }
    }

    /// Strictly less than; false when incomparable.
    #[must_use]
    pub fn lt(&self, other: &Self) -> bool {
        self.num_cmp(other) == Some(Ordering::Less)
    }

    /// Less than or equal; false when incomparable.
    #[must_use]
    pub fn le(&self, other: &Self) -> bool {
        matches!(
            self.num_cmp(other),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// Strictly greater than; false when incomparable.
    #[must_use]
    pub fn gt(&self, other: &Self) -> bool {
        self.num_cmp(other) == Some(Ordering::Greater)
    }

    /// Greater than or equal; false when incomparable.
    #[must_use]
    pub fn ge(&self, other: &Self) -> bool {
        matches!(
            self.num_cmp(other),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    // === Batched addition ===

    /// Sums a slice of values, bucketing exact terms by distinct radical so
    /// that `√2 + √2` becomes `2·√2` losslessly. The rational-only total
    /// accumulates in a big rational (no overflow) and the Gaussian
    /// imaginary total separately. Returns one value per surviving bucket:
    /// the rational/Gaussian total first, then radical terms in ascending
    /// radical order.
    ///
    /// The moment any input is inexact the bucketing is defeated, and the
    /// result is a single iterated machine sum.
    #[must_use]
    pub fn sum(values: &[Self]) -> Vec<Self> {
        if values.iter().any(Self::is_nan) {
            return vec![Self::nan()];
        }
        if values.iter().any(|v| matches!(v, Self::Machine(_))) {
            let total = values
                .iter()
                .fold(Self::zero(), |acc, v| acc.add(v));
            return vec![total];
        }

        let mut rational = BigValue::from_ratio(0, 1);
        let mut imaginary: i128 = 0;
        let mut buckets: HashMap<i64, Ratio<i64>> = HashMap::new();
        let mut spilled: Vec<Self> = Vec::new();

        for value in values {
            match value {
                Self::Big(b) => rational = rational.add(b),
                Self::Exact(a) if a.is_rational() => {
                    rational = rational.add(&a.to_big_rational());
                }
                Self::Exact(a) if a.is_real() => {
                    let entry = buckets.entry(a.radical()).or_insert_with(Ratio::zero);
                    match entry.checked_add(&a.rational_part()) {
                        Some(sum) => *entry = sum,
                        None => {
                            // Coefficient left i64 range: this bucket can no
                            // longer be represented exactly.
                            spilled.push(Self::Machine(a.to_machine()));
                        }
                    }
                }
                Self::Exact(a) => {
                    imaginary += i128::from(a.imag());
                    rational = rational.add(&ExactValue::integer(a.numerator()).to_big_rational());
                }
                Self::Machine(_) => unreachable!("machine inputs take the fallback path"),
            }
        }

        let mut out = Vec::new();
        if imaginary != 0 {
            let gaussian = i64::try_from(imaginary)
                .ok()
                .and_then(|im| {
                    rational
                        .to_exact_if_small()
                        .filter(ExactValue::is_integer)
                        .map(|re| Self::exact_gaussian(re.numerator(), im))
                });
            match gaussian {
                Some(v) => out.push(v),
                None => out.push(Self::complex(rational.to_f64(), imaginary as f64)),
            }
        } else if !rational.is_zero() {
            match rational.to_exact_if_small() {
                Some(small) => out.push(Self::Exact(small)),
                None => out.push(Self::Big(rational)),
            }
        }

        let mut radicals: Vec<_> = buckets
            .into_iter()
            .filter(|(_, coefficient)| !coefficient.is_zero())
            .collect();
        radicals.sort_by_key(|(radical, _)| *radical);
        for (radical, coefficient) in radicals {
            match ExactValue::normalized(coefficient, radical, 0) {
                Some(v) => out.push(Self::Exact(v)),
                None => out.push(Self::machine(
                    (*coefficient.numer() as f64 / *coefficient.denom() as f64)
                        * (radical as f64).sqrt(),
                )),
            }
        }
        for term in spilled {
            out.push(term);
        }
        if out.is_empty() {
            out.push(Self::zero());
        }
        out
    }
}

impl Default for NumericValue {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(a) => fmt::Debug::fmt(a, f),
            Self::Big(b) => fmt::Debug::fmt(b, f),
            Self::Machine(m) => fmt::Debug::fmt(m, f),
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(a) => fmt::Display::fmt(a, f),
            Self::Big(b) => fmt::Display::fmt(b, f),
            Self::Machine(m) => fmt::Display::fmt(m, f),
        }
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        Self::machine(value)
    }
}

impl From<(i64, i64)> for NumericValue {
    fn from((numerator, denominator): (i64, i64)) -> Self {
        Self::rational(numerator, denominator)
    }
}

impl From<(f64, f64)> for NumericValue {
    fn from((re, im): (f64, f64)) -> Self {
        Self::complex(re, im)
    }
}

impl From<ExactValue> for NumericValue {
    fn from(value: ExactValue) -> Self {
        Self::Exact(value)
    }
}

impl From<BigValue> for NumericValue {
    fn from(value: BigValue) -> Self {
        Self::Big(value)
    }
}

impl From<MachineValue> for NumericValue {
    fn from(value: MachineValue) -> Self {
        Self::Machine(value)
    }
}

impl From<dashu::integer::IBig> for NumericValue {
    fn from(value: dashu::integer::IBig) -> Self {
        Self::Big(BigValue::from_ibig(value))
    }
}

impl From<dashu::rational::RBig> for NumericValue {
    fn from(value: dashu::rational::RBig) -> Self {
        Self::Big(BigValue::from_rbig(value))
    }
}

impl std::ops::Add for NumericValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        NumericValue::add(&self, &rhs)
    }
}

impl std::ops::Add for &NumericValue {
    type Output = NumericValue;

    fn add(self, rhs: Self) -> Self::Output {
        NumericValue::add(self, rhs)
    }
}

impl std::ops::Sub for NumericValue {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        NumericValue::sub(&self, &rhs)
    }
}

impl std::ops::Sub for &NumericValue {
    type Output = NumericValue;

    fn sub(self, rhs: Self) -> Self::Output {
        NumericValue::sub(self, rhs)
    }
}

impl std::ops::Mul for NumericValue {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        NumericValue::mul(&self, &rhs)
    }
}

impl std::ops::Mul for &NumericValue {
    type Output = NumericValue;

    fn mul(self, rhs: Self) -> Self::Output {
        NumericValue::mul(self, rhs)
    }
}

impl std::ops::Div for NumericValue {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        NumericValue::div(&self, &rhs)
    }
}

impl std::ops::Div for &NumericValue {
    type Output = NumericValue;

    fn div(self, rhs: Self) -> Self::Output {
        NumericValue::div(self, rhs)
    }
}

impl std::ops::Neg for NumericValue {
    type Output = Self;

    fn neg(self) -> Self::Output {
        NumericValue::neg(&self)
    }
}

impl std::ops::Neg for &NumericValue {
    type Output = NumericValue;

    fn neg(self) -> Self::Output {
        NumericValue::neg(self)
    }
}

impl Zero for NumericValue {
    fn zero() -> Self {
        NumericValue::zero()
    }

    fn is_zero(&self) -> bool {
        NumericValue::is_zero(self)
    }
}

impl One for NumericValue {
    fn one() -> Self {
        NumericValue::one()
    }

    fn is_one(&self) -> bool {
        NumericValue::is_one(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_exact() {
        for n in [-3i64, 0, 1, 7, 1_000_000] {
            let v = NumericValue::integer(n);
            assert!(v.is_exact());
            assert_eq!(v.re(), n as f64);
        }
    }

    #[test]
    fn nan_is_absorbing() {
        let nan = NumericValue::nan();
        let two = NumericValue::integer(2);
        assert!(nan.add(&two).is_nan());
        assert!(two.mul(&nan).is_nan());
        assert!(nan.pow(&two).is_nan());
        assert!(two.gcd(&nan).is_nan());
        assert!(nan.sqrt().is_nan());
    }

    #[test]
    fn zero_pow_table() {
        let zero = NumericValue::zero();
        assert!(zero.pow(&NumericValue::zero()).is_nan());
        assert!(zero.pow(&NumericValue::integer(3)).is_zero());
        assert!(zero.pow(&NumericValue::infinity()).is_zero());
        assert!(zero
            .pow(&NumericValue::integer(-2))
            .is_complex_infinity());
        assert!(zero
            .pow(&NumericValue::neg_infinity())
            .is_complex_infinity());
    }

    #[test]
    fn one_pow_table() {
        let one = NumericValue::one();
        assert!(one.pow(&NumericValue::integer(5)).is_one());
        assert!(one.pow(&NumericValue::infinity()).is_nan());
        assert!(one.pow(&NumericValue::neg_infinity()).is_nan());
    }

    #[test]
    fn negative_one_to_infinity_is_nan() {
        let v = NumericValue::integer(-1).pow(&NumericValue::infinity());
        assert!(v.is_nan());
    }

    #[test]
    fn infinite_exponent_thresholds() {
        let inf = NumericValue::infinity();
        assert!(NumericValue::integer(2).pow(&inf).is_positive_infinity());
        assert!(NumericValue::rational(1, 2).pow(&inf).is_zero());
        assert!(NumericValue::integer(2)
            .pow(&NumericValue::neg_infinity())
            .is_zero());
        assert!(NumericValue::rational(1, 2)
            .pow(&NumericValue::neg_infinity())
            .is_positive_infinity());
        assert!(NumericValue::infinity().pow(&inf).is_complex_infinity());
    }

    #[test]
    fn infinite_base_complex_exponent() {
        let inf = NumericValue::infinity();
        assert!(inf.pow(&NumericValue::complex(0.0, 2.0)).is_nan());
        assert!(inf
            .pow(&NumericValue::complex(1.0, 2.0))
            .is_complex_infinity());
        assert!(inf.pow(&NumericValue::complex(-1.0, 2.0)).is_zero());
    }

    #[test]
    fn pow_stays_exact_within_bound() {
        let v = NumericValue::integer(2).powi(10);
        assert_eq!(v, NumericValue::integer(1024));
        assert!(v.is_exact_family());
    }

    #[test]
    fn pow_promotes_to_big_past_bound() {
        let v = NumericValue::integer(2).powi(10_000);
        assert!(matches!(v, NumericValue::Big(_)));
        assert!(v.is_exact());
    }

    #[test]
    fn rational_exponent_takes_exact_root() {
        // 8^(1/3) = 2 exactly
        let v = NumericValue::integer(8).pow(&NumericValue::rational(1, 3));
        assert_eq!(v, NumericValue::integer(2));
        // 4^(3/2) = 8 exactly
        let v = NumericValue::integer(4).pow(&NumericValue::rational(3, 2));
        assert_eq!(v, NumericValue::integer(8));
    }

    #[test]
    fn sum_buckets_radicals() {
        let sqrt2 = NumericValue::exact(1, 1, 2);
        let total = NumericValue::sum(&[sqrt2.clone(), sqrt2]);
        assert_eq!(total, vec![NumericValue::exact(2, 1, 2)]);
    }

    #[test]
    fn sum_keeps_rational_and_radical_separate() {
        let terms = [
            NumericValue::rational(1, 4),
            NumericValue::exact(1, 1, 3),
            NumericValue::rational(1, 4),
            NumericValue::exact(2, 1, 3),
        ];
        let total = NumericValue::sum(&terms);
        assert_eq!(
            total,
            vec![NumericValue::rational(1, 2), NumericValue::exact(3, 1, 3)]
        );
    }

    #[test]
    fn sum_falls_back_on_inexact_input() {
        let terms = [
            NumericValue::machine(1.2),
            NumericValue::machine(-1.2),
            NumericValue::rational(1, 4),
        ];
        let total = NumericValue::sum(&terms);
        assert_eq!(total.len(), 1);
        assert!(matches!(total[0], NumericValue::Machine(_)));
    }

    #[test]
    fn sum_cancels_to_zero() {
        let sqrt5 = NumericValue::exact(1, 1, 5);
        let total = NumericValue::sum(&[sqrt5.clone(), sqrt5.neg()]);
        assert_eq!(total, vec![NumericValue::zero()]);
    }

    #[test]
    fn sum_folds_gaussian_total() {
        let terms = [
            NumericValue::exact_gaussian(1, 2),
            NumericValue::exact_gaussian(2, -1),
        ];
        let total = NumericValue::sum(&terms);
        assert_eq!(total, vec![NumericValue::exact_gaussian(3, 1)]);
    }

    #[test]
    fn num_eq_across_families() {
        assert!(NumericValue::rational(1, 4).num_eq(&NumericValue::machine(0.25)));
        assert!(!NumericValue::rational(1, 3).num_eq(&NumericValue::machine(0.3)));
        assert!(!NumericValue::nan().num_eq(&NumericValue::nan()));
    }

    #[test]
    fn ordering_across_radicals() {
        // √2 ≈ 1.414 sits between 7/5 and 3/2.
        let sqrt2 = NumericValue::exact(1, 1, 2);
        assert!(sqrt2.lt(&NumericValue::rational(3, 2)));
        assert!(sqrt2.gt(&NumericValue::rational(7, 5)));
        assert!(sqrt2.lt(&NumericValue::integer(2)));
        assert!(NumericValue::complex(1.0, 1.0)
            .num_cmp(&NumericValue::integer(1))
            .is_none());
    }

    #[test]
    fn division_policy() {
        let zero = NumericValue::zero();
        assert!(zero.div(&zero).is_nan());
        assert!(NumericValue::integer(1).div(&zero).is_positive_infinity());
        assert!(NumericValue::integer(-1).div(&zero).is_negative_infinity());
        assert!(NumericValue::exact_gaussian(1, 1)
            .div(&zero)
            .is_complex_infinity());
    }

    #[test]
    fn exact_constructor_promotes_big_radicals() {
        let v = NumericValue::exact(1, 1, SMALL_INTEGER + 1);
        assert!(matches!(v, NumericValue::Machine(_)));
    }
}
