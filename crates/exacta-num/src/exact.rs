//! Exact numeric values: `rational × √radical (+ Gaussian imaginary)`.
//!
//! An [`ExactValue`] equals its true mathematical value with no rounding.
//! Normalization happens once, at construction; every arithmetic operation
//! returns a fresh [`NumericValue`], promoting out of the exact family the
//! moment exactness cannot be preserved.

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedMul, One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

use crate::machine::MachineValue;
use crate::value::{NumericValue, SMALL_INTEGER};

/// An exact number of the form `rational · √radical + im·i`.
///
/// Invariants, enforced at construction:
/// - `rational` is in lowest terms with a positive denominator (`Ratio`
///   maintains this).
/// - `radical ≥ 1` and square-free; perfect-square factors are extracted
///   into the rational (`√75 → 5·√3`).
/// - A zero numerator collapses to canonical zero (`rational = 0/1,
///   radical = 1`).
/// - `im ≠ 0` requires an integral rational and `radical == 1` (Gaussian
///   integers); anything richer lives in the machine family.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExactValue {
    rational: Ratio<i64>,
    radical: i64,
    im: i64,
}

/// Splits `radical` into `(s, rest)` with `radical = s²·rest` and `rest`
/// square-free.
fn extract_square(radical: i64) -> (i64, i64) {
    let mut square_free = radical;
    let mut extracted = 1i64;
    let mut factor = 2i64;
    while factor * factor <= square_free {
        let square = factor * factor;
        while square_free % square == 0 {
            square_free /= square;
            extracted *= factor;
        }
        factor += 1;
    }
    (extracted, square_free)
}

/// Integer n-th root of a non-negative `x`, if one exists exactly.
pub(crate) fn exact_nth_root(x: i64, n: u32) -> Option<i64> {
    debug_assert!(x >= 0, "exact_nth_root expects a non-negative radicand");
    if x <= 1 || n == 1 {
        return Some(x);
    }
    let guess = (x as f64).powf(1.0 / f64::from(n)).round() as i64;
    for candidate in guess.saturating_sub(1)..=guess.saturating_add(1) {
        if candidate >= 0 && candidate.checked_pow(n) == Some(x) {
            return Some(candidate);
        }
    }
    None
}

impl ExactValue {
    /// Creates an exact value `(numerator/denominator) · √radical`,
    /// normalizing as described on the type.
    ///
    /// # Panics
    ///
    /// Panics if `denominator == 0`, `radical < 0`, or normalization would
    /// overflow `i64`; callers are expected to validate first (the smart
    /// constructors on [`NumericValue`] promote instead of panicking).
    #[must_use]
    pub fn new(numerator: i64, denominator: i64, radical: i64) -> Self {
        assert!(denominator != 0, "denominator cannot be zero");
        assert!(radical >= 0, "radical cannot be negative");
        Self::normalized(Ratio::new(numerator, denominator), radical, 0)
            .expect("magnitude exceeds the exact range")
    }

    /// Creates an exact integer.
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self {
            rational: Ratio::from_integer(n),
            radical: 1,
            im: 0,
        }
    }

    /// Creates an exact rational `numerator/denominator`.
    ///
    /// # Panics
    ///
    /// Panics if `denominator == 0`.
    #[must_use]
    pub fn rational(numerator: i64, denominator: i64) -> Self {
        Self::new(numerator, denominator, 1)
    }

    /// Creates a Gaussian integer `re + im·i`.
    #[must_use]
    pub fn gaussian(re: i64, im: i64) -> Self {
        Self {
            rational: Ratio::from_integer(re),
            radical: 1,
            im,
        }
    }

    /// Canonical zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::integer(0)
    }

    /// Canonical one.
    #[must_use]
    pub fn one() -> Self {
        Self::integer(1)
    }

    /// Normalizing constructor; `None` when square extraction would
    /// overflow `i64`.
    pub(crate) fn normalized(rational: Ratio<i64>, radical: i64, im: i64) -> Option<Self> {
        debug_assert!(radical >= 0, "radical cannot be negative");
        debug_assert!(
            im == 0 || (radical <= 1 && rational.is_integer()),
            "Gaussian part requires an integral rational and radical 1"
        );
        if radical == 0 || rational.is_zero() {
            return Some(Self {
                rational: Ratio::zero(),
                radical: 1,
                im,
            });
        }
        let (extracted, square_free) = extract_square(radical);
        let rational = if extracted == 1 {
            rational
        } else {
            rational.checked_mul(&Ratio::from_integer(extracted))?
        };
        Some(Self {
            rational,
            radical: square_free,
            im,
        })
    }

    // === Accessors ===

    /// The rational component.
    #[must_use]
    pub fn rational_part(&self) -> Ratio<i64> {
        self.rational
    }

    /// The rational numerator (sign lives here).
    #[must_use]
    pub fn numerator(&self) -> i64 {
        *self.rational.numer()
    }

    /// The rational denominator, always positive.
    #[must_use]
    pub fn denominator(&self) -> i64 {
        *self.rational.denom()
    }

    /// The square-free radical, `≥ 1`.
    #[must_use]
    pub fn radical(&self) -> i64 {
        self.radical
    }

    /// The Gaussian imaginary part.
    #[must_use]
    pub fn imag(&self) -> i64 {
        self.im
    }

    // === Queries ===

    /// True for canonical zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rational.is_zero() && self.im == 0
    }

    /// True for exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.rational.is_one() && self.radical == 1 && self.im == 0
    }

    /// True for exactly negative one.
    #[must_use]
    pub fn is_negative_one(&self) -> bool {
        self.rational == -Ratio::from_integer(1) && self.radical == 1 && self.im == 0
    }

    /// True when the value is a plain integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.rational.is_integer() && self.radical == 1 && self.im == 0
    }

    /// True when the value is rational (no surviving radical, no imaginary
    /// part).
    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.radical == 1 && self.im == 0
    }

    /// True when the value has no imaginary part.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.im == 0
    }

    /// Sign of the value: `-1`, `0`, `1`, or `None` for a Gaussian value
    /// off the real line.
    #[must_use]
    pub fn sgn(&self) -> Option<i8> {
        if self.im != 0 {
            return None;
        }
        Some(match self.rational.cmp(&Ratio::zero()) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    }

    /// Real part as a machine float.
    #[must_use]
    pub fn re(&self) -> f64 {
        (self.numerator() as f64 / self.denominator() as f64) * (self.radical as f64).sqrt()
    }

    /// Machine-float rendition of the whole value.
    pub(crate) fn to_machine(&self) -> MachineValue {
        MachineValue::new(self.re(), self.im as f64)
    }

    // === Arithmetic ===

    /// Negation; stays exact.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            rational: -self.rational,
            radical: self.radical,
            im: -self.im,
        }
    }

    /// Multiplicative inverse.
    ///
    /// `((n/d)·√r)⁻¹ = (d/(n·r))·√r` exactly; a Gaussian inverse stays
    /// exact only when both parts come out integral. `0⁻¹` is the machine
    /// positive infinity.
    #[must_use]
    pub fn inv(&self) -> NumericValue {
        if self.is_zero() {
            return NumericValue::infinity();
        }
        if self.im == 0 {
            let scaled = self.numerator().checked_mul(self.radical);
            if let Some(denom) = scaled {
                if let Some(v) =
                    Self::normalized(Ratio::new(self.denominator(), denom), self.radical, 0)
                {
                    return NumericValue::Exact(v);
                }
            }
            return self.promote_rational_or_machine(|big| big.inv());
        }
        // (a + b·i)⁻¹ = (a - b·i) / (a² + b²)
        let a = self.numerator();
        let b = self.im;
        let norm = a
            .checked_mul(a)
            .and_then(|aa| b.checked_mul(b).and_then(|bb| aa.checked_add(bb)));
        if let Some(norm) = norm {
            let re = Ratio::new(a, norm);
            let im = Ratio::new(-b, norm);
            if re.is_integer() && im.is_integer() {
                return NumericValue::Exact(Self::gaussian(re.to_integer(), im.to_integer()));
            }
        }
        NumericValue::Machine(self.to_machine().inv())
    }

    /// Addition; stays exact only for equal radicals or Gaussian-compatible
    /// operands, otherwise both sides go to machine form.
    #[must_use]
    pub fn add(&self, other: &Self) -> NumericValue {
        if self.is_zero() {
            return NumericValue::Exact(*other);
        }
        if other.is_zero() {
            return NumericValue::Exact(*self);
        }
        if self.im == 0 && other.im == 0 {
            if self.radical == other.radical {
                if let Some(sum) = self.rational.checked_add(&other.rational) {
                    if let Some(v) = Self::normalized(sum, self.radical, 0) {
                        return NumericValue::Exact(v);
                    }
                }
                if self.radical == 1 {
                    return NumericValue::Big(self.to_big_rational().add(&other.to_big_rational()));
                }
            }
            return NumericValue::Machine(self.to_machine().add(&other.to_machine()));
        }
        if self.radical == 1
            && other.radical == 1
            && self.rational.is_integer()
            && other.rational.is_integer()
        {
            let re = self.numerator().checked_add(other.numerator());
            let im = self.im.checked_add(other.im);
            if let (Some(re), Some(im)) = (re, im) {
                return NumericValue::exact_gaussian(re, im);
            }
        }
        NumericValue::Machine(self.to_machine().add(&other.to_machine()))
    }

    /// Multiplication; radicals combine as `√a·√b = √(ab)` and renormalize
    /// while the product stays under the small-integer bound.
    #[must_use]
    pub fn mul(&self, other: &Self) -> NumericValue {
        if self.is_zero() || other.is_zero() {
            return NumericValue::Exact(Self::zero());
        }
        if self.im == 0 && other.im == 0 {
            if let Some(product) = self.rational.checked_mul(&other.rational) {
                if self.radical == other.radical {
                    // √r·√r folds straight into the rational.
                    if let Some(folded) =
                        product.checked_mul(&Ratio::from_integer(self.radical))
                    {
                        return NumericValue::from_ratio(folded);
                    }
                } else if let Some(combined) = self.radical.checked_mul(other.radical) {
                    if combined <= SMALL_INTEGER {
                        if let Some(v) = Self::normalized(product, combined, 0) {
                            return NumericValue::Exact(v);
                        }
                    }
                }
            } else if self.radical == 1 && other.radical == 1 {
                return NumericValue::Big(self.to_big_rational().mul(&other.to_big_rational()));
            }
            return NumericValue::Machine(self.to_machine().mul(&other.to_machine()));
        }
        if self.radical == 1 && other.radical == 1 {
            // Complex-rational product; lands exact when the parts do.
            let (ar, ai) = (self.rational, Ratio::from_integer(self.im));
            let (br, bi) = (other.rational, Ratio::from_integer(other.im));
            let re = checked_sub_ratio(ar.checked_mul(&br), ai.checked_mul(&bi));
            let im = checked_add_ratio(ar.checked_mul(&bi), ai.checked_mul(&br));
            if let (Some(re), Some(im)) = (re, im) {
                if im.is_zero() {
                    return NumericValue::from_ratio(re);
                }
                if re.is_integer() && im.is_integer() {
                    return NumericValue::exact_gaussian(re.to_integer(), im.to_integer());
                }
            }
        }
        NumericValue::Machine(self.to_machine().mul(&other.to_machine()))
    }

    /// Raises to a non-negative integer power, componentwise while checked
    /// `i64` arithmetic holds; pure rationals overflow into the big family,
    /// radicals and Gaussian values into machine form.
    #[must_use]
    pub fn pow_unsigned(&self, exp: u32) -> NumericValue {
        if exp == 0 {
            return NumericValue::Exact(Self::one());
        }
        if exp == 1 {
            return NumericValue::Exact(*self);
        }
        if self.im != 0 {
            return self.gaussian_pow(exp);
        }
        // ((n/d)·√r)^e = (n^e/d^e) · r^(e/2) · (√r iff e odd)
        let components = (|| {
            let n = self.numerator().checked_pow(exp)?;
            let d = self.denominator().checked_pow(exp)?;
            let half = self.radical.checked_pow(exp / 2)?;
            let n = n.checked_mul(half)?;
            let radical = if exp % 2 == 1 { self.radical } else { 1 };
            Self::normalized(Ratio::new(n, d), radical, 0)
        })();
        match components {
            Some(v) => NumericValue::Exact(v),
            None => self.promote_rational_or_machine(|big| big.pow_i64(i64::from(exp))),
        }
    }

    fn gaussian_pow(&self, exp: u32) -> NumericValue {
        let mut base = (self.numerator(), self.im);
        let mut acc = (1i64, 0i64);
        let mut e = exp;
        loop {
            if e & 1 == 1 {
                match gaussian_mul(acc, base) {
                    Some(p) => acc = p,
                    None => return NumericValue::Machine(self.to_machine().powi(i64::from(exp))),
                }
            }
            e >>= 1;
            if e == 0 {
                break;
            }
            match gaussian_mul(base, base) {
                Some(sq) => base = sq,
                None => return NumericValue::Machine(self.to_machine().powi(i64::from(exp))),
            }
        }
        NumericValue::exact_gaussian(acc.0, acc.1)
    }

    /// Exact n-th root attempt; promotes when no exact root exists.
    ///
    /// Odd roots of negative reals follow the real branch
    /// (`root(-8, 3) = -2`); even roots of negative reals are imaginary.
    #[must_use]
    pub fn root(&self, n: u32) -> NumericValue {
        if n == 1 {
            return NumericValue::Exact(*self);
        }
        if n == 2 {
            return self.sqrt();
        }
        if self.im != 0 {
            return NumericValue::Machine(self.to_machine().root(i64::from(n)));
        }
        match self.sgn() {
            Some(0) => NumericValue::Exact(Self::zero()),
            Some(-1) => {
                if n % 2 == 1 {
                    self.neg().root(n).neg()
                } else {
                    NumericValue::Machine(self.to_machine().root(i64::from(n)))
                }
            }
            _ => {
                if self.radical == 1 {
                    let roots = exact_nth_root(self.numerator(), n)
                        .zip(exact_nth_root(self.denominator(), n));
                    if let Some((rn, rd)) = roots {
                        return NumericValue::Exact(Self {
                            rational: Ratio::new(rn, rd),
                            radical: 1,
                            im: 0,
                        });
                    }
                }
                NumericValue::Machine(self.to_machine().root(i64::from(n)))
            }
        }
    }

    /// Square root, keeping the rational part exact by moving factors into
    /// the radical: `√(a/b) = √(ab)/b` while `ab` fits the bound. Negative
    /// rationals give an exact Gaussian imaginary when the magnitude root
    /// is integral, a machine imaginary otherwise.
    #[must_use]
    pub fn sqrt(&self) -> NumericValue {
        if self.im != 0 {
            return NumericValue::Machine(self.to_machine().sqrt());
        }
        match self.sgn() {
            Some(0) => NumericValue::Exact(Self::zero()),
            Some(-1) => {
                if self.radical == 1 {
                    let magnitude = exact_nth_root(-self.numerator(), 2)
                        .zip(exact_nth_root(self.denominator(), 2));
                    if let Some((rn, rd)) = magnitude {
                        let root = Ratio::new(rn, rd);
                        if root.is_integer() {
                            return NumericValue::exact_gaussian(0, root.to_integer());
                        }
                    }
                }
                NumericValue::Machine(self.to_machine().sqrt())
            }
            _ => {
                if self.radical == 1 {
                    let moved = self.numerator().checked_mul(self.denominator());
                    if let Some(nd) = moved {
                        if nd <= SMALL_INTEGER {
                            if let Some(v) =
                                Self::normalized(Ratio::new(1, self.denominator()), nd, 0)
                            {
                                return NumericValue::Exact(v);
                            }
                        }
                    }
                }
                NumericValue::Machine(self.to_machine().sqrt())
            }
        }
    }

    /// Absolute value; `|a + b·i| = √(a² + b²)` stays exact within the
    /// bound.
    #[must_use]
    pub fn abs(&self) -> NumericValue {
        if self.im == 0 {
            return NumericValue::Exact(Self {
                rational: self.rational.abs(),
                radical: self.radical,
                im: 0,
            });
        }
        let a = self.numerator();
        let b = self.im;
        let norm = a
            .checked_mul(a)
            .and_then(|aa| b.checked_mul(b).and_then(|bb| aa.checked_add(bb)));
        if let Some(norm) = norm {
            if norm <= SMALL_INTEGER {
                if let Some(v) = Self::normalized(Ratio::from_integer(1), norm, 0) {
                    return NumericValue::Exact(v);
                }
            }
        }
        NumericValue::Machine(self.to_machine().abs())
    }

    /// Floor; `NaN` for Gaussian values.
    #[must_use]
    pub fn floor(&self) -> NumericValue {
        self.rounded(Ratio::floor, f64::floor)
    }

    /// Ceiling; `NaN` for Gaussian values.
    #[must_use]
    pub fn ceil(&self) -> NumericValue {
        self.rounded(Ratio::ceil, f64::ceil)
    }

    /// Rounds to the nearest integer, ties away from zero; `NaN` for
    /// Gaussian values.
    #[must_use]
    pub fn round(&self) -> NumericValue {
        self.rounded(Ratio::round, f64::round)
    }

    fn rounded(
        &self,
        rational_op: fn(&Ratio<i64>) -> Ratio<i64>,
        float_op: fn(f64) -> f64,
    ) -> NumericValue {
        if self.im != 0 {
            return NumericValue::nan();
        }
        if self.radical == 1 {
            return NumericValue::Exact(Self {
                rational: rational_op(&self.rational),
                radical: 1,
                im: 0,
            });
        }
        let rounded = float_op(self.re());
        if rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64 {
            NumericValue::Exact(Self::integer(rounded as i64))
        } else {
            NumericValue::Machine(MachineValue::real(rounded))
        }
    }

    /// Natural logarithm; only `ln 1 = 0` stays exact.
    #[must_use]
    pub fn ln(&self) -> NumericValue {
        if self.is_one() {
            return NumericValue::Exact(Self::zero());
        }
        NumericValue::Machine(self.to_machine().ln())
    }

    /// Exponential; only `e⁰ = 1` stays exact.
    #[must_use]
    pub fn exp(&self) -> NumericValue {
        if self.is_zero() {
            return NumericValue::Exact(Self::one());
        }
        NumericValue::Machine(self.to_machine().exp())
    }

    /// Greatest common divisor, meaningful only for integers; any other
    /// operand pair yields `1`.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        if self.is_integer() && other.is_integer() {
            let g = gcd_i64(self.numerator(), other.numerator());
            return Self::integer(g);
        }
        Self::one()
    }

    /// Exact ordering of two real exact values; `None` when either operand
    /// has an imaginary part.
    #[must_use]
    pub fn cmp_real(&self, other: &Self) -> Option<Ordering> {
        if self.im != 0 || other.im != 0 {
            return None;
        }
        if self.radical == other.radical {
            return Some(self.rational.cmp(&other.rational));
        }
        let (sa, sb) = (self.sgn()?, other.sgn()?);
        if sa != sb {
            return Some(sa.cmp(&sb));
        }
        // Equal nonzero signs, distinct radicals: compare squares by
        // checked cross-multiplication, falling back to floats when the
        // i128 products overflow.
        let squared = |v: &Self| -> Option<i128> {
            let n = i128::from(v.numerator());
            n.checked_mul(n)?.checked_mul(i128::from(v.radical))
        };
        let cross = |v: &Self| i128::from(v.denominator()) * i128::from(v.denominator());
        let magnitudes = (|| {
            let lhs = squared(self)?.checked_mul(cross(other))?;
            let rhs = squared(other)?.checked_mul(cross(self))?;
            Some(lhs.cmp(&rhs))
        })();
        let magnitude_order = match magnitudes {
            Some(order) => order,
            None => self.re().partial_cmp(&other.re())?,
        };
        Some(if sa < 0 {
            magnitude_order.reverse()
        } else {
            magnitude_order
        })
    }

    pub(crate) fn to_big_rational(&self) -> crate::big::BigValue {
        debug_assert!(self.is_rational(), "only rationals promote to the big family");
        crate::big::BigValue::from_ratio(self.numerator(), self.denominator())
    }

    fn promote_rational_or_machine(
        &self,
        op: impl FnOnce(&crate::big::BigValue) -> NumericValue,
    ) -> NumericValue {
        if self.is_rational() {
            op(&self.to_big_rational())
        } else {
            NumericValue::Machine(self.to_machine())
        }
    }
}

fn gaussian_mul(a: (i64, i64), b: (i64, i64)) -> Option<(i64, i64)> {
    let re = a.0.checked_mul(b.0)?.checked_sub(a.1.checked_mul(b.1)?)?;
    let im = a.0.checked_mul(b.1)?.checked_add(a.1.checked_mul(b.0)?)?;
    Some((re, im))
}

fn checked_add_ratio(a: Option<Ratio<i64>>, b: Option<Ratio<i64>>) -> Option<Ratio<i64>> {
    a?.checked_add(&b?)
}

fn checked_sub_ratio(a: Option<Ratio<i64>>, b: Option<Ratio<i64>>) -> Option<Ratio<i64>> {
    let b = b?;
    a?.checked_add(&(-b))
}

pub(crate) fn gcd_i64(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

impl fmt::Debug for ExactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exact({self})")
    }
}

impl fmt::Display for ExactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im != 0 {
            let sign = if self.im < 0 { '-' } else { '+' };
            return write!(
                f,
                "({} {} {}·i)",
                self.numerator(),
                sign,
                self.im.unsigned_abs()
            );
        }
        if self.radical == 1 {
            return write!(f, "{}", self.rational);
        }
        if self.rational.is_one() {
            write!(f, "√{}", self.radical)
        } else if self.rational == -Ratio::from_integer(1) {
            write!(f, "-√{}", self.radical)
        } else {
            write!(f, "{}·√{}", self.rational, self.radical)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_normalizes_rational() {
        let v = ExactValue::rational(2, 4);
        assert_eq!(v.numerator(), 1);
        assert_eq!(v.denominator(), 2);
    }

    #[test]
    fn construction_extracts_perfect_squares() {
        // √75 = 5·√3
        let v = ExactValue::new(1, 1, 75);
        assert_eq!(v.numerator(), 5);
        assert_eq!(v.radical(), 3);

        // √16 = 4
        let v = ExactValue::new(1, 1, 16);
        assert_eq!(v.numerator(), 4);
        assert_eq!(v.radical(), 1);
    }

    #[test]
    fn zero_collapses_canonically() {
        let v = ExactValue::new(0, 7, 42);
        assert!(v.is_zero());
        assert_eq!(v.radical(), 1);
        assert_eq!(v.denominator(), 1);
    }

    #[test]
    fn sqrt_of_75() {
        let v = ExactValue::integer(75).sqrt();
        let exact = v.as_exact().expect("sqrt(75) stays exact");
        assert_eq!(exact.numerator(), 5);
        assert_eq!(exact.radical(), 3);
    }

    #[test]
    fn sqrt_moves_denominator_into_radical() {
        // √(1/2) = √2 / 2
        let v = ExactValue::rational(1, 2).sqrt();
        let exact = v.as_exact().expect("sqrt(1/2) stays exact");
        assert_eq!(exact.numerator(), 1);
        assert_eq!(exact.denominator(), 2);
        assert_eq!(exact.radical(), 2);
    }

    #[test]
    fn sqrt_of_negative_square_is_gaussian() {
        let v = ExactValue::integer(-4).sqrt();
        let exact = v.as_exact().expect("sqrt(-4) stays exact");
        assert_eq!(exact.imag(), 2);
        assert_eq!(exact.numerator(), 0);
    }

    #[test]
    fn sqrt_of_negative_non_square_is_machine_imaginary() {
        let v = ExactValue::integer(-2).sqrt();
        assert!(!v.is_exact_family());
        assert_eq!(v.re(), 0.0);
        assert!((v.im() - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn add_same_radical_stays_exact() {
        let a = ExactValue::new(1, 1, 2);
        let sum = a.add(&a);
        let exact = sum.as_exact().expect("√2 + √2 stays exact");
        assert_eq!(exact.numerator(), 2);
        assert_eq!(exact.radical(), 2);
    }

    #[test]
    fn add_mixed_radicals_promotes() {
        let a = ExactValue::new(1, 1, 2);
        let b = ExactValue::new(1, 1, 3);
        assert!(!a.add(&b).is_exact_family());
    }

    #[test]
    fn mul_combines_radicals() {
        // √2 · √8 = √16 = 4
        let a = ExactValue::new(1, 1, 2);
        let b = ExactValue::new(1, 1, 8);
        let product = a.mul(&b);
        let exact = product.as_exact().expect("√2·√8 stays exact");
        assert_eq!(exact.numerator(), 4);
        assert_eq!(exact.radical(), 1);
    }

    #[test]
    fn gaussian_product_stays_exact() {
        // (1 + 2i)(3 - i) = 5 + 5i
        let a = ExactValue::gaussian(1, 2);
        let b = ExactValue::gaussian(3, -1);
        let product = a.mul(&b);
        let exact = product.as_exact().expect("Gaussian product stays exact");
        assert_eq!(exact.numerator(), 5);
        assert_eq!(exact.imag(), 5);
    }

    #[test]
    fn inv_keeps_radical_exact() {
        // (√2)⁻¹ = √2/2
        let v = ExactValue::new(1, 1, 2);
        let inv = v.inv();
        let exact = inv.as_exact().expect("1/√2 stays exact");
        assert_eq!(exact.numerator(), 1);
        assert_eq!(exact.denominator(), 2);
        assert_eq!(exact.radical(), 2);
    }

    #[test]
    fn inv_of_imaginary_unit() {
        let i = ExactValue::gaussian(0, 1);
        let inv = i.inv();
        let exact = inv.as_exact().expect("i⁻¹ stays exact");
        assert_eq!(exact.imag(), -1);
    }

    #[test]
    fn odd_root_of_negative_is_real_branch() {
        let v = ExactValue::integer(-8).root(3);
        let exact = v.as_exact().expect("cbrt(-8) stays exact");
        assert_eq!(exact.numerator(), -2);
    }

    #[test]
    fn pow_within_bound_stays_exact() {
        let v = ExactValue::integer(2).pow_unsigned(10);
        let exact = v.as_exact().expect("2^10 stays exact");
        assert_eq!(exact.numerator(), 1024);
    }

    #[test]
    fn pow_of_radical() {
        // (√2)³ = 2·√2
        let v = ExactValue::new(1, 1, 2).pow_unsigned(3);
        let exact = v.as_exact().expect("(√2)³ stays exact");
        assert_eq!(exact.numerator(), 2);
        assert_eq!(exact.radical(), 2);
    }

    #[test]
    fn cmp_across_radicals() {
        // √2 < √3, 2·√2 > √3, -√2 < √3
        let sqrt2 = ExactValue::new(1, 1, 2);
        let sqrt3 = ExactValue::new(1, 1, 3);
        let two_sqrt2 = ExactValue::new(2, 1, 2);
        assert_eq!(sqrt2.cmp_real(&sqrt3), Some(Ordering::Less));
        assert_eq!(two_sqrt2.cmp_real(&sqrt3), Some(Ordering::Greater));
        assert_eq!(sqrt2.neg().cmp_real(&sqrt3), Some(Ordering::Less));
    }

    #[test]
    fn floor_of_radical_value() {
        // 5·√3 ≈ 8.66
        let v = ExactValue::new(5, 1, 3);
        let floor = v.floor();
        assert_eq!(floor.as_exact().map(ExactValue::numerator), Some(8));
    }

    #[test]
    fn gaussian_abs_is_radical() {
        // |3 + 4i| = 5
        let v = ExactValue::gaussian(3, 4).abs();
        assert_eq!(v.as_exact().map(ExactValue::numerator), Some(5));
    }

    #[test]
    fn display_forms() {
        assert_eq!(ExactValue::integer(-1).to_string(), "-1");
        assert_eq!(ExactValue::rational(1, 2).to_string(), "1/2");
        assert_eq!(ExactValue::new(1, 1, 2).to_string(), "√2");
        assert_eq!(ExactValue::new(5, 3, 2).to_string(), "5/3·√2");
        assert_eq!(ExactValue::gaussian(2, -3).to_string(), "(2 - 3·i)");
    }
}
