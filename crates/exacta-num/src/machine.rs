//! Machine numeric values: a native `(re, im)` floating-point pair.
//!
//! The machine family is the floating fallback for everything the exact
//! family cannot preserve. Complex `pow`/`root`/`sqrt`/`ln`/`exp` go through
//! [`Complex64`] polar form, with a chop step that zeroes components below a
//! fixed tolerance to suppress trigonometric round-trip noise.

use num_complex::Complex64;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Components with magnitude at or below this are zeroed after a complex
/// polar round-trip.
pub const CHOP_TOLERANCE: f64 = 1e-10;

/// A floating-point numeric value with full complex support.
///
/// Invariants, enforced at construction:
/// - `im` is never NaN independently of `re`; any NaN component collapses
///   the whole value to the canonical NaN `(NaN, 0)`.
/// - `-0.0` never escapes as a distinguishable value.
/// - Complex infinity is represented as `(∞, ∞)`: both parts infinite,
///   direction undetermined.
#[derive(Clone, Copy)]
pub struct MachineValue {
    re: f64,
    im: f64,
}

impl MachineValue {
    /// Creates a machine value, canonicalizing NaN and negative zero.
    #[must_use]
    pub fn new(re: f64, im: f64) -> Self {
        debug_assert!(
            !(im.is_nan() && !re.is_nan()),
            "imaginary part cannot be NaN on its own"
        );
        if re.is_nan() || im.is_nan() {
            return Self {
                re: f64::NAN,
                im: 0.0,
            };
        }
        // +0.0 addition folds -0.0 away.
        Self {
            re: re + 0.0,
            im: im + 0.0,
        }
    }

    /// Creates a real machine value.
    #[must_use]
    pub fn real(re: f64) -> Self {
        Self::new(re, 0.0)
    }

    /// The canonical NaN.
    #[must_use]
    pub fn nan() -> Self {
        Self {
            re: f64::NAN,
            im: 0.0,
        }
    }

    /// Positive real infinity.
    #[must_use]
    pub fn infinity() -> Self {
        Self::real(f64::INFINITY)
    }

    /// Negative real infinity.
    #[must_use]
    pub fn neg_infinity() -> Self {
        Self::real(f64::NEG_INFINITY)
    }

    /// Complex infinity: infinite magnitude, undetermined direction.
    #[must_use]
    pub fn complex_infinity() -> Self {
        Self {
            re: f64::INFINITY,
            im: f64::INFINITY,
        }
    }

    // === Accessors ===

    /// Real part.
    #[must_use]
    pub fn re(&self) -> f64 {
        self.re
    }

    /// Imaginary part.
    #[must_use]
    pub fn im(&self) -> f64 {
        self.im
    }

    fn to_complex(self) -> Complex64 {
        Complex64::new(self.re, self.im)
    }

    /// Rebuilds from a complex result of a polar round-trip, chopping
    /// near-zero noise.
    fn from_complex_chopped(z: Complex64) -> Self {
        Self::new(chop(z.re), chop(z.im))
    }

    // === Queries ===

    /// True for the NaN sentinel.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.re.is_nan()
    }

    /// True for zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    /// True for exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.re == 1.0 && self.im == 0.0
    }

    /// True for exactly negative one.
    #[must_use]
    pub fn is_negative_one(&self) -> bool {
        self.re == -1.0 && self.im == 0.0
    }

    /// True when the value lies on the real line.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.im == 0.0 && !self.re.is_nan()
    }

    /// True when both parts are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// True for positive real infinity.
    #[must_use]
    pub fn is_positive_infinity(&self) -> bool {
        self.re == f64::INFINITY && self.im == 0.0
    }

    /// True for negative real infinity.
    #[must_use]
    pub fn is_negative_infinity(&self) -> bool {
        self.re == f64::NEG_INFINITY && self.im == 0.0
    }

    /// True for complex infinity.
    #[must_use]
    pub fn is_complex_infinity(&self) -> bool {
        self.re.is_infinite() && self.im.is_infinite()
    }

    /// A machine value counts as exact only when both parts are integral
    /// or the value is infinite; it never re-enters the exact family.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        if self.is_nan() {
            return false;
        }
        if self.re.is_infinite() || self.im.is_infinite() {
            return true;
        }
        self.re.fract() == 0.0 && self.im.fract() == 0.0
    }

    /// Sign of a real value; `None` for NaN or complex values.
    #[must_use]
    pub fn sgn(&self) -> Option<i8> {
        if !self.is_real() {
            return None;
        }
        Some(if self.re == 0.0 {
            0
        } else if self.re < 0.0 {
            -1
        } else {
            1
        })
    }

    // === Arithmetic ===

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        Self::new(-self.re, -self.im)
    }

    /// Multiplicative inverse. `1/0 = ∞`; any infinity inverts to zero.
    #[must_use]
    pub fn inv(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.is_zero() {
            return Self::infinity();
        }
        if self.re.is_infinite() || self.im.is_infinite() {
            return Self::real(0.0);
        }
        if self.im == 0.0 {
            return Self::real(1.0 / self.re);
        }
        Self::from_complex_chopped(self.to_complex().inv())
    }

    /// Addition.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        Self::new(self.re + other.re, self.im + other.im)
    }

    /// Subtraction.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplication. Complex infinity absorbs anything except zero
    /// (which gives NaN); infinite × zero is NaN.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        if self.is_complex_infinity() || other.is_complex_infinity() {
            if self.is_zero() || other.is_zero() {
                return Self::nan();
            }
            return Self::complex_infinity();
        }
        if !self.is_finite() || !other.is_finite() {
            if self.is_zero() || other.is_zero() {
                return Self::nan();
            }
            if self.im == 0.0 && other.im == 0.0 {
                return Self::real(self.re * other.re);
            }
            return Self::complex_infinity();
        }
        if self.im == 0.0 && other.im == 0.0 {
            return Self::real(self.re * other.re);
        }
        let z = self.to_complex() * other.to_complex();
        Self::new(z.re, z.im)
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
            if self.im == 0.0 && self.re.is_finite() {
                return Self::real(if self.re < 0.0 {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                });
            }
            return Self::complex_infinity();
        }
        self.mul(&other.inv())
    }

    /// Raises to an arbitrary machine exponent. Real bases with real
    /// exponents stay on the real line whenever IEEE `pow` is defined
    /// there; every other combination goes through polar form and is
    /// chopped.
    #[must_use]
    pub fn pow(&self, exp: &Self) -> Self {
        if self.is_nan() || exp.is_nan() {
            return Self::nan();
        }
        // IEEE pow says (±1)^∞ = 1; the kernel treats it as an oscillation.
        if exp.im == 0.0 && exp.re.is_infinite() && (self.is_one() || self.is_negative_one()) {
            return Self::nan();
        }
        if self.im == 0.0 && exp.im == 0.0 {
            let negative_fractional =
                self.re < 0.0 && exp.re.is_finite() && exp.re.fract() != 0.0;
            if !negative_fractional {
                return Self::real(self.re.powf(exp.re));
            }
        }
        Self::from_complex_chopped(self.to_complex().powc(exp.to_complex()))
    }

    /// Raises to an integer exponent.
    #[must_use]
    pub fn powi(&self, exp: i64) -> Self {
        self.pow(&Self::real(exp as f64))
    }

    /// Principal n-th root, except that odd roots of negative reals follow
    /// the real branch (`root(-8, 3) = -2`), matching the exact family.
    #[must_use]
    pub fn root(&self, n: i64) -> Self {
        if self.is_nan() || n == 0 {
            return Self::nan();
        }
        if n == 1 {
            return *self;
        }
        if n < 0 {
            return self.root(-n).inv();
        }
        if self.is_complex_infinity() {
            return Self::complex_infinity();
        }
        let degree = n as f64;
        if self.im == 0.0 {
            if self.re >= 0.0 {
                return Self::real(self.re.powf(1.0 / degree));
            }
            if n % 2 == 1 {
                return Self::real(-((-self.re).powf(1.0 / degree)));
            }
            // Even root of a negative infinity has no principal direction.
            if self.re.is_infinite() {
                return Self::complex_infinity();
            }
        }
        Self::from_complex_chopped(
            self.to_complex().powc(Complex64::new(1.0 / degree, 0.0)),
        )
    }

    /// Square root; negative reals give a pure machine imaginary.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.im == 0.0 {
            if self.re >= 0.0 {
                return Self::real(self.re.sqrt());
            }
            return Self::new(0.0, (-self.re).sqrt());
        }
        Self::from_complex_chopped(self.to_complex().sqrt())
    }

    /// Natural logarithm; negative and complex operands go through the
    /// complex branch.
    #[must_use]
    pub fn ln(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.im == 0.0 && self.re >= 0.0 {
            return Self::real(self.re.ln());
        }
        Self::from_complex_chopped(self.to_complex().ln())
    }

    /// Exponential.
    #[must_use]
    pub fn exp(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.im == 0.0 {
            return Self::real(self.re.exp());
        }
        Self::from_complex_chopped(self.to_complex().exp())
    }

    /// Absolute value (complex modulus).
    #[must_use]
    pub fn abs(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.im == 0.0 {
            return Self::real(self.re.abs());
        }
        Self::real(self.re.hypot(self.im))
    }

    /// Floor: NaN for non-real or non-finite values, identity when already
    /// integral.
    #[must_use]
    pub fn floor(&self) -> Self {
        self.rounded(f64::floor)
    }

    /// Ceiling: same domain policy as [`floor`](Self::floor).
    #[must_use]
    pub fn ceil(&self) -> Self {
        self.rounded(f64::ceil)
    }

    /// Nearest integer, ties away from zero: same domain policy as
    /// [`floor`](Self::floor).
    #[must_use]
    pub fn round(&self) -> Self {
        self.rounded(f64::round)
    }

    fn rounded(&self, op: fn(f64) -> f64) -> Self {
        if !self.is_real() || !self.re.is_finite() {
            return Self::nan();
        }
        if self.re.fract() == 0.0 {
            return *self;
        }
        Self::real(op(self.re))
    }

    /// Greatest common divisor; only meaningful for integral reals, any
    /// other operand pair yields 1, NaN propagates.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::nan();
        }
        let as_int = |v: &Self| -> Option<i64> {
            if v.is_real() && v.re.is_finite() && v.re.fract() == 0.0 && v.re.abs() <= i64::MAX as f64
            {
                Some(v.re as i64)
            } else {
                None
            }
        };
        match (as_int(self), as_int(other)) {
            (Some(a), Some(b)) => Self::real(crate::exact::gcd_i64(a, b) as f64),
            _ => Self::real(1.0),
        }
    }

    /// Ordering of real values; `None` for NaN or complex operands.
    #[must_use]
    pub fn cmp_real(&self, other: &Self) -> Option<Ordering> {
        if !self.is_real() || !other.is_real() {
            return None;
        }
        self.re.partial_cmp(&other.re)
    }
}

fn chop(x: f64) -> f64 {
    if x.abs() <= CHOP_TOLERANCE {
        0.0
    } else {
        x
    }
}

// Bit-pattern equality and hashing, so machine values can be interned;
// numeric comparison lives in `cmp_real` and `NumericValue::num_eq`.
impl PartialEq for MachineValue {
    fn eq(&self, other: &Self) -> bool {
        self.re.to_bits() == other.re.to_bits() && self.im.to_bits() == other.im.to_bits()
    }
}

impl Eq for MachineValue {}

impl Hash for MachineValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.re.to_bits());
        state.write_u64(self.im.to_bits());
    }
}

impl fmt::Debug for MachineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Machine({self})")
    }
}

impl fmt::Display for MachineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return write!(f, "NaN");
        }
        if self.is_complex_infinity() {
            return write!(f, "~oo");
        }
        if self.is_positive_infinity() {
            return write!(f, "PositiveInfinity");
        }
        if self.is_negative_infinity() {
            return write!(f, "NegativeInfinity");
        }
        if self.im == 0.0 {
            return write!(f, "{:?}", self.re);
        }
        let sign = if self.im < 0.0 { '-' } else { '+' };
        write!(f, "({:?} {} {:?}·i)", self.re, sign, self.im.abs())
    }
}
