//! Power canonicalization.
//!
//! [`canonical_power`] walks an ordered rule list over the shapes of base
//! and exponent; the first matching rule wins. Algebraic rewrites come
//! before numeric evaluation, and the numeric tower is consulted only when
//! both operands are literals.

use exacta_core::{functions, Constant, ExprArena, ExprHandle, ExprNode};
use exacta_num::NumericValue;

use crate::eval::numeric_eval;
use crate::root::canonical_root_depth;
use crate::{CanonConfig, EvalMode};

/// Canonicalizes `base ^ exp` with the default configuration.
pub fn canonical_power(arena: &mut ExprArena, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
    canonical_power_with(arena, base, exp, &CanonConfig::default())
}

/// Canonicalizes `base ^ exp` under an explicit configuration.
pub fn canonical_power_with(
    arena: &mut ExprArena,
    base: ExprHandle,
    exp: ExprHandle,
    config: &CanonConfig,
) -> ExprHandle {
    canonical_power_depth(arena, base, exp, config, 0)
}

/// Canonicalizes and then, in approximate mode, forces the result down to a
/// machine number wherever every leaf is numeric.
pub fn pow(
    arena: &mut ExprArena,
    base: ExprHandle,
    exp: ExprHandle,
    mode: EvalMode,
) -> ExprHandle {
    let canonical = canonical_power(arena, base, exp);
    match mode {
        EvalMode::Exact => canonical,
        EvalMode::Approximate => match numeric_eval(arena, canonical) {
            Some(value) => arena.number(value),
            None => canonical,
        },
    }
}

pub(crate) fn canonical_power_depth(
    arena: &mut ExprArena,
    base: ExprHandle,
    exp: ExprHandle,
    config: &CanonConfig,
    depth: usize,
) -> ExprHandle {
    if depth > config.max_depth {
        return unevaluated_pow(arena, base, exp);
    }
    let next = depth + 1;

    // x^a ^ b → x^(a·b)
    if let ExprNode::Pow { base: x, exp: a } = *arena.get(base) {
        let product = mul_expr(arena, a, exp);
        return canonical_power_depth(arena, x, product, config, next);
    }

    // (x/y)^b for negative numeric b → y^(-b) / x^(-b); distributing the
    // flip only for negative exponents avoids needless normalization churn.
    if let ExprNode::Div { num, den } = *arena.get(base) {
        let negative = arena
            .numeric_value(exp)
            .is_some_and(|b| matches!(b.sgn(), Some(s) if s < 0));
        if negative {
            let flipped = arena.numeric_value(exp).map(NumericValue::neg);
            let flipped = arena.number(flipped.unwrap_or_else(NumericValue::nan));
            let new_num = canonical_power_depth(arena, den, flipped, config, next);
            let new_den = canonical_power_depth(arena, num, flipped, config, next);
            return build_div(arena, new_num, new_den);
        }
    }

    let base_num = arena.numeric_value(base).cloned();
    let exp_num = arena.numeric_value(exp).cloned();

    // 0^0, 0^±n, 0^±∞ — the numeric tower owns the zero-base policy.
    if let Some(b) = &base_num {
        if b.is_zero() {
            if let Some(e) = &exp_num {
                return arena.number(b.pow(e));
            }
        }
    }

    // a^0 → 1 for finite a, NaN otherwise. A symbolic base stands for a
    // finite quantity (infinities are literals), so it collapses to 1 too.
    if let Some(e) = &exp_num {
        if e.is_zero() {
            if let Some(b) = &base_num {
                return arena.number(b.pow(e));
            }
            return arena.number(NumericValue::one());
        }
    }

    // 1^b → 1, except 1^±∞ which oscillates.
    if let Some(b) = &base_num {
        if b.is_one() {
            if let Some(e) = &exp_num {
                return arena.number(b.pow(e));
            }
            return base;
        }
    }

    // b^1 → b unchanged.
    if let Some(e) = &exp_num {
        if e.is_one() {
            return base;
        }
    }

    // a^-1 → a⁻¹ for numeric a; the tower special-cases ±∞ and ±1.
    if let Some(e) = &exp_num {
        if e.is_negative_one() {
            if let Some(b) = &base_num {
                return arena.number(b.inv());
            }
        }
    }

    // Infinite exponents and infinite bases: the numeric special table
    // (thresholds on |a|, parity of the exponent, sign of Re) decides.
    if let (Some(b), Some(e)) = (&base_num, &exp_num) {
        if !b.is_finite() || !e.is_finite() {
            return arena.number(b.pow(e));
        }
    }

    if matches!(arena.get(base), ExprNode::Constant(Constant::E)) {
        // e^±∞ short-circuits ahead of the general rules.
        if let Some(e) = &exp_num {
            if e.is_positive_infinity() {
                return arena.number(NumericValue::infinity());
            }
            if e.is_negative_infinity() {
                return arena.number(NumericValue::zero());
            }
        }
        // Euler's formula: e^(i·θ) → cos θ + i·sin θ.
        if let Some(theta) = imaginary_factor(arena, exp) {
            let cos = arena.function(functions::COS, [theta]);
            let sin = arena.function(functions::SIN, [theta]);
            mark_if(arena, cos, &[theta]);
            mark_if(arena, sin, &[theta]);
            let i = arena.number(NumericValue::exact_gaussian(0, 1));
            let imaginary = arena.mul([sin, i]);
            mark_if(arena, imaginary, &[sin]);
            let result = arena.add([cos, imaginary]);
            mark_if(arena, result, &[cos, imaginary]);
            return result;
        }
    }

    // (-x)^n → x^n for even n, -(x^n) for odd n.
    if let ExprNode::Neg(x) = *arena.get(base) {
        if let Some(n) = exp_num.as_ref().and_then(NumericValue::to_i64) {
            let power = canonical_power_depth(arena, x, exp, config, next);
            return if n % 2 == 0 {
                power
            } else {
                neg_expr(arena, power)
            };
        }
    }

    // √x^2 → x; √x^even → x^(n/2); √x^odd → √(x^n).
    if let ExprNode::Function { id: functions::SQRT, args } = arena.get(base) {
        let x = args[0];
        if let Some(n) = exp_num.as_ref().and_then(NumericValue::to_i64) {
            if n == 2 {
                return x;
            }
            if n % 2 == 0 {
                let half = arena.number(NumericValue::integer(n / 2));
                return canonical_power_depth(arena, x, half, config, next);
            }
            let power = canonical_power_depth(arena, x, exp, config, next);
            return canonical_root_depth(arena, power, 2, config, next);
        }
    }

    // exp(x)^b → e^(x·b).
    if let ExprNode::Function { id: functions::EXP, args } = arena.get(base) {
        let x = args[0];
        let product = mul_expr(arena, x, exp);
        let e = arena.constant(Constant::E);
        return canonical_power_depth(arena, e, product, config, next);
    }

    // (x·y·…)^b → x^b · y^b · …
    if let ExprNode::Mul(args) = arena.get(base).clone() {
        let factors: Vec<ExprHandle> = args
            .iter()
            .map(|&factor| canonical_power_depth(arena, factor, exp, config, next))
            .collect();
        return build_mul(arena, &factors);
    }

    // Root(x, n)^b → x^(b/n).
    if let ExprNode::Root { radicand, degree } = *arena.get(base) {
        let quotient = div_expr(arena, exp, degree);
        return canonical_power_depth(arena, radicand, quotient, config, next);
    }

    // x^(1/q) → Root(x, q).
    if let Some(e) = &exp_num {
        if let Some(exact) = e.as_exact() {
            if exact.is_rational() && exact.numerator() == 1 && exact.denominator() > 1 {
                return canonical_root_depth(arena, base, exact.denominator(), config, next);
            }
        }
    }

    // Literal base, literal exponent: delegate to the tower. Integer
    // exponents always evaluate (exactness-aware promotion included);
    // otherwise evaluation happens only when nothing exact would be lost.
    if let (Some(b), Some(e)) = (&base_num, &exp_num) {
        if e.to_i64().is_some() {
            return arena.number(b.pow(e));
        }
        if matches!(b, NumericValue::Machine(_)) || matches!(e, NumericValue::Machine(_)) {
            return arena.number(b.pow(e));
        }
        let value = b.pow(e);
        if value.is_exact_family() {
            return arena.number(value);
        }
    }

    unevaluated_pow(arena, base, exp)
}

/// Fall-through: an unevaluated `Pow`, canonical iff both operands were.
fn unevaluated_pow(arena: &mut ExprArena, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
    let node = arena.pow(base, exp);
    mark_if(arena, node, &[base, exp]);
    node
}

/// Marks `node` canonical when every part is.
fn mark_if(arena: &mut ExprArena, node: ExprHandle, parts: &[ExprHandle]) {
    if parts.iter().all(|&p| arena.is_canonical(p)) {
        arena.mark_canonical(node);
    }
}

/// Product of two expressions, folding numeric literals.
fn mul_expr(arena: &mut ExprArena, a: ExprHandle, b: ExprHandle) -> ExprHandle {
    let left = arena.numeric_value(a).cloned();
    let right = arena.numeric_value(b).cloned();
    match (left, right) {
        (Some(x), Some(y)) => arena.number(x.mul(&y)),
        (Some(x), None) if x.is_one() => b,
        (None, Some(y)) if y.is_one() => a,
        _ => {
            let node = arena.mul([a, b]);
            mark_if(arena, node, &[a, b]);
            node
        }
    }
}

/// Quotient of two expressions, folding numeric literals.
fn div_expr(arena: &mut ExprArena, num: ExprHandle, den: ExprHandle) -> ExprHandle {
    let left = arena.numeric_value(num).cloned();
    let right = arena.numeric_value(den).cloned();
    match (left, right) {
        (Some(x), Some(y)) => arena.number(x.div(&y)),
        (None, Some(y)) if y.is_one() => num,
        _ => build_div(arena, num, den),
    }
}

fn build_div(arena: &mut ExprArena, num: ExprHandle, den: ExprHandle) -> ExprHandle {
    let node = arena.div(num, den);
    mark_if(arena, node, &[num, den]);
    node
}

fn build_mul(arena: &mut ExprArena, factors: &[ExprHandle]) -> ExprHandle {
    let mut product = NumericValue::one();
    let mut all_numeric = true;
    for &factor in factors {
        match arena.numeric_value(factor) {
            Some(v) => product = product.mul(v),
            None => {
                all_numeric = false;
                break;
            }
        }
    }
    if all_numeric {
        return arena.number(product);
    }
    let node = arena.mul(factors.iter().copied());
    mark_if(arena, node, factors);
    node
}

/// Negation of an expression, folding numeric literals.
fn neg_expr(arena: &mut ExprArena, arg: ExprHandle) -> ExprHandle {
    if let Some(v) = arena.numeric_value(arg).cloned() {
        return arena.number(v.neg());
    }
    let node = arena.neg(arg);
    mark_if(arena, node, &[arg]);
    node
}

/// Extracts θ from an exponent of the shape `i·θ`: either a pure-imaginary
/// literal, or a `Mul` containing one.
fn imaginary_factor(arena: &mut ExprArena, exp: ExprHandle) -> Option<ExprHandle> {
    let pure_imaginary = |v: &NumericValue| -> Option<NumericValue> {
        if v.is_nan() || v.re() != 0.0 {
            return None;
        }
        match v.as_exact() {
            Some(e) if e.imag() != 0 => Some(NumericValue::integer(e.imag())),
            Some(_) => None,
            None => {
                let im = v.im();
                (im != 0.0 && im.is_finite()).then(|| NumericValue::machine(im))
            }
        }
    };

    match arena.get(exp).clone() {
        ExprNode::Number(v) => {
            let scale = pure_imaginary(&v)?;
            Some(arena.number(scale))
        }
        ExprNode::Mul(args) => {
            let at = args
                .iter()
                .position(|&a| arena.numeric_value(a).and_then(|v| pure_imaginary(v)).is_some())?;
            let scale = arena
                .numeric_value(args[at])
                .and_then(|v| pure_imaginary(v))?;
            let mut rest: Vec<ExprHandle> = args
                .iter()
                .enumerate()
                .filter(|&(index, _)| index != at)
                .map(|(_, &h)| h)
                .collect();
            if !scale.is_one() {
                let scale = arena.number(scale);
                rest.insert(0, scale);
            }
            match rest.len() {
                0 => Some(arena.number(NumericValue::one())),
                1 => Some(rest[0]),
                _ => {
                    let node = arena.mul(rest.clone());
                    mark_if(arena, node, &rest);
                    Some(node)
                }
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exacta_num::NumericValue;

    fn assert_number(arena: &ExprArena, handle: ExprHandle, expected: &NumericValue) {
        let value = arena
            .numeric_value(handle)
            .unwrap_or_else(|| panic!("expected a numeric result, got {:?}", arena.get(handle)));
        assert_eq!(value, expected);
    }

    #[test]
    fn zero_base_table() {
        let mut arena = ExprArena::new();
        let zero = arena.integer(0);
        let h = canonical_power(&mut arena, zero, zero);
        assert!(arena.numeric_value(h).expect("numeric").is_nan());

        let three = arena.integer(3);
        let h = canonical_power(&mut arena, zero, three);
        assert_number(&arena, h, &NumericValue::zero());

        let inf = arena.number(NumericValue::infinity());
        let h = canonical_power(&mut arena, zero, inf);
        assert_number(&arena, h, &NumericValue::zero());

        let neg_inf = arena.number(NumericValue::neg_infinity());
        let h = canonical_power(&mut arena, zero, neg_inf);
        assert!(arena.numeric_value(h).expect("numeric").is_complex_infinity());
    }

    #[test]
    fn exponent_zero_and_one() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let zero = arena.integer(0);
        let one = arena.integer(1);

        let h = canonical_power(&mut arena, x, one);
        assert_eq!(h, x, "b^1 returns the base unchanged");

        let h = canonical_power(&mut arena, x, zero);
        assert_number(&arena, h, &NumericValue::one());

        let inf = arena.number(NumericValue::infinity());
        let h = canonical_power(&mut arena, inf, zero);
        assert!(arena.numeric_value(h).expect("numeric").is_nan());
    }

    #[test]
    fn one_to_infinity_oscillates() {
        let mut arena = ExprArena::new();
        let one = arena.integer(1);
        let x = arena.symbol("x");
        let inf = arena.number(NumericValue::infinity());

        assert_eq!(canonical_power(&mut arena, one, x), one);
        let h = canonical_power(&mut arena, one, inf);
        assert!(arena.numeric_value(h).expect("numeric").is_nan());
    }

    #[test]
    fn negative_one_exponent_inverts() {
        let mut arena = ExprArena::new();
        let neg_one = arena.integer(-1);
        let two = arena.integer(2);
        let h = canonical_power(&mut arena, two, neg_one);
        assert_number(&arena, h, &NumericValue::rational(1, 2));

        let inf = arena.number(NumericValue::infinity());
        let h = canonical_power(&mut arena, inf, neg_one);
        assert_number(&arena, h, &NumericValue::machine(0.0));

        let h = canonical_power(&mut arena, neg_one, neg_one);
        assert_number(&arena, h, &NumericValue::integer(-1));
    }

    #[test]
    fn negative_one_to_infinity_is_nan() {
        let mut arena = ExprArena::new();
        let neg_one = arena.integer(-1);
        let inf = arena.number(NumericValue::infinity());
        let h = canonical_power(&mut arena, neg_one, inf);
        assert!(arena.numeric_value(h).expect("numeric").is_nan());
    }

    #[test]
    fn pow_base_folds_exponents() {
        // (x^2)^3 → x^6
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let three = arena.integer(3);
        let inner = arena.pow(x, two);
        let h = canonical_power(&mut arena, inner, three);
        let ExprNode::Pow { base, exp } = *arena.get(h) else {
            panic!("expected an unevaluated power");
        };
        assert_eq!(base, x);
        assert_number(&arena, exp, &NumericValue::integer(6));
    }

    #[test]
    fn divide_base_flips_for_negative_exponents() {
        // (x/y)^-2 → y^2 / x^2
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let quotient = arena.div(x, y);
        let neg_two = arena.integer(-2);
        let h = canonical_power(&mut arena, quotient, neg_two);
        let ExprNode::Div { num, den } = *arena.get(h) else {
            panic!("expected a division");
        };
        let ExprNode::Pow { base: nb, .. } = *arena.get(num) else {
            panic!("numerator should be y^2");
        };
        let ExprNode::Pow { base: db, .. } = *arena.get(den) else {
            panic!("denominator should be x^2");
        };
        assert_eq!(nb, y);
        assert_eq!(db, x);
    }

    #[test]
    fn euler_formula() {
        // e^(i·θ) → cos θ + sin θ · i
        let mut arena = ExprArena::new();
        let e = arena.constant(Constant::E);
        let theta = arena.symbol("θ");
        let i = arena.number(NumericValue::exact_gaussian(0, 1));
        let exponent = arena.mul([i, theta]);
        let h = canonical_power(&mut arena, e, exponent);
        let ExprNode::Add(terms) = arena.get(h).clone() else {
            panic!("expected cos θ + sin θ · i");
        };
        assert_eq!(terms.len(), 2);
        let ExprNode::Function { id, args } = arena.get(terms[0]) else {
            panic!("first term should be cos");
        };
        assert_eq!(*id, functions::COS);
        assert_eq!(args[0], theta);
    }

    #[test]
    fn e_to_infinity() {
        let mut arena = ExprArena::new();
        let e = arena.constant(Constant::E);
        let inf = arena.number(NumericValue::infinity());
        let h = canonical_power(&mut arena, e, inf);
        assert!(arena
            .numeric_value(h)
            .expect("numeric")
            .is_positive_infinity());

        let neg_inf = arena.number(NumericValue::neg_infinity());
        let h = canonical_power(&mut arena, e, neg_inf);
        assert_number(&arena, h, &NumericValue::zero());
    }

    #[test]
    fn negated_base_parity() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let neg_x = arena.neg(x);
        let two = arena.integer(2);
        let three = arena.integer(3);

        // (-x)^2 → x^2
        let h = canonical_power(&mut arena, neg_x, two);
        let ExprNode::Pow { base, .. } = *arena.get(h) else {
            panic!("expected x^2");
        };
        assert_eq!(base, x);

        // (-x)^3 → -(x^3)
        let h = canonical_power(&mut arena, neg_x, three);
        assert!(matches!(arena.get(h), ExprNode::Neg(_)));
    }

    #[test]
    fn sqrt_base_rules() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let sqrt_x = arena.function(functions::SQRT, [x]);

        // √x^2 → x
        let two = arena.integer(2);
        assert_eq!(canonical_power(&mut arena, sqrt_x, two), x);

        // √x^4 → x^2
        let four = arena.integer(4);
        let h = canonical_power(&mut arena, sqrt_x, four);
        let ExprNode::Pow { base, exp } = *arena.get(h) else {
            panic!("expected x^2");
        };
        assert_eq!(base, x);
        assert_number(&arena, exp, &NumericValue::integer(2));

        // √x^3 → √(x^3)
        let three = arena.integer(3);
        let h = canonical_power(&mut arena, sqrt_x, three);
        let ExprNode::Function { id, args } = arena.get(h) else {
            panic!("expected a square root");
        };
        assert_eq!(*id, functions::SQRT);
        assert!(matches!(arena.get(args[0]), ExprNode::Pow { .. }));
    }

    #[test]
    fn exp_base_becomes_e_power() {
        // exp(x)^2 → e^(x·2) stays an unevaluated power of e
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let exp_x = arena.function(functions::EXP, [x]);
        let two = arena.integer(2);
        let h = canonical_power(&mut arena, exp_x, two);
        let ExprNode::Pow { base, .. } = *arena.get(h) else {
            panic!("expected e^(x·2)");
        };
        assert!(matches!(arena.get(base), ExprNode::Constant(Constant::E)));
    }

    #[test]
    fn product_base_distributes() {
        // (x·y)^2 → x^2 · y^2
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let product = arena.mul([x, y]);
        let two = arena.integer(2);
        let h = canonical_power(&mut arena, product, two);
        let ExprNode::Mul(factors) = arena.get(h).clone() else {
            panic!("expected a distributed product");
        };
        assert_eq!(factors.len(), 2);
        assert!(matches!(arena.get(factors[0]), ExprNode::Pow { .. }));
        assert!(matches!(arena.get(factors[1]), ExprNode::Pow { .. }));
    }

    #[test]
    fn root_base_becomes_fractional_power() {
        // Root(x, 3)^6 → x^2
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let three = arena.integer(3);
        let root = arena.root(x, three);
        let six = arena.integer(6);
        let h = canonical_power(&mut arena, root, six);
        let ExprNode::Pow { base, exp } = *arena.get(h) else {
            panic!("expected x^2");
        };
        assert_eq!(base, x);
        assert_number(&arena, exp, &NumericValue::integer(2));
    }

    #[test]
    fn unit_fraction_exponent_becomes_root() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let half = arena.number(NumericValue::rational(1, 2));
        let h = canonical_power(&mut arena, x, half);
        let ExprNode::Function { id, args } = arena.get(h) else {
            panic!("expected √x");
        };
        assert_eq!(*id, functions::SQRT);
        assert_eq!(args[0], x);

        let fifth = arena.number(NumericValue::rational(1, 5));
        let h = canonical_power(&mut arena, x, fifth);
        assert!(matches!(arena.get(h), ExprNode::Root { .. }));
    }

    #[test]
    fn numeric_delegation_keeps_exactness() {
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let ten = arena.integer(10);
        let h = canonical_power(&mut arena, two, ten);
        assert_number(&arena, h, &NumericValue::integer(1024));

        // 2^10000 promotes to the big family instead of overflowing.
        let huge = arena.integer(10_000);
        let h = canonical_power(&mut arena, two, huge);
        let value = arena.numeric_value(h).expect("numeric");
        assert!(matches!(value, NumericValue::Big(_)));
    }

    #[test]
    fn exact_mode_leaves_irrational_powers_symbolic() {
        // 2^(2/3) has no exact form: stays an unevaluated power.
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let two_thirds = arena.number(NumericValue::rational(2, 3));
        let h = canonical_power(&mut arena, two, two_thirds);
        assert!(matches!(arena.get(h), ExprNode::Pow { .. }));
        assert!(arena.is_canonical(h));

        // 4^(3/2) = 8 exactly, so it does evaluate.
        let four = arena.integer(4);
        let three_halves = arena.number(NumericValue::rational(3, 2));
        let h = canonical_power(&mut arena, four, three_halves);
        assert_number(&arena, h, &NumericValue::integer(8));
    }

    #[test]
    fn approximate_mode_forces_evaluation() {
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let two_thirds = arena.number(NumericValue::rational(2, 3));
        let h = pow(&mut arena, two, two_thirds, EvalMode::Approximate);
        let value = arena.numeric_value(h).expect("approximate mode evaluates");
        assert!((value.re() - 2f64.powf(2.0 / 3.0)).abs() < 1e-12);

        // A symbolic base stays symbolic even in approximate mode.
        let x = arena.symbol("x");
        let h = pow(&mut arena, x, two_thirds, EvalMode::Approximate);
        assert!(matches!(arena.get(h), ExprNode::Pow { .. }));
    }

    #[test]
    fn approximate_mode_reaches_nested_subexpressions() {
        // (√2 · √3)^2: distribution leaves numeric powers; approximate mode
        // must evaluate the whole tree, not just the top node.
        let mut arena = ExprArena::new();
        let sqrt2 = arena.number(NumericValue::exact(1, 1, 2));
        let sqrt3 = arena.number(NumericValue::exact(1, 1, 3));
        let product = arena.mul([sqrt2, sqrt3]);
        let two = arena.integer(2);
        let h = pow(&mut arena, product, two, EvalMode::Approximate);
        let value = arena.numeric_value(h).expect("fully evaluated");
        assert!((value.re() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn fallthrough_preserves_canonical_flag() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let h = canonical_power(&mut arena, x, y);
        assert!(matches!(arena.get(h), ExprNode::Pow { .. }));
        assert!(arena.is_canonical(h), "canonical operands give a canonical node");
    }

    #[test]
    fn depth_bound_falls_through() {
        // A pathologically nested Pow tower stops rewriting instead of
        // exhausting the stack.
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let mut tower = x;
        for _ in 0..600 {
            tower = arena.pow(tower, two);
        }
        let config = CanonConfig { max_depth: 64 };
        let h = canonical_power_with(&mut arena, tower, two, &config);
        assert!(matches!(arena.get(h), ExprNode::Pow { .. }));
    }
}
