//! Root canonicalization.
//!
//! `canonical_root(a, n)` resolves `a^(1/n)`: degree 1 is the radicand
//! itself, numeric radicands take an exact n-th root where one exists, and
//! everything else stays symbolic — a `Sqrt` function node for degree 2, an
//! unevaluated `Root` node otherwise.

use exacta_core::{functions, ExprArena, ExprHandle};
use exacta_num::NumericValue;

use crate::eval::numeric_eval;
use crate::{CanonConfig, EvalMode};

/// Canonicalizes `radicand^(1/degree)` with the default configuration.
pub fn canonical_root(arena: &mut ExprArena, radicand: ExprHandle, degree: i64) -> ExprHandle {
    canonical_root_with(arena, radicand, degree, &CanonConfig::default())
}

/// Canonicalizes `radicand^(1/degree)` under an explicit configuration.
pub fn canonical_root_with(
    arena: &mut ExprArena,
    radicand: ExprHandle,
    degree: i64,
    config: &CanonConfig,
) -> ExprHandle {
    canonical_root_depth(arena, radicand, degree, config, 0)
}

/// Canonicalizes and then, in approximate mode, forces the result down to a
/// machine number wherever every leaf is numeric.
pub fn root(
    arena: &mut ExprArena,
    radicand: ExprHandle,
    degree: i64,
    mode: EvalMode,
) -> ExprHandle {
    let canonical = canonical_root(arena, radicand, degree);
    match mode {
        EvalMode::Exact => canonical,
        EvalMode::Approximate => match numeric_eval(arena, canonical) {
            Some(value) => arena.number(value),
            None => canonical,
        },
    }
}

pub(crate) fn canonical_root_depth(
    arena: &mut ExprArena,
    radicand: ExprHandle,
    degree: i64,
    config: &CanonConfig,
    depth: usize,
) -> ExprHandle {
    if degree == 0 {
        return arena.number(NumericValue::nan());
    }
    if degree == 1 {
        return radicand;
    }
    if depth > config.max_depth || degree == i64::MIN {
        return unevaluated_root(arena, radicand, degree);
    }
    if degree < 0 {
        // a^(-1/n) = 1 / a^(1/n)
        let positive = canonical_root_depth(arena, radicand, -degree, config, depth + 1);
        let one = arena.integer(1);
        let node = arena.div(one, positive);
        if arena.is_canonical(positive) {
            arena.mark_canonical(node);
        }
        return node;
    }

    if let Some(value) = arena.numeric_value(radicand).cloned() {
        // An inexact radicand has no exactness to protect: evaluate.
        if matches!(value, NumericValue::Machine(_)) {
            return arena.number(value.root(degree));
        }
        let rooted = value.root(degree);
        if rooted.is_exact_family() {
            return arena.number(rooted);
        }
    }

    if degree == 2 {
        let node = arena.function(functions::SQRT, [radicand]);
        if arena.is_canonical(radicand) {
            arena.mark_canonical(node);
        }
        return node;
    }
    unevaluated_root(arena, radicand, degree)
}

fn unevaluated_root(arena: &mut ExprArena, radicand: ExprHandle, degree: i64) -> ExprHandle {
    let degree = arena.number(NumericValue::integer(degree));
    let node = arena.root(radicand, degree);
    if arena.is_canonical(radicand) {
        arena.mark_canonical(node);
    }
    node
}
