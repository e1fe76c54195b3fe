//! Recursive numeric evaluation for approximate mode.

use exacta_core::{functions, Constant, ExprArena, ExprHandle, ExprNode};
use exacta_num::NumericValue;

/// Depth bound for evaluation over nested structure.
const MAX_EVAL_DEPTH: usize = 256;

/// Evaluates an expression tree to a single numeric value, if every leaf
/// resolves to one. Symbols (and pathologically deep trees) yield `None`.
pub(crate) fn numeric_eval(arena: &ExprArena, handle: ExprHandle) -> Option<NumericValue> {
    numeric_eval_depth(arena, handle, 0)
}

fn numeric_eval_depth(
    arena: &ExprArena,
    handle: ExprHandle,
    depth: usize,
) -> Option<NumericValue> {
    if depth > MAX_EVAL_DEPTH {
        return None;
    }
    match arena.get(handle) {
        ExprNode::Number(v) => Some(v.clone()),
        ExprNode::Symbol(_) => None,
        ExprNode::Constant(Constant::E) => Some(NumericValue::machine_e()),
        ExprNode::Constant(Constant::Pi) => Some(NumericValue::machine_pi()),
        ExprNode::Neg(arg) => Some(numeric_eval_depth(arena, *arg, depth + 1)?.neg()),
        ExprNode::Add(args) => {
            let mut total = NumericValue::zero();
            for arg in args {
                total = total.add(&numeric_eval_depth(arena, *arg, depth + 1)?);
            }
            Some(total)
        }
        ExprNode::Mul(args) => {
            let mut product = NumericValue::one();
            for arg in args {
                product = product.mul(&numeric_eval_depth(arena, *arg, depth + 1)?);
            }
            Some(product)
        }
        ExprNode::Div { num, den } => {
            let num = numeric_eval_depth(arena, *num, depth + 1)?;
            let den = numeric_eval_depth(arena, *den, depth + 1)?;
            Some(num.div(&den))
        }
        ExprNode::Pow { base, exp } => {
            let base = numeric_eval_depth(arena, *base, depth + 1)?;
            let exp = numeric_eval_depth(arena, *exp, depth + 1)?;
            Some(base.pow(&exp))
        }
        ExprNode::Root { radicand, degree } => {
            let radicand = numeric_eval_depth(arena, *radicand, depth + 1)?;
            let degree = numeric_eval_depth(arena, *degree, depth + 1)?.to_i64()?;
            Some(radicand.root(degree))
        }
        ExprNode::Function { id, args } => {
            if args.len() != 1 {
                return None;
            }
            let arg = numeric_eval_depth(arena, args[0], depth + 1)?;
            apply_function(*id, &arg)
        }
    }
}

fn apply_function(id: u32, arg: &NumericValue) -> Option<NumericValue> {
    match id {
        functions::SQRT => Some(arg.sqrt()),
        functions::EXP => Some(arg.exp()),
        functions::LN => Some(arg.ln()),
        functions::ABS => Some(arg.abs()),
        functions::SIN | functions::COS | functions::TAN => {
            if arg.is_nan() {
                return Some(NumericValue::nan());
            }
            if !arg.is_real() {
                return None;
            }
            let x = arg.re();
            let value = match id {
                functions::SIN => x.sin(),
                functions::COS => x.cos(),
                _ => x.tan(),
            };
            Some(NumericValue::machine(value))
        }
        _ => None,
    }
}
