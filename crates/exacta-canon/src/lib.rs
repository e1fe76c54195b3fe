//! # exacta-canon
//!
//! Power/Root canonicalization for the Exacta kernel.
//!
//! This crate provides:
//! - [`canonical_power`] / [`canonical_root`] — the ordered, first-match
//!   rule engine over (base, exponent) shapes
//! - [`pow`] / [`root`] — the same rules plus an explicit [`EvalMode`] that
//!   decides whether unevaluated results are forced to machine numbers
//!
//! ## Design Principles
//!
//! - **Rewrites before numbers**: algebraic identities apply first; the
//!   numeric tower is only consulted once both operands are literals
//! - **No errors**: unresolvable shapes fall through to an unevaluated
//!   `Pow`/`Root` node, which is a valid terminal form, never a failure
//! - **Explicit evaluation mode**: the approximation flag is an argument
//!   threaded through every recursive call, not hidden state

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod eval;
pub mod power;
pub mod root;

pub use power::{canonical_power, canonical_power_with, pow};
pub use root::{canonical_root, canonical_root_with, root};

/// Whether literal evaluation may produce floating approximations.
///
/// Passed by value through every recursive call, so a single top-level
/// request applies to every nested sub-expression: an approximate request
/// never leaves a numeric subtree unevaluated, and an exact request never
/// silently approximates an exact operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Evaluate only where exactness is preserved; otherwise keep a
    /// symbolic `Pow`/`Root` node.
    Exact,
    /// Force full numeric evaluation, degrading to machine values where
    /// no exact form exists.
    Approximate,
}

/// Configuration for the canonicalizer.
#[derive(Clone, Debug)]
pub struct CanonConfig {
    /// Maximum recursion depth over nested expression structure; deeper
    /// input falls through to unevaluated nodes instead of exhausting the
    /// stack.
    pub max_depth: usize,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}
