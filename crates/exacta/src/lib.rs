//! # Exacta
//!
//! The exact-arithmetic numeric kernel of a symbolic-computation engine.
//!
//! Exacta represents numbers — integers, rationals, quadratic radicals,
//! Gaussian integers, complex values — in forms that preserve mathematical
//! exactness through chains of operations, and degrades to floating or
//! arbitrary-precision approximation only when exactness cannot be
//! preserved.
//!
//! ## Features
//!
//! - **Exact numeric tower**: `rational × √radical (+ Gaussian i)`, a big
//!   rational overflow tier, and a machine complex fallback behind one
//!   closed sum type
//! - **Power/Root canonicalization**: an ordered algebraic rule engine that
//!   rewrites before it evaluates, with an explicit approximation mode
//! - **Lossless batched summation**: n-ary addition bucketed by radical
//! - **Round-trip literals**: every value serializes to a canonical form
//!   and parses back equal
//!
//! ## Quick Start
//!
//! ```rust
//! use exacta::prelude::*;
//!
//! let mut arena = ExprArena::new();
//! let base = arena.integer(75);
//! let root = canonical_root(&mut arena, base, 2);
//! // √75 canonicalizes to the exact value 5·√3
//! assert_eq!(arena.numeric_value(root), Some(&NumericValue::exact(5, 1, 3)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use exacta_canon as canon;
pub use exacta_core as core;
pub use exacta_num as num;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use exacta_canon::{
        canonical_power, canonical_root, pow, root, CanonConfig, EvalMode,
    };
    pub use exacta_core::{functions, Constant, ExprArena, ExprHandle, ExprNode};
    pub use exacta_num::{
        BigValue, ExactValue, MachineValue, NumericValue, ParseNumericError,
    };
}
