//! Arena allocator for expression storage.
//!
//! All expressions live contiguously in a `Vec` with hash-consing, so each
//! structurally unique expression is stored exactly once. The arena also
//! tracks, per node, whether the expression is known canonical: atoms are
//! born canonical, compound nodes are marked by the canonicalizer.

use hashbrown::HashMap;
use smallvec::SmallVec;

use exacta_num::NumericValue;

use crate::expr::{Constant, ExprHandle, ExprNode, FunctionId};

/// The main arena for storing expressions.
#[derive(Debug, Default)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Per-node canonical flag, parallel to `nodes`.
    canonical: Vec<bool>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol table: maps symbol names to their IDs.
    symbols: HashMap<String, u32>,
    /// Reverse symbol table for display.
    symbol_names: Vec<String>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    /// Atoms are marked canonical on creation.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "arena capacity exceeded");

        let handle = ExprHandle::new(index as u32);
        self.canonical.push(node.is_atom());
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// The numeric literal behind a handle, if it is one.
    #[must_use]
    pub fn numeric_value(&self, handle: ExprHandle) -> Option<&NumericValue> {
        match self.get(handle) {
            ExprNode::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the expression behind `handle` is known canonical.
    #[must_use]
    pub fn is_canonical(&self, handle: ExprHandle) -> bool {
        self.canonical[handle.index() as usize]
    }

    /// Marks the expression behind `handle` as canonical.
    pub fn mark_canonical(&mut self, handle: ExprHandle) {
        self.canonical[handle.index() as usize] = true;
    }

    /// Interns a symbol, returning its unique ID.
    pub fn intern_symbol(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.symbols.get(name) {
            return id;
        }

        let id = self.symbol_names.len() as u32;
        self.symbols.insert(name.to_string(), id);
        self.symbol_names.push(name.to_string());
        id
    }

    /// Gets the name of a symbol by its ID.
    #[must_use]
    pub fn symbol_name(&self, id: u32) -> Option<&str> {
        self.symbol_names.get(id as usize).map(String::as_str)
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Convenience constructors ===

    /// Creates a numeric literal expression.
    pub fn number(&mut self, value: NumericValue) -> ExprHandle {
        self.intern(ExprNode::Number(value))
    }

    /// Creates an integer literal expression.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.number(NumericValue::integer(value))
    }

    /// Creates a symbol expression.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates a constant expression.
    pub fn constant(&mut self, constant: Constant) -> ExprHandle {
        self.intern(ExprNode::Constant(constant))
    }

    /// Creates an addition expression.
    pub fn add(&mut self, args: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let args: SmallVec<[ExprHandle; 4]> = args.into_iter().collect();
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Add(args))
    }

    /// Creates a multiplication expression.
    pub fn mul(&mut self, args: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let args: SmallVec<[ExprHandle; 4]> = args.into_iter().collect();
        if args.len() == 1 {
            return args[0];
        }
        self.intern(ExprNode::Mul(args))
    }

    /// Creates a power expression.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Pow { base, exp })
    }

    /// Creates a negation expression.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Neg(arg))
    }

    /// Creates a division expression.
    pub fn div(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Div { num, den })
    }

    /// Creates an n-th root expression.
    pub fn root(&mut self, radicand: ExprHandle, degree: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Root { radicand, degree })
    }

    /// Creates a function application.
    pub fn function(
        &mut self,
        id: FunctionId,
        args: impl IntoIterator<Item = ExprHandle>,
    ) -> ExprHandle {
        self.intern(ExprNode::Function {
            id,
            args: args.into_iter().collect(),
        })
    }
}
