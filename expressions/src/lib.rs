//! Arithmetic expressions as graphs, with precedence-aware printing and a
//! memoized postorder fold.
//!
//! An expression is made of **terminals** (numbers and symbols) and binary
//! **operators** (`+`, `-`, `*`, `/`, and `^`).  A subexpression may be shared
//! by several parents, so an expression is a directed acyclic graph rather
//! than a strict tree.
//!
//! # Construction
//! The quickest way to build an expression is with a
//! [`Tree`](crate::context::Tree), which overloads the arithmetic operators
//! and wraps numeric literals on either side:
//! ```
//! use expressions::context::Tree;
//!
//! let x = Tree::symbol("x");
//! let t = 3 + x.clone() * 2;
//! assert_eq!(t.to_string(), "3 + x * 2");
//! let t = (x + 1).pow(2);
//! assert_eq!(t.to_string(), "(x + 1) ^ 2");
//! ```
//!
//! Expressions can also be constructed manually, using functions on a
//! [`Context`](crate::context::Context).  A context serves as an arena-style
//! allocator, handing out [`Node`](crate::context::Node) indices:
//! ```
//! use expressions::context::Context;
//!
//! let mut ctx = Context::new();
//! let x = ctx.symbol("x");
//! let y = ctx.symbol("y");
//! let sum = ctx.add(x, y)?;
//! let prod = ctx.mul(sum, 2)?;
//! assert_eq!(ctx.render(prod)?, "(x + y) * 2");
//! # Ok::<(), expressions::Error>(())
//! ```
//!
//! Trees and contexts are interchangeable:
//! [`Context::import`](crate::context::Context::import) and
//! [`Context::export`](crate::context::Context::export) convert between them
//! while preserving sharing.
//!
//! # Evaluation
//! This crate doesn't define what an expression _means_.  Instead,
//! [`Context::postorder`](crate::context::Context::postorder) folds a graph
//! into a value using a caller-supplied function, which is given each node
//! along with the results for its operands.  Shared nodes are evaluated once,
//! and traversal doesn't recurse on the stack, so very deep expressions are
//! fine.
//! ```
//! use std::collections::HashMap;
//! use expressions::context::{BinaryOpcode, Op, Tree};
//!
//! #[derive(Debug)]
//! enum EvalError {
//!     Unbound(String),
//!     Expr(expressions::Error),
//! }
//! impl From<expressions::Error> for EvalError {
//!     fn from(e: expressions::Error) -> Self {
//!         EvalError::Expr(e)
//!     }
//! }
//!
//! let vars = HashMap::from([("x", 2.0)]);
//! let t = (Tree::symbol("x") + 1).pow(2) / 3;
//! let v = t.postorder(|_, op, args: &[&f64]| match op {
//!     Op::Number(v) => Ok(v.to_f64()),
//!     Op::Symbol(s) => vars
//!         .get(&**s)
//!         .copied()
//!         .ok_or_else(|| EvalError::Unbound(s.to_string())),
//!     Op::Binary(op, ..) => {
//!         let (a, b) = (*args[0], *args[1]);
//!         Ok(match op {
//!             BinaryOpcode::Add => a + b,
//!             BinaryOpcode::Sub => a - b,
//!             BinaryOpcode::Mul => a * b,
//!             BinaryOpcode::Div => a / b,
//!             BinaryOpcode::Pow => a.powf(b),
//!         })
//!     }
//! })?;
//! assert_eq!(v, 3.0);
//! # Ok::<(), EvalError>(())
//! ```
#![warn(missing_docs)]

pub mod context;

mod error;
pub use error::Error;
