//! Infrastructure for representing arithmetic expressions as graphs
mod indexed;
mod literal;
mod number;
mod op;
mod postorder;
mod print;
mod tree;

use indexed::{IndexVec, define_index};
pub use literal::Literal;
pub use number::Number;
pub use op::{BinaryOpcode, Op, TERMINAL_PRECEDENCE};
pub use tree::{Tree, TreeOp, pow};

use crate::Error;

use std::collections::HashMap;
use std::sync::Arc;

define_index!(Node, "An index in the `Context::ops` arena");

/// A `Context` holds a set of expression nodes.
///
/// It should be used like an arena allocator: it grows over time, then frees
/// all of its contents when dropped.
///
/// Nodes are never deduplicated, so each [`Node`] handle is a distinct
/// identity; the same handle may be used as an operand by several parents.
/// Operands are always inserted before the nodes that use them, so a
/// `Context` can't contain cycles.
#[derive(Debug, Default)]
pub struct Context {
    ops: IndexVec<Op, Node>,
}

static_assertions::assert_impl_all!(Context: Send, Sync);
static_assertions::assert_impl_all!(Tree: Send, Sync);

impl Context {
    /// Build a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the context
    ///
    /// All [`Node`] handles from this context are invalidated.
    ///
    /// ```
    /// # use expressions::context::Context;
    /// let mut ctx = Context::new();
    /// let x = ctx.symbol("x");
    /// ctx.clear();
    /// assert!(ctx.render(x).is_err());
    /// ```
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Returns the number of [`Op`] nodes in the context
    ///
    /// ```
    /// # use expressions::context::Context;
    /// let mut ctx = Context::new();
    /// let x = ctx.symbol("x");
    /// assert_eq!(ctx.len(), 1);
    /// let sum = ctx.add(x, 1)?;
    /// assert_eq!(ctx.len(), 3); // x, 1, and (x + 1)
    /// # Ok::<(), expressions::Error>(())
    /// ```
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Checks whether the context is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Checks whether the given [`Node`] is valid in this context
    fn check_node(&self, node: Node) -> Result<(), Error> {
        self.get_op(node).ok_or(Error::BadNode).map(|_| ())
    }

    /// Looks up an operation by `Node` handle
    pub fn get_op(&self, node: Node) -> Option<&Op> {
        self.ops.get(node)
    }

    /// Iterates over every node handle in the context, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = Node> + use<> {
        self.ops.keys()
    }

    /// Returns the printing precedence of the given node
    pub fn precedence(&self, node: Node) -> Result<u8, Error> {
        self.get_op(node).map(Op::precedence).ok_or(Error::BadNode)
    }

    /// Looks up the value associated with the given node.
    ///
    /// If the node is invalid for this context, returns an error; if the node
    /// is not a number, returns `Ok(None)`.
    pub fn number_value(&self, n: Node) -> Result<Option<Number>, Error> {
        match self.get_op(n) {
            Some(Op::Number(c)) => Ok(Some(*c)),
            Some(_) => Ok(None),
            None => Err(Error::BadNode),
        }
    }

    /// Looks up the name associated with the given node.
    ///
    /// If the node is invalid for this context, returns an error; if the node
    /// is not a symbol, returns `Ok(None)`.
    pub fn symbol_name(&self, n: Node) -> Result<Option<&str>, Error> {
        match self.get_op(n) {
            Some(Op::Symbol(s)) => Ok(Some(s)),
            Some(_) => Ok(None),
            None => Err(Error::BadNode),
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    // Terminals
    /// Returns a new node representing the given number
    /// ```
    /// # use expressions::context::{Context, Number};
    /// # let mut ctx = Context::new();
    /// let v = ctx.number(3);
    /// assert_eq!(ctx.number_value(v).unwrap(), Some(Number::Int(3)));
    /// ```
    pub fn number<N: Into<Number>>(&mut self, v: N) -> Node {
        self.ops.push(Op::Number(v.into()))
    }

    /// Returns a new node representing the given symbol
    ///
    /// Calling this twice with the same name returns two distinct nodes.
    pub fn symbol(&mut self, name: &str) -> Node {
        self.ops.push(Op::Symbol(name.into()))
    }

    /// Returns a new number node, checking the type of the given value
    ///
    /// ```
    /// # use expressions::{Error, context::Context};
    /// let mut ctx = Context::new();
    /// assert!(ctx.try_number(1.5).is_ok());
    /// assert!(matches!(
    ///     ctx.try_number("x"),
    ///     Err(Error::InvalidTerminal { found: "str", .. })
    /// ));
    /// ```
    pub fn try_number<L: Into<Literal>>(&mut self, v: L) -> Result<Node, Error> {
        let v: Literal = v.into();
        Ok(self.number(v.as_number()?))
    }

    /// Returns a new symbol node, checking the type of the given value
    pub fn try_symbol<L: Into<Literal>>(&mut self, v: L) -> Result<Node, Error> {
        let v: Literal = v.into();
        Ok(self.symbol(v.as_symbol()?))
    }

    ////////////////////////////////////////////////////////////////////////////
    // Operators
    /// Builds a new [`Node`] for the given binary operation
    fn op_binary<A: IntoNode, B: IntoNode>(
        &mut self,
        a: A,
        b: B,
        op: BinaryOpcode,
    ) -> Result<Node, Error> {
        let a = a.into_node(self)?;
        let b = b.into_node(self)?;
        Ok(self.ops.push(Op::Binary(op, a, b)))
    }

    /// Builds an addition node
    /// ```
    /// # let mut ctx = expressions::context::Context::new();
    /// let x = ctx.symbol("x");
    /// let op = ctx.add(x, 1.0)?;
    /// assert_eq!(ctx.render(op)?, "x + 1.0");
    /// # Ok::<(), expressions::Error>(())
    /// ```
    pub fn add<A: IntoNode, B: IntoNode>(
        &mut self,
        a: A,
        b: B,
    ) -> Result<Node, Error> {
        self.op_binary(a, b, BinaryOpcode::Add)
    }

    /// Builds a subtraction node
    pub fn sub<A: IntoNode, B: IntoNode>(
        &mut self,
        a: A,
        b: B,
    ) -> Result<Node, Error> {
        self.op_binary(a, b, BinaryOpcode::Sub)
    }

    /// Builds a multiplication node
    /// ```
    /// # let mut ctx = expressions::context::Context::new();
    /// let x = ctx.symbol("x");
    /// let sum = ctx.add(x, 1)?;
    /// let op = ctx.mul(sum, 5)?;
    /// assert_eq!(ctx.render(op)?, "(x + 1) * 5");
    /// # Ok::<(), expressions::Error>(())
    /// ```
    pub fn mul<A: IntoNode, B: IntoNode>(
        &mut self,
        a: A,
        b: B,
    ) -> Result<Node, Error> {
        self.op_binary(a, b, BinaryOpcode::Mul)
    }

    /// Builds a division node
    pub fn div<A: IntoNode, B: IntoNode>(
        &mut self,
        a: A,
        b: B,
    ) -> Result<Node, Error> {
        self.op_binary(a, b, BinaryOpcode::Div)
    }

    /// Builds a node which raises `a` to the power `b`
    pub fn pow<A: IntoNode, B: IntoNode>(
        &mut self,
        a: A,
        b: B,
    ) -> Result<Node, Error> {
        self.op_binary(a, b, BinaryOpcode::Pow)
    }

    ////////////////////////////////////////////////////////////////////////////
    /// Imports the given tree, returning the root node
    ///
    /// Subtrees which are shared by pointer become a single node; subtrees
    /// which are merely equal become separate nodes.
    ///
    /// ```
    /// # use expressions::context::{Context, Tree};
    /// let s = Tree::symbol("x") + 1;
    /// let t = s.clone() * s;
    /// let mut ctx = Context::new();
    /// ctx.import(&t);
    /// assert_eq!(ctx.len(), 4); // x, 1, (x + 1), and the product
    /// ```
    pub fn import(&mut self, tree: &Tree) -> Node {
        // Depth-first recursion on the heap, to protect against stack overflows
        enum Action {
            Down,
            Up,
        }

        let mut seen: HashMap<*const TreeOp, Node> = HashMap::new();
        let mut todo = vec![(Action::Down, &**tree)];
        while let Some((action, t)) = todo.pop() {
            let key = t as *const TreeOp;
            if seen.contains_key(&key) {
                continue;
            }
            match action {
                Action::Down => {
                    todo.push((Action::Up, t));
                    // Reversed, so that the left operand is imported first
                    todo.extend(
                        t.iter_children().rev().map(|c| (Action::Down, &**c)),
                    );
                }
                Action::Up => {
                    let op = match t {
                        TreeOp::Number(v) => Op::Number(*v),
                        TreeOp::Symbol(s) => Op::Symbol(s.clone()),
                        TreeOp::Binary(op, lhs, rhs) => Op::Binary(
                            *op,
                            seen[&Arc::as_ptr(lhs)],
                            seen[&Arc::as_ptr(rhs)],
                        ),
                    };
                    seen.insert(key, self.ops.push(op));
                }
            }
        }
        seen[&tree.as_ptr()]
    }

    /// Converts the given node into a standalone [`Tree`]
    ///
    /// Sharing is preserved: a node used by several parents becomes a single
    /// `Arc` in the output.
    pub fn export(&self, root: Node) -> Result<Tree, Error> {
        self.postorder(root, |_, op, args: &[&Tree]| {
            Ok(match op {
                Op::Number(v) => Tree::number(*v),
                Op::Symbol(s) => TreeOp::Symbol(s.clone()).into(),
                Op::Binary(op, ..) => {
                    Tree::op_binary(args[0].clone(), args[1].clone(), *op)
                }
            })
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
/// Helper trait for things that can be converted into a
/// [`Node`] given a [`Context`].
///
/// This trait allows you to write
/// ```
/// # let mut ctx = expressions::context::Context::new();
/// let x = ctx.symbol("x");
/// let sum = ctx.add(x, 1.0).unwrap();
/// ```
/// instead of the more verbose
/// ```
/// # let mut ctx = expressions::context::Context::new();
/// let x = ctx.symbol("x");
/// let num = ctx.number(1.0);
/// let sum = ctx.add(x, num).unwrap();
/// ```
pub trait IntoNode {
    /// Converts the given values into a node
    fn into_node(self, ctx: &mut Context) -> Result<Node, Error>;
}

impl IntoNode for Node {
    fn into_node(self, ctx: &mut Context) -> Result<Node, Error> {
        ctx.check_node(self)?;
        Ok(self)
    }
}

macro_rules! impl_into_node {
    ($($t:ty),*) => {
        $(
            impl IntoNode for $t {
                fn into_node(self, ctx: &mut Context) -> Result<Node, Error> {
                    Ok(ctx.number(self))
                }
            }
        )*
    };
}

impl_into_node!(Number, bool, f32, f64, i32, i64);

////////////////////////////////////////////////////////////////////////////////
