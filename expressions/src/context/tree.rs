//! Context-free expression trees
use super::{BinaryOpcode, Context, Literal, Node, Number, Op};
use crate::Error;
use std::sync::Arc;

/// Opcode type for trees
///
/// This is equivalent to [`Op`](crate::context::Op), but children are held
/// by reference-counted pointers instead of [`Context`] indices.
#[allow(missing_docs)]
pub enum TreeOp {
    Number(Number),
    Symbol(Arc<str>),
    Binary(BinaryOpcode, Arc<TreeOp>, Arc<TreeOp>),
}

impl Drop for TreeOp {
    fn drop(&mut self) {
        // Early exit for TreeOps which have limited recursion
        if self.eligible_for_fast_drop() {
            return;
        }

        let placeholder = || TreeOp::Number(Number::Int(0));
        let mut todo = vec![std::mem::replace(self, placeholder())];
        let empty = Arc::new(placeholder());
        while let Some(mut t) = todo.pop() {
            for t in t.iter_children_mut() {
                let arg = std::mem::replace(t, empty.clone());
                todo.extend(Arc::into_inner(arg));
            }
            drop(t);
        }
    }
}

impl TreeOp {
    /// Checks whether the given tree is eligible for fast dropping
    ///
    /// Fast dropping uses the normal `Drop` implementation, which recurses on
    /// the stack and can overflow for deep trees.  A recursive tree is only
    /// eligible for fast dropping if all of its children are terminals.
    fn eligible_for_fast_drop(&self) -> bool {
        self.iter_children().all(|c| c.is_terminal())
    }

    /// Checks whether this is a number or symbol
    pub fn is_terminal(&self) -> bool {
        matches!(self, TreeOp::Number(..) | TreeOp::Symbol(..))
    }

    /// Iterates over operands in order, producing 0 or 2 values
    pub fn iter_children(
        &self,
    ) -> impl DoubleEndedIterator<Item = &Arc<TreeOp>> {
        match self {
            TreeOp::Number(..) | TreeOp::Symbol(..) => [None, None],
            TreeOp::Binary(_op, lhs, rhs) => [Some(lhs), Some(rhs)],
        }
        .into_iter()
        .flatten()
    }

    fn iter_children_mut(&mut self) -> impl Iterator<Item = &mut Arc<TreeOp>> {
        match self {
            TreeOp::Number(..) | TreeOp::Symbol(..) => [None, None],
            TreeOp::Binary(_op, lhs, rhs) => [Some(lhs), Some(rhs)],
        }
        .into_iter()
        .flatten()
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Tree {
                fn from(v: $t) -> Tree {
                    Tree::number(v)
                }
            }
        )*
    };
}

impl_from_number!(Number, bool, f32, f64, i32, i64);

impl From<TreeOp> for Tree {
    fn from(t: TreeOp) -> Tree {
        Tree(Arc::new(t))
    }
}

/// Owned handle for a standalone expression tree
///
/// Cloning a `Tree` is cheap and shares the underlying node, so the same
/// subexpression may appear under several parents:
/// ```
/// # use expressions::context::Tree;
/// let s = Tree::symbol("x") + 1;
/// let t = s.clone() * s;
/// assert_eq!(t.to_string(), "(x + 1) * (x + 1)");
/// ```
#[derive(Clone)]
pub struct Tree(Arc<TreeOp>);

impl std::ops::Deref for Tree {
    type Target = TreeOp;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        // Heap recursion using a `Vec`, to avoid blowing up the stack
        let mut todo = vec![(&self.0, &other.0)];
        while let Some((a, b)) = todo.pop() {
            // Pointer equality lets us short-circuit deep checks
            if Arc::ptr_eq(a, b) {
                continue;
            }
            match (a.as_ref(), b.as_ref()) {
                (TreeOp::Number(a), TreeOp::Number(b)) => {
                    if *a != *b {
                        return false;
                    }
                }
                (TreeOp::Symbol(a), TreeOp::Symbol(b)) => {
                    if *a != *b {
                        return false;
                    }
                }
                (
                    TreeOp::Binary(op_a, lhs_a, rhs_a),
                    TreeOp::Binary(op_b, lhs_b, rhs_b),
                ) => {
                    if *op_a != *op_b {
                        return false;
                    }
                    todo.push((lhs_a, lhs_b));
                    todo.push((rhs_a, rhs_b));
                }
                _ => return false,
            }
        }
        true
    }
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ctx = Context::new();
        let root = ctx.import(self);
        let s = ctx.render(root).map_err(|_| std::fmt::Error)?;
        f.write_str(&s)
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ctx = Context::new();
        let root = ctx.import(self);
        let s = ctx.debug_repr(root).map_err(|_| std::fmt::Error)?;
        f.write_str(&s)
    }
}

impl Tree {
    /// Builds a number terminal
    ///
    /// ```
    /// # use expressions::context::Tree;
    /// assert_eq!(Tree::number(2).to_string(), "2");
    /// assert_eq!(Tree::number(2.0).to_string(), "2.0");
    /// ```
    pub fn number<N: Into<Number>>(v: N) -> Self {
        Tree(Arc::new(TreeOp::Number(v.into())))
    }

    /// Builds a symbol terminal
    pub fn symbol(name: &str) -> Self {
        Tree(Arc::new(TreeOp::Symbol(name.into())))
    }

    /// Builds a number terminal from a dynamically typed value
    ///
    /// ```
    /// # use expressions::{Error, context::Tree};
    /// assert!(Tree::try_number(3).is_ok());
    /// assert_eq!(
    ///     Tree::try_number("x").unwrap_err(),
    ///     Error::InvalidTerminal { expected: "number", found: "str" },
    /// );
    /// ```
    pub fn try_number<L: Into<Literal>>(v: L) -> Result<Self, Error> {
        let v: Literal = v.into();
        v.as_number().map(Self::number)
    }

    /// Builds a symbol terminal from a dynamically typed value
    pub fn try_symbol<L: Into<Literal>>(v: L) -> Result<Self, Error> {
        let v: Literal = v.into();
        v.as_symbol().map(Self::symbol)
    }

    pub(crate) fn op_binary(a: Tree, b: Tree, op: BinaryOpcode) -> Self {
        Tree(Arc::new(TreeOp::Binary(op, a.0, b.0)))
    }

    /// Raises this tree to the given power
    ///
    /// There's no operator for this: `^` is XOR in Rust, with a precedence
    /// that doesn't match exponentiation.  Use the free function [`pow`] if
    /// the base is a plain number.
    pub fn pow<T: Into<Tree>>(&self, other: T) -> Self {
        Self::op_binary(self.clone(), other.into(), BinaryOpcode::Pow)
    }

    /// Returns a pointer to the inner [`TreeOp`]
    ///
    /// This can be used as a strong (but not unique) identity.
    pub fn as_ptr(&self) -> *const TreeOp {
        Arc::as_ptr(&self.0)
    }

    /// Shallow (pointer) equality check
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }

    /// Folds the tree with a postorder traversal
    ///
    /// The tree is imported into a fresh [`Context`], then reduced with
    /// [`Context::postorder`]; subtrees shared by pointer are visited once.
    pub fn postorder<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnMut(Node, &Op, &[&R]) -> Result<R, E>,
        E: From<Error>,
    {
        let mut ctx = Context::new();
        let root = ctx.import(self);
        ctx.postorder(root, f)
    }
}

/// Raises `base` to the power `exp`, coercing numbers on either side
///
/// ```
/// # use expressions::context::{Tree, pow};
/// let x = Tree::symbol("x");
/// assert_eq!(pow(2, x.clone()).to_string(), "2 ^ x");
/// assert_eq!(pow(x, 0.5).to_string(), "x ^ 0.5");
/// ```
pub fn pow<A: Into<Tree>, B: Into<Tree>>(base: A, exp: B) -> Tree {
    Tree::op_binary(base.into(), exp.into(), BinaryOpcode::Pow)
}

macro_rules! impl_binary {
    ($op:ident, $op_assign:ident, $base_fn:ident, $assign_fn:ident) => {
        impl<A: Into<Tree>> std::ops::$op<A> for Tree {
            type Output = Self;

            fn $base_fn(self, other: A) -> Self {
                Self::op_binary(self, other.into(), BinaryOpcode::$op)
            }
        }
        impl<A: Into<Tree>> std::ops::$op_assign<A> for Tree {
            fn $assign_fn(&mut self, other: A) {
                use std::ops::$op;
                let mut next = self.clone().$base_fn(other.into());
                std::mem::swap(self, &mut next);
            }
        }
        // One float and one integer type, so that unsuffixed literals on
        // the left resolve without annotations
        impl_binary!(@lhs $op, $base_fn, f64, i32);
    };
    (@lhs $op:ident, $base_fn:ident, $($t:ty),*) => {
        $(
            impl std::ops::$op<Tree> for $t {
                type Output = Tree;
                fn $base_fn(self, other: Tree) -> Tree {
                    Tree::op_binary(self.into(), other, BinaryOpcode::$op)
                }
            }
        )*
    };
}

impl_binary!(Add, AddAssign, add, add_assign);
impl_binary!(Sub, SubAssign, sub, sub_assign);
impl_binary!(Mul, MulAssign, mul, mul_assign);
impl_binary!(Div, DivAssign, div, div_assign);

#[cfg(test)]
mod test {
    use super::*;

    fn operands(t: &Tree) -> (&TreeOp, &TreeOp) {
        let TreeOp::Binary(_, lhs, rhs) = &**t else {
            panic!("not an operator");
        };
        (&**lhs, &**rhs)
    }

    #[test]
    fn tree_coercion() {
        let a = Tree::number(2.0) + Tree::number(3);
        let b = 2.0 + Tree::number(3);
        let c = Tree::number(2.0) + 3;
        assert_eq!(a, b);
        assert_eq!(a, c);

        assert!(matches!(&*a, TreeOp::Binary(BinaryOpcode::Add, ..)));
        let (lhs, rhs) = operands(&a);
        assert!(matches!(lhs, TreeOp::Number(v) if *v == Number::from(2.0)));
        assert!(matches!(rhs, TreeOp::Number(v) if *v == Number::Int(3)));

        // Integers and floats are different terminals
        assert_ne!(a, Tree::number(2) + Tree::number(3));
    }

    #[test]
    fn bare_literals() {
        let x = Tree::symbol("x");
        assert_eq!((2 + x.clone()).to_string(), "2 + x");
        assert_eq!((2 - x.clone()).to_string(), "2 - x");
        assert_eq!((2 * x.clone()).to_string(), "2 * x");
        assert_eq!((2 / x.clone()).to_string(), "2 / x");
        assert_eq!((1.5 + x.clone()).to_string(), "1.5 + x");
        assert_eq!((1.5 - x.clone()).to_string(), "1.5 - x");
        assert_eq!((1.5 * x.clone()).to_string(), "1.5 * x");
        assert_eq!((1.5 / x.clone()).to_string(), "1.5 / x");

        assert_eq!((x.clone() + 2).to_string(), "x + 2");
        assert_eq!((x.clone() - 2).to_string(), "x - 2");
        assert_eq!((x.clone() * 2).to_string(), "x * 2");
        assert_eq!((x.clone() / 2).to_string(), "x / 2");
        assert_eq!((x.clone() + 1.5).to_string(), "x + 1.5");
        assert_eq!((x.clone() - 1.5).to_string(), "x - 1.5");
        assert_eq!((x.clone() * 1.5).to_string(), "x * 1.5");
        assert_eq!((x.clone() / 1.5).to_string(), "x / 1.5");

        assert_eq!((3 + x.clone() * 2).to_string(), "3 + x * 2");
        assert_eq!((x.clone() + true).to_string(), "x + true");
    }

    #[test]
    fn free_pow() {
        let x = Tree::symbol("x");
        let t = pow(2, x.clone());
        let TreeOp::Binary(BinaryOpcode::Pow, lhs, rhs) = &*t else {
            panic!("expected a power");
        };
        assert!(matches!(&**lhs, TreeOp::Number(Number::Int(2))));
        assert!(Arc::ptr_eq(rhs, &x.0));
        assert_eq!(pow(x.clone(), 2), x.pow(2));
        assert_eq!(pow(2.5, 3).to_string(), "2.5 ^ 3");
    }

    #[test]
    fn tree_operators() {
        let x = Tree::symbol("x");
        for (t, op) in [
            (x.clone() + 1, BinaryOpcode::Add),
            (x.clone() - 1, BinaryOpcode::Sub),
            (x.clone() * 1, BinaryOpcode::Mul),
            (x.clone() / 1, BinaryOpcode::Div),
            (x.pow(1), BinaryOpcode::Pow),
        ] {
            let TreeOp::Binary(got, lhs, _) = &*t else {
                panic!("not an operator");
            };
            assert_eq!(*got, op);
            assert!(Arc::ptr_eq(lhs, &x.0));
        }
    }

    #[test]
    fn tree_assign_ops() {
        let x = Tree::symbol("x");
        let mut t = x.clone();
        t -= 1;
        t *= 2.5f32;
        assert_eq!(t, (x - 1) * 2.5);
    }

    #[test]
    fn tree_literal_left() {
        let t = 1 - Tree::symbol("y");
        let (lhs, rhs) = operands(&t);
        assert!(matches!(lhs, TreeOp::Number(Number::Int(1))));
        assert!(matches!(rhs, TreeOp::Symbol(s) if &**s == "y"));

        // Large integers are kept exactly
        let big = i64::MAX;
        let t = Tree::symbol("y") * big;
        let (_, rhs) = operands(&t);
        assert!(matches!(rhs, TreeOp::Number(Number::Int(v)) if *v == big));
        assert_eq!(t.to_string(), "y * 9223372036854775807");
    }

    #[test]
    fn tree_try_terminals() {
        assert_eq!(Tree::try_number(5).unwrap(), Tree::number(5));
        assert_eq!(Tree::try_number(5.0).unwrap(), Tree::number(5.0));
        assert_eq!(Tree::try_number(true).unwrap(), Tree::number(true));
        assert_eq!(Tree::try_number(true).unwrap().to_string(), "true");
        assert_eq!(
            (Tree::try_number(2.0).unwrap() + 1).to_string(),
            "2.0 + 1"
        );
        assert_eq!(Tree::try_symbol("a").unwrap(), Tree::symbol("a"));
        assert_eq!(
            Tree::try_number("x").unwrap_err(),
            Error::InvalidTerminal {
                expected: "number",
                found: "str"
            }
        );
        assert_eq!(
            Tree::try_symbol(5).unwrap_err(),
            Error::InvalidTerminal {
                expected: "symbol",
                found: "int"
            }
        );
    }

    #[test]
    fn tree_identity() {
        let x1 = Tree::symbol("x");
        let x2 = Tree::symbol("x");
        assert!(!x1.ptr_eq(&x2)); // shallow equality
        assert_eq!(x1, x2); // deep equality
        assert!(x1.ptr_eq(&x1.clone()));
        assert_ne!(x1, Tree::symbol("y"));
        assert_ne!(x1.clone() + 1, x1.clone() - 1);
    }

    #[test]
    fn tree_debug() {
        let t = Tree::number(2.0) * Tree::symbol("x") + 4;
        assert_eq!(format!("{t:?}"), r#"Add(Mul(2.0, "x"), 4)"#);
        assert_eq!(t.to_string(), "2.0 * x + 4");

        let t = Tree::try_number(2.0).unwrap() + 1;
        assert_eq!(format!("{t:?}"), "Add(2.0, 1)");
    }

    #[test]
    fn deep_recursion_drop() {
        let mut x = Tree::symbol("x");
        for _ in 0..1_000_000 {
            x += 1.0;
        }
        drop(x);
        // we should not panic here!
    }

    #[test]
    fn deep_recursion_eq() {
        let mut x1 = Tree::symbol("x");
        for _ in 0..1_000_000 {
            x1 += 1.0;
        }
        let mut x2 = Tree::symbol("x");
        for _ in 0..1_000_000 {
            x2 += 1.0;
        }
        assert_eq!(x1, x2);
    }

    #[test]
    fn deep_recursion_postorder() {
        let mut x = Tree::symbol("x");
        for _ in 0..1_000_000 {
            x += 1.0;
        }
        let depth = x
            .postorder(|_, op, args: &[&usize]| {
                Ok::<_, Error>(match op {
                    Op::Binary(..) => *args[0] + 1,
                    _ => 0,
                })
            })
            .unwrap();
        assert_eq!(depth, 1_000_000);
    }
}
