use crate::context::{Node, Number};
use std::sync::Arc;

/// Precedence of terminals (numbers and symbols)
///
/// This is higher than every [`BinaryOpcode`], so a terminal never needs
/// parentheses.
pub const TERMINAL_PRECEDENCE: u8 = 5;

/// A two-argument math operation
#[derive(
    Copy,
    Clone,
    Debug,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[allow(missing_docs)]
pub enum BinaryOpcode {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOpcode {
    /// Returns the token used when printing this operation
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOpcode::Add => "+",
            BinaryOpcode::Sub => "-",
            BinaryOpcode::Mul => "*",
            BinaryOpcode::Div => "/",
            BinaryOpcode::Pow => "^",
        }
    }

    /// Returns the precedence rank; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOpcode::Add | BinaryOpcode::Sub => 1,
            BinaryOpcode::Mul | BinaryOpcode::Div => 2,
            BinaryOpcode::Pow => 3,
        }
    }

    /// Returns the variant name, e.g. `"Add"`
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Represents an operation in a math expression.
///
/// `Op`s should be constructed by calling functions on
/// [`Context`](crate::context::Context), e.g.
/// [`Context::add`](crate::context::Context::add) will generate an
/// `Op::Binary(BinaryOpcode::Add, .., ..)` node and return an opaque handle.
///
/// Each `Op` is tightly coupled to the [`Context`](crate::context::Context)
/// which generated it, and will not be valid for a different `Context`.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum Op {
    Number(Number),
    Symbol(Arc<str>),
    Binary(BinaryOpcode, Node, Node),
}

impl Op {
    /// Returns the precedence used when deciding on parentheses
    pub fn precedence(&self) -> u8 {
        match self {
            Op::Number(..) | Op::Symbol(..) => TERMINAL_PRECEDENCE,
            Op::Binary(op, ..) => op.precedence(),
        }
    }

    /// Returns the variant name, e.g. `"Number"` or `"Mul"`
    pub fn name(&self) -> &'static str {
        match self {
            Op::Number(..) => "Number",
            Op::Symbol(..) => "Symbol",
            Op::Binary(op, ..) => op.name(),
        }
    }

    /// Checks whether this is a terminal (i.e. it has no operands)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Op::Number(..) | Op::Symbol(..))
    }

    /// Iterates over operands in order, producing 0 or 2 values
    pub fn iter_children(
        &self,
    ) -> impl DoubleEndedIterator<Item = Node> + use<> {
        let out = match self {
            Op::Binary(_, a, b) => [Some(*a), Some(*b)],
            Op::Number(..) | Op::Symbol(..) => [None, None],
        };
        out.into_iter().flatten()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn precedence_is_ordered() {
        assert!(
            BinaryOpcode::Add.precedence() < BinaryOpcode::Mul.precedence()
        );
        assert!(
            BinaryOpcode::Mul.precedence() < BinaryOpcode::Pow.precedence()
        );
        assert_eq!(
            BinaryOpcode::Add.precedence(),
            BinaryOpcode::Sub.precedence()
        );
        assert_eq!(
            BinaryOpcode::Mul.precedence(),
            BinaryOpcode::Div.precedence()
        );
        for op in BinaryOpcode::iter() {
            assert!(op.precedence() < TERMINAL_PRECEDENCE);
        }
    }

    #[test]
    fn symbols_and_names() {
        let pairs: Vec<_> = BinaryOpcode::iter()
            .map(|op| (op.name(), op.symbol()))
            .collect();
        assert_eq!(
            pairs,
            [("Add", "+"), ("Sub", "-"), ("Mul", "*"), ("Div", "/"), ("Pow", "^")]
        );
    }

    #[test]
    fn terminal_children() {
        let n = Op::Number(Number::from(1.0));
        assert!(n.is_terminal());
        assert_eq!(n.iter_children().count(), 0);
        assert_eq!(n.precedence(), TERMINAL_PRECEDENCE);

        let s = Op::Symbol("x".into());
        assert_eq!(s.name(), "Symbol");
        assert_eq!(s.iter_children().count(), 0);
    }
}
