//! Human-readable and debug rendering of expressions
use super::{Context, Node, Op};
use crate::Error;

impl Context {
    /// Renders the given node as infix text
    ///
    /// Each operand is wrapped in parentheses if its precedence is strictly
    /// lower than the operator's.  Associativity is not considered, so
    /// `a - (b - c)` renders as `a - b - c`.
    ///
    /// ```
    /// # use expressions::context::Context;
    /// let mut ctx = Context::new();
    /// let sum = ctx.add(2, 3)?;
    /// let prod = ctx.mul(sum, 4)?;
    /// assert_eq!(ctx.render(prod)?, "(2 + 3) * 4");
    /// # Ok::<(), expressions::Error>(())
    /// ```
    pub fn render(&self, root: Node) -> Result<String, Error> {
        self.postorder(root, |_, op, args: &[&String]| {
            Ok(match op {
                Op::Number(v) => v.to_string(),
                Op::Symbol(s) => s.to_string(),
                Op::Binary(code, lhs, rhs) => {
                    let p = code.precedence();
                    format!(
                        "{} {} {}",
                        self.parenthesize(*lhs, args[0], p),
                        code.symbol(),
                        self.parenthesize(*rhs, args[1], p),
                    )
                }
            })
        })
    }

    fn parenthesize(&self, node: Node, text: &str, outer: u8) -> String {
        if self.ops[node].precedence() < outer {
            format!("({text})")
        } else {
            text.to_owned()
        }
    }

    /// Renders the given node with operator names and raw values
    ///
    /// Operators are shown as `Name(lhs, rhs)`; numbers are shown as
    /// written and symbol names are quoted.
    ///
    /// ```
    /// # use expressions::context::Context;
    /// let mut ctx = Context::new();
    /// let x = ctx.symbol("x");
    /// let op = ctx.pow(x, 2.0)?;
    /// assert_eq!(ctx.debug_repr(op)?, r#"Pow("x", 2.0)"#);
    /// # Ok::<(), expressions::Error>(())
    /// ```
    pub fn debug_repr(&self, root: Node) -> Result<String, Error> {
        self.postorder(root, |_, op, args: &[&String]| {
            Ok(match op {
                Op::Number(v) => v.to_string(),
                Op::Symbol(s) => format!("{s:?}"),
                Op::Binary(code, ..) => {
                    format!("{}({}, {})", code.name(), args[0], args[1])
                }
            })
        })
    }
}
