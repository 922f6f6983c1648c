//! Memoized postorder reduction over a [`Context`]
use super::{Context, Node, Op, indexed::IndexVec};
use crate::Error;

use arrayvec::ArrayVec;

impl Context {
    /// Reduces the graph below `root` to a single value
    ///
    /// `f` is called as `f(node, op, args)`, where `args` holds the results
    /// for each of `op`'s operands, in order.  Every node reachable from
    /// `root` is passed to `f` exactly once, even if it's used by many
    /// parents, and always after all of its operands.  The order among
    /// independent subgraphs is unspecified.
    ///
    /// Traversal uses a stack on the heap, so deep graphs are limited only by
    /// memory.  Once every parent of a node has been evaluated, that node's
    /// result is dropped.
    ///
    /// If `f` returns an error, traversal stops and the error is returned
    /// unchanged.  If `root` isn't part of this context, returns
    /// [`Error::BadNode`] (converted into `E`).
    ///
    /// ```
    /// # use expressions::{Error, context::{BinaryOpcode, Context, Op}};
    /// let mut ctx = Context::new();
    /// let x = ctx.mul(4, 2)?;
    /// let sum = ctx.add(3, x)?;
    /// let v = ctx.postorder(sum, |_, op, args: &[&f64]| {
    ///     Ok::<_, Error>(match op {
    ///         Op::Number(v) => v.to_f64(),
    ///         Op::Binary(BinaryOpcode::Add, ..) => args[0] + args[1],
    ///         Op::Binary(BinaryOpcode::Mul, ..) => args[0] * args[1],
    ///         _ => unimplemented!(),
    ///     })
    /// })?;
    /// assert_eq!(v, 11.0);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn postorder<R, E, F>(&self, root: Node, mut f: F) -> Result<R, E>
    where
        F: FnMut(Node, &Op, &[&R]) -> Result<R, E>,
        E: From<Error>,
    {
        self.check_node(root)?;
        let mut uses = self.count_uses(root);
        let mut done: IndexVec<Option<R>, Node> =
            std::iter::repeat_with(|| None).take(self.len()).collect();

        let mut todo = vec![root];
        while let Some(node) = todo.pop() {
            // A node may be pushed more than once before it's evaluated
            if done[node].is_some() {
                continue;
            }
            let op = &self.ops[node];
            let pending: ArrayVec<Node, 2> =
                op.iter_children().filter(|c| done[*c].is_none()).collect();
            if !pending.is_empty() {
                todo.push(node);
                // Reversed, so that the left operand is evaluated first
                todo.extend(pending.into_iter().rev());
                continue;
            }

            let out = {
                let args: ArrayVec<&R, 2> = op
                    .iter_children()
                    .filter_map(|c| done[c].as_ref())
                    .collect();
                f(node, op, &args)?
            };
            done[node] = Some(out);

            // Every stack entry for a child was pushed above one of its
            // parents, so none remain once the last parent is evaluated.
            for c in op.iter_children() {
                uses[c] -= 1;
                if uses[c] == 0 {
                    done[c] = None;
                }
            }
        }
        done.take(root).ok_or_else(|| Error::BadNode.into())
    }

    /// Counts operand edges into each node reachable from `root`
    fn count_uses(&self, root: Node) -> IndexVec<usize, Node> {
        let mut uses: IndexVec<usize, Node> = vec![0; self.len()].into();
        let mut seen: IndexVec<bool, Node> = vec![false; self.len()].into();
        let mut todo = vec![root];
        while let Some(node) = todo.pop() {
            if std::mem::replace(&mut seen[node], true) {
                continue;
            }
            for c in self.ops[node].iter_children() {
                uses[c] += 1;
                todo.push(c);
            }
        }
        uses
    }
}
