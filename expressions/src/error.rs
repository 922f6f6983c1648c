//! Module containing the crate's universal error type
use thiserror::Error;

/// Universal error type for expression construction and traversal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Node is not present in this `Context`
    #[error("node is not present in this `Context`")]
    BadNode,

    /// A terminal was built from a value of the wrong type
    #[error("element must be a {expected}, not {found}")]
    InvalidTerminal {
        /// Kind of terminal being built (`number` or `symbol`)
        expected: &'static str,
        /// Type name of the offending value
        found: &'static str,
    },
}
