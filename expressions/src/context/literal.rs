//! Dynamically typed values for validating terminal construction
use super::Number;
use crate::Error;
use serde::{Deserialize, Serialize};

/// A value of unknown type, e.g. one that was deserialized from a document
///
/// Terminals built with [`Tree::try_number`](crate::context::Tree::try_number)
/// or [`Tree::try_symbol`](crate::context::Tree::try_symbol) check the type of
/// their `Literal` and reject mismatches with [`Error::InvalidTerminal`].
/// `Bool`, `Int` and `Float` are numbers; only `Text` is a symbol.
///
/// ```
/// # use expressions::context::Literal;
/// let v: Literal = serde_json::from_str("2.5").unwrap();
/// assert_eq!(v, Literal::Float(2.5));
/// assert_eq!(v.type_name(), "float");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[allow(missing_docs)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Returns the name of the value's type, as reported in errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Bool(..) => "bool",
            Literal::Int(..) => "int",
            Literal::Float(..) => "float",
            Literal::Text(..) => "str",
        }
    }

    /// Returns the value as a number, or an error if it is text
    ///
    /// Booleans count as numbers.
    pub fn as_number(&self) -> Result<Number, Error> {
        match self {
            Literal::Bool(b) => Ok(Number::Bool(*b)),
            Literal::Int(i) => Ok(Number::Int(*i)),
            Literal::Float(f) => Ok((*f).into()),
            Literal::Text(..) => Err(Error::InvalidTerminal {
                expected: "number",
                found: self.type_name(),
            }),
        }
    }

    /// Returns the value as a symbol name, or an error if it is not text
    pub fn as_symbol(&self) -> Result<&str, Error> {
        match self {
            Literal::Text(s) => Ok(s),
            _ => Err(Error::InvalidTerminal {
                expected: "symbol",
                found: self.type_name(),
            }),
        }
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Int(v.into())
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f32> for Literal {
    fn from(v: f32) -> Self {
        Literal::Float(v.into())
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Text(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::Text(v)
    }
}
