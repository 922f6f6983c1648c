//! Numeric terminal values
use ordered_float::OrderedFloat;

/// The value held by a number terminal
///
/// The kind of value is preserved, so that integers, floats and booleans
/// print the way they were written:
/// ```
/// # use expressions::context::Number;
/// assert_eq!(Number::from(2).to_string(), "2");
/// assert_eq!(Number::from(2.0).to_string(), "2.0");
/// assert_eq!(Number::from(true).to_string(), "true");
/// ```
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum Number {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
}

impl Number {
    /// Converts to a floating-point value
    ///
    /// Booleans become `0.0` or `1.0`; large integers may be rounded.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Bool(b) => f64::from(u8::from(b)),
            Number::Int(i) => i as f64,
            Number::Float(f) => f.0,
        }
    }

    /// Returns the name of the value's type
    pub fn type_name(&self) -> &'static str {
        match self {
            Number::Bool(..) => "bool",
            Number::Int(..) => "int",
            Number::Float(..) => "float",
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Bool(b) => write!(f, "{b}"),
            Number::Int(i) => write!(f, "{i}"),
            // `Debug` keeps the trailing `.0` on integral floats
            Number::Float(v) => write!(f, "{:?}", v.0),
        }
    }
}

impl From<bool> for Number {
    fn from(v: bool) -> Self {
        Number::Bool(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(v.into())
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Number::Float(OrderedFloat(v.into()))
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(OrderedFloat(v))
    }
}
