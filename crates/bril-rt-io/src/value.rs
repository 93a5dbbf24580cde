//! Tagged primitive values.

use std::fmt;

use bril_rt_core::ArgType;

use crate::format::{bool_text, float_text};

/// One printable or decodable Bril primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// 64-bit IEEE float.
    Float(f64),
}

impl Value {
    /// The primitive type of this value.
    pub fn ty(&self) -> ArgType {
        match self {
            Self::Int(_) => ArgType::Int,
            Self::Bool(_) => ArgType::Bool,
            Self::Float(_) => ArgType::Float,
        }
    }
}

/// Writes the canonical text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => f.write_str(bool_text(*v)),
            Self::Float(v) => f.write_str(&float_text(*v)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}
