//! Constant values carried by symbols.

use std::fmt;

/// A constant representable inline in metadata.
///
/// Floats are stored as their bit pattern so the type stays `Eq + Hash`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    String(Box<str>),
}

impl ConstantValue {
    /// Create a float constant from an `f64`.
    pub fn float(value: f64) -> Self {
        ConstantValue::Float(value.to_bits())
    }

    /// The float value, if this is a float constant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstantValue::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Whether this is the `null` constant.
    pub fn is_null(&self) -> bool {
        matches!(self, ConstantValue::Null)
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => write!(f, "null"),
            ConstantValue::Bool(b) => write!(f, "{b}"),
            ConstantValue::Int(i) => write!(f, "{i}"),
            ConstantValue::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            ConstantValue::String(s) => write!(f, "{s:?}"),
        }
    }
}
