//! Operand/result models and the addition error type.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Operands

/// A dynamically typed input value.
///
/// Only `Int` and `Float` are numeric; every other variant is rejected by
/// [`crate::add`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnumOperand {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Null,
    List(Vec<EnumOperand>),
    Object(BTreeMap<String, EnumOperand>),
}

impl EnumOperand {
    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Null => "null",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for EnumOperand {
                fn from(value: $t) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for EnumOperand {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Self::Int(v),
            Err(_) => Self::Float(value as f64),
        }
    }
}

impl From<f32> for EnumOperand {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for EnumOperand {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for EnumOperand {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for EnumOperand {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EnumOperand {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<()> for EnumOperand {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl<T: Into<EnumOperand>> From<Option<T>> for EnumOperand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<&Value> for EnumOperand {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(v) => Self::Bool(*v),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Self::Int(v)
                } else if let Some(v) = n.as_u64() {
                    Self::from(v)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(v) => Self::Text(v.clone()),
            Value::Array(l_values) => Self::List(l_values.iter().map(Self::from).collect()),
            Value::Object(dict_values) => Self::Object(
                dict_values
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for EnumOperand {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Results

/// Sum of two numeric operands.
#[derive(Debug, Clone, Copy)]
pub enum EnumNumber {
    Int(i64),
    Float(f64),
}

impl EnumNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Numeric equality: `Int(3) == Float(3.0)`.
impl PartialEq for EnumNumber {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl PartialEq<i64> for EnumNumber {
    fn eq(&self, other: &i64) -> bool {
        *self == Self::Int(*other)
    }
}

impl PartialEq<f64> for EnumNumber {
    fn eq(&self, other: &f64) -> bool {
        *self == Self::Float(*other)
    }
}

impl fmt::Display for EnumNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Which argument of `add` failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumOperandPosition {
    First,
    Second,
}

impl fmt::Display for EnumOperandPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

/// An operand is not a usable number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("{position} operand must be a number, got {type_name}")]
    NotNumeric {
        position: EnumOperandPosition,
        type_name: &'static str,
    },
    #[error("{position} operand must not be NaN")]
    NotANumber { position: EnumOperandPosition },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
