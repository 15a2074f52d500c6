//! Scalars and the array-or-scalar operand accepted by binary operations.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::array::NumericArray;
use crate::dtype::DType;
use crate::error::{ArrayError, Result};

/// A single numeric value outside of an array.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    /// The dtype this scalar would have as a standalone array.
    pub fn dtype(self) -> DType {
        match self {
            Scalar::Int(_) => DType::Int64,
            Scalar::Float(_) => DType::Float64,
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Scalar::Int(v) => v == 0,
            Scalar::Float(v) => v == 0.0,
        }
    }

    /// Reads a JSON number. Anything else is an operand type error for `op`.
    pub fn from_json(op: &'static str, value: &serde_json::Value) -> Result<Self> {
        if let Some(v) = value.as_i64() {
            return Ok(Scalar::Int(v));
        }
        if let Some(v) = value.as_f64() {
            return Ok(Scalar::Float(v));
        }
        Err(ArrayError::OperandType {
            op,
            found: describe_json(value),
        })
    }
}

pub(crate) fn describe_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => format!("boolean {}", b),
        serde_json::Value::String(s) => format!("string {:?}", s),
        serde_json::Value::Object(_) => "object".to_string(),
        serde_json::Value::Array(_) => "sequence".to_string(),
        serde_json::Value::Number(n) => format!("number {}", n),
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => fmt::Display::fmt(v, f),
            Scalar::Float(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

/// Right-hand side of a binary operation: another array or a scalar.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Array(&'a NumericArray),
    Scalar(Scalar),
}

impl<'a> Operand<'a> {
    pub(crate) fn describe(&self) -> String {
        match self {
            Operand::Array(array) => format!("array of shape {:?}", array.shape()),
            Operand::Scalar(scalar) => format!("scalar {}", scalar),
        }
    }
}

impl<'a> From<&'a NumericArray> for Operand<'a> {
    fn from(value: &'a NumericArray) -> Self {
        Operand::Array(value)
    }
}

impl<'a> From<Scalar> for Operand<'a> {
    fn from(value: Scalar) -> Self {
        Operand::Scalar(value)
    }
}

macro_rules! impl_operand_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl<'a> From<$ty> for Operand<'a> {
                fn from(value: $ty) -> Self {
                    Operand::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

impl_operand_from_scalar!(i32, i64, f32, f64);
