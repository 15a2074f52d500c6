//! Element types and the promotion rules between them.
use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayD, LinalgScalar};
use serde::{Deserialize, Serialize};

use crate::array::Buffer;
use crate::scalar::Scalar;

/// Semantic element type of a [`NumericArray`](crate::NumericArray).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int32,
    Int64,
    Float32,
    #[default]
    Float64,
}

impl DType {
    pub const fn name(self) -> &'static str {
        match self {
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    /// Result dtype of an operation between two arrays.
    ///
    /// Integers widen to the larger integer, `float32` only survives against
    /// itself, and anything meeting `float64` becomes `float64`.
    pub fn promote(self, other: DType) -> DType {
        match (self, other) {
            (a, b) if a == b => a,
            (DType::Float64, _) | (_, DType::Float64) => DType::Float64,
            (DType::Float32, _) | (_, DType::Float32) => DType::Float64,
            _ => DType::Int64,
        }
    }

    /// Result dtype of an operation between an array of this dtype and a
    /// scalar. Scalars are weak: they only lift an integer array to
    /// `float64` when the scalar itself is a float.
    pub fn promote_scalar(self, scalar: Scalar) -> DType {
        match scalar {
            Scalar::Float(_) if self.is_integer() => DType::Float64,
            Scalar::Int(v) if self == DType::Int32 && i32::try_from(v).is_err() => DType::Int64,
            _ => self,
        }
    }

    /// The dtype linear-algebra results are computed and returned in.
    pub fn float_result(self) -> DType {
        if self.is_float() {
            self
        } else {
            DType::Float64
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int32" | "i32" => Ok(DType::Int32),
            "int64" | "i64" | "int" => Ok(DType::Int64),
            "float32" | "f32" | "single" => Ok(DType::Float32),
            "float64" | "f64" | "float" | "double" => Ok(DType::Float64),
            _ => Err(format!(
                "Unknown dtype: {}. Expected one of int32, int64, float32, float64",
                s
            )),
        }
    }
}

/// Rust element types that can back a [`Buffer`].
///
/// Integer arithmetic wraps on overflow. Division is only reached once the
/// kernel has ruled out zero integer divisors.
pub trait Element:
    LinalgScalar + PartialOrd + fmt::Debug + fmt::Display + Send + Sync
{
    const DTYPE: DType;

    fn from_f64(value: f64) -> Self;
    fn from_i64(value: i64) -> Self;
    fn to_f64(self) -> f64;
    fn to_scalar(self) -> Scalar;
    fn cast<U: Element>(self) -> U;

    fn add_elem(self, rhs: Self) -> Self;
    fn sub_elem(self, rhs: Self) -> Self;
    fn mul_elem(self, rhs: Self) -> Self;
    fn div_elem(self, rhs: Self) -> Self;

    fn from_scalar(value: Scalar) -> Self {
        match value {
            Scalar::Int(v) => Self::from_i64(v),
            Scalar::Float(v) => Self::from_f64(v),
        }
    }

    fn wrap(array: ArrayD<Self>) -> Buffer;
    fn unwrap_ref(buffer: &Buffer) -> Option<&ArrayD<Self>>;
}

macro_rules! impl_int_element {
    ($ty:ty, $dtype:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$dtype;

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn from_i64(value: i64) -> Self {
                value as $ty
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn to_scalar(self) -> Scalar {
                Scalar::Int(self as i64)
            }

            fn cast<U: Element>(self) -> U {
                U::from_i64(self as i64)
            }

            fn add_elem(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            fn sub_elem(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            fn mul_elem(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            fn div_elem(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }

            fn wrap(array: ArrayD<Self>) -> Buffer {
                Buffer::$dtype(array)
            }

            fn unwrap_ref(buffer: &Buffer) -> Option<&ArrayD<Self>> {
                match buffer {
                    Buffer::$dtype(array) => Some(array),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_float_element {
    ($ty:ty, $dtype:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$dtype;

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn from_i64(value: i64) -> Self {
                value as $ty
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn to_scalar(self) -> Scalar {
                Scalar::Float(self as f64)
            }

            fn cast<U: Element>(self) -> U {
                U::from_f64(self as f64)
            }

            fn add_elem(self, rhs: Self) -> Self {
                self + rhs
            }

            fn sub_elem(self, rhs: Self) -> Self {
                self - rhs
            }

            fn mul_elem(self, rhs: Self) -> Self {
                self * rhs
            }

            fn div_elem(self, rhs: Self) -> Self {
                self / rhs
            }

            fn wrap(array: ArrayD<Self>) -> Buffer {
                Buffer::$dtype(array)
            }

            fn unwrap_ref(buffer: &Buffer) -> Option<&ArrayD<Self>> {
                match buffer {
                    Buffer::$dtype(array) => Some(array),
                    _ => None,
                }
            }
        }
    };
}

impl_int_element!(i32, Int32);
impl_int_element!(i64, Int64);
impl_float_element!(f32, Float32);
impl_float_element!(f64, Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_table() {
        use DType::*;
        assert_eq!(Int32.promote(Int32), Int32);
        assert_eq!(Int32.promote(Int64), Int64);
        assert_eq!(Int64.promote(Int32), Int64);
        assert_eq!(Float32.promote(Float32), Float32);
        assert_eq!(Float32.promote(Int32), Float64);
        assert_eq!(Int64.promote(Float32), Float64);
        assert_eq!(Float64.promote(Int32), Float64);
        assert_eq!(Float32.promote(Float64), Float64);
    }

    #[test]
    fn scalars_are_weak() {
        assert_eq!(DType::Int32.promote_scalar(Scalar::Int(7)), DType::Int32);
        assert_eq!(DType::Int32.promote_scalar(Scalar::Float(0.5)), DType::Float64);
        assert_eq!(DType::Float32.promote_scalar(Scalar::Float(0.5)), DType::Float32);
        assert_eq!(DType::Float32.promote_scalar(Scalar::Int(2)), DType::Float32);
    }

    #[test]
    fn out_of_range_int_scalar_widens_int32() {
        assert_eq!(DType::Int32.promote_scalar(Scalar::Int(5_000_000_000)), DType::Int64);
        assert_eq!(DType::Int32.promote_scalar(Scalar::Int(i32::MIN as i64)), DType::Int32);
        assert_eq!(DType::Int64.promote_scalar(Scalar::Int(5_000_000_000)), DType::Int64);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("F64".parse::<DType>().unwrap(), DType::Float64);
        assert_eq!("int".parse::<DType>().unwrap(), DType::Int64);
        assert_eq!("i32".parse::<DType>().unwrap(), DType::Int32);
        assert!("complex128".parse::<DType>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DType::Float32).unwrap(), "\"float32\"");
        let parsed: DType = serde_json::from_str("\"int64\"").unwrap();
        assert_eq!(parsed, DType::Int64);
    }

    #[test]
    fn integer_arithmetic_wraps() {
        assert_eq!(i32::MAX.add_elem(1), i32::MIN);
        assert_eq!((-7i64).div_elem(2), -3);
        assert_eq!(i32::from_f64(-2.9), -2);
    }
}
