//! Nested value sequences used to populate a new array.
use crate::error::{ArrayError, Result};
use crate::scalar::{describe_json, Scalar};

/// A scalar or a sequence of nested values, e.g. `[[1, 2], [3, 4]]`.
///
/// The implied shape is the length at each nesting level; every sequence at
/// the same level must have the same shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Scalar(Scalar),
    Seq(Vec<Values>),
}

impl Values {
    /// Shape implied by the nesting. Ragged input is a shape mismatch.
    pub fn shape(&self) -> Result<Vec<usize>> {
        match self {
            Values::Scalar(_) => Ok(Vec::new()),
            Values::Seq(items) => {
                let Some(first) = items.first() else {
                    return Ok(vec![0]);
                };
                let inner = first.shape()?;
                for item in &items[1..] {
                    let other = item.shape()?;
                    if other != inner {
                        return Err(ArrayError::shape(
                            "create",
                            format!("nested sequences of shape {:?}", inner),
                            &other,
                        ));
                    }
                }
                let mut shape = Vec::with_capacity(inner.len() + 1);
                shape.push(items.len());
                shape.extend(inner);
                Ok(shape)
            }
        }
    }

    /// Row-major leaves of the tree.
    pub fn flatten(&self) -> Vec<Scalar> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Scalar>) {
        match self {
            Values::Scalar(value) => out.push(*value),
            Values::Seq(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    /// Converts numbers and (nested) JSON lists. Any other JSON value is an
    /// operand type error.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(items) => items
                .iter()
                .map(Values::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Values::Seq),
            serde_json::Value::Number(_) => Scalar::from_json("create", value).map(Values::Scalar),
            other => Err(ArrayError::OperandType {
                op: "create",
                found: describe_json(other),
            }),
        }
    }
}

impl From<Scalar> for Values {
    fn from(value: Scalar) -> Self {
        Values::Scalar(value)
    }
}

macro_rules! impl_values_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Values {
                fn from(value: $ty) -> Self {
                    Values::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

impl_values_from_scalar!(i32, i64, f32, f64);

impl<T: Into<Values>> From<Vec<T>> for Values {
    fn from(value: Vec<T>) -> Self {
        Values::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Values>, const N: usize> From<[T; N]> for Values {
    fn from(value: [T; N]) -> Self {
        Values::Seq(value.into_iter().map(Into::into).collect())
    }
}
