//! Error type shared by every array operation.
use thiserror::Error;

use crate::dtype::DType;

/// Failures raised by construction, element access and arithmetic.
///
/// All variants are raised at the point of detection, before any result
/// buffer is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrayError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("{op}: expected {expected}, got shape {actual:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: String,
        actual: Vec<usize>,
    },

    /// An operand is neither an array nor an accepted scalar for `op`.
    #[error("{op}: unsupported operand {found}")]
    OperandType { op: &'static str, found: String },

    /// Element access outside the array's extents.
    #[error("index {index:?} is out of bounds for shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },

    /// Inversion or solve on a singular (or numerically near-singular) matrix.
    #[error("matrix of size {size}x{size} is singular")]
    SingularMatrix { size: usize },

    /// Integer division with a zero divisor.
    #[error("integer division by zero ({dtype})")]
    DivisionByZero { dtype: DType },
}

impl ArrayError {
    pub(crate) fn shape(op: &'static str, expected: impl Into<String>, actual: &[usize]) -> Self {
        ArrayError::ShapeMismatch {
            op,
            expected: expected.into(),
            actual: actual.to_vec(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArrayError>;
