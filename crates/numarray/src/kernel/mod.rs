//! The numeric kernel every [`NumericArray`] operation is dispatched through.
//!
//! Storage, element-wise arithmetic, broadcasting views, matrix products and
//! display come from `ndarray`; inverse, determinant and solve use the LU
//! factorization in [`linalg`].
pub mod broadcast;
pub mod elementwise;
pub mod linalg;
pub mod product;

pub use elementwise::BinaryOp;

use crate::array::NumericArray;
use crate::config::{Broadcasting, KernelConfig};
use crate::error::{ArrayError, Result};
use crate::scalar::{Operand, Scalar};
use elementwise::ScalarSide;

#[derive(Debug, Clone, Default)]
pub struct Kernel {
    config: KernelConfig,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn add<'a>(&self, lhs: &NumericArray, rhs: impl Into<Operand<'a>>) -> Result<NumericArray> {
        self.binary(BinaryOp::Add, lhs, rhs.into())
    }

    pub fn subtract<'a>(&self, lhs: &NumericArray, rhs: impl Into<Operand<'a>>) -> Result<NumericArray> {
        self.binary(BinaryOp::Subtract, lhs, rhs.into())
    }

    pub fn multiply<'a>(&self, lhs: &NumericArray, rhs: impl Into<Operand<'a>>) -> Result<NumericArray> {
        self.binary(BinaryOp::Multiply, lhs, rhs.into())
    }

    pub fn divide<'a>(&self, lhs: &NumericArray, rhs: impl Into<Operand<'a>>) -> Result<NumericArray> {
        self.binary(BinaryOp::Divide, lhs, rhs.into())
    }

    /// `lhs <op> rhs`, always into a fresh array.
    pub fn binary(&self, op: BinaryOp, lhs: &NumericArray, rhs: Operand<'_>) -> Result<NumericArray> {
        log::debug!(
            "{}: {:?} ({}) with {}",
            op.name(),
            lhs.shape(),
            lhs.dtype(),
            rhs.describe()
        );
        match rhs {
            Operand::Array(rhs) => elementwise::array_array(op, lhs, rhs, self.config.broadcasting),
            Operand::Scalar(scalar) => elementwise::array_scalar(op, lhs, scalar, ScalarSide::Right),
        }
    }

    /// `lhs <op> rhs` with the scalar on the left, e.g. `1.0 / a`.
    pub fn binary_scalar_lhs(&self, op: BinaryOp, lhs: Scalar, rhs: &NumericArray) -> Result<NumericArray> {
        log::debug!("{}: scalar {} with {:?} ({})", op.name(), lhs, rhs.shape(), rhs.dtype());
        elementwise::array_scalar(op, rhs, lhs, ScalarSide::Left)
    }

    pub fn matmul<'a>(&self, lhs: &NumericArray, rhs: impl Into<Operand<'a>>) -> Result<NumericArray> {
        match rhs.into() {
            Operand::Array(rhs) => product::matmul(lhs, rhs, self.config.parallel_threshold),
            other @ Operand::Scalar(_) => Err(ArrayError::OperandType {
                op: "matmul",
                found: other.describe(),
            }),
        }
    }

    /// Scalar (or rank-0) operands multiply element-wise, two vectors give a
    /// rank-0 inner product, everything else is [`matmul`](Kernel::matmul).
    pub fn dot<'a>(&self, lhs: &NumericArray, rhs: impl Into<Operand<'a>>) -> Result<NumericArray> {
        let rhs = match rhs.into() {
            Operand::Scalar(scalar) => {
                return elementwise::array_scalar(BinaryOp::Multiply, lhs, scalar, ScalarSide::Right)
            }
            Operand::Array(rhs) => rhs,
        };
        match (lhs.ndim(), rhs.ndim()) {
            (0, _) | (_, 0) => {
                elementwise::array_array(BinaryOp::Multiply, lhs, rhs, Broadcasting::Numpy)
            }
            (1, 1) => {
                let value = product::inner(lhs, rhs)?;
                Ok(NumericArray::full(&[], value, lhs.dtype().promote(rhs.dtype())))
            }
            _ => product::matmul(lhs, rhs, self.config.parallel_threshold),
        }
    }

    pub fn inner(&self, lhs: &NumericArray, rhs: &NumericArray) -> Result<Scalar> {
        product::inner(lhs, rhs)
    }

    pub fn transpose(&self, array: &NumericArray) -> NumericArray {
        product::transpose(array)
    }

    pub fn transpose_axes(&self, array: &NumericArray, axes: &[usize]) -> Result<NumericArray> {
        product::transpose_axes(array, axes)
    }

    pub fn inverse(&self, array: &NumericArray) -> Result<NumericArray> {
        linalg::inverse(array, self.config.singular_tolerance)
    }

    pub fn determinant(&self, array: &NumericArray) -> Result<f64> {
        linalg::determinant(array)
    }

    pub fn solve(&self, a: &NumericArray, b: &NumericArray) -> Result<NumericArray> {
        linalg::solve(a, b, self.config.singular_tolerance)
    }
}
