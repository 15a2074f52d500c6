//! `+ - * /` for arrays. Each operator yields a `Result` since shapes and
//! integer divisors are only known at runtime.
use std::ops::{Add, Div, Mul, Sub};

use crate::array::NumericArray;
use crate::error::Result;
use crate::kernel::{BinaryOp, Kernel};
use crate::scalar::{Operand, Scalar};

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<'a, 'b> $trait<&'b NumericArray> for &'a NumericArray {
            type Output = Result<NumericArray>;

            fn $method(self, rhs: &'b NumericArray) -> Self::Output {
                Kernel::default().binary($op, self, Operand::Array(rhs))
            }
        }

        impl<'a> $trait<f64> for &'a NumericArray {
            type Output = Result<NumericArray>;

            fn $method(self, rhs: f64) -> Self::Output {
                Kernel::default().binary($op, self, Operand::Scalar(Scalar::Float(rhs)))
            }
        }

        impl<'a> $trait<i64> for &'a NumericArray {
            type Output = Result<NumericArray>;

            fn $method(self, rhs: i64) -> Self::Output {
                Kernel::default().binary($op, self, Operand::Scalar(Scalar::Int(rhs)))
            }
        }

        impl<'a> $trait<&'a NumericArray> for f64 {
            type Output = Result<NumericArray>;

            fn $method(self, rhs: &'a NumericArray) -> Self::Output {
                Kernel::default().binary_scalar_lhs($op, Scalar::Float(self), rhs)
            }
        }

        impl<'a> $trait<&'a NumericArray> for i64 {
            type Output = Result<NumericArray>;

            fn $method(self, rhs: &'a NumericArray) -> Self::Output {
                Kernel::default().binary_scalar_lhs($op, Scalar::Int(self), rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, BinaryOp::Add);
impl_binary_op!(Sub, sub, BinaryOp::Subtract);
impl_binary_op!(Mul, mul, BinaryOp::Multiply);
impl_binary_op!(Div, div, BinaryOp::Divide);
