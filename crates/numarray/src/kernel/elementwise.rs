//! Element-wise arithmetic between arrays and scalars.
use ndarray::{ArrayD, IxDyn, Zip};
use num_traits::Zero;

use crate::array::NumericArray;
use crate::config::Broadcasting;
use crate::dtype::Element;
use crate::error::{ArrayError, Result};
use crate::kernel::broadcast::broadcast_shape;
use crate::scalar::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
        }
    }

    fn func<T: Element>(self) -> fn(T, T) -> T {
        match self {
            BinaryOp::Add => T::add_elem,
            BinaryOp::Subtract => T::sub_elem,
            BinaryOp::Multiply => T::mul_elem,
            BinaryOp::Divide => T::div_elem,
        }
    }
}

/// Which side of the operator the scalar sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarSide {
    Left,
    Right,
}

pub(crate) fn array_array(
    op: BinaryOp,
    lhs: &NumericArray,
    rhs: &NumericArray,
    broadcasting: Broadcasting,
) -> Result<NumericArray> {
    let mismatch = || {
        let expected = match broadcasting {
            Broadcasting::Strict => format!("shape {:?}", lhs.shape()),
            Broadcasting::Numpy => format!("a shape broadcastable with {:?}", lhs.shape()),
        };
        ArrayError::shape(op.name(), expected, rhs.shape())
    };

    let shape = match broadcasting {
        Broadcasting::Strict if lhs.shape() == rhs.shape() => lhs.shape().to_vec(),
        Broadcasting::Strict => return Err(mismatch()),
        Broadcasting::Numpy => broadcast_shape(lhs.shape(), rhs.shape()).ok_or_else(mismatch)?,
    };

    let dtype = lhs.dtype().promote(rhs.dtype());
    let buffer = with_dtype!(dtype, T => {
        let a = lhs.buffer().cast::<T>();
        let b = rhs.buffer().cast::<T>();
        T::wrap(combine(op, &a, &b, &shape).ok_or_else(mismatch)??)
    });
    let out = NumericArray::from_buffer(buffer);
    warn_non_finite(op, &out);
    Ok(out)
}

/// `None` only if a view cannot be broadcast to `shape`, which the caller
/// has already ruled out.
fn combine<T: Element>(
    op: BinaryOp,
    lhs: &ArrayD<T>,
    rhs: &ArrayD<T>,
    shape: &[usize],
) -> Option<Result<ArrayD<T>>> {
    let lhs = lhs.broadcast(IxDyn(shape))?;
    let rhs = rhs.broadcast(IxDyn(shape))?;
    if op == BinaryOp::Divide && T::DTYPE.is_integer() && rhs.iter().any(|v| v.is_zero()) {
        return Some(Err(ArrayError::DivisionByZero { dtype: T::DTYPE }));
    }
    let f = op.func::<T>();
    Some(Ok(Zip::from(&lhs).and(&rhs).map_collect(|&a, &b| f(a, b))))
}

pub(crate) fn array_scalar(
    op: BinaryOp,
    array: &NumericArray,
    scalar: Scalar,
    side: ScalarSide,
) -> Result<NumericArray> {
    let dtype = array.dtype().promote_scalar(scalar);
    let buffer = with_dtype!(dtype, T => {
        let a = array.buffer().cast::<T>();
        let s = T::from_scalar(scalar);
        if op == BinaryOp::Divide && dtype.is_integer() {
            let zero_divisor = match side {
                ScalarSide::Right => s.is_zero(),
                ScalarSide::Left => a.iter().any(|v| v.is_zero()),
            };
            if zero_divisor {
                return Err(ArrayError::DivisionByZero { dtype });
            }
        }
        let f = op.func::<T>();
        T::wrap(match side {
            ScalarSide::Right => a.mapv(|v| f(v, s)),
            ScalarSide::Left => a.mapv(|v| f(s, v)),
        })
    });
    let out = NumericArray::from_buffer(buffer);
    warn_non_finite(op, &out);
    Ok(out)
}

fn warn_non_finite(op: BinaryOp, out: &NumericArray) {
    if op != BinaryOp::Divide || out.dtype().is_integer() {
        return;
    }
    let count = out.to_vec_f64().iter().filter(|v| !v.is_finite()).count();
    if count > 0 {
        log::warn!(
            "divide produced {} non-finite value(s) in a {:?} result",
            count,
            out.shape()
        );
    }
}
