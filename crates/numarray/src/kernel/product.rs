//! Matrix products and axis permutations.
use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Ix1, Ix2};
use num_traits::Zero;
use rayon::prelude::*;

use crate::array::{Buffer, NumericArray};
use crate::dtype::Element;
use crate::error::{ArrayError, Result};
use crate::scalar::Scalar;

/// `lhs @ rhs` for rank-1 and rank-2 operands.
///
/// A rank-1 left operand is a row vector and a rank-1 right operand a column
/// vector; the added axis does not appear in the result.
pub(crate) fn matmul(
    lhs: &NumericArray,
    rhs: &NumericArray,
    parallel_threshold: usize,
) -> Result<NumericArray> {
    for operand in [lhs, rhs] {
        if !(1..=2).contains(&operand.ndim()) {
            return Err(ArrayError::shape(
                "matmul",
                "an operand of rank 1 or 2",
                operand.shape(),
            ));
        }
    }
    let (ls, rs) = (lhs.shape(), rhs.shape());
    let (m, k) = if ls.len() == 2 { (ls[0], ls[1]) } else { (1, ls[0]) };
    let (k2, n) = if rs.len() == 2 { (rs[0], rs[1]) } else { (rs[0], 1) };
    if k != k2 {
        return Err(ArrayError::shape(
            "matmul",
            format!("leading dimension {}", k),
            rs,
        ));
    }

    let dtype = lhs.dtype().promote(rhs.dtype());
    let buffer = with_dtype!(dtype, T => {
        let a = lhs.buffer().cast::<T>();
        let b = rhs.buffer().cast::<T>();
        let a = as_matrix(&a, Axis(0)).ok_or_else(|| ArrayError::shape("matmul", "an operand of rank 1 or 2", ls))?;
        let b = as_matrix(&b, Axis(1)).ok_or_else(|| ArrayError::shape("matmul", "an operand of rank 1 or 2", rs))?;
        let mut out = multiply(a, b, parallel_threshold).into_dyn();
        if rs.len() == 1 {
            out = out.remove_axis(Axis(1));
        }
        if ls.len() == 1 {
            out = out.remove_axis(Axis(0));
        }
        T::wrap(out)
    });
    log::debug!("matmul {}x{} . {}x{} -> {:?} ({})", m, k, k, n, buffer.shape(), dtype);
    Ok(NumericArray::from_buffer(buffer))
}

/// Views a rank-2 array as-is, or a rank-1 array with a unit axis inserted
/// at `vector_axis`.
fn as_matrix<T: Element>(array: &ArrayD<T>, vector_axis: Axis) -> Option<ArrayView2<'_, T>> {
    match array.ndim() {
        2 => array.view().into_dimensionality::<Ix2>().ok(),
        1 => array
            .view()
            .into_dimensionality::<Ix1>()
            .ok()
            .map(|v| v.insert_axis(vector_axis)),
        _ => None,
    }
}

/// Splits output rows across the rayon pool once `m * k * n` reaches the
/// threshold.
fn multiply<T: Element>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>, threshold: usize) -> Array2<T> {
    let (m, k) = a.dim();
    let n = b.ncols();
    let work = m.saturating_mul(k).saturating_mul(n);
    let wrapping = T::DTYPE.is_integer();
    if m < 2 || work < threshold {
        if !wrapping {
            return a.dot(&b);
        }
        let mut out = Array2::<T>::zeros((m, n));
        for (mut out_row, a_row) in out.axis_iter_mut(Axis(0)).zip(a.axis_iter(Axis(0))) {
            wrapping_row(out_row.view_mut(), a_row, b);
        }
        return out;
    }

    log::debug!("matmul: splitting {} rows across {} threads", m, rayon::current_num_threads());
    let mut out = Array2::<T>::zeros((m, n));
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(a.axis_iter(Axis(0)).into_par_iter())
        .for_each(|(mut out_row, a_row)| {
            if wrapping {
                wrapping_row(out_row.view_mut(), a_row, b);
            } else {
                out_row.assign(&a_row.dot(&b));
            }
        });
    out
}

/// One output row of an integer product, wrapping on overflow.
fn wrapping_row<T: Element>(mut out_row: ArrayViewMut1<'_, T>, a_row: ArrayView1<'_, T>, b: ArrayView2<'_, T>) {
    for (cell, column) in out_row.iter_mut().zip(b.axis_iter(Axis(1))) {
        *cell = a_row
            .iter()
            .zip(column.iter())
            .fold(T::zero(), |acc, (&x, &y)| acc.add_elem(x.mul_elem(y)));
    }
}

/// Sum of pairwise products of two equal-length vectors.
pub(crate) fn inner(lhs: &NumericArray, rhs: &NumericArray) -> Result<Scalar> {
    for operand in [lhs, rhs] {
        if operand.ndim() != 1 {
            return Err(ArrayError::shape("inner", "a rank-1 operand", operand.shape()));
        }
    }
    if lhs.len() != rhs.len() {
        return Err(ArrayError::shape(
            "inner",
            format!("length {}", lhs.len()),
            rhs.shape(),
        ));
    }

    let dtype = lhs.dtype().promote(rhs.dtype());
    let value = with_dtype!(dtype, T => {
        let a = lhs.buffer().cast::<T>();
        let b = rhs.buffer().cast::<T>();
        a.iter().zip(b.iter()).fold(T::zero(), |acc, (&x, &y)| acc.add_elem(x.mul_elem(y))).to_scalar()
    });
    Ok(value)
}

/// Reverses every axis. Rank 0 and 1 come back as copies.
pub(crate) fn transpose(array: &NumericArray) -> NumericArray {
    NumericArray::from_buffer(dispatch!(array.buffer(), a => reversed(a)))
}

fn reversed<T: Element>(array: &ArrayD<T>) -> Buffer {
    T::wrap(array.t().as_standard_layout().into_owned())
}

pub(crate) fn transpose_axes(array: &NumericArray, axes: &[usize]) -> Result<NumericArray> {
    let ndim = array.ndim();
    let mut seen = vec![false; ndim];
    let is_permutation = axes.len() == ndim
        && axes.iter().all(|&axis| {
            axis < ndim && !std::mem::replace(&mut seen[axis], true)
        });
    if !is_permutation {
        return Err(ArrayError::shape(
            "transpose",
            format!("a permutation of 0..{} (axes {:?})", ndim, axes),
            array.shape(),
        ));
    }
    Ok(NumericArray::from_buffer(
        dispatch!(array.buffer(), a => permuted(a, axes)),
    ))
}

fn permuted<T: Element>(array: &ArrayD<T>, axes: &[usize]) -> Buffer {
    T::wrap(
        array
            .view()
            .permuted_axes(axes.to_vec())
            .as_standard_layout()
            .into_owned(),
    )
}
