//! Square-matrix routines built on an LU factorization with partial pivoting.
use ndarray::{Array2, ArrayView2, Axis, Ix1, Ix2};

use crate::array::{Buffer, NumericArray};
use crate::error::{ArrayError, Result};

/// `P A = L U` packed into one matrix: `L` (unit diagonal) below the
/// diagonal, `U` on and above it.
#[derive(Debug, Clone)]
pub struct Lu {
    lu: Array2<f64>,
    /// Row `i` of the factored matrix is row `pivots[i]` of the input.
    pivots: Vec<usize>,
    sign: f64,
    /// Largest absolute input entry, the reference for singularity checks.
    scale: f64,
}

impl Lu {
    pub fn factor(mut a: Array2<f64>) -> Lu {
        let n = a.nrows();
        let scale = a.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let mut pivots: Vec<usize> = (0..n).collect();
        let mut sign = 1.0;

        for k in 0..n {
            let mut pivot_row = k;
            let mut max_val = a[[k, k]].abs();
            for i in (k + 1)..n {
                let val = a[[i, k]].abs();
                if val > max_val {
                    max_val = val;
                    pivot_row = i;
                }
            }

            if pivot_row != k {
                pivots.swap(k, pivot_row);
                for j in 0..n {
                    a.swap([k, j], [pivot_row, j]);
                }
                sign = -sign;
            }

            let pivot = a[[k, k]];
            if pivot == 0.0 {
                // the whole column below is zero already
                continue;
            }
            for i in (k + 1)..n {
                let factor = a[[i, k]] / pivot;
                a[[i, k]] = factor;
                for j in (k + 1)..n {
                    a[[i, j]] -= factor * a[[k, j]];
                }
            }
        }

        Lu {
            lu: a,
            pivots,
            sign,
            scale,
        }
    }

    pub fn size(&self) -> usize {
        self.lu.nrows()
    }

    pub fn determinant(&self) -> f64 {
        let det = self.lu.diag().iter().fold(self.sign, |acc, v| acc * v);
        // no negative zero from the pivot sign
        if det == 0.0 {
            0.0
        } else {
            det
        }
    }

    /// True when some pivot is at most `tolerance` times the largest input
    /// entry. An all-zero matrix of positive size is always singular.
    pub fn is_singular(&self, tolerance: f64) -> bool {
        self.lu
            .diag()
            .iter()
            .any(|p| !(p.abs() > tolerance * self.scale))
    }

    /// Solves `A X = B` column by column. Only meaningful when
    /// [`is_singular`](Lu::is_singular) is false.
    pub fn solve(&self, b: ArrayView2<'_, f64>) -> Array2<f64> {
        let n = self.size();
        let mut x = Array2::<f64>::zeros(b.raw_dim());
        for (i, &row) in self.pivots.iter().enumerate() {
            x.row_mut(i).assign(&b.row(row));
        }

        for mut col in x.axis_iter_mut(Axis(1)) {
            for i in 0..n {
                let mut sum = col[i];
                for j in 0..i {
                    sum -= self.lu[[i, j]] * col[j];
                }
                col[i] = sum;
            }
            for i in (0..n).rev() {
                let mut sum = col[i];
                for j in (i + 1)..n {
                    sum -= self.lu[[i, j]] * col[j];
                }
                col[i] = sum / self.lu[[i, i]];
            }
        }
        x
    }

    pub fn inverse(&self) -> Array2<f64> {
        self.solve(Array2::<f64>::eye(self.size()).view())
    }
}

fn square_matrix(op: &'static str, array: &NumericArray) -> Result<Array2<f64>> {
    let shape = array.shape();
    let not_square = || ArrayError::shape(op, "a square rank-2 matrix", shape);
    if shape.len() != 2 || shape[0] != shape[1] {
        return Err(not_square());
    }
    array
        .buffer()
        .cast::<f64>()
        .view()
        .into_dimensionality::<Ix2>()
        .map(|view| view.to_owned())
        .map_err(|_| not_square())
}

fn factor_nonsingular(op: &'static str, array: &NumericArray, tolerance: f64) -> Result<Lu> {
    let lu = Lu::factor(square_matrix(op, array)?);
    if lu.is_singular(tolerance) {
        log::debug!("{}: rejecting singular {}x{} matrix", op, lu.size(), lu.size());
        return Err(ArrayError::SingularMatrix { size: lu.size() });
    }
    Ok(lu)
}

pub(crate) fn inverse(array: &NumericArray, tolerance: f64) -> Result<NumericArray> {
    let lu = factor_nonsingular("inverse", array, tolerance)?;
    let inv = NumericArray::from_buffer(Buffer::Float64(lu.inverse().into_dyn()));
    Ok(inv.astype(array.dtype().float_result()))
}

/// Never fails on singular input: an exactly zero pivot gives `0.0`.
pub(crate) fn determinant(array: &NumericArray) -> Result<f64> {
    Ok(Lu::factor(square_matrix("determinant", array)?).determinant())
}

pub(crate) fn solve(a: &NumericArray, b: &NumericArray, tolerance: f64) -> Result<NumericArray> {
    let n = a.shape().first().copied().unwrap_or(0);
    let bs = b.shape();
    if !(1..=2).contains(&bs.len()) || bs[0] != n {
        return Err(ArrayError::shape(
            "solve",
            format!("a rank-1 or rank-2 right-hand side with leading dimension {}", n),
            bs,
        ));
    }
    let lu = factor_nonsingular("solve", a, tolerance)?;

    let rhs = b.buffer().cast::<f64>();
    let rhs = match bs.len() {
        1 => rhs.view().into_dimensionality::<Ix1>().map(|v| v.insert_axis(Axis(1))),
        _ => rhs.view().into_dimensionality::<Ix2>(),
    }
    .map_err(|_| ArrayError::shape("solve", "a rank-1 or rank-2 right-hand side", bs))?;

    let mut x = lu.solve(rhs).into_dyn();
    if bs.len() == 1 {
        x = x.remove_axis(Axis(1));
    }
    let dtype = a.dtype().promote(b.dtype()).float_result();
    Ok(NumericArray::from_buffer(Buffer::Float64(x)).astype(dtype))
}
