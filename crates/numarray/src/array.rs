use std::borrow::Cow;
use std::fmt;

use ndarray::{ArrayD, Axis, IxDyn};

use crate::dtype::{DType, Element};
use crate::error::{ArrayError, Result};
use crate::kernel::Kernel;
use crate::scalar::{Operand, Scalar};
use crate::values::Values;

/// Owned, contiguous element storage, one variant per [`DType`].
#[derive(Clone, Debug, PartialEq)]
pub enum Buffer {
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
}

impl Buffer {
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        with_dtype!(dtype, T => T::wrap(ArrayD::<T>::zeros(IxDyn(shape))))
    }

    pub fn dtype(&self) -> DType {
        match self {
            Buffer::Int32(_) => DType::Int32,
            Buffer::Int64(_) => DType::Int64,
            Buffer::Float32(_) => DType::Float32,
            Buffer::Float64(_) => DType::Float64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, array => array.shape())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, array => array.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The elements as `T`, borrowing when the dtype already matches.
    pub fn cast<T: Element>(&self) -> Cow<'_, ArrayD<T>> {
        if let Some(array) = T::unwrap_ref(self) {
            return Cow::Borrowed(array);
        }
        Cow::Owned(dispatch!(self, array => array.mapv(|v| v.cast::<T>())))
    }

    pub fn astype(&self, dtype: DType) -> Buffer {
        with_dtype!(dtype, T => T::wrap(self.cast::<T>().into_owned()))
    }
}

/// A dense n-dimensional array of numbers with value semantics.
///
/// Shape and dtype are read off the owned [`Buffer`], so
/// `product(shape) == len()` always holds. Every operation except
/// [`set`](NumericArray::set) allocates a fresh result.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericArray {
    buffer: Buffer,
}

impl NumericArray {
    /// Allocates an array of `shape`, zero-filled when `values` is `None`,
    /// otherwise copied from `values` converted to `dtype`.
    pub fn create(shape: &[usize], dtype: DType, values: Option<Values>) -> Result<Self> {
        let Some(values) = values else {
            return Ok(Self::zeros(shape, dtype));
        };
        let implied = values.shape()?;
        if implied != shape {
            return Err(ArrayError::shape(
                "create",
                format!("shape {:?}", shape),
                &implied,
            ));
        }
        let flat = values.flatten();
        let buffer = with_dtype!(dtype, T => {
            let data: Vec<T> = flat.into_iter().map(T::from_scalar).collect();
            T::wrap(
                ArrayD::from_shape_vec(IxDyn(shape), data)
                    .map_err(|_| ArrayError::shape("create", format!("shape {:?}", shape), &implied))?,
            )
        });
        Ok(Self { buffer })
    }

    /// Builds an array whose shape is inferred from the nesting of `values`.
    pub fn from_values(values: impl Into<Values>, dtype: DType) -> Result<Self> {
        let values = values.into();
        let shape = values.shape()?;
        Self::create(&shape, dtype, Some(values))
    }

    /// Wraps a row-major buffer of `T`.
    pub fn from_shape_vec<T: Element>(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let len = data.len();
        let array = ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|_| {
            ArrayError::shape(
                "from_shape_vec",
                format!("{} elements for shape {:?}", shape.iter().product::<usize>(), shape),
                &[len],
            )
        })?;
        Ok(Self {
            buffer: T::wrap(array),
        })
    }

    /// Parses a (nested) JSON list of numbers.
    pub fn from_json(value: &serde_json::Value, dtype: DType) -> Result<Self> {
        Self::from_values(Values::from_json(value)?, dtype)
    }

    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        Self {
            buffer: Buffer::zeros(shape, dtype),
        }
    }

    pub fn ones(shape: &[usize], dtype: DType) -> Self {
        Self::full(shape, 1, dtype)
    }

    pub fn full(shape: &[usize], value: impl Into<Scalar>, dtype: DType) -> Self {
        let value = value.into();
        let buffer = with_dtype!(dtype, T => T::wrap(ArrayD::from_elem(IxDyn(shape), T::from_scalar(value))));
        Self { buffer }
    }

    pub fn identity(n: usize, dtype: DType) -> Self {
        let buffer = with_dtype!(dtype, T => T::wrap(ndarray::Array2::<T>::eye(n).into_dyn()));
        Self { buffer }
    }

    pub fn zeros_like(other: &NumericArray) -> Self {
        Self::zeros(other.shape(), other.dtype())
    }

    pub fn ones_like(other: &NumericArray) -> Self {
        Self::ones(other.shape(), other.dtype())
    }

    pub fn from_buffer(buffer: Buffer) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    /// Typed view of the underlying ndarray, if `T` matches the dtype.
    pub fn as_array<T: Element>(&self) -> Option<&ArrayD<T>> {
        T::unwrap_ref(&self.buffer)
    }

    pub fn shape(&self) -> &[usize] {
        self.buffer.shape()
    }

    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn astype(&self, dtype: DType) -> NumericArray {
        Self {
            buffer: self.buffer.astype(dtype),
        }
    }

    /// Reads one element. `index` is a full multi-index, or a single flat
    /// row-major position when the array is not rank 1.
    pub fn get(&self, index: &[usize]) -> Result<Scalar> {
        let index = self.resolve(index)?;
        Ok(dispatch!(&self.buffer, array => array[index.as_slice()].to_scalar()))
    }

    /// Writes one element in place, converting `value` to the array's dtype.
    pub fn set(&mut self, index: &[usize], value: impl Into<Scalar>) -> Result<()> {
        let index = self.resolve(index)?;
        let value = value.into();
        dispatch!(&mut self.buffer, array => store(array, &index, value));
        Ok(())
    }

    pub fn get_flat(&self, position: usize) -> Result<Scalar> {
        let index = self.unravel(position)?;
        Ok(dispatch!(&self.buffer, array => array[index.as_slice()].to_scalar()))
    }

    pub fn set_flat(&mut self, position: usize, value: impl Into<Scalar>) -> Result<()> {
        let index = self.unravel(position)?;
        let value = value.into();
        dispatch!(&mut self.buffer, array => store(array, &index, value));
        Ok(())
    }

    /// The only element of a single-element array.
    pub fn item(&self) -> Result<Scalar> {
        if self.len() != 1 {
            return Err(ArrayError::shape("item", "exactly one element", self.shape()));
        }
        self.get_flat(0)
    }

    fn resolve(&self, index: &[usize]) -> Result<Vec<usize>> {
        let shape = self.shape();
        if index.len() == shape.len() {
            if index.iter().zip(shape).all(|(i, dim)| i < dim) {
                return Ok(index.to_vec());
            }
        } else if index.len() == 1 {
            return self.unravel(index[0]);
        }
        Err(ArrayError::IndexOutOfBounds {
            index: index.to_vec(),
            shape: shape.to_vec(),
        })
    }

    fn unravel(&self, position: usize) -> Result<Vec<usize>> {
        let shape = self.shape();
        if position >= self.len() {
            return Err(ArrayError::IndexOutOfBounds {
                index: vec![position],
                shape: shape.to_vec(),
            });
        }
        let mut rest = position;
        let mut index = vec![0; shape.len()];
        for (slot, &dim) in index.iter_mut().zip(shape).rev() {
            *slot = rest % dim;
            rest /= dim;
        }
        Ok(index)
    }

    /// Elements in row-major order, converted to `f64`.
    pub fn to_vec_f64(&self) -> Vec<f64> {
        dispatch!(&self.buffer, array => array.iter().map(|v| v.to_f64()).collect())
    }

    /// Nested JSON lists mirroring the shape.
    pub fn to_json(&self) -> serde_json::Value {
        dispatch!(&self.buffer, array => nested_json(array.view()))
    }

    /// Element-wise `|a - b| <= atol + rtol * |b|` over equal shapes.
    pub fn allclose(&self, other: &NumericArray, rtol: f64, atol: f64) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        self.to_vec_f64()
            .iter()
            .zip(other.to_vec_f64().iter())
            .all(|(a, b)| (a - b).abs() <= atol + rtol * b.abs())
    }

    pub fn add<'a>(&self, other: impl Into<Operand<'a>>) -> Result<NumericArray> {
        Kernel::default().add(self, other)
    }

    pub fn subtract<'a>(&self, other: impl Into<Operand<'a>>) -> Result<NumericArray> {
        Kernel::default().subtract(self, other)
    }

    pub fn multiply<'a>(&self, other: impl Into<Operand<'a>>) -> Result<NumericArray> {
        Kernel::default().multiply(self, other)
    }

    pub fn divide<'a>(&self, other: impl Into<Operand<'a>>) -> Result<NumericArray> {
        Kernel::default().divide(self, other)
    }

    pub fn matmul<'a>(&self, other: impl Into<Operand<'a>>) -> Result<NumericArray> {
        Kernel::default().matmul(self, other)
    }

    pub fn dot<'a>(&self, other: impl Into<Operand<'a>>) -> Result<NumericArray> {
        Kernel::default().dot(self, other)
    }

    pub fn inner(&self, other: &NumericArray) -> Result<Scalar> {
        Kernel::default().inner(self, other)
    }

    pub fn transpose(&self) -> NumericArray {
        Kernel::default().transpose(self)
    }

    pub fn transpose_axes(&self, axes: &[usize]) -> Result<NumericArray> {
        Kernel::default().transpose_axes(self, axes)
    }

    pub fn inverse(&self) -> Result<NumericArray> {
        Kernel::default().inverse(self)
    }

    pub fn determinant(&self) -> Result<f64> {
        Kernel::default().determinant(self)
    }

    pub fn solve(&self, rhs: &NumericArray) -> Result<NumericArray> {
        Kernel::default().solve(self, rhs)
    }
}

fn store<T: Element>(array: &mut ArrayD<T>, index: &[usize], value: Scalar) {
    array[index] = T::from_scalar(value);
}

fn nested_json<T: Element>(view: ndarray::ArrayViewD<'_, T>) -> serde_json::Value {
    if view.ndim() == 0 {
        return match view.iter().next().map(|v| v.to_scalar()) {
            Some(Scalar::Int(v)) => serde_json::Value::from(v),
            Some(Scalar::Float(v)) => serde_json::Value::from(v),
            None => serde_json::Value::Null,
        };
    }
    serde_json::Value::Array(view.axis_iter(Axis(0)).map(nested_json).collect())
}

impl fmt::Display for NumericArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(&self.buffer, array => fmt::Display::fmt(array, f))
    }
}
