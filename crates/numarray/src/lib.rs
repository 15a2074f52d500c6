//! numarray: dense n-dimensional numeric arrays on top of `ndarray`.
//!
//! A [`NumericArray`] pairs a shape and a [`DType`] with an owned, row-major
//! buffer. Element-wise arithmetic, matrix products, transpose, dot,
//! inverse, determinant and solve all go through a [`Kernel`], which owns
//! the broadcasting and numeric tolerances in [`KernelConfig`]. The array's
//! own methods use the default kernel.
//!
//! ```
//! use numarray::{DType, NumericArray};
//!
//! let a = NumericArray::from_values([[1, 2], [3, 4]], DType::Float64).unwrap();
//! let b = NumericArray::from_values([[5, 6], [7, 8]], DType::Float64).unwrap();
//! assert_eq!(a.matmul(&b).unwrap().to_vec_f64(), vec![19.0, 22.0, 43.0, 50.0]);
//! ```
#[macro_use]
mod macros;

pub mod array;
pub mod config;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod ops;
pub mod scalar;
pub mod values;

pub use array::{Buffer, NumericArray};
pub use config::{Broadcasting, KernelConfig};
pub use dtype::{DType, Element};
pub use error::{ArrayError, Result};
pub use kernel::{BinaryOp, Kernel};
pub use scalar::{Operand, Scalar};
pub use values::Values;
