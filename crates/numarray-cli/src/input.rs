//! Operand files.
//!
//! An operand file holds one of
//! - a JSON number (a scalar operand),
//! - a nested JSON list of numbers,
//! - an object `{"shape": [...], "dtype": "...", "values": ...}` where only
//!   `values` is required. A given `shape` must match the nesting of
//!   `values`, or `values` may be a flat list of `product(shape)` numbers.
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use numarray::{DType, NumericArray, Scalar, Values};

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Array(NumericArray),
    Scalar(Scalar),
}

impl Input {
    /// The operand as an array; a scalar becomes a rank-0 array of its own
    /// dtype.
    pub fn into_array(self) -> Result<NumericArray> {
        match self {
            Input::Array(array) => Ok(array),
            Input::Scalar(scalar) => Ok(NumericArray::create(
                &[],
                scalar.dtype(),
                Some(Values::Scalar(scalar)),
            )?),
        }
    }
}

pub fn load_input<P: AsRef<Path>>(path: P, default_dtype: DType) -> Result<Input> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read operand: {}", path.display()))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse operand: {}", path.display()))?;
    parse_input(&json, default_dtype)
        .with_context(|| format!("Invalid operand: {}", path.display()))
}

pub fn parse_input(json: &Value, default_dtype: DType) -> Result<Input> {
    match json {
        Value::Number(_) => Ok(Input::Scalar(Scalar::from_json("load", json)?)),
        Value::Array(_) => Ok(Input::Array(NumericArray::from_json(json, default_dtype)?)),
        Value::Object(fields) => {
            let dtype = match fields.get("dtype") {
                Some(Value::String(name)) => DType::from_str(name).map_err(anyhow::Error::msg)?,
                Some(other) => bail!("dtype must be a string, found {}", other),
                None => default_dtype,
            };
            let values = fields
                .get("values")
                .context("operand object has no \"values\" field")?;
            let values = Values::from_json(values)?;
            let array = match fields.get("shape") {
                Some(shape) => {
                    let shape: Vec<usize> = serde_json::from_value(shape.clone())
                        .context("shape must be a list of non-negative integers")?;
                    with_shape(&shape, values, dtype)?
                }
                None => NumericArray::from_values(values, dtype)?,
            };
            Ok(Input::Array(array))
        }
        other => bail!("expected a number, a list or an object, found {}", other),
    }
}

fn with_shape(shape: &[usize], values: Values, dtype: DType) -> Result<NumericArray> {
    if values.shape()? == shape {
        return Ok(NumericArray::create(shape, dtype, Some(values))?);
    }
    let flat = values.flatten();
    let mut array = NumericArray::zeros(shape, dtype);
    if flat.len() != array.len() {
        bail!(
            "shape {:?} needs {} values, found {}",
            shape,
            array.len(),
            flat.len()
        );
    }
    for (position, value) in flat.into_iter().enumerate() {
        array.set_flat(position, value)?;
    }
    Ok(array)
}
