//! Operation dispatch and result rendering for the command line.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde_json::json;

use numarray::{Kernel, NumericArray, Operand, Scalar};

use crate::input::Input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
    Matmul,
    Dot,
    Transpose,
    Inverse,
    Determinant,
    Solve,
    Show,
}

impl Op {
    pub const ALL: [Op; 11] = [
        Op::Add,
        Op::Subtract,
        Op::Multiply,
        Op::Divide,
        Op::Matmul,
        Op::Dot,
        Op::Transpose,
        Op::Inverse,
        Op::Determinant,
        Op::Solve,
        Op::Show,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Subtract => "subtract",
            Op::Multiply => "multiply",
            Op::Divide => "divide",
            Op::Matmul => "matmul",
            Op::Dot => "dot",
            Op::Transpose => "transpose",
            Op::Inverse => "inverse",
            Op::Determinant => "determinant",
            Op::Solve => "solve",
            Op::Show => "show",
        }
    }

    /// Whether the operation takes a right-hand operand.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Op::Add | Op::Subtract | Op::Multiply | Op::Divide | Op::Matmul | Op::Dot | Op::Solve
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid operation: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Array(NumericArray),
    Scalar(Scalar),
}

impl Output {
    /// The display form, with `precision` digits for float values when set.
    pub fn render(&self, precision: Option<usize>) -> String {
        match (self, precision) {
            (Output::Array(array), Some(p)) => format!("{:.*}", p, array),
            (Output::Array(array), None) => array.to_string(),
            (Output::Scalar(scalar), Some(p)) => format!("{:.*}", p, scalar),
            (Output::Scalar(scalar), None) => scalar.to_string(),
        }
    }

    /// Infinite or NaN values, which JSON can only hold as `null`.
    pub fn non_finite_count(&self) -> usize {
        match self {
            Output::Array(array) => array.to_vec_f64().iter().filter(|v| !v.is_finite()).count(),
            Output::Scalar(scalar) => usize::from(!scalar.to_f64().is_finite()),
        }
    }

    /// `{"shape", "dtype", "values"}`; a scalar has an empty shape.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Output::Array(array) => json!({
                "shape": array.shape(),
                "dtype": array.dtype(),
                "values": array.to_json(),
            }),
            Output::Scalar(scalar) => json!({
                "shape": Vec::<usize>::new(),
                "dtype": scalar.dtype(),
                "values": scalar,
            }),
        }
    }
}

/// Applies `op` to `lhs` (and `rhs` for binary operations) on `kernel`.
pub fn evaluate(kernel: &Kernel, op: Op, lhs: &NumericArray, rhs: Option<&Input>) -> Result<Output> {
    log::debug!("evaluating {} on shape {:?} ({})", op, lhs.shape(), lhs.dtype());
    if !op.is_binary() {
        if rhs.is_some() {
            bail!("{} takes a single operand", op);
        }
        return Ok(match op {
            Op::Transpose => Output::Array(kernel.transpose(lhs)),
            Op::Inverse => Output::Array(kernel.inverse(lhs)?),
            Op::Determinant => Output::Scalar(Scalar::Float(kernel.determinant(lhs)?)),
            _ => Output::Array(lhs.clone()),
        });
    }

    let rhs = rhs.with_context(|| format!("{} needs a second operand", op))?;
    let operand = match rhs {
        Input::Array(array) => Operand::Array(array),
        Input::Scalar(scalar) => Operand::Scalar(*scalar),
    };
    let result = match op {
        Op::Add => kernel.add(lhs, operand)?,
        Op::Subtract => kernel.subtract(lhs, operand)?,
        Op::Multiply => kernel.multiply(lhs, operand)?,
        Op::Divide => kernel.divide(lhs, operand)?,
        Op::Matmul => kernel.matmul(lhs, operand)?,
        Op::Dot => kernel.dot(lhs, operand)?,
        _ => match rhs {
            Input::Array(b) => kernel.solve(lhs, b)?,
            Input::Scalar(scalar) => bail!("solve needs an array right-hand side, found scalar {}", scalar),
        },
    };
    Ok(Output::Array(result))
}

/// Writes `output` as pretty JSON to `path`.
pub fn write_output<P: AsRef<Path>>(path: P, output: &Output) -> Result<()> {
    let path = path.as_ref();
    let non_finite = output.non_finite_count();
    if non_finite > 0 {
        log::warn!(
            "[numarray] {} non-finite value(s) are written as null to {}",
            non_finite,
            path.display()
        );
    }
    let text = serde_json::to_string_pretty(&output.to_json())?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write output: {}", path.display()))?;
    log::info!("[numarray] Wrote result to {}", path.display());
    Ok(())
}

