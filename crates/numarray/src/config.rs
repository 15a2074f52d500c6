use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How element-wise operations treat operands of different shapes.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Broadcasting {
    /// Shapes must be identical.
    #[default]
    Strict,
    /// NumPy rules: align from the right, extents of 1 stretch.
    Numpy,
}

impl FromStr for Broadcasting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" | "none" => Ok(Broadcasting::Strict),
            "numpy" => Ok(Broadcasting::Numpy),
            _ => Err(format!(
                "Unknown broadcasting mode: {}. Expected `strict` or `numpy`",
                s
            )),
        }
    }
}

/// Tunables for the numeric kernel.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KernelConfig {
    pub broadcasting: Broadcasting,

    /// A pivot at or below `singular_tolerance * max|a_ij|` makes a matrix
    /// singular for `inverse` and `solve`.
    pub singular_tolerance: f64,

    /// Matrix products with `m * k * n` at or above this are split by rows
    /// across the rayon pool.
    pub parallel_threshold: usize,
}

impl KernelConfig {
    pub fn new(broadcasting: Broadcasting) -> Self {
        Self {
            broadcasting,
            ..Self::default()
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            broadcasting: Broadcasting::Strict,
            singular_tolerance: 1e-12,
            parallel_threshold: 1 << 18,
        }
    }
}
