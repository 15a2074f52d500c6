use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use numarray::{Broadcasting, DType, KernelConfig};

/// Settings for one evaluation, read from a JSON file and then overridden by
/// command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub kernel: KernelConfig,
    /// Dtype for operand files that do not name one.
    pub dtype: DType,
    /// Digits after the decimal point when printing float results.
    pub precision: Option<usize>,
}

impl EvalConfig {
    /// Starts from `config_path` (or defaults) and applies the `dtype`,
    /// `precision` and `broadcasting` flags present in `matches`.
    pub fn from_arguments(config_path: Option<&Path>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                log::info!("[numarray] Using config: {}", path.display());
                load_eval_config(path)?
            }
            None => EvalConfig::default(),
        };

        if let Some(dtype) = matches.get_one::<String>("dtype") {
            config.dtype = DType::from_str(dtype).map_err(anyhow::Error::msg)?;
        }
        if let Some(precision) = matches.get_one::<usize>("precision") {
            config.precision = Some(*precision);
        }
        if let Some(mode) = matches.get_one::<String>("broadcasting") {
            config.kernel.broadcasting = Broadcasting::from_str(mode).map_err(anyhow::Error::msg)?;
        }
        Ok(config)
    }
}

/// Load an evaluation configuration from a JSON file. Missing fields take
/// their defaults.
pub fn load_eval_config<P: AsRef<Path>>(path: P) -> Result<EvalConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: EvalConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
