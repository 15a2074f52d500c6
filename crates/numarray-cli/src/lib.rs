//! Library half of the `numarray` command: config loading, operand files and
//! operation dispatch. `main.rs` only wires these to clap.
pub mod config;
pub mod eval;
pub mod input;
