//! Execution-environment adapters.

pub mod venv;

pub use venv::{NullEnv, VenvManager};
