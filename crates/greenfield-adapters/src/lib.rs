//! Infrastructure adapters for Greenfield.
//!
//! This crate implements the ports defined in
//! `greenfield_core::application::ports`. It contains all external
//! dependencies and I/O operations: the real filesystem, the git binary,
//! the hosting HTTP API, and the Python environment tooling.

pub mod environment;
pub mod filesystem;
pub mod hosting;
pub mod vcs;

// Re-export commonly used adapters
pub use environment::{NullEnv, VenvManager};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use hosting::{DEFAULT_API_URL, GithubHosting};
pub use vcs::GitCli;
