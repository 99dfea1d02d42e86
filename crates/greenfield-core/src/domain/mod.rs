//! Core domain layer for Greenfield.
//!
//! This module contains pure business logic with ZERO external dependencies.
//! All I/O (filesystem, version control, network, subprocesses) is handled
//! via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No external crates**: Only std library + thiserror (+ serde derives)
//! - **Immutable values**: Everything here is validated at construction and
//!   never mutated afterwards

pub mod error;
pub mod project;
pub mod report;
pub mod source;
pub mod tokens;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use project::{BootstrapConfig, ProjectName, ProjectPaths, RemoteCredentials, TemplateName};
pub use report::{RunReport, Stage, StageFailure};
pub use source::TemplateSource;
pub use tokens::TokenMap;
