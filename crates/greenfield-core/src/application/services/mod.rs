//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! high-level use case: "bootstrap a project from a template".

pub mod bootstrap_service;

pub use bootstrap_service::BootstrapService;
