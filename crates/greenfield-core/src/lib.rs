//! Greenfield Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Greenfield
//! project bootstrapper, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         greenfield-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │          (BootstrapService)             │
//! │    Runs the four pipeline stages        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Filesystem, VersionControl,           │
//! │   HostingApi, EnvManager)               │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   greenfield-adapters (Infrastructure)  │
//! │  (LocalFilesystem, GitCli,              │
//! │   GithubHosting, VenvManager)           │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain Layer (Pure Logic)         │
//! │  (BootstrapConfig, ProjectPaths,        │
//! │   TokenMap, RunReport)                  │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use greenfield_core::{
//!     application::BootstrapService,
//!     domain::{BootstrapConfig, ProjectName, TemplateSource},
//! };
//!
//! // 1. Validate input once, at the boundary
//! let name = ProjectName::parse("my-widget").unwrap();
//! let config = BootstrapConfig::new(name, "/home/me/projects", false, None).unwrap();
//! let source = TemplateSource::LocalPath("/home/me/repos/st-experiment-template".into());
//!
//! // 2. Use the application service (with injected adapters)
//! let service = BootstrapService::new(filesystem, vcs, hosting, env);
//! let report = service.run(&config, &source);
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BootstrapService,
        ports::{EnvManager, Filesystem, HostingApi, VersionControl},
    };
    pub use crate::domain::{
        BootstrapConfig, ProjectName, ProjectPaths, RemoteCredentials, RunReport, Stage,
        StageFailure, TemplateName, TemplateSource, TokenMap,
    };
    pub use crate::error::{GreenfieldError, GreenfieldResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
