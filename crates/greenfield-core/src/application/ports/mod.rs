//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `greenfield-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: directory/file operations
//!   - `VersionControl`: the repository tool
//!   - `HostingApi`: remote repository creation
//!   - `EnvManager`: isolated execution environments
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    CreatedRepository, EnvManager, Filesystem, HostingApi, RepositorySpec, VersionControl,
};
