//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `greenfield-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::RemoteCredentials;
use crate::error::GreenfieldResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `greenfield_adapters::filesystem::LocalFilesystem` (production)
/// - `greenfield_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - File content is bytes, not text: token substitution must touch every
///   file, including ones that are not valid UTF-8
/// - `create_dir_new` is the concurrency guard for a run: two runs racing on
///   the same project directory cannot both win it
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory, creating missing parents, failing if the leaf
    /// already exists.
    fn create_dir_new(&self, path: &Path) -> GreenfieldResult<()>;

    /// Recursively copy a directory tree, preserving structure and file
    /// permissions. The destination must not exist yet.
    fn copy_tree(&self, src: &Path, dst: &Path) -> GreenfieldResult<()>;

    /// Remove a directory and all its contents.
    fn remove_dir_all(&self, path: &Path) -> GreenfieldResult<()>;

    /// Rename a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> GreenfieldResult<()>;

    /// Every regular file under `root`, recursively.
    fn walk_files(&self, root: &Path) -> GreenfieldResult<Vec<PathBuf>>;

    /// Read a file's raw content.
    fn read_file(&self, path: &Path) -> GreenfieldResult<Vec<u8>>;

    /// Overwrite a file with raw content.
    fn write_file(&self, path: &Path, content: &[u8]) -> GreenfieldResult<()>;
}

/// Port for the version-control tool.
///
/// Implemented by `greenfield_adapters::vcs::GitCli` (subprocess). Every
/// operation is single-attempt; failures carry the tool's stderr.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Clone one branch of `url` into `dir`.
    fn clone_branch(&self, url: &str, dir: &Path, branch: &str) -> GreenfieldResult<()>;

    /// Initialize a fresh repository at `dir`.
    fn init(&self, dir: &Path) -> GreenfieldResult<()>;

    /// Stage everything under `dir`.
    fn add_all(&self, dir: &Path) -> GreenfieldResult<()>;

    /// Create a commit. Fails when no identity is configured.
    fn commit(&self, dir: &Path, message: &str) -> GreenfieldResult<()>;

    /// Register a named remote.
    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> GreenfieldResult<()>;

    /// Push `branch_spec` to `remote`, setting the upstream.
    fn push(&self, dir: &Path, remote: &str, branch_spec: &str) -> GreenfieldResult<()>;
}

/// What the hosting API is asked to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySpec {
    pub name: String,
    pub homepage: String,
    pub private: bool,
    pub has_issues: bool,
    pub has_wiki: bool,
}

impl RepositorySpec {
    /// Spec for a freshly bootstrapped project: private, issues and wiki on.
    pub fn private(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            homepage: String::new(),
            private: true,
            has_issues: true,
            has_wiki: true,
        }
    }
}

/// What the hosting API answered with on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRepository {
    /// URL to register as the repository's primary remote.
    pub clone_url: String,
}

/// Port for the repository-hosting API.
///
/// One call: create a remote repository. Anything other than the API's
/// "created" answer is an error carrying the raw response for diagnosis.
#[cfg_attr(test, mockall::automock)]
pub trait HostingApi: Send + Sync {
    fn create_repository(
        &self,
        spec: &RepositorySpec,
        credentials: &RemoteCredentials,
    ) -> GreenfieldResult<CreatedRepository>;
}

/// Port for the isolated-environment manager.
///
/// Implemented by `greenfield_adapters::environment::VenvManager` (Python
/// venv + pip) and `NullEnv` (provisioning disabled).
#[cfg_attr(test, mockall::automock)]
pub trait EnvManager: Send + Sync {
    /// Create an isolated environment rooted at `env_dir`.
    fn create_env(&self, env_dir: &Path) -> GreenfieldResult<()>;

    /// Upgrade the environment's package installer to its latest version.
    fn upgrade_installer(&self, env_dir: &Path) -> GreenfieldResult<()>;
}
