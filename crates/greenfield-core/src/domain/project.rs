//! Project identity, credentials, and derived paths.
//!
//! # Design
//!
//! These are pure value types — validated at construction, equality-by-value,
//! immutable afterwards. The orchestrator never re-validates or recomputes
//! anything defined here: names are parsed once at the boundary, paths are
//! derived once per run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::error::DomainError;

// ── ProjectName ───────────────────────────────────────────────────────────────

/// A validated project name: a non-empty, lowercase, hyphen-separated token
/// such as `my-widget`.
///
/// The hyphenated form is the display name; [`ProjectName::snake_case`] is the
/// module-directory form used for the template's source subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Parse and validate a project name.
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_token(&name).map_err(|reason| DomainError::InvalidProjectName {
            name: name.clone(),
            reason,
        })?;
        Ok(Self(name))
    }

    /// The hyphenated display form, e.g. `my-widget`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The module-directory form: hyphens become underscores, e.g. `my_widget`.
    pub fn snake_case(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── TemplateName ──────────────────────────────────────────────────────────────

/// The template's own name, taken from its directory or clone-URL basename.
///
/// Same token rules and snake conversion as [`ProjectName`]; kept as a
/// separate type so the two cannot be swapped in a substitution pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateName(String);

impl TemplateName {
    /// Parse and validate a template name.
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_token(&name).map_err(|reason| DomainError::InvalidTemplateName {
            name: name.clone(),
            reason,
        })?;
        Ok(Self(name))
    }

    /// The hyphenated form, e.g. `st-experiment-template`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The source-subdirectory form, e.g. `st_experiment_template`.
    pub fn snake_case(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared token rules for project and template names.
fn validate_token(token: &str) -> Result<(), String> {
    if token.is_empty() {
        return Err("name cannot be empty".into());
    }
    if token.starts_with('-') || token.ends_with('-') {
        return Err("name cannot start or end with '-'".into());
    }
    if token.contains("--") {
        return Err("name cannot contain consecutive hyphens".into());
    }
    if let Some(c) = token
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(format!(
            "invalid character '{c}' (use lowercase letters, digits, and hyphens)"
        ));
    }
    Ok(())
}

// ── RemoteCredentials ─────────────────────────────────────────────────────────

/// Hosting-account credentials used for the single remote-creation call.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    username: String,
    token: String,
}

impl RemoteCredentials {
    /// Build credentials, rejecting empty components.
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Result<Self, DomainError> {
        let username = username.into();
        let token = token.into();
        if username.trim().is_empty() {
            return Err(DomainError::InvalidCredentials {
                reason: "account name is empty".into(),
            });
        }
        if token.trim().is_empty() {
            return Err(DomainError::InvalidCredentials {
                reason: "API token is empty".into(),
            });
        }
        Ok(Self { username, token })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// The token must never end up in logs or error output.
impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

// ── BootstrapConfig ───────────────────────────────────────────────────────────

/// Validated input for one bootstrap run. Constructed once, never mutated.
///
/// Invariant: `sync_remote == true` implies credentials are present. The
/// constructor enforces this, so a run can never reach the hosting stage
/// without a way to authenticate.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    project_name: ProjectName,
    project_root_dir: PathBuf,
    sync_remote: bool,
    remote_credentials: Option<RemoteCredentials>,
}

impl BootstrapConfig {
    /// Build a config, enforcing the cross-field invariants.
    pub fn new(
        project_name: ProjectName,
        project_root_dir: impl Into<PathBuf>,
        sync_remote: bool,
        remote_credentials: Option<RemoteCredentials>,
    ) -> Result<Self, DomainError> {
        let project_root_dir = project_root_dir.into();
        if !project_root_dir.is_absolute() {
            return Err(DomainError::RelativeRootDir {
                path: project_root_dir,
            });
        }
        if sync_remote && remote_credentials.is_none() {
            return Err(DomainError::MissingCredentials);
        }
        Ok(Self {
            project_name,
            project_root_dir,
            sync_remote,
            remote_credentials,
        })
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn project_root_dir(&self) -> &PathBuf {
        &self.project_root_dir
    }

    pub fn sync_remote(&self) -> bool {
        self.sync_remote
    }

    pub fn remote_credentials(&self) -> Option<&RemoteCredentials> {
        self.remote_credentials.as_ref()
    }
}

// ── ProjectPaths ──────────────────────────────────────────────────────────────

/// Paths derived once from a [`BootstrapConfig`].
///
/// Every stage consumes this bundle; none recomputes it. The repo checkout
/// lives one level below the project directory, both named after the project:
/// `<root>/<name>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub project_dir: PathBuf,
    pub repo_dir: PathBuf,
}

impl ProjectPaths {
    /// Compute the path bundle for a run.
    pub fn derive(config: &BootstrapConfig) -> Self {
        let project_dir = config
            .project_root_dir()
            .join(config.project_name().as_str());
        let repo_dir = project_dir.join(config.project_name().as_str());
        Self {
            project_dir,
            repo_dir,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
