//! Application layer errors.
//!
//! These errors represent failures while running the pipeline stages, not
//! input validation. Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while a pipeline stage is executing.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Target directory already present; the run refuses to merge into it.
    #[error("project directory already exists at {path}")]
    ProjectDirExists { path: PathBuf },

    /// The materialized template is missing its expected source subdirectory.
    #[error("template shape mismatch: no '{expected}' directory under {repo_dir}")]
    TemplateShapeMismatch { expected: String, repo_dir: PathBuf },

    /// A filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// A version-control tool invocation failed.
    #[error("version control failed: {command}: {details}")]
    VersionControl { command: String, details: String },

    /// The hosting API answered, but not with "created".
    ///
    /// Carries the raw status and body so the caller can diagnose the refusal
    /// (quota, name collision, bad token scope, ...).
    #[error("hosting API returned {status}: {body}")]
    HostingRefused { status: u16, body: String },

    /// The hosting API could not be reached, or its answer was unreadable.
    #[error("hosting API request failed: {reason}")]
    HostingTransport { reason: String },

    /// Environment provisioning failed.
    #[error("environment provisioning failed: {reason}")]
    Environment { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectDirExists { path } => vec![
                format!("The directory '{}' already exists", path.display()),
                "Choose a different project name".into(),
                "Nothing was created or modified".into(),
            ],
            Self::TemplateShapeMismatch { expected, .. } => vec![
                format!("Expected the template to ship a '{}' source directory", expected),
                "Check that the template follows the hyphen-name/snake-dir convention".into(),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::VersionControl { command, .. } => vec![
                format!("Command failed: {}", command),
                "Ensure git is installed and on your PATH".into(),
                "For commit failures, check that user.name and user.email are configured".into(),
            ],
            Self::HostingRefused { status, .. } => vec![
                format!("The hosting API refused the request (HTTP {})", status),
                "A repository with this name may already exist".into(),
                "Check that the token has repository-creation scope".into(),
                "The local repository and commit were kept".into(),
            ],
            Self::HostingTransport { .. } => vec![
                "Could not reach the hosting API".into(),
                "Check your network connection and the configured hosting.api_url".into(),
            ],
            Self::Environment { .. } => vec![
                "Environment provisioning failed after the project was created".into(),
                "Check that the configured Python interpreter exists".into(),
                "The project tree and repository are intact".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectDirExists { .. } => ErrorCategory::Validation,
            Self::TemplateShapeMismatch { .. } => ErrorCategory::NotFound,
            Self::Filesystem { .. }
            | Self::VersionControl { .. }
            | Self::HostingRefused { .. }
            | Self::HostingTransport { .. }
            | Self::Environment { .. } => ErrorCategory::Internal,
        }
    }
}
