// ============================================================================
// domain/error.rs - INPUT VALIDATION ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the run report keeps the failing error)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("invalid template name '{name}': {reason}")]
    InvalidTemplateName { name: String, reason: String },

    #[error("project root directory must be absolute: {path}")]
    RelativeRootDir { path: PathBuf },

    #[error("cannot derive a template name from source '{src}'")]
    UnnamedTemplateSource { src: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("remote sync requested but no hosting credentials were supplied")]
    MissingCredentials,

    #[error("invalid hosting credentials: {reason}")]
    InvalidCredentials { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use lowercase letters, digits, and single hyphens".into(),
                "Examples: my-widget, experiment-03".into(),
            ],
            Self::InvalidTemplateName { name, .. } => vec![
                format!("Template name '{}' does not look like a template directory", name),
                "Point --template at a hyphen-named template checkout".into(),
            ],
            Self::RelativeRootDir { path } => vec![
                format!("'{}' is not an absolute path", path.display()),
                "Pass an absolute directory via --dir or configure projects.root_dir".into(),
            ],
            Self::MissingCredentials => vec![
                "Remote sync needs a hosting account and API token".into(),
                "Pass --user and --token, or set GREENFIELD_HOSTING_USER / GREENFIELD_HOSTING_TOKEN".into(),
            ],
            Self::InvalidCredentials { reason } => vec![
                format!("Credential problem: {}", reason),
                "Both the account name and the API token must be non-empty".into(),
            ],
            Self::UnnamedTemplateSource { src } => vec![
                format!("Could not extract a basename from '{}'", src),
                "Template paths and URLs must end in the template's name".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. }
            | Self::InvalidTemplateName { .. }
            | Self::RelativeRootDir { .. }
            | Self::UnnamedTemplateSource { .. } => ErrorCategory::Validation,
            Self::MissingCredentials | Self::InvalidCredentials { .. } => {
                ErrorCategory::Configuration
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
}
