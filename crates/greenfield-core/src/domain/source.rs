//! Where the template content comes from.

use std::fmt;
use std::path::PathBuf;

use crate::domain::error::DomainError;
use crate::domain::project::TemplateName;

/// The template source for one run.
///
/// Exactly one variant is active per run, selected at the boundary by the
/// `sync_remote` flag: local copy for offline runs, branch clone when the
/// project will be synchronized with a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Copy an existing local template directory.
    LocalPath(PathBuf),
    /// Clone a specific branch of a remote template repository.
    RemoteRef { url: String, branch: String },
}

impl TemplateSource {
    /// Derive the template's own name from its basename.
    ///
    /// For a local path this is the directory name; for a remote ref the last
    /// URL segment with any `.git` suffix dropped.
    pub fn template_name(&self) -> Result<TemplateName, DomainError> {
        let raw = match self {
            Self::LocalPath(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned),
            Self::RemoteRef { url, .. } => url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .map(|segment| segment.trim_end_matches(".git").to_owned()),
        };

        let raw = raw
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DomainError::UnnamedTemplateSource {
                src: self.to_string(),
            })?;

        TemplateName::parse(raw)
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPath(path) => write!(f, "{}", path.display()),
            Self::RemoteRef { url, branch } => write!(f, "{url}#{branch}"),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
