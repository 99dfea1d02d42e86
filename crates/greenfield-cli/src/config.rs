//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `GREENFIELD_*` environment variables
//! 3. Config file (`--config` path, else the platform default location)
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where new projects land.
    pub projects: ProjectsConfig,
    /// Where the template comes from.
    pub template: TemplateConfig,
    /// Hosting API endpoint and default credentials.
    pub hosting: HostingConfig,
    /// Environment provisioning settings.
    pub environment: EnvironmentConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    pub root_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub local_path: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostingConfig {
    pub api_url: String,
    pub username: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub python: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects: ProjectsConfig { root_dir: None },
            template: TemplateConfig {
                local_path: None,
                remote_url: None,
                branch: "main".into(),
            },
            hosting: HostingConfig {
                api_url: greenfield_adapters::DEFAULT_API_URL.into(),
                username: None,
                token: None,
            },
            environment: EnvironmentConfig {
                python: "python3".into(),
            },
            output: OutputConfig { no_color: false },
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// The `config_file` parameter is the path the user passed via `--config`
    /// (or `None` to use the default location). A missing default file is
    /// fine; a missing explicit file is an error.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?);

        match config_file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.clone()));
            }
            None => {
                let default_path = Self::config_path();
                if default_path.is_file() {
                    builder = builder.add_source(config::File::from(default_path));
                }
            }
        }

        // GREENFIELD_HOSTING__TOKEN=... maps onto hosting.token, etc.
        builder = builder.add_source(
            config::Environment::with_prefix("GREENFIELD").separator("__"),
        );

        builder
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.greenfield.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "greenfield", "greenfield")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".greenfield.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hosting_api_is_github() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.hosting.api_url, "https://api.github.com");
    }

    #[test]
    fn default_template_branch_is_main() {
        assert_eq!(AppConfig::default().template.branch, "main");
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg.environment.python, "python3");
        assert!(cfg.template.local_path.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn config_path_is_non_empty() {
        // Just assert it doesn't panic and returns a non-empty path.
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
