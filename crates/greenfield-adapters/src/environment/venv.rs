//! Python virtual-environment provisioning via subprocess.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use greenfield_core::{
    application::{ApplicationError, ports::EnvManager},
    error::GreenfieldResult,
};

/// Environment manager backed by `python -m venv` and the environment's own
/// pip. Both operations are single-attempt.
#[derive(Debug, Clone)]
pub struct VenvManager {
    python: String,
}

impl VenvManager {
    /// Create a manager using the given Python interpreter.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl Default for VenvManager {
    fn default() -> Self {
        Self::new("python3")
    }
}

/// Path of the environment's pip binary.
fn installer_path(env_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        env_dir.join("Scripts").join("pip.exe")
    } else {
        env_dir.join("bin").join("pip")
    }
}

fn run(program: &str, args: &[&str]) -> GreenfieldResult<()> {
    let rendered = format!("{} {}", program, args.join(" "));
    debug!(command = %rendered, "Running environment command");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ApplicationError::Environment {
            reason: format!("{rendered}: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ApplicationError::Environment {
            reason: if stderr.is_empty() {
                format!("{rendered}: exited with {}", output.status)
            } else {
                format!("{rendered}: {stderr}")
            },
        }
        .into());
    }
    Ok(())
}

impl EnvManager for VenvManager {
    fn create_env(&self, env_dir: &Path) -> GreenfieldResult<()> {
        let dir = env_dir.display().to_string();
        run(&self.python, &["-m", "venv", &dir])
    }

    fn upgrade_installer(&self, env_dir: &Path) -> GreenfieldResult<()> {
        let pip = installer_path(env_dir);
        run(
            &pip.display().to_string(),
            &["install", "--upgrade", "pip"],
        )
    }
}

/// No-op environment manager used when provisioning is disabled
/// (`--no-env`). The pipeline shape stays the same; the stage just does
/// nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEnv;

impl EnvManager for NullEnv {
    fn create_env(&self, _env_dir: &Path) -> GreenfieldResult<()> {
        debug!("Environment provisioning disabled; skipping creation");
        Ok(())
    }

    fn upgrade_installer(&self, _env_dir: &Path) -> GreenfieldResult<()> {
        debug!("Environment provisioning disabled; skipping installer upgrade");
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
