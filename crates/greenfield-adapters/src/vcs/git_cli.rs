//! Version-control adapter shelling out to the git binary.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use greenfield_core::{
    application::{ApplicationError, ports::VersionControl},
    error::GreenfieldResult,
};

/// Git adapter invoking the `git` binary as a subprocess.
///
/// Every call is single-attempt; a failing command surfaces git's stderr in
/// the error. The repository path is passed per call because the adapter is
/// constructed before the repository exists.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    /// Create an adapter using `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: "git".into(),
        }
    }

    /// Create an adapter using a specific git binary (testing, odd installs).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, cwd: Option<&Path>, args: &[&str]) -> GreenfieldResult<String> {
        let rendered = format!("{} {}", self.program, args.join(" "));
        debug!(command = %rendered, "Running version-control command");

        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| ApplicationError::VersionControl {
            command: rendered.clone(),
            details: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ApplicationError::VersionControl {
                command: rendered,
                details: if stderr.is_empty() {
                    "unknown error".to_string()
                } else {
                    stderr
                },
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for GitCli {
    fn clone_branch(&self, url: &str, dir: &Path, branch: &str) -> GreenfieldResult<()> {
        let target = dir.display().to_string();
        self.run(None, &["clone", "--branch", branch, url, target.as_str()])?;
        Ok(())
    }

    fn init(&self, dir: &Path) -> GreenfieldResult<()> {
        self.run(Some(dir), &["init"])?;
        Ok(())
    }

    fn add_all(&self, dir: &Path) -> GreenfieldResult<()> {
        self.run(Some(dir), &["add", "--all"])?;
        Ok(())
    }

    fn commit(&self, dir: &Path, message: &str) -> GreenfieldResult<()> {
        self.run(Some(dir), &["commit", "-m", message])?;
        Ok(())
    }

    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> GreenfieldResult<()> {
        self.run(Some(dir), &["remote", "add", name, url])?;
        Ok(())
    }

    fn push(&self, dir: &Path, remote: &str, branch_spec: &str) -> GreenfieldResult<()> {
        self.run(Some(dir), &["push", "--set-upstream", remote, branch_spec])?;
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
