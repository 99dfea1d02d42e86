//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use greenfield_core::{application::ports::Filesystem, error::GreenfieldResult};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_new(&self, path: &Path) -> GreenfieldResult<()> {
        // Parents may be created freely; the leaf must not exist yet.
        // `fs::create_dir` makes the leaf check atomic.
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create parent directories"))?;
        }
        std::fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> GreenfieldResult<()> {
        for entry in WalkDir::new(src).follow_links(false) {
            let entry = entry.map_err(|e| map_walk_error(src, e))?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| map_io_error(entry.path(), io::Error::other(e), "relativize path"))?;
            let target = dst.join(relative);

            let file_type = entry.file_type();
            if file_type.is_dir() {
                std::fs::create_dir_all(&target)
                    .map_err(|e| map_io_error(&target, e, "create directory"))?;
            } else if file_type.is_file() {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| map_io_error(parent, e, "create directory"))?;
                }
                // fs::copy carries the source file's permission bits along.
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(entry.path(), e, "copy file"))?;
            }
            // Symlinks and other special files are skipped.
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> GreenfieldResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn rename(&self, from: &Path, to: &Path) -> GreenfieldResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn walk_files(&self, root: &Path) -> GreenfieldResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| map_walk_error(root, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read_file(&self, path: &Path) -> GreenfieldResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> GreenfieldResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> greenfield_core::error::GreenfieldError {
    use greenfield_core::application::ApplicationError;

    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("failed to {}: {}", operation, e),
    }
    .into()
}

fn map_walk_error(root: &Path, e: walkdir::Error) -> greenfield_core::error::GreenfieldError {
    use greenfield_core::application::ApplicationError;

    ApplicationError::Filesystem {
        path: e
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
        reason: format!("walk failed: {}", e),
    }
    .into()
}

// ── tests ─────────────────────────────────────────────────────────────────────
