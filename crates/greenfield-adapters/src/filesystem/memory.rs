//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use greenfield_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{GreenfieldError, GreenfieldResult},
};

/// In-memory filesystem for testing.
///
/// Files live in a `BTreeMap` so `walk_files` returns a deterministic order.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating parent directories (testing helper).
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap();
        if let Some(parent) = path.parent() {
            add_dir_chain(&mut inner.directories, parent);
        }
        inner.files.insert(path, content.into());
    }

    /// Seed a directory (testing helper).
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let mut inner = self.inner.write().unwrap();
        add_dir_chain(&mut inner.directories, &path.into());
    }

    /// Read a file's content back (testing helper).
    pub fn file_bytes(&self, path: &Path) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files (testing helper).
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        inner.files.keys().cloned().collect()
    }
}

/// Register `path` and every ancestor as a directory.
fn add_dir_chain(directories: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn lock_poisoned() -> GreenfieldError {
    GreenfieldError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn not_found(path: &Path) -> GreenfieldError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: "no such file or directory".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn create_dir_new(&self, path: &Path) -> GreenfieldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        if inner.directories.contains(path) || inner.files.contains_key(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "failed to create directory: already exists".into(),
            }
            .into());
        }
        add_dir_chain(&mut inner.directories, path);
        Ok(())
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> GreenfieldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        if !inner.directories.contains(src) {
            return Err(not_found(src));
        }

        let copied_files: Vec<(PathBuf, Vec<u8>)> = inner
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(src))
            .map(|(p, c)| (dst.join(p.strip_prefix(src).unwrap()), c.clone()))
            .collect();
        let copied_dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(src))
            .map(|p| dst.join(p.strip_prefix(src).unwrap()))
            .collect();

        for dir in copied_dirs {
            add_dir_chain(&mut inner.directories, &dir);
        }
        for (path, content) in copied_files {
            inner.files.insert(path, content);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> GreenfieldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        if !inner.directories.contains(path) {
            return Err(not_found(path));
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> GreenfieldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;

        if inner.files.contains_key(from) {
            let content = inner.files.remove(from).unwrap();
            inner.files.insert(to.to_path_buf(), content);
            return Ok(());
        }
        if !inner.directories.contains(from) {
            return Err(not_found(from));
        }

        let moved_files: Vec<(PathBuf, Vec<u8>)> = inner
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(from))
            .map(|(p, c)| (to.join(p.strip_prefix(from).unwrap()), c.clone()))
            .collect();
        let moved_dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .map(|p| to.join(p.strip_prefix(from).unwrap()))
            .collect();

        inner.files.retain(|p, _| !p.starts_with(from));
        inner.directories.retain(|p| !p.starts_with(from));
        for dir in moved_dirs {
            add_dir_chain(&mut inner.directories, &dir);
        }
        for (path, content) in moved_files {
            inner.files.insert(path, content);
        }
        Ok(())
    }

    fn walk_files(&self, root: &Path) -> GreenfieldResult<Vec<PathBuf>> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        Ok(inner
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn read_file(&self, path: &Path) -> GreenfieldResult<Vec<u8>> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        inner.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> GreenfieldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::Filesystem {
                    path: path.to_path_buf(),
                    reason: "parent directory does not exist".into(),
                }
                .into());
            }
        }
        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_new_rejects_existing() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_new(Path::new("/projects/app")).unwrap();
        assert!(fs.create_dir_new(Path::new("/projects/app")).is_err());
        // parents were registered too
        assert!(fs.exists(Path::new("/projects")));
    }

    #[test]
    fn copy_tree_rewrites_the_prefix() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/tpl/src/main.py", "print()");
        fs.add_file("/tpl/README.md", "# tpl");

        fs.copy_tree(Path::new("/tpl"), Path::new("/dst/repo")).unwrap();

        assert_eq!(fs.file_bytes(Path::new("/dst/repo/src/main.py")).unwrap(), b"print()");
        assert_eq!(fs.file_bytes(Path::new("/dst/repo/README.md")).unwrap(), b"# tpl");
        // source untouched
        assert!(fs.exists(Path::new("/tpl/README.md")));
    }

    #[test]
    fn rename_moves_a_whole_directory() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/repo/old_name/mod.py", "x = 1");

        fs.rename(Path::new("/repo/old_name"), Path::new("/repo/new_name"))
            .unwrap();

        assert!(!fs.exists(Path::new("/repo/old_name")));
        assert_eq!(fs.file_bytes(Path::new("/repo/new_name/mod.py")).unwrap(), b"x = 1");
    }

    #[test]
    fn remove_dir_all_drops_everything_below() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/repo/.git/HEAD", "ref: refs/heads/main");
        fs.add_file("/repo/keep.txt", "keep");

        fs.remove_dir_all(Path::new("/repo/.git")).unwrap();

        assert!(!fs.exists(Path::new("/repo/.git")));
        assert!(fs.exists(Path::new("/repo/keep.txt")));
    }

    #[test]
    fn walk_files_is_deterministic_and_scoped() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/repo/b.txt", "b");
        fs.add_file("/repo/a.txt", "a");
        fs.add_file("/elsewhere/c.txt", "c");

        let files = fs.walk_files(Path::new("/repo")).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("/repo/a.txt"), PathBuf::from("/repo/b.txt")]
        );
    }

    #[test]
    fn write_file_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/nowhere/f.txt"), b"x").is_err());

        fs.add_dir("/somewhere");
        fs.write_file(Path::new("/somewhere/f.txt"), b"x").unwrap();
        assert_eq!(fs.file_bytes(Path::new("/somewhere/f.txt")).unwrap(), b"x");
    }
}
