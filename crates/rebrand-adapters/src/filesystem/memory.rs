//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use rebrand_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{RebrandError, RebrandResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle while the
/// service owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_all(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(ancestor.to_path_buf());
        }
    }

    fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and all its parents (testing helper).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.add_dir_all(path.as_ref());
        }
    }

    /// Create a file, creating parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dir_all(parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All files and directories, sorted.
    pub fn list_paths(&self) -> Vec<PathBuf> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    fn read(&self) -> RebrandResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> RebrandResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> RebrandError {
    RebrandError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn not_found(path: &Path) -> RebrandError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "No such file or directory".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.read().map(|inner| inner.contains(path)).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_path(&self, path: &Path) -> RebrandResult<bool> {
        let mut inner = self.write()?;
        if !inner.contains(path) {
            return Ok(false);
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(true)
    }

    fn rename_no_replace(&self, from: &Path, to: &Path) -> RebrandResult<()> {
        let mut inner = self.write()?;
        if inner.contains(to) {
            return Err(ApplicationError::Conflict {
                path: to.to_path_buf(),
            }
            .into());
        }
        if !inner.directories.contains(from) {
            return Err(not_found(from));
        }

        let moved = |p: &Path| p.strip_prefix(from).map(|rel| to.join(rel)).ok();

        let directories = std::mem::take(&mut inner.directories);
        inner.directories = directories
            .into_iter()
            .map(|p| moved(&p).unwrap_or(p))
            .collect();

        let files = std::mem::take(&mut inner.files);
        inner.files = files
            .into_iter()
            .map(|(p, content)| (moved(&p).unwrap_or(p), content))
            .collect();

        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> RebrandResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> RebrandResult<()> {
        let mut inner = self.write()?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn find_dirs_named(
        &self,
        root: &Path,
        name: &str,
        skip: &[PathBuf],
    ) -> RebrandResult<Vec<PathBuf>> {
        let inner = self.read()?;
        let mut found: Vec<PathBuf> = Vec::new();

        // BTreeSet order visits parents before children.
        for dir in inner.directories.iter().filter(|d| d.starts_with(root)) {
            if dir == root || skip.iter().any(|s| dir.starts_with(s)) {
                continue;
            }
            if found.iter().any(|f| dir.starts_with(f)) {
                continue;
            }
            if dir.file_name().is_some_and(|n| n == name) {
                found.push(dir.clone());
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_moves_whole_subtree() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/home/u/python-try/pyproject.toml", "[project]");
        fs.add_dir("/home/u/python-try/src/pkg");

        fs.rename_no_replace("/home/u/python-try".as_ref(), "/home/u/my-service".as_ref())
            .unwrap();

        assert!(!fs.exists("/home/u/python-try".as_ref()));
        assert!(fs.is_dir("/home/u/my-service/src/pkg".as_ref()));
        assert_eq!(
            fs.read_file("/home/u/my-service/pyproject.toml".as_ref()).as_deref(),
            Some("[project]")
        );
    }

    #[test]
    fn rename_refuses_existing_target() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/home/u/python-try");
        fs.add_dir("/home/u/my-service");

        let err = fs
            .rename_no_replace("/home/u/python-try".as_ref(), "/home/u/my-service".as_ref())
            .unwrap_err();
        assert!(matches!(
            err,
            RebrandError::Application(ApplicationError::Conflict { .. })
        ));
    }

    #[test]
    fn remove_reports_whether_anything_was_removed() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/w/.venv/pyvenv.cfg", "");

        assert!(fs.remove_path("/w/.venv".as_ref()).unwrap());
        assert!(!fs.remove_path("/w/.venv".as_ref()).unwrap());
        assert!(!fs.exists("/w/.venv/pyvenv.cfg".as_ref()));
    }

    #[test]
    fn find_skips_excluded_and_nested_matches() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/w/src/pkg/__pycache__/__pycache__");
        fs.add_dir("/w/.venv/lib/__pycache__");
        fs.add_dir("/w/tests/__pycache__");

        let found = fs
            .find_dirs_named("/w".as_ref(), "__pycache__", &[PathBuf::from("/w/.venv")])
            .unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("/w/src/pkg/__pycache__"),
                PathBuf::from("/w/tests/__pycache__")
            ]
        );
    }
}
