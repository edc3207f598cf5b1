//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use rebrand_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{RebrandError, RebrandResult},
};
use tracing::trace;
use walkdir::WalkDir;

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
        // Dangling symlinks count as existing.
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_path(&self, path: &Path) -> RebrandResult<bool> {
        let metadata = match path.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(map_io_error(path, e, "inspect")),
        };

        let removed = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };

        match removed {
            Ok(()) => Ok(true),
            // Something else removed it first.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_io_error(path, e, "remove")),
        }
    }

    fn rename_no_replace(&self, from: &Path, to: &Path) -> RebrandResult<()> {
        if self.exists(to) {
            return Err(ApplicationError::Conflict {
                path: to.to_path_buf(),
            }
            .into());
        }

        std::fs::rename(from, to).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists | io::ErrorKind::DirectoryNotEmpty => {
                ApplicationError::Conflict {
                    path: to.to_path_buf(),
                }
                .into()
            }
            io::ErrorKind::CrossesDevices => ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: format!(
                    "cannot move across filesystems to {}; move the directory manually",
                    to.display()
                ),
            }
            .into(),
            _ => map_io_error(from, e, "rename directory"),
        })
    }

    fn read_to_string(&self, path: &Path) -> RebrandResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> RebrandResult<()> {
        // Write next to the target and swap it in, so an interrupted write
        // never leaves a truncated manifest behind.
        let staging = staging_path(path);
        std::fs::write(&staging, content).map_err(|e| map_io_error(&staging, e, "write file"))?;
        std::fs::rename(&staging, path).map_err(|e| {
            let _ = std::fs::remove_file(&staging);
            map_io_error(path, e, "replace file")
        })
    }

    fn find_dirs_named(
        &self,
        root: &Path,
        name: &str,
        skip: &[PathBuf],
    ) -> RebrandResult<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut entries = WalkDir::new(root).follow_links(false).into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                ApplicationError::FilesystemError {
                    reason: format!("Failed to scan directory: {e}"),
                    path,
                }
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }
            if skip.iter().any(|s| s == entry.path()) {
                trace!(path = %entry.path().display(), "Skipping");
                entries.skip_current_dir();
                continue;
            }
            if entry.depth() > 0 && entry.file_name() == name {
                found.push(entry.into_path());
                entries.skip_current_dir();
            }
        }

        Ok(found)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".rebrand-tmp");
    path.with_file_name(name)
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> RebrandError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn remove_tolerates_missing_paths() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        assert!(!fs.remove_path(&dir.path().join("missing")).unwrap());
    }

    #[test]
    fn remove_deletes_trees_and_files() {
        let dir = TempDir::new().unwrap();
        let venv = dir.path().join(".venv");
        std::fs::create_dir_all(venv.join("lib/site-packages")).unwrap();
        std::fs::write(venv.join("pyvenv.cfg"), "home = /usr").unwrap();
        let coverage = dir.path().join(".coverage");
        std::fs::write(&coverage, "data").unwrap();

        let fs = LocalFilesystem::new();
        assert!(fs.remove_path(&venv).unwrap());
        assert!(fs.remove_path(&coverage).unwrap());
        assert!(!venv.exists());
        assert!(!coverage.exists());
    }

    #[test]
    fn rename_refuses_existing_target() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("python-try");
        let to = dir.path().join("my-service");
        std::fs::create_dir(&from).unwrap();
        std::fs::create_dir(&to).unwrap();

        let err = LocalFilesystem::new().rename_no_replace(&from, &to).unwrap_err();
        assert!(matches!(
            err,
            RebrandError::Application(ApplicationError::Conflict { .. })
        ));
        assert!(from.exists());
    }

    #[test]
    fn rename_moves_directory() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("python-try");
        let to = dir.path().join("my-service");
        std::fs::create_dir(&from).unwrap();
        std::fs::write(from.join("pyproject.toml"), "[project]").unwrap();

        LocalFilesystem::new().rename_no_replace(&from, &to).unwrap();
        assert!(!from.exists());
        assert!(to.join("pyproject.toml").exists());
    }

    #[test]
    fn write_replaces_content_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pyproject.toml");
        std::fs::write(&path, "old").unwrap();

        LocalFilesystem::new().write_file(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn finds_nested_caches_but_skips_excluded_trees() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for rel in [
            "src/pkg/__pycache__",
            "src/pkg/__pycache__/__pycache__",
            "tests/__pycache__",
            ".venv/lib/__pycache__",
            ".git/__pycache__",
        ] {
            std::fs::create_dir_all(root.join(rel)).unwrap();
        }

        let mut found = LocalFilesystem::new()
            .find_dirs_named(
                root,
                "__pycache__",
                &[root.join(".git"), root.join(".venv")],
            )
            .unwrap();
        found.sort();

        assert_eq!(
            found,
            vec![
                root.join("src/pkg/__pycache__"),
                root.join("tests/__pycache__")
            ]
        );
    }
}
