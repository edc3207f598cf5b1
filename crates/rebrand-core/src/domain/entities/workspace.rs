//! The workspace being renamed.
//!
//! A [`Workspace`] is threaded explicitly through every step; nothing in the
//! core reads or changes the process working directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{DomainError, ProjectName};

/// An absolute workspace directory split into its parent and base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workspace {
    path: PathBuf,
    parent: PathBuf,
    name: String,
}

impl Workspace {
    /// Build a workspace from an absolute directory path.
    ///
    /// The path is taken as-is; callers canonicalise it first.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let invalid = |reason: &str| DomainError::InvalidWorkspace {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if !path.is_absolute() {
            return Err(invalid("path must be absolute"));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| invalid("directory name is not valid UTF-8"))?
            .to_string();

        let parent = path
            .parent()
            .ok_or_else(|| invalid("workspace cannot be a filesystem root"))?
            .to_path_buf();

        Ok(Self { path, parent, name })
    }

    /// Absolute path of the workspace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the workspace.
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// Base name of the workspace directory (the current project name).
    pub fn current_name(&self) -> &str {
        &self.name
    }

    /// Path the workspace would occupy under `name`.
    pub fn sibling(&self, name: &ProjectName) -> PathBuf {
        self.parent.join(name.as_str())
    }

    /// The same workspace after a move to `name`.
    pub fn relocated(&self, name: &ProjectName) -> Self {
        Self {
            path: self.sibling(name),
            parent: self.parent.clone(),
            name: name.as_str().to_string(),
        }
    }

    /// Resolve a workspace-relative path.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        std::env::temp_dir().join("home").join("u")
    }

    #[test]
    fn splits_parent_and_name() {
        let ws = Workspace::from_path(root().join("python-try")).unwrap();
        assert_eq!(ws.current_name(), "python-try");
        assert_eq!(ws.parent(), root().as_path());
    }

    #[test]
    fn relocation_keeps_parent() {
        let ws = Workspace::from_path(root().join("python-try")).unwrap();
        let name = ProjectName::parse("my-service").unwrap();
        let moved = ws.relocated(&name);
        assert_eq!(moved.path(), root().join("my-service").as_path());
        assert_eq!(moved.parent(), ws.parent());
        assert_eq!(moved.current_name(), "my-service");
    }

    #[test]
    fn rejects_relative_paths() {
        assert!(matches!(
            Workspace::from_path("python-try"),
            Err(DomainError::InvalidWorkspace { .. })
        ));
    }

    #[test]
    fn join_is_workspace_relative() {
        let ws = Workspace::from_path(root().join("python-try")).unwrap();
        assert_eq!(
            ws.join("pyproject.toml"),
            root().join("python-try").join("pyproject.toml")
        );
    }
}
