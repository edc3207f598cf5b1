//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the bootstrap needs from external systems.
//! The `rebrand-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::Step;
use crate::error::RebrandResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `rebrand_adapters::filesystem::LocalFilesystem` (production)
/// - `rebrand_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a file or a directory tree.
    ///
    /// A missing path is not an error: returns `Ok(false)`. Any other
    /// failure is reported.
    fn remove_path(&self, path: &Path) -> RebrandResult<bool>;

    /// Move a directory, failing with a conflict if `to` already exists.
    ///
    /// Implementations must use a single rename, never copy + delete.
    fn rename_no_replace(&self, from: &Path, to: &Path) -> RebrandResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> RebrandResult<String>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> RebrandResult<()>;

    /// Recursively find directories called `name` under `root`, not
    /// descending into any path listed in `skip`.
    fn find_dirs_named(&self, root: &Path, name: &str, skip: &[PathBuf])
    -> RebrandResult<Vec<PathBuf>>;
}

/// Port for the isolated dependency environment manager.
///
/// Implemented by:
/// - `rebrand_adapters::environment::CommandEnvironment` (`uv sync --frozen`)
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentManager: Send + Sync {
    /// Executables this manager invokes, checked before the run starts.
    fn programs(&self) -> Vec<String>;

    /// Recreate the environment inside `workspace` from `lock_file`,
    /// without upgrading anything. Re-running on a matching environment
    /// changes nothing.
    fn recreate(&self, workspace: &Path, lock_file: &Path) -> RebrandResult<()>;
}

/// Port for the hook framework.
///
/// Implemented by:
/// - `rebrand_adapters::hooks::CommandHookInstaller` (`uv run pre-commit install`)
#[cfg_attr(test, mockall::automock)]
pub trait HookInstaller: Send + Sync {
    /// Executables this installer invokes, checked before the run starts.
    fn programs(&self) -> Vec<String>;

    /// Install the framework's hooks into the workspace repository.
    fn install(&self, workspace: &Path) -> RebrandResult<()>;

    /// Run a repository-specific hook customization script.
    fn customize(&self, workspace: &Path, script: &Path) -> RebrandResult<()>;
}

/// Port for locating executables.
#[cfg_attr(test, mockall::automock)]
pub trait ToolLocator: Send + Sync {
    /// Absolute path of `program`, or `None` when it is not installed.
    fn resolve(&self, program: &str) -> Option<PathBuf>;
}

/// Port for reading git configuration values.
#[cfg_attr(test, mockall::automock)]
pub trait GitConfigReader: Send + Sync {
    /// Value of `key`, or `None` when unset.
    fn get(&self, key: &str) -> RebrandResult<Option<String>>;
}

/// Port for creating a fresh git repository in a workspace.
///
/// Implemented by:
/// - `rebrand_adapters::git::GitCommandRepository` (`git init`, `git commit`)
#[cfg_attr(test, mockall::automock)]
pub trait GitRepository: Send + Sync {
    /// Executables this repository driver invokes, checked before the run starts.
    fn programs(&self) -> Vec<String>;

    /// Initialise an empty repository whose first branch is `branch`.
    fn init(&self, workspace: &Path, branch: &str) -> RebrandResult<()>;

    /// Register a remote.
    fn add_remote(&self, workspace: &Path, name: &str, url: &str) -> RebrandResult<()>;

    /// Stage every file and create a commit.
    fn commit_all(&self, workspace: &Path, message: &str) -> RebrandResult<()>;
}

/// Observer for step transitions, used by front-ends to show progress.
pub trait ProgressReporter {
    fn step_started(&self, _step: Step, _workspace: &Path) {}

    fn step_finished(&self, _step: Step) {}

    fn path_removed(&self, _path: &Path) {}
}

/// A [`ProgressReporter`] that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}
