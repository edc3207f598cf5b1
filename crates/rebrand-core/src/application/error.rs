//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the external
//! collaborators, not rule violations. Rule violations are `DomainError`
//! from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while driving the bootstrap steps.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The rename target is already taken.
    #[error("Target directory already exists: {}", .path.display())]
    Conflict { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", .path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// An external program needed by the run is not installed.
    #[error("Required tool '{program}' was not found on PATH")]
    MissingTool { program: String },

    /// The dependency environment could not be recreated.
    #[error("Environment rebuild failed: {reason}")]
    EnvironmentFailed { reason: String },

    /// The hook framework or customization script failed.
    #[error("Hook installation failed: {reason}")]
    HookFailed { reason: String },

    /// Reading git configuration failed.
    #[error("Could not query git configuration: {reason}")]
    GitQueryFailed { reason: String },

    /// A git command that rewrites repository history failed.
    #[error("Git history reset failed: {reason}")]
    GitFailed { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Conflict { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                "Or move the existing directory out of the way first".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check file permissions and that no process holds the files open".into(),
                "Moves across filesystems are not supported; move the directory manually".into(),
            ],
            Self::MissingTool { program } => vec![
                format!("Install '{program}' and make sure it is on PATH"),
                "Run 'rebrand doctor' to check all required tools".into(),
            ],
            Self::EnvironmentFailed { .. } => vec![
                "Check network access and the lock file".into(),
                "The rebuild is pinned to the lock file; it never upgrades dependencies".into(),
            ],
            Self::HookFailed { .. } => vec![
                "Install the hooks manually: uv run pre-commit install".into(),
                "Or retry with: rebrand resume --from hooks".into(),
            ],
            Self::GitQueryFailed { .. } => vec![
                "Ensure git is installed and on PATH".into(),
            ],
            Self::GitFailed { .. } => vec![
                "Check that user.name and user.email are set: rebrand doctor".into(),
                "Then retry with: rebrand resume --from history".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Conflict { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::HookFailed { .. } => ErrorCategory::Io,
            Self::MissingTool { .. }
            | Self::EnvironmentFailed { .. }
            | Self::GitFailed { .. } => ErrorCategory::Environment,
            Self::GitQueryFailed { .. } => ErrorCategory::Internal,
        }
    }
}
