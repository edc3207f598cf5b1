//! Unified error handling for Rebrand Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, RunState, Step};

/// Root error type for Rebrand Core operations.
#[derive(Debug, Error, Clone)]
pub enum RebrandError {
    /// Errors from the domain layer (rule violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and collaborators).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// A bootstrap step failed after the run started mutating the workspace.
    #[error(
        "{} (step {}) failed in {}: {source}",
        .step.label(),
        .step.number(),
        .workspace.display()
    )]
    StepFailed {
        step: Step,
        workspace: PathBuf,
        #[source]
        source: Box<RebrandError>,
    },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl RebrandError {
    /// Wrap `source` as a failure of `step` with the workspace's current path.
    pub fn step_failed(step: Step, workspace: impl Into<PathBuf>, source: RebrandError) -> Self {
        Self::StepFailed {
            step,
            workspace: workspace.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through step wrappers.
    pub fn root_cause(&self) -> &RebrandError {
        match self {
            Self::StepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The step that failed, if the error happened during a run.
    pub fn failed_step(&self) -> Option<Step> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Terminal state of the run that produced this error.
    pub fn state(&self) -> RunState {
        RunState::Aborted {
            at: self.failed_step().unwrap_or(Step::Validate),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::StepFailed {
                step,
                workspace,
                source,
            } => {
                let mut suggestions = source.suggestions();
                suggestions.push(format!("Current workspace path: {}", workspace.display()));
                match step {
                    Step::Validate | Step::Clean => suggestions.push(
                        "Nothing has been moved; fix the cause and re-run 'rebrand rename'".into(),
                    ),
                    Step::Relocate => suggestions.push(
                        "The directory was not moved, but local caches were already removed; \
                         fix the cause and re-run 'rebrand rename'"
                            .into(),
                    ),
                    _ => {
                        suggestions.push(
                            "The workspace has already been renamed; no rollback was attempted"
                                .into(),
                        );
                        suggestions.push(format!(
                            "From {}, run: rebrand resume --from {}",
                            workspace.display(),
                            step
                        ));
                    }
                }
                suggestions
            }
            Self::Internal { .. } => vec![
                "This appears to be a bug in Rebrand".into(),
                "Please report this issue at: https://github.com/cosecruz/rebrand/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Parse => ErrorCategory::Parse,
            },
            Self::Application(e) => e.category(),
            Self::StepFailed { source, .. } => source.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input or a conflicting target; nothing was changed.
    Validation,
    /// The manifest is not in the expected structure.
    Parse,
    /// Filesystem or process I/O failed.
    Io,
    /// The dependency environment or a required tool failed.
    Environment,
    Internal,
}

/// Convenient result type alias.
pub type RebrandResult<T> = Result<T, RebrandError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn env_failure() -> RebrandError {
        ApplicationError::EnvironmentFailed {
            reason: "network unreachable".into(),
        }
        .into()
    }

    #[test]
    fn step_failure_message_names_step_cause_and_path() {
        let err = RebrandError::step_failed(
            Step::RebuildEnvironment,
            "/home/u/my-service",
            env_failure(),
        );
        let msg = err.to_string();
        assert!(msg.contains("Environment rebuild (step 4)"));
        assert!(msg.contains("network unreachable"));
        assert!(msg.contains("/home/u/my-service"));
    }

    #[test]
    fn step_failure_keeps_cause_category() {
        let err = RebrandError::step_failed(Step::RebuildEnvironment, "/x", env_failure());
        assert_eq!(err.category(), ErrorCategory::Environment);
        assert_eq!(err.state(), RunState::Aborted { at: Step::RebuildEnvironment });
    }

    #[test]
    fn hot_failures_suggest_resume() {
        let err = RebrandError::step_failed(
            Step::RewriteMetadata,
            "/home/u/my-service",
            DomainError::ManifestSyntax {
                reason: "bad".into(),
            }
            .into(),
        );
        assert!(
            err.suggestions()
                .iter()
                .any(|s| s.contains("rebrand resume --from metadata"))
        );
    }

    #[test]
    fn cold_failures_suggest_rerun() {
        let err = RebrandError::step_failed(
            Step::Clean,
            "/home/u/python-try",
            ApplicationError::FilesystemError {
                path: "/home/u/python-try/.venv".into(),
                reason: "permission denied".into(),
            }
            .into(),
        );
        assert!(err.suggestions().iter().any(|s| s.contains("Nothing has been moved")));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn conflict_is_validation() {
        let err: RebrandError = ApplicationError::Conflict {
            path: "/home/u/my-service".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.failed_step().is_none());
    }
}
