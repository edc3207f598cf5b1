// ============================================================================
// domain/error.rs - DOMAIN RULE VIOLATIONS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep them around after the run)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Input errors
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid workspace {}: {reason}", .path.display())]
    InvalidWorkspace { path: PathBuf, reason: String },

    #[error("Unknown step '{0}'")]
    UnknownStep(String),

    #[error("Step '{step}' cannot be resumed; only environment, metadata and hooks can")]
    StepNotResumable { step: String },

    // ========================================================================
    // Manifest errors
    // ========================================================================
    #[error("Manifest is not valid TOML: {reason}")]
    ManifestSyntax { reason: String },

    #[error("Manifest field missing: {field}")]
    ManifestFieldMissing { field: &'static str },

    #[error("Manifest field '{field}' has an unexpected shape: {reason}")]
    ManifestFieldShape { field: &'static str, reason: String },

    // ========================================================================
    // Commit messages
    // ========================================================================
    #[error("Commit message does not follow Conventional Commits: '{subject}'")]
    NonConventionalCommit { subject: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { .. } => vec![
                "Use a plain directory name without path separators".into(),
                "Names may not be empty, '.', '..', or start with '.'".into(),
                "Examples: my-service, my_app, project123".into(),
            ],
            Self::InvalidWorkspace { path, .. } => vec![
                format!("Check that {} is an existing directory", path.display()),
                "Run rebrand from the root of the template checkout or pass --workspace".into(),
            ],
            Self::UnknownStep(_) | Self::StepNotResumable { .. } => vec![
                "Resumable steps: environment, metadata, hooks".into(),
                "Example: rebrand resume --from environment".into(),
            ],
            Self::ManifestSyntax { .. }
            | Self::ManifestFieldMissing { .. }
            | Self::ManifestFieldShape { .. } => vec![
                "The manifest must contain a [project] table with a string 'name'".into(),
                "Fix the manifest by hand, then re-run the failing step".into(),
            ],
            Self::NonConventionalCommit { .. } => vec![
                "Format: <type>[optional scope]: <description>".into(),
                "Types: feat, fix, docs, style, refactor, perf, test, chore, ci, build, revert"
                    .into(),
                "Examples: 'feat: add user login', 'fix(auth): handle expired tokens'".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. }
            | Self::InvalidWorkspace { .. }
            | Self::UnknownStep(_)
            | Self::StepNotResumable { .. }
            | Self::NonConventionalCommit { .. } => ErrorCategory::Validation,
            Self::ManifestSyntax { .. }
            | Self::ManifestFieldMissing { .. }
            | Self::ManifestFieldShape { .. } => ErrorCategory::Parse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Parse,
}
