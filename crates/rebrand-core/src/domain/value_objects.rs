//! Domain value objects: ProjectName, Step, RunState.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. They
//! carry their string representations and `FromStr` parsers; sequencing
//! logic lives in the bootstrap service.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ProjectName ──────────────────────────────────────────────────────────────

/// A validated project name, usable as a sibling directory name and as the
/// manifest `name` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate a raw name.
    ///
    /// Rejects empty names, surrounding whitespace, path separators, `.`,
    /// `..`, hidden names and control characters.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if raw.trim() != raw {
            return Err(invalid("name cannot start or end with whitespace"));
        }
        if raw == "." || raw == ".." {
            return Err(invalid("name cannot be '.' or '..'"));
        }
        if raw.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(invalid("name cannot contain path separators"));
        }
        if raw.chars().any(char::is_control) {
            return Err(invalid("name cannot contain control characters"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Step ─────────────────────────────────────────────────────────────────────

/// One stage of a bootstrap run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Validate,
    Clean,
    Relocate,
    RebuildEnvironment,
    RewriteMetadata,
    /// Opt-in: replace the template's git history with a single commit.
    ResetHistory,
    InstallHooks,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Self::Validate,
        Self::Clean,
        Self::Relocate,
        Self::RebuildEnvironment,
        Self::RewriteMetadata,
        Self::ResetHistory,
        Self::InstallHooks,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Clean => "clean",
            Self::Relocate => "relocate",
            Self::RebuildEnvironment => "environment",
            Self::RewriteMetadata => "metadata",
            Self::ResetHistory => "history",
            Self::InstallHooks => "hooks",
        }
    }

    /// Human-readable label used in progress output and error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Validate => "Input validation",
            Self::Clean => "Workspace cleanup",
            Self::Relocate => "Directory relocation",
            Self::RebuildEnvironment => "Environment rebuild",
            Self::RewriteMetadata => "Metadata rewrite",
            Self::ResetHistory => "History reset",
            Self::InstallHooks => "Hook installation",
        }
    }

    /// 1-based position in the run.
    pub const fn number(&self) -> u8 {
        match self {
            Self::Validate => 1,
            Self::Clean => 2,
            Self::Relocate => 3,
            Self::RebuildEnvironment => 4,
            Self::RewriteMetadata => 5,
            Self::ResetHistory => 6,
            Self::InstallHooks => 7,
        }
    }

    /// Steps that can be re-run on their own once the workspace has moved.
    pub const fn is_resumable(&self) -> bool {
        matches!(
            self,
            Self::RebuildEnvironment
                | Self::RewriteMetadata
                | Self::ResetHistory
                | Self::InstallHooks
        )
    }

    /// Steps that only run when the caller asks for them.
    pub const fn is_opt_in(&self) -> bool {
        matches!(self, Self::ResetHistory)
    }

    /// `true` once the original directory path no longer exists when this
    /// step runs.
    pub const fn is_after_relocation(&self) -> bool {
        self.number() > Self::Relocate.number()
    }

    /// State reached when this step completes.
    pub const fn completed_state(&self) -> RunState {
        match self {
            Self::Validate => RunState::Validated,
            Self::Clean => RunState::Cleaned,
            Self::Relocate => RunState::Relocated,
            Self::RebuildEnvironment => RunState::EnvironmentReady,
            Self::RewriteMetadata => RunState::MetadataUpdated,
            Self::ResetHistory => RunState::HistoryReset,
            Self::InstallHooks => RunState::HooksInstalled,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "validate" => Ok(Self::Validate),
            "clean" => Ok(Self::Clean),
            "relocate" | "move" => Ok(Self::Relocate),
            "environment" | "env" => Ok(Self::RebuildEnvironment),
            "metadata" | "manifest" => Ok(Self::RewriteMetadata),
            "history" | "git" => Ok(Self::ResetHistory),
            "hooks" => Ok(Self::InstallHooks),
            other => Err(DomainError::UnknownStep(other.to_string())),
        }
    }
}

// ── RunState ─────────────────────────────────────────────────────────────────

/// Progress of a run. `HooksInstalled` is the terminal success state;
/// `Aborted` is the terminal failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "state")]
pub enum RunState {
    Validated,
    Cleaned,
    Relocated,
    EnvironmentReady,
    MetadataUpdated,
    HistoryReset,
    HooksInstalled,
    Aborted { at: Step },
}

impl RunState {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::HooksInstalled | Self::Aborted { .. })
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validated => f.write_str("validated"),
            Self::Cleaned => f.write_str("cleaned"),
            Self::Relocated => f.write_str("relocated"),
            Self::EnvironmentReady => f.write_str("environment-ready"),
            Self::MetadataUpdated => f.write_str("metadata-updated"),
            Self::HistoryReset => f.write_str("history-reset"),
            Self::HooksInstalled => f.write_str("hooks-installed"),
            Self::Aborted { at } => write!(f, "aborted at step {} ({at})", at.number()),
        }
    }
}
