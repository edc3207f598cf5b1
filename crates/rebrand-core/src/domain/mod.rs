//! Domain layer: pure rules with no I/O.
//!
//! - [`value_objects`]: `ProjectName`, `Step`, `RunState`
//! - [`entities`]: `Workspace`, manifest field sets
//! - [`manifest_editor`]: format-preserving `pyproject.toml` rewriting
//! - [`commit_message`]: Conventional Commits validation
//! - [`git_config`]: expectations for the local git identity and line endings

pub mod commit_message;
pub mod entities;
pub mod error;
pub mod git_config;
pub mod manifest_editor;
pub mod value_objects;

pub use entities::{Author, ManifestFields, MetadataOverrides, Workspace};
pub use error::{DomainError, ErrorCategory};
pub use git_config::{GitCheck, HostPlatform};
pub use value_objects::{ProjectName, RunState, Step};
