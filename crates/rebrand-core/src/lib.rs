//! Rebrand Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for turning a
//! freshly cloned project template into a renamed, ready-to-use workspace.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           rebrand-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (BootstrapService, DoctorService)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, EnvironmentManager, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    rebrand-adapters (Infrastructure)    │
//! │ (LocalFilesystem, CommandEnvironment)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rebrand_core::prelude::*;
//!
//! # fn run(service: BootstrapService) -> RebrandResult<()> {
//! let request = RenameRequest {
//!     workspace: Workspace::from_path("/home/u/python-try")?,
//!     requested: "my-service".into(),
//!     overrides: MetadataOverrides::default(),
//!     fresh_history: false,
//! };
//! service.rename(&request, &SilentProgress)?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BootstrapService, BootstrapSettings, DoctorService, RenameRequest, RunOutcome, RunReport,
        Validation,
        ports::{
            EnvironmentManager, Filesystem, GitConfigReader, GitRepository, HookInstaller,
            ProgressReporter, SilentProgress, ToolLocator,
        },
    };
    pub use crate::domain::{
        Author, ManifestFields, MetadataOverrides, ProjectName, RunState, Step, Workspace,
    };
    pub use crate::error::{RebrandError, RebrandResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
