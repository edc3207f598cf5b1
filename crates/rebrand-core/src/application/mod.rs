//! Application layer for Rebrand.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (BootstrapService, DoctorService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer sequences the domain rules but contains none of
//! them itself. Naming and manifest rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    BootstrapService, BootstrapSettings, DoctorReport, DoctorService, HookWarning, RenamePlan,
    RenameRequest, RunOutcome, RunReport, ToolCheck, Validation,
};

pub use ports::{
    EnvironmentManager, Filesystem, GitConfigReader, GitRepository, HookInstaller,
    ProgressReporter, SilentProgress, ToolLocator,
};

pub use error::ApplicationError;
