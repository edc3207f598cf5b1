//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `rebrand-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: deletion, rename, manifest I/O
//!   - `EnvironmentManager`: recreate the isolated dependency environment
//!   - `HookInstaller`: install local automation hooks
//!   - `GitRepository`: opt-in fresh history for the renamed project
//!   - `ToolLocator` / `GitConfigReader`: preflight and doctor checks
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    EnvironmentManager, Filesystem, GitConfigReader, GitRepository, HookInstaller,
    ProgressReporter, SilentProgress, ToolLocator,
};

#[cfg(test)]
pub use output::{
    MockEnvironmentManager, MockFilesystem, MockGitConfigReader, MockGitRepository,
    MockHookInstaller, MockToolLocator,
};
