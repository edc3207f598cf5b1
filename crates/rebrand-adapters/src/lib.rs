//! Infrastructure adapters for Rebrand.
//!
//! This crate implements the ports defined in `rebrand-core::application::ports`.
//! It contains all external dependencies, subprocesses and I/O operations.

pub mod environment;
pub mod filesystem;
pub mod git;
pub mod hooks;
pub mod process;
pub mod tools;

// Re-export commonly used adapters
pub use environment::CommandEnvironment;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::{GitCommandConfig, GitCommandRepository};
pub use hooks::CommandHookInstaller;
pub use process::CommandSpec;
pub use tools::PathLocator;
