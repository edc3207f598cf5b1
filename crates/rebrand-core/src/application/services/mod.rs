//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "rename this checkout" or "check the host".

pub mod bootstrap_service;
pub mod doctor_service;

pub use bootstrap_service::{
    BootstrapService, BootstrapSettings, HookWarning, RenamePlan, RenameRequest, ResolvedTool,
    RunOutcome, RunReport, Validation,
};
pub use doctor_service::{DoctorReport, DoctorService, ToolCheck};
