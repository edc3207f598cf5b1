//! Dependency environment manager driven through a subprocess.

use std::path::Path;

use rebrand_core::{
    application::{ApplicationError, ports::EnvironmentManager},
    error::RebrandResult,
};
use tracing::{info, instrument};

use crate::process::CommandSpec;

/// Recreates the environment by running a lock-pinned sync command in the
/// workspace, `uv sync --frozen` by default.
#[derive(Debug, Clone)]
pub struct CommandEnvironment {
    command: CommandSpec,
}

impl CommandEnvironment {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }
}

impl Default for CommandEnvironment {
    fn default() -> Self {
        Self::new(CommandSpec::new("uv", ["sync", "--frozen"]))
    }
}

impl EnvironmentManager for CommandEnvironment {
    fn programs(&self) -> Vec<String> {
        vec![self.command.program.clone()]
    }

    #[instrument(skip_all, fields(workspace = %workspace.display()))]
    fn recreate(&self, workspace: &Path, lock_file: &Path) -> RebrandResult<()> {
        // Without the lock file the sync would resolve fresh versions.
        if !lock_file.is_file() {
            return Err(ApplicationError::EnvironmentFailed {
                reason: format!("lock file not found: {}", lock_file.display()),
            }
            .into());
        }

        self.command
            .run(workspace)
            .map_err(|e| ApplicationError::EnvironmentFailed {
                reason: e.to_string(),
            })?;
        info!(command = %self.command, "Environment recreated");
        Ok(())
    }
}
