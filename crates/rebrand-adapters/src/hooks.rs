//! Hook framework installer driven through subprocesses.

use std::path::Path;

use rebrand_core::{
    application::{ApplicationError, ports::HookInstaller},
    error::RebrandResult,
};
use tracing::{info, instrument};

use crate::process::CommandSpec;

/// Installs hooks with `install` and runs customization scripts through
/// `script_runner` (the script path is appended as the last argument).
#[derive(Debug, Clone)]
pub struct CommandHookInstaller {
    install: CommandSpec,
    script_runner: CommandSpec,
}

impl CommandHookInstaller {
    pub fn new(install: CommandSpec, script_runner: CommandSpec) -> Self {
        Self {
            install,
            script_runner,
        }
    }
}

impl Default for CommandHookInstaller {
    fn default() -> Self {
        Self::new(
            CommandSpec::new("uv", ["run", "pre-commit", "install"]),
            CommandSpec::new("uv", ["run", "python"]),
        )
    }
}

impl HookInstaller for CommandHookInstaller {
    fn programs(&self) -> Vec<String> {
        let mut programs = vec![self.install.program.clone()];
        if self.script_runner.program != self.install.program {
            programs.push(self.script_runner.program.clone());
        }
        programs
    }

    #[instrument(skip_all, fields(workspace = %workspace.display()))]
    fn install(&self, workspace: &Path) -> RebrandResult<()> {
        self.install
            .run(workspace)
            .map_err(|e| ApplicationError::HookFailed {
                reason: e.to_string(),
            })?;
        info!(command = %self.install, "Hooks installed");
        Ok(())
    }

    #[instrument(skip_all, fields(script = %script.display()))]
    fn customize(&self, workspace: &Path, script: &Path) -> RebrandResult<()> {
        let command = self.script_runner.with_arg(script.to_string_lossy());
        command
            .run(workspace)
            .map_err(|e| ApplicationError::HookFailed {
                reason: e.to_string(),
            })?;
        info!(%command, "Hook customization applied");
        Ok(())
    }
}
