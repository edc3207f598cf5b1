//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into core calls and render the
//! results. Adapter wiring lives here so every handler builds the service
//! the same way.

use std::path::{Path, PathBuf};

use rebrand_adapters::{
    CommandEnvironment, CommandHookInstaller, CommandSpec, GitCommandConfig,
    GitCommandRepository, LocalFilesystem, PathLocator,
};
use rebrand_core::{
    application::{BootstrapService, GitConfigReader, RunReport},
    domain::{MetadataOverrides, RunState, Workspace},
    error::RebrandError,
};
use tracing::debug;

use crate::{
    cli::{MetadataArgs, OutputFormat, WorkspaceArg},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub mod completions;
pub mod config;
pub mod doctor;
pub mod lint_commit;
pub mod rename;
pub mod resume;

/// Wire the production adapters into a [`BootstrapService`].
pub fn build_service(config: &AppConfig) -> BootstrapService {
    let environment = CommandEnvironment::new(CommandSpec::new(
        config.environment.program.clone(),
        config.environment.args.iter().cloned(),
    ));

    let install = CommandSpec::new(
        config.hooks.program.clone(),
        config.hooks.args.iter().cloned(),
    );
    let runner = match config.hooks.script_runner.split_first() {
        Some((program, args)) => CommandSpec::new(program.clone(), args.iter().cloned()),
        // Rejected by config validation; keep the install program as a fallback.
        None => CommandSpec::new(config.hooks.program.clone(), Vec::<String>::new()),
    };

    BootstrapService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(environment),
        Box::new(CommandHookInstaller::new(install, runner)),
        Box::new(PathLocator),
        config.bootstrap_settings(),
    )
    .with_git(Box::new(GitCommandRepository::new(CommandSpec::new(
        config.git.program.clone(),
        Vec::<String>::new(),
    ))))
}

/// Manifest overrides from the command line.
///
/// With `git.author_from_git` set, a missing author name or email is taken
/// from git's `user.name` / `user.email`. Lookup failures only mean no
/// fallback.
pub fn metadata_overrides(args: MetadataArgs, config: &AppConfig) -> MetadataOverrides {
    let overrides = args.into_overrides();
    let complete = overrides
        .author
        .as_ref()
        .is_some_and(|author| author.email.is_some());
    if !config.git.author_from_git || complete {
        return overrides;
    }

    let git = GitCommandConfig::new(config.git.program.clone());
    let lookup = |key: &str| match git.get(key) {
        Ok(value) => value,
        Err(e) => {
            debug!(key, error = %e, "No git identity fallback");
            None
        }
    };
    overrides.with_default_author(lookup("user.name"), lookup("user.email"))
}

/// Resolve `-C DIR` (or the current directory) to an absolute workspace.
pub fn resolve_workspace(arg: &WorkspaceArg) -> CliResult<Workspace> {
    let raw = match &arg.path {
        Some(path) => path.clone(),
        None => std::env::current_dir()
            .with_cli_context(|| "failed to determine the current directory")?,
    };

    let absolute = absolutize(&raw)?;
    Workspace::from_path(absolute).map_err(|e| CliError::Core(RebrandError::from(e)))
}

fn absolutize(path: &Path) -> CliResult<PathBuf> {
    let resolved = if path.exists() {
        path.canonicalize()
    } else {
        // Left for validation to reject with a proper message.
        std::path::absolute(path)
    };
    resolved.with_cli_context(|| format!("failed to resolve {}", path.display()))
}

/// Print the summary shared by `rename` and `resume`.
pub fn report_run(report: &RunReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(report)?;
    } else {
        if !report.removed.is_empty() {
            output.info(&format!("Removed {} cached path(s)", report.removed.len()))?;
        }
        match report.state {
            RunState::HooksInstalled => output.success(&format!(
                "Workspace ready at {}",
                report.workspace.display()
            ))?,
            _ => output.success(&format!(
                "Workspace renamed to {} ({})",
                report.workspace.display(),
                report.state
            ))?,
        }
    }

    if let Some(warning) = &report.hook_warning {
        output.warning(&warning.to_string())?;
        output.warning(&format!(
            "Re-run later with: rebrand resume --from hooks -C {}",
            warning.workspace.display()
        ))?;
    }

    if report.previous.is_some() {
        output.print("")?;
        output.print("Your shell is still in the old directory. Next:")?;
        output.print(&format!("  cd {}", report.workspace.display()))?;
    }

    Ok(())
}
