//! Implementation of the `rebrand resume` command.
//!
//! Re-runs the post-move steps in a workspace that was already relocated,
//! typically after `rename` failed at the environment or metadata step.

use tracing::instrument;

use crate::{
    cli::ResumeArgs,
    commands::{build_service, metadata_overrides, report_run, resolve_workspace},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(from = %args.from))]
pub fn execute(args: ResumeArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let workspace = resolve_workspace(&args.workspace)?;
    let service = build_service(&config);

    output.info(&format!(
        "Resuming '{}' from {}",
        workspace.current_name(),
        args.from.label()
    ))?;

    let overrides = metadata_overrides(args.metadata, &config);
    let report = service.resume(
        &workspace,
        args.from,
        overrides,
        args.fresh_history,
        &output,
    )?;
    report_run(&report, &output)
}
