//! Implementation of the `rebrand rename` command.
//!
//! Responsibility: turn CLI arguments into a `RenameRequest`, show the plan,
//! confirm, run it, and print where the project now lives.

use std::io::{self, IsTerminal};

use tracing::{debug, instrument};

use rebrand_core::application::{RenamePlan, RenameRequest, Validation};

use crate::{
    cli::{OutputFormat, RenameArgs, global::GlobalArgs},
    commands::{build_service, metadata_overrides, report_run, resolve_workspace},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `rebrand rename` command.
///
/// 1. Validate the name and workspace (no changes yet)
/// 2. Early-exit for an unchanged name or `--dry-run`
/// 3. Confirm with the user unless `--yes`, `--quiet` or stdin is not a TTY
/// 4. Run steps 2-7 and report the outcome
#[instrument(skip_all, fields(name = %args.name))]
pub fn execute(
    args: RenameArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let workspace = resolve_workspace(&args.workspace)?;
    let service = build_service(&config);

    let request = RenameRequest {
        workspace,
        requested: args.name.clone(),
        overrides: metadata_overrides(args.metadata, &config),
        fresh_history: args.fresh_history,
    };

    let plan = match service.validate(&request)? {
        Validation::Unchanged { workspace } => {
            output.info(&format!(
                "'{}' is already named '{}'; nothing to do",
                workspace.path().display(),
                args.name
            ))?;
            return Ok(());
        }
        Validation::Proceed(plan) => plan,
    };

    debug!(
        target = %plan.target.path().display(),
        cleanup = plan.cleanup.len(),
        "Plan ready"
    );

    if args.dry_run {
        if output.format() == OutputFormat::Json {
            output.json(&plan)?;
        } else {
            show_plan(&plan, &output)?;
            output.info("Dry run: no changes made")?;
        }
        return Ok(());
    }

    if !global.quiet && !args.yes && io::stdin().is_terminal() {
        show_plan(&plan, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let report = service.execute(&plan, &output)?;
    report_run(&report, &output)
}

fn show_plan(plan: &RenamePlan, output: &OutputManager) -> CliResult<()> {
    output.header("Rename plan:")?;
    output.print(&format!("  From:    {}", plan.source.path().display()))?;
    output.print(&format!("  To:      {}", plan.target.path().display()))?;
    output.print(&format!(
        "  Fields:  {}",
        plan.fields.touched_keys().join(", ")
    ))?;

    if plan.cleanup.is_empty() {
        output.print("  Remove:  nothing")?;
    } else {
        output.print("  Remove:")?;
        for path in &plan.cleanup {
            output.print(&format!("    {}", path.display()))?;
        }
    }

    for tool in &plan.tools {
        output.print(&format!("  Uses:    {} ({})", tool.program, tool.path.display()))?;
    }
    if let Some(script) = &plan.customization_script {
        output.print(&format!("  Hook script: {}", script.display()))?;
    }
    if plan.fresh_history {
        output.print("  History: replaced by a single initial commit")?;
    }
    output.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::Write;

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}
