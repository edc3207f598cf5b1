//! Implementation of the `rebrand doctor` command.

use rebrand_adapters::{GitCommandConfig, PathLocator};
use rebrand_core::application::{DoctorReport, DoctorService};
use tracing::instrument;

use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(config: AppConfig, output: OutputManager) -> CliResult<()> {
    let git = GitCommandConfig::new(config.git.program.clone());
    let service = DoctorService::new(Box::new(PathLocator), Box::new(git));
    let report = service.diagnose(&programs(&config))?;

    if output.format() == OutputFormat::Json {
        output.json(&report)?;
    } else {
        print_report(&report, &output)?;
    }

    let (failed, total) = tally(&report);
    if failed > 0 {
        return Err(CliError::ChecksFailed { failed, total });
    }
    output.success("All checks passed")?;
    Ok(())
}

/// Configured programs plus git itself.
fn programs(config: &AppConfig) -> Vec<String> {
    let mut programs = config.programs();
    if !programs.contains(&config.git.program) {
        programs.push(config.git.program.clone());
    }
    programs
}

fn tally(report: &DoctorReport) -> (usize, usize) {
    let failed = report.tools.iter().filter(|t| !t.passed()).count()
        + report.git.iter().filter(|g| !g.passed).count();
    (failed, report.tools.len() + report.git.len())
}

fn print_report(report: &DoctorReport, output: &OutputManager) -> CliResult<()> {
    output.header("Tools:")?;
    for tool in &report.tools {
        match &tool.path {
            Some(path) => output.success(&format!("{} ({})", tool.program, path.display()))?,
            None => output.error(&format!("{} not found on PATH", tool.program))?,
        }
    }

    if report.git.is_empty() {
        output.info("Git configuration not checked: git is not installed")?;
        return Ok(());
    }

    output.header("Git configuration:")?;
    for check in &report.git {
        if check.passed {
            output.success(&check.detail)?;
        } else {
            output.error(&format!("{} is not set correctly; {}", check.key, check.detail))?;
        }
    }
    Ok(())
}
