//! Implementation of the `rebrand lint-commit` command.
//!
//! Meant to be called from a `commit-msg` hook with the message file git
//! passes as the first argument.

use std::fs;

use rebrand_core::{domain::commit_message, error::RebrandError};
use tracing::instrument;

use crate::{
    cli::LintCommitArgs,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn execute(args: LintCommitArgs, output: OutputManager) -> CliResult<()> {
    let message = fs::read_to_string(&args.file).with_cli_context(|| {
        format!("failed to read commit message from {}", args.file.display())
    })?;

    commit_message::validate(&message).map_err(RebrandError::from)?;
    output.success("Commit message follows Conventional Commits")?;
    Ok(())
}
