//! Subprocess plumbing shared by the command-backed adapters.

use std::{
    fmt,
    io,
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use thiserror::Error;
use tracing::debug;

/// Inherited variables that would point a child at the environment that
/// existed before the move.
const STALE_ENV_VARS: [&str; 1] = ["VIRTUAL_ENV"];

/// A program plus its fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A copy with `arg` appended.
    pub fn with_arg(&self, arg: impl Into<String>) -> Self {
        let mut spec = self.clone();
        spec.args.push(arg.into());
        spec
    }

    /// Build the `Command`, running in `cwd`.
    pub fn build(&self, cwd: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(cwd).stdin(Stdio::null());
        for var in STALE_ENV_VARS {
            command.env_remove(var);
        }
        command
    }

    /// Run to completion, capturing output.
    pub fn run(&self, cwd: &Path) -> Result<(), CommandError> {
        debug!(command = %self, cwd = %cwd.display(), "Running");
        let output = self
            .build(cwd)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            debug!(command = %self, "stdout:\n{}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            debug!(command = %self, "stderr:\n{}", stderr.trim_end());
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                command: self.to_string(),
                status: output.status,
                detail: tail(&stderr, 5),
            })
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Failure of a subprocess run.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("could not start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' exited with {status}{}", detail_suffix(.detail))]
    Failed {
        command: String,
        status: ExitStatus,
        detail: String,
    },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

/// Last `lines` non-empty lines of `text`, joined with " | ".
fn tail(text: &str, lines: usize) -> String {
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    kept[kept.len().saturating_sub(lines)..].join(" | ")
}
