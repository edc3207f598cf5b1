//! Output management and formatting.
//!
//! Progress and results go to stdout; warnings and errors go to stderr so
//! they stay visible when stdout is piped or rendered as JSON.

use std::io::{self, IsTerminal};
use std::path::Path;

use console::Term;
use owo_colors::OwoColorize;
use rebrand_core::{application::ProgressReporter, domain::Step};
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
    err_term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    /// Human-oriented lines are dropped in quiet and JSON modes.
    fn chatty(&self) -> bool {
        !self.quiet && self.resolved_format != OutputFormat::Json
    }

    fn marked(&self, mark: &str, msg: &str, paint: fn(&str) -> String) -> String {
        if self.no_color {
            format!("{mark} {msg}")
        } else {
            paint(&format!("{mark} {msg}"))
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        self.term
            .write_line(&self.marked("\u{2713}", msg, |s| s.green().bold().to_string()))
    }

    /// Error indicator on stderr: `✗ <msg>`. Never suppressed.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        self.err_term
            .write_line(&self.marked("\u{2717}", msg, |s| s.red().bold().to_string()))
    }

    /// Warning indicator on stderr: `⚠ <msg>`. Shown even in quiet mode,
    /// since warnings ask for manual follow-up.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.err_term
            .write_line(&self.marked("\u{26a0}", msg, |s| s.yellow().bold().to_string()))
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        self.term
            .write_line(&self.marked("\u{2139}", msg, |s| s.blue().to_string()))
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if !self.chatty() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON document on stdout. Only written in JSON mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        if self.resolved_format != OutputFormat::Json {
            return Ok(());
        }
        let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&rendered)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

/// Step progress as `[4/7] Environment rebuild in /path`.
impl ProgressReporter for OutputManager {
    fn step_started(&self, step: Step, workspace: &Path) {
        let line = format!(
            "[{}/{}] {} in {}",
            step.number(),
            Step::ALL.len(),
            step.label(),
            workspace.display()
        );
        // Progress is best effort; a closed stdout must not abort the run.
        let _ = self.header(&line);
    }

    fn path_removed(&self, path: &Path) {
        let _ = self.print(&format!("      removed {}", path.display()));
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: true,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn warnings_are_written_in_quiet_mode() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.warning("hooks were not installed").is_ok());
    }

    #[test]
    fn plain_format_disables_color() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Plain,
        };
        let out = OutputManager::new(&args, &AppConfig::default());
        assert_eq!(out.marked("\u{2713}", "done", |s| s.green().to_string()), "\u{2713} done");
    }

    #[test]
    fn format_accessor_returns_resolved() {
        assert_eq!(make_manager(false, OutputFormat::Json).format(), OutputFormat::Json);
    }
}
