//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rebrand_core::domain::{Author, MetadataOverrides, Step};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "rebrand",
    bin_name = "rebrand",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Turn a template checkout into a freshly named project",
    long_about = "Rebrand renames a cloned Python project template in place: it \
                  removes path-sensitive caches, moves the directory, rebuilds the \
                  uv environment, rewrites pyproject.toml and reinstalls hooks.",
    after_help = "EXAMPLES:\n\
        \x20 rebrand rename my-service\n\
        \x20 rebrand rename my-service --author 'Ada Lovelace' --email ada@example.com\n\
        \x20 rebrand rename my-service --dry-run\n\
        \x20 rebrand resume --from environment\n\
        \x20 rebrand doctor",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rename the template checkout and rebuild it under the new name.
    #[command(
        visible_alias = "rn",
        about = "Rename the workspace to a new project name",
        after_help = "EXAMPLES:\n\
            \x20 rebrand rename my-service\n\
            \x20 rebrand rename my-service -C ~/src/python-try --yes\n\
            \x20 rebrand rename my-service --repository https://github.com/ada/my-service\n\
            \x20 rebrand rename my-service --fresh-history --yes"
    )]
    Rename(RenameArgs),

    /// Re-run the post-move steps after a failure.
    #[command(
        about = "Resume an interrupted rename from a given step",
        after_help = "EXAMPLES:\n\
            \x20 rebrand resume --from environment\n\
            \x20 rebrand resume --from metadata --author 'Ada Lovelace'\n\
            \x20 rebrand resume --from history --repository https://github.com/ada/my-service\n\
            \x20 rebrand resume --from hooks -C ~/src/my-service"
    )]
    Resume(ResumeArgs),

    /// Check the host for required tools and git configuration.
    #[command(
        about = "Check required tools and git configuration",
        after_help = "EXAMPLES:\n\
            \x20 rebrand doctor\n\
            \x20 rebrand doctor --output-format json"
    )]
    Doctor,

    /// Validate a commit message file (for use as a commit-msg hook).
    #[command(
        about = "Check a commit message against Conventional Commits",
        after_help = "EXAMPLES:\n\
            \x20 rebrand lint-commit .git/COMMIT_EDITMSG"
    )]
    LintCommit(LintCommitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 rebrand completions bash > ~/.local/share/bash-completion/completions/rebrand\n\
            \x20 rebrand completions zsh  > ~/.zfunc/_rebrand\n\
            \x20 rebrand completions fish > ~/.config/fish/completions/rebrand.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect or create the configuration file.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 rebrand config list\n\
            \x20 rebrand config get environment.program\n\
            \x20 rebrand config init"
    )]
    Config(ConfigCommands),
}

// ── rename ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// New project name; becomes the directory name and `[project].name`.
    #[arg(value_name = "NAME", help = "New project name")]
    pub name: String,

    #[command(flatten)]
    pub workspace: WorkspaceArg,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and run immediately")]
    pub yes: bool,

    /// Validate and print the plan without changing anything.
    #[arg(long = "dry-run", help = "Show what would happen without changing anything")]
    pub dry_run: bool,

    #[arg(
        long = "fresh-history",
        help = "Replace the template's git history with a single initial commit"
    )]
    pub fresh_history: bool,
}

// ── resume ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResumeArgs {
    /// First step to re-run.
    #[arg(
        long = "from",
        value_name = "STEP",
        help = "Step to resume from: environment, metadata, history or hooks"
    )]
    pub from: Step,

    #[command(flatten)]
    pub workspace: WorkspaceArg,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    #[arg(
        long = "fresh-history",
        help = "Also reset git history (implied by --from history)"
    )]
    pub fresh_history: bool,
}

#[derive(Debug, Args)]
pub struct WorkspaceArg {
    /// Template checkout to operate on.
    #[arg(
        short = 'C',
        long = "workspace",
        value_name = "DIR",
        help = "Workspace directory (default: current directory)"
    )]
    pub path: Option<PathBuf>,
}

/// Optional manifest fields written alongside the name.
#[derive(Debug, Default, Args)]
pub struct MetadataArgs {
    #[arg(
        long = "author",
        value_name = "NAME",
        help = "Author name for [project].authors (default: git user.name)"
    )]
    pub author: Option<String>,

    #[arg(
        long = "email",
        value_name = "EMAIL",
        requires = "author",
        help = "Author email (requires --author; default: git user.email)"
    )]
    pub email: Option<String>,

    #[arg(long = "project-version", value_name = "VERSION", help = "Value for [project].version")]
    pub project_version: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "Value for [project].description")]
    pub description: Option<String>,

    #[arg(long = "repository", value_name = "URL", help = "Repository URL for [project.urls]")]
    pub repository: Option<String>,

    #[arg(
        long = "docs-url",
        value_name = "URL",
        help = "Documentation URL (default: <repository>/docs)"
    )]
    pub docs_url: Option<String>,
}

impl MetadataArgs {
    pub fn into_overrides(self) -> MetadataOverrides {
        let author = self.author.map(|name| {
            let author = Author::new(name);
            match self.email {
                Some(email) => author.with_email(email),
                None => author,
            }
        });
        MetadataOverrides {
            version: self.project_version,
            description: self.description,
            author,
            documentation_url: self.docs_url,
            repository_url: self.repository,
        }
    }
}

// ── lint-commit ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LintCommitArgs {
    /// File holding the commit message, as passed by git to commit-msg hooks.
    #[arg(value_name = "FILE", help = "Commit message file")]
    pub file: PathBuf,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print all configuration values.
    List,
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `environment.program`.
        key: String,
    },
    /// Print the path of the configuration file.
    Path,
    /// Write the built-in defaults to the configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
