//! Git adapters: configuration lookups via `git config --get`, and the
//! repository driver behind the opt-in history reset.

use std::{path::Path, process::Command};

use rebrand_core::{
    application::{
        ApplicationError,
        ports::{GitConfigReader, GitRepository},
    },
    error::RebrandResult,
};
use tracing::{debug, info, instrument};

use crate::process::CommandSpec;

#[derive(Debug, Clone)]
pub struct GitCommandConfig {
    program: String,
}

impl GitCommandConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCommandConfig {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitConfigReader for GitCommandConfig {
    fn get(&self, key: &str) -> RebrandResult<Option<String>> {
        let output = Command::new(&self.program)
            .args(["config", "--get", key])
            .output()
            .map_err(|e| ApplicationError::GitQueryFailed {
                reason: format!("could not run '{}': {e}", self.program),
            })?;

        // `git config --get` exits 1 when the key is unset.
        match output.status.code() {
            Some(0) => {
                let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
                debug!(key, %value, "git config");
                Ok(Some(value))
            }
            Some(1) => Ok(None),
            _ => Err(ApplicationError::GitQueryFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }
}

/// Creates repositories by running `git` in the workspace.
///
/// `git` may carry leading arguments such as `-c key=value` overrides; every
/// subcommand is appended after them.
#[derive(Debug, Clone)]
pub struct GitCommandRepository {
    git: CommandSpec,
}

impl GitCommandRepository {
    pub fn new(git: CommandSpec) -> Self {
        Self { git }
    }

    fn run<const N: usize>(&self, workspace: &Path, args: [&str; N]) -> RebrandResult<()> {
        let mut command = self.git.clone();
        command.args.extend(args.iter().map(|a| a.to_string()));
        command
            .run(workspace)
            .map_err(|e| ApplicationError::GitFailed {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

impl Default for GitCommandRepository {
    fn default() -> Self {
        Self::new(CommandSpec::new("git", Vec::<String>::new()))
    }
}

impl GitRepository for GitCommandRepository {
    fn programs(&self) -> Vec<String> {
        vec![self.git.program.clone()]
    }

    #[instrument(skip_all, fields(workspace = %workspace.display(), branch = %branch))]
    fn init(&self, workspace: &Path, branch: &str) -> RebrandResult<()> {
        self.run(workspace, ["init", "-b", branch])
    }

    fn add_remote(&self, workspace: &Path, name: &str, url: &str) -> RebrandResult<()> {
        self.run(workspace, ["remote", "add", name, url])?;
        info!(name, url, "Remote added");
        Ok(())
    }

    #[instrument(skip_all, fields(workspace = %workspace.display()))]
    fn commit_all(&self, workspace: &Path, message: &str) -> RebrandResult<()> {
        self.run(workspace, ["add", "--all"])?;
        self.run(workspace, ["commit", "--quiet", "-m", message])?;
        info!(message, "Initial commit created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// `git` with a throwaway identity, or `None` when git is not installed.
    fn hermetic_git() -> Option<GitCommandRepository> {
        which::which("git").ok()?;
        Some(GitCommandRepository::new(CommandSpec::new(
            "git",
            [
                "-c",
                "user.name=Rebrand Test",
                "-c",
                "user.email=rebrand@example.com",
                "-c",
                "commit.gpgsign=false",
            ],
        )))
    }

    fn git_output(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git").args(args).current_dir(dir).output().unwrap();
        assert!(output.status.success(), "git {args:?} failed");
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    #[test]
    fn fresh_repository_has_one_commit_on_main() {
        let Some(git) = hermetic_git() else {
            eprintln!("git not installed; skipping");
            return;
        };
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pyproject.toml"), "[project]\n").unwrap();

        git.init(dir.path(), "main").unwrap();
        git.add_remote(dir.path(), "origin", "https://github.com/ada/my-service").unwrap();
        git.commit_all(dir.path(), "Initial commit for my-service").unwrap();

        assert_eq!(git_output(dir.path(), &["branch", "--show-current"]), "main");
        assert_eq!(
            git_output(dir.path(), &["log", "--format=%s"]),
            "Initial commit for my-service"
        );
        assert_eq!(
            git_output(dir.path(), &["remote", "get-url", "origin"]),
            "https://github.com/ada/my-service"
        );
        assert_eq!(git_output(dir.path(), &["ls-files"]), "pyproject.toml");
    }

    #[test]
    fn git_failure_is_reported_as_history_error() {
        let git = GitCommandRepository::new(CommandSpec::new(
            "rebrand-no-such-git",
            Vec::<String>::new(),
        ));
        let err = git.init(&std::env::temp_dir(), "main").unwrap_err();
        assert!(err.to_string().contains("Git history reset failed"));
        assert_eq!(git.programs(), vec!["rebrand-no-such-git".to_string()]);
    }

    #[test]
    fn missing_git_is_query_failure() {
        let err = GitCommandConfig::new("rebrand-no-such-git")
            .get("user.name")
            .unwrap_err();
        assert!(err.to_string().contains("rebrand-no-such-git"));
    }

    #[cfg(unix)]
    #[test]
    fn exit_one_means_unset() {
        // `false` exits 1 regardless of arguments.
        assert_eq!(GitCommandConfig::new("false").get("user.name").unwrap(), None);
    }
}
