//! Doctor Service - host prerequisites check.
//!
//! Reports which external tools resolve on PATH and whether the git
//! configuration keys a template checkout relies on are set correctly.
//! Performs no mutation.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    application::ports::{GitConfigReader, ToolLocator},
    domain::{GitCheck, HostPlatform, git_config},
    error::RebrandResult,
};

/// Availability of one external program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCheck {
    pub program: String,
    pub path: Option<PathBuf>,
}

impl ToolCheck {
    pub fn passed(&self) -> bool {
        self.path.is_some()
    }
}

/// Full doctor result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorReport {
    pub tools: Vec<ToolCheck>,
    pub git: Vec<GitCheck>,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.tools.iter().all(ToolCheck::passed) && self.git.iter().all(|g| g.passed)
    }
}

pub struct DoctorService {
    tools: Box<dyn ToolLocator>,
    git: Box<dyn GitConfigReader>,
    platform: HostPlatform,
}

impl DoctorService {
    pub fn new(tools: Box<dyn ToolLocator>, git: Box<dyn GitConfigReader>) -> Self {
        Self {
            tools,
            git,
            platform: HostPlatform::current(),
        }
    }

    /// Override the platform used for the `core.autocrlf` expectation.
    pub fn with_platform(mut self, platform: HostPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Check `programs` and the git configuration.
    ///
    /// Git checks are skipped when `git` itself is among the programs and
    /// did not resolve.
    #[instrument(skip_all)]
    pub fn diagnose(&self, programs: &[String]) -> RebrandResult<DoctorReport> {
        let tools: Vec<ToolCheck> = programs
            .iter()
            .map(|program| ToolCheck {
                program: program.clone(),
                path: self.tools.resolve(program),
            })
            .collect();

        let git_missing = tools.iter().any(|t| t.program == "git" && !t.passed());
        let git = if git_missing {
            debug!("git not found; skipping configuration checks");
            Vec::new()
        } else {
            git_config::CHECKED_KEYS
                .into_iter()
                .map(|key| {
                    let value = self.git.get(key)?;
                    Ok(git_config::evaluate(key, value.as_deref(), self.platform))
                })
                .collect::<RebrandResult<_>>()?
        };

        Ok(DoctorReport { tools, git })
    }
}
