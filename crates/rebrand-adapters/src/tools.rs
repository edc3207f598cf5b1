//! Executable lookup on `PATH`.

use std::path::PathBuf;

use rebrand_core::application::ports::ToolLocator;
use tracing::trace;

/// Resolves programs with the `which` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        let resolved = which::which(program).ok();
        trace!(program, found = resolved.is_some(), "Resolved tool");
        resolved
    }
}
