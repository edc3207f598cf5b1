//! Conventional Commits validation for the `commit-msg` hook.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::DomainError;

/// Commit types accepted in the subject line.
pub const COMMIT_TYPES: [&str; 11] = [
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore", "ci", "build", "revert",
];

/// Subject-line matcher, built once from [`COMMIT_TYPES`].
///
/// The pattern is assembled only from compile-time constants and every commit
/// type is a lowercase ASCII word, so it contains no input-dependent
/// metacharacters and compilation cannot fail at runtime.
/// `subject_pattern_compiles_for_every_type` forces it in tests.
static SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"^({})(\(.+\))?!?: .+", COMMIT_TYPES.join("|"));
    Regex::new(&pattern).unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"))
});

/// Validate the contents of a commit message file.
///
/// Comment lines (`#`) and leading blank lines are ignored, as git strips
/// them before recording the commit. Merge commits always pass.
pub fn validate(message: &str) -> Result<(), DomainError> {
    let subject = message
        .lines()
        .map(str::trim_end)
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .unwrap_or("");

    if subject.starts_with("Merge") || SUBJECT.is_match(subject) {
        return Ok(());
    }

    Err(DomainError::NonConventionalCommit {
        subject: subject.to_string(),
    })
}
