//! Expected git configuration for commits made from a fresh project.

use serde::Serialize;

/// Keys checked by the doctor, in report order.
pub const CHECKED_KEYS: [&str; 3] = ["user.name", "user.email", "core.autocrlf"];

/// Line-ending policy depends on the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    Unix,
}

impl HostPlatform {
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Value `core.autocrlf` should hold on this platform.
    pub const fn expected_autocrlf(&self) -> &'static str {
        match self {
            Self::Windows => "true",
            Self::Unix => "input",
        }
    }
}

/// Outcome of checking one git configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitCheck {
    pub key: &'static str,
    pub passed: bool,
    pub detail: String,
}

/// Evaluate the configured `value` of `key` (None when unset).
pub fn evaluate(key: &'static str, value: Option<&str>, platform: HostPlatform) -> GitCheck {
    let value = value.map(str::trim).filter(|v| !v.is_empty());

    let (passed, detail) = match (key, value) {
        ("core.autocrlf", Some(v)) if v.eq_ignore_ascii_case(platform.expected_autocrlf()) => {
            (true, format!("core.autocrlf = {v}"))
        }
        ("core.autocrlf", _) => (
            false,
            format!(
                "set it with: git config --global core.autocrlf {}",
                platform.expected_autocrlf()
            ),
        ),
        (_, Some(v)) => (true, format!("{key} = {v}")),
        ("user.email", None) => (
            false,
            "set it with: git config --global user.email 'your.email@example.com'".to_string(),
        ),
        (_, None) => (
            false,
            format!("set it with: git config --global {key} 'Your Name'"),
        ),
    };

    GitCheck {
        key,
        passed,
        detail,
    }
}
