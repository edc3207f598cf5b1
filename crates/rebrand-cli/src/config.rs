//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference.  The
//! CLI layer owns config; the core crate only sees the settings derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `REBRAND_<SECTION>__<KEY>`, e.g.
//!    `REBRAND_ENVIRONMENT__PROGRAM=uv`; list values are comma separated
//! 3. Config file: `--config FILE`, otherwise the platform config file and
//!    then `.rebrand.toml` in the current directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File};
use rebrand_core::application::BootstrapSettings;
use serde::{Deserialize, Serialize};

/// Per-directory config file name.
pub const LOCAL_CONFIG_FILE: &str = ".rebrand.toml";

const ENV_PREFIX: &str = "REBRAND";

/// Keys whose environment override is a comma separated list.
const LIST_KEYS: [&str; 4] = [
    "environment.args",
    "hooks.args",
    "hooks.script_runner",
    "cleaner.paths",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: EnvironmentConfig,
    pub hooks: HooksConfig,
    pub cleaner: CleanerConfig,
    pub manifest: ManifestConfig,
    pub git: GitConfig,
    pub output: OutputConfig,
}

/// The dependency environment manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub program: String,
    pub args: Vec<String>,
    pub lock_file: PathBuf,
    pub env_dir: PathBuf,
}

/// The hook framework and the optional customization script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HooksConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Workspace-relative script; skipped when absent from the workspace.
    pub customization_script: Option<PathBuf>,
    /// Command line the script path is appended to.
    pub script_runner: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    pub paths: Vec<PathBuf>,
    pub bytecode_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    pub file: PathBuf,
}

/// Git usage: author fallback and the opt-in fresh history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    pub program: String,
    /// First branch created by `--fresh-history`.
    pub branch: String,
    /// Remote name the repository URL is registered under.
    pub remote: String,
    /// Default `--author` / `--email` to git's `user.name` / `user.email`.
    pub author_from_git: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = BootstrapSettings::default();
        Self {
            environment: EnvironmentConfig {
                program: "uv".into(),
                args: vec!["sync".into(), "--frozen".into()],
                lock_file: settings.lock_file,
                env_dir: settings.env_dir,
            },
            hooks: HooksConfig {
                program: "uv".into(),
                args: vec!["run".into(), "pre-commit".into(), "install".into()],
                customization_script: settings.customization_script,
                script_runner: vec!["uv".into(), "run".into(), "python".into()],
            },
            cleaner: CleanerConfig {
                paths: settings.clean_paths,
                bytecode_dir: settings.bytecode_dir,
            },
            manifest: ManifestConfig {
                file: settings.manifest_file,
            },
            git: GitConfig {
                program: "git".into(),
                branch: settings.history_branch,
                remote: settings.history_remote,
                author_from_git: true,
            },
            output: OutputConfig { no_color: false },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then file, then environment.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let mut builder = Config::builder().add_source(defaults);
        match config_file {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(global) = Self::global_config_path() {
                    builder = builder.add_source(File::from(global).required(false));
                }
                builder = builder
                    .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false));
            }
        }

        let mut environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",");
        for key in LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }

        let config: Self = builder
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.environment.program.trim().is_empty() {
            anyhow::bail!("environment.program must not be empty");
        }
        if self.hooks.program.trim().is_empty() {
            anyhow::bail!("hooks.program must not be empty");
        }
        if self.hooks.script_runner.is_empty() {
            anyhow::bail!("hooks.script_runner must name at least a program");
        }
        if self.git.program.trim().is_empty() {
            anyhow::bail!("git.program must not be empty");
        }
        if self.git.branch.trim().is_empty() {
            anyhow::bail!("git.branch must not be empty");
        }
        Ok(())
    }

    /// Platform config file, e.g. `~/.config/rebrand/config.toml`.
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rebrand", "rebrand")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Path `config path` reports and `config init` writes to.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.rebrand.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        Self::global_config_path().unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Settings handed to the bootstrap service.
    pub fn bootstrap_settings(&self) -> BootstrapSettings {
        BootstrapSettings {
            manifest_file: self.manifest.file.clone(),
            lock_file: self.environment.lock_file.clone(),
            env_dir: self.environment.env_dir.clone(),
            clean_paths: self.cleaner.paths.clone(),
            bytecode_dir: self.cleaner.bytecode_dir.clone(),
            customization_script: self.hooks.customization_script.clone(),
            history_branch: self.git.branch.clone(),
            history_remote: self.git.remote.clone(),
        }
    }

    /// Every external program a rename may invoke, deduplicated.
    pub fn programs(&self) -> Vec<String> {
        let mut programs = Vec::new();
        let candidates = [
            Some(&self.environment.program),
            Some(&self.hooks.program),
            self.hooks.script_runner.first(),
        ];
        for program in candidates.into_iter().flatten() {
            if !programs.contains(program) {
                programs.push(program.clone());
            }
        }
        programs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_core_settings() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bootstrap_settings(), BootstrapSettings::default());
        assert_eq!(cfg.environment.args, vec!["sync", "--frozen"]);
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn programs_are_deduplicated() {
        assert_eq!(AppConfig::default().programs(), vec!["uv".to_string()]);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[environment]\nprogram = \"true\"\n\n\
             [hooks]\nprogram = \"sh\"\n\n\
             [output]\nno_color = true"
        )
        .unwrap();

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.environment.program, "true");
        assert_eq!(cfg.hooks.program, "sh");
        assert!(cfg.output.no_color);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.manifest.file, PathBuf::from("pyproject.toml"));
        assert_eq!(cfg.environment.lock_file, PathBuf::from("uv.lock"));
        assert_eq!(
            cfg.programs(),
            vec!["true".to_string(), "sh".into(), "uv".into()]
        );
    }

    #[test]
    fn git_section_feeds_history_settings() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[git]\nbranch = \"trunk\"\nremote = \"upstream\"\nauthor_from_git = false"
        )
        .unwrap();

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.git.program, "git");
        assert!(!cfg.git.author_from_git);
        let settings = cfg.bootstrap_settings();
        assert_eq!(settings.history_branch, "trunk");
        assert_eq!(settings.history_remote, "upstream");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/rebrand.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn empty_program_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[environment]\nprogram = \"\"").unwrap();
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("environment.program"));
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
