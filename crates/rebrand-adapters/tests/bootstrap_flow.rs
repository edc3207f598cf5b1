//! End-to-end runs of the bootstrap service over the real adapters.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use rebrand_adapters::{
    CommandEnvironment, CommandHookInstaller, CommandSpec, GitCommandRepository, LocalFilesystem,
    MemoryFilesystem,
};
use rebrand_core::{
    application::{ApplicationError, ports::*},
    domain::{Author, MetadataOverrides, RunState, Step, Workspace},
    error::{RebrandError, RebrandResult},
    prelude::{BootstrapService, BootstrapSettings, RenameRequest, RunOutcome},
};

const MANIFEST: &str = r#"[project]
name = "python-try"
version = "0.0.1"
description = "A template"
requires-python = ">=3.12"

[tool.ruff]
line-length = 100
"#;

/// Records every collaborator call in order.
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct RecordingEnvironment {
    journal: Journal,
    fs: MemoryFilesystem,
    fail: bool,
}

impl EnvironmentManager for RecordingEnvironment {
    fn programs(&self) -> Vec<String> {
        vec!["uv".into()]
    }

    fn recreate(&self, workspace: &Path, lock_file: &Path) -> RebrandResult<()> {
        self.journal.push(format!(
            "recreate {} {}",
            workspace.display(),
            lock_file.display()
        ));
        if self.fail {
            return Err(ApplicationError::EnvironmentFailed {
                reason: "network unreachable".into(),
            }
            .into());
        }
        self.fs.add_file(workspace.join(".venv/pyvenv.cfg"), "fresh");
        Ok(())
    }
}

struct RecordingHooks {
    journal: Journal,
}

impl HookInstaller for RecordingHooks {
    fn programs(&self) -> Vec<String> {
        vec!["uv".into()]
    }

    fn install(&self, workspace: &Path) -> RebrandResult<()> {
        self.journal.push(format!("install {}", workspace.display()));
        Ok(())
    }

    fn customize(&self, _workspace: &Path, script: &Path) -> RebrandResult<()> {
        self.journal.push(format!("customize {}", script.display()));
        Ok(())
    }
}

struct EverythingInstalled;

impl ToolLocator for EverythingInstalled {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin").join(program))
    }
}

fn home() -> PathBuf {
    std::env::temp_dir().join("rebrand-flow").join("home")
}

fn template(fs: &MemoryFilesystem) -> PathBuf {
    let root = home().join("python-try");
    fs.add_file(root.join("pyproject.toml"), MANIFEST);
    fs.add_file(root.join("uv.lock"), "version = 1");
    fs.add_file(root.join(".venv/pyvenv.cfg"), "stale");
    fs.add_dir(root.join(".pytest_cache"));
    fs.add_dir(root.join("src/python_try/__pycache__"));
    fs.add_file(root.join("scripts/setup_hook_commit_message.py"), "print()");
    fs.add_dir(root.join(".git/hooks"));
    root
}

fn memory_service(fs: &MemoryFilesystem, journal: &Journal, env_fails: bool) -> BootstrapService {
    BootstrapService::new(
        Box::new(fs.clone()),
        Box::new(RecordingEnvironment {
            journal: journal.clone(),
            fs: fs.clone(),
            fail: env_fails,
        }),
        Box::new(RecordingHooks {
            journal: journal.clone(),
        }),
        Box::new(EverythingInstalled),
        BootstrapSettings::default(),
    )
}

fn request(root: &Path, name: &str, overrides: MetadataOverrides) -> RenameRequest {
    RenameRequest {
        workspace: Workspace::from_path(root).unwrap(),
        requested: name.into(),
        overrides,
        fresh_history: false,
    }
}

#[test]
fn renames_template_end_to_end() {
    let fs = MemoryFilesystem::new();
    let journal = Journal::default();
    let root = template(&fs);
    let service = memory_service(&fs, &journal, false);

    let overrides = MetadataOverrides {
        author: Some(Author::new("Ada Lovelace").with_email("ada@example.com")),
        repository_url: Some("https://github.com/ada/my-service".into()),
        ..MetadataOverrides::default()
    };
    let outcome = service
        .rename(&request(&root, "my-service", overrides), &SilentProgress)
        .unwrap();
    let RunOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };

    let target = home().join("my-service");
    assert_eq!(report.state, RunState::HooksInstalled);
    assert_eq!(report.workspace, target);
    assert!(!fs.exists(&root));

    // Stale environment and caches gone, fresh one created after the move.
    assert_eq!(
        fs.read_file(&target.join(".venv/pyvenv.cfg")).as_deref(),
        Some("fresh")
    );
    assert!(!fs.exists(&target.join(".pytest_cache")));
    assert!(!fs.exists(&target.join("src/python_try/__pycache__")));
    assert!(fs.exists(&target.join(".git/hooks")));

    let manifest = fs.read_file(&target.join("pyproject.toml")).unwrap();
    assert!(manifest.contains("\nname = \"my-service\"\n"));
    assert!(manifest.contains("version = \"0.0.1\""));
    assert!(manifest.contains(
        r#"authors = [{ name = "Ada Lovelace", email = "ada@example.com" }]"#
    ));
    assert!(manifest.contains("[tool.ruff]\nline-length = 100\n"));
    assert!(manifest.contains(r#"Documentation = "https://github.com/ada/my-service/docs""#));

    assert_eq!(
        journal.entries(),
        vec![
            format!(
                "recreate {} {}",
                target.display(),
                target.join("uv.lock").display()
            ),
            format!("install {}", target.display()),
            format!(
                "customize {}",
                target.join("scripts/setup_hook_commit_message.py").display()
            ),
        ]
    );
}

#[test]
fn conflict_leaves_template_untouched() {
    let fs = MemoryFilesystem::new();
    let journal = Journal::default();
    let root = template(&fs);
    fs.add_dir(home().join("my-service"));
    let before = fs.list_paths();

    let err = memory_service(&fs, &journal, false)
        .rename(
            &request(&root, "my-service", MetadataOverrides::default()),
            &SilentProgress,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RebrandError::Application(ApplicationError::Conflict { .. })
    ));
    assert_eq!(fs.list_paths(), before);
    assert!(journal.entries().is_empty());
}

#[test]
fn environment_failure_can_be_resumed() {
    let fs = MemoryFilesystem::new();
    let journal = Journal::default();
    let root = template(&fs);
    let target = home().join("my-service");

    let err = memory_service(&fs, &journal, true)
        .rename(
            &request(&root, "my-service", MetadataOverrides::default()),
            &SilentProgress,
        )
        .unwrap_err();
    assert_eq!(err.failed_step(), Some(Step::RebuildEnvironment));
    assert!(err.to_string().contains(&target.display().to_string()));
    // Moved, manifest not yet rewritten.
    assert!(fs.is_dir(&target));
    assert!(
        fs.read_file(&target.join("pyproject.toml"))
            .unwrap()
            .contains("name = \"python-try\"")
    );

    let report = memory_service(&fs, &journal, false)
        .resume(
            &Workspace::from_path(&target).unwrap(),
            Step::RebuildEnvironment,
            MetadataOverrides::default(),
            false,
            &SilentProgress,
        )
        .unwrap();
    assert_eq!(report.state, RunState::HooksInstalled);
    assert!(
        fs.read_file(&target.join("pyproject.toml"))
            .unwrap()
            .contains("name = \"my-service\"")
    );
}

#[cfg(unix)]
#[test]
fn renames_real_directory_with_command_adapters() {
    let tmp = tempfile::TempDir::new().unwrap();
    let root = tmp.path().join("python-try");
    std::fs::create_dir_all(root.join(".venv/bin")).unwrap();
    std::fs::create_dir_all(root.join("pkg/__pycache__")).unwrap();
    std::fs::write(root.join("pyproject.toml"), MANIFEST).unwrap();
    std::fs::write(root.join("uv.lock"), "version = 1").unwrap();

    let sh = |script: &str| CommandSpec::new("sh", ["-c", script]);
    let service = BootstrapService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(CommandEnvironment::new(sh("mkdir -p .venv && pwd > .venv/origin"))),
        Box::new(CommandHookInstaller::new(
            sh("touch hooks-installed"),
            CommandSpec::new("sh", Vec::<String>::new()),
        )),
        Box::new(rebrand_adapters::PathLocator),
        BootstrapSettings::default(),
    );

    let outcome = service
        .rename(
            &request(&root, "my-service", MetadataOverrides::default()),
            &SilentProgress,
        )
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Completed(_)));

    let target = tmp.path().join("my-service");
    assert!(!root.exists());
    assert!(target.join("hooks-installed").exists());
    assert!(!target.join("pkg/__pycache__").exists());
    let origin = std::fs::read_to_string(target.join(".venv/origin")).unwrap();
    assert!(origin.trim_end().ends_with("my-service"));
    let manifest = std::fs::read_to_string(target.join("pyproject.toml")).unwrap();
    assert_eq!(manifest, MANIFEST.replace("\"python-try\"", "\"my-service\""));
}

#[test]
fn custom_environment_dir_is_removed_before_the_move() {
    let tmp = tempfile::TempDir::new().unwrap();
    let root = tmp.path().join("python-try");
    std::fs::create_dir_all(root.join("venv/lib")).unwrap();
    std::fs::write(root.join("venv/pyvenv.cfg"), "home = /old/path").unwrap();
    std::fs::write(root.join("pyproject.toml"), MANIFEST).unwrap();

    let settings = BootstrapSettings {
        env_dir: PathBuf::from("venv"),
        ..BootstrapSettings::default()
    };
    let service = BootstrapService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(RecordingEnvironment {
            journal: Journal::default(),
            fs: MemoryFilesystem::new(),
            fail: false,
        }),
        Box::new(RecordingHooks {
            journal: Journal::default(),
        }),
        Box::new(EverythingInstalled),
        settings,
    );

    let ws = Workspace::from_path(&root).unwrap();
    assert_eq!(service.cleanup_targets(&ws).unwrap(), vec![root.join("venv")]);

    let removed = service.clean(&ws, &SilentProgress).unwrap();
    assert_eq!(removed, vec![root.join("venv")]);
    assert!(!root.join("venv").exists());
    assert!(root.join("pyproject.toml").exists());
}

/// Runs `git` in `dir` and returns trimmed stdout.
fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {args:?} failed");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn fresh_history_replaces_template_commits() {
    if which::which("git").is_err() {
        eprintln!("git not installed; skipping");
        return;
    }
    let identity = [
        "-c",
        "user.name=Rebrand Test",
        "-c",
        "user.email=rebrand@example.com",
        "-c",
        "commit.gpgsign=false",
    ];

    let tmp = tempfile::TempDir::new().unwrap();
    let root = tmp.path().join("python-try");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("pyproject.toml"), MANIFEST).unwrap();
    git(&root, &["init", "-q"]);
    for message in ["template 1", "template 2"] {
        let mut args = identity.to_vec();
        args.extend(["commit", "-q", "--allow-empty", "-m", message]);
        git(&root, &args);
    }

    let journal = Journal::default();
    let repository = GitCommandRepository::new(CommandSpec::new("git", identity));
    let service = BootstrapService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(RecordingEnvironment {
            journal: journal.clone(),
            fs: MemoryFilesystem::new(),
            fail: false,
        }),
        Box::new(RecordingHooks {
            journal: journal.clone(),
        }),
        Box::new(EverythingInstalled),
        BootstrapSettings::default(),
    )
    .with_git(Box::new(repository));

    let overrides = MetadataOverrides {
        repository_url: Some("https://github.com/ada/my-service".into()),
        ..MetadataOverrides::default()
    };
    let request = RenameRequest {
        fresh_history: true,
        ..request(&root, "my-service", overrides)
    };
    let RunOutcome::Completed(report) = service.rename(&request, &SilentProgress).unwrap() else {
        panic!("expected a completed run");
    };

    let target = tmp.path().join("my-service");
    assert_eq!(report.completed, Step::ALL.to_vec());
    assert_eq!(git(&target, &["log", "--format=%s"]), "Initial commit for my-service");
    assert_eq!(git(&target, &["branch", "--show-current"]), "main");
    assert_eq!(
        git(&target, &["remote", "get-url", "origin"]),
        "https://github.com/ada/my-service"
    );
    // The committed manifest already carries the new name.
    assert!(git(&target, &["show", "HEAD:pyproject.toml"]).contains("name = \"my-service\""));
    assert_eq!(
        journal.entries().last().unwrap(),
        &format!("install {}", target.display())
    );
}
