//! Bootstrap Service - main application orchestrator.
//!
//! This service coordinates the whole rename of a template checkout:
//! 1. Validate the requested name against the workspace (no side effects)
//! 2. Clean path-sensitive artifacts (environment, caches)
//! 3. Relocate the directory
//! 4. Rebuild the dependency environment from the new path
//! 5. Rewrite the manifest identity fields
//! 6. Optionally replace the git history with a single initial commit
//! 7. Install hooks (failures here are reported as warnings)
//!
//! Each step must succeed before the next starts. There is no rollback: once
//! step 3 has run, failures are reported with the new path so the operator
//! can resume from the failed step.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{
            EnvironmentManager, Filesystem, GitRepository, HookInstaller, ProgressReporter,
            ToolLocator,
        },
    },
    domain::{
        DomainError, ManifestFields, MetadataOverrides, ProjectName, RunState, Step, Workspace,
        manifest_editor,
    },
    error::{RebrandError, RebrandResult},
};

const GIT_DIR: &str = ".git";

/// Workspace-relative locations the bootstrap works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSettings {
    /// Project manifest, e.g. `pyproject.toml`.
    pub manifest_file: PathBuf,
    /// Lock file the environment is rebuilt from, e.g. `uv.lock`.
    pub lock_file: PathBuf,
    /// Isolated environment directory, e.g. `.venv`.
    pub env_dir: PathBuf,
    /// Paths deleted before relocation (missing ones are skipped).
    pub clean_paths: Vec<PathBuf>,
    /// Directory name of bytecode caches, removed wherever found.
    pub bytecode_dir: String,
    /// Optional hook customization script.
    pub customization_script: Option<PathBuf>,
    /// First branch of a fresh history.
    pub history_branch: String,
    /// Remote registered for the repository URL in a fresh history.
    pub history_remote: String,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            manifest_file: PathBuf::from("pyproject.toml"),
            lock_file: PathBuf::from("uv.lock"),
            env_dir: PathBuf::from(".venv"),
            clean_paths: [
                ".venv",
                ".pytest_cache",
                ".mypy_cache",
                ".ruff_cache",
                "build",
                "dist",
                "htmlcov",
                ".coverage",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            bytecode_dir: "__pycache__".into(),
            customization_script: Some(PathBuf::from("scripts/setup_hook_commit_message.py")),
            history_branch: "main".into(),
            history_remote: "origin".into(),
        }
    }
}

/// A rename as requested by the caller.
#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub workspace: Workspace,
    pub requested: String,
    pub overrides: MetadataOverrides,
    /// Replace the template's git history with a single initial commit.
    pub fresh_history: bool,
}

/// An executable found during preflight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTool {
    pub program: String,
    pub path: PathBuf,
}

/// Everything a validated rename will do, computed without side effects.
#[derive(Debug, Clone, Serialize)]
pub struct RenamePlan {
    pub name: ProjectName,
    pub source: Workspace,
    pub target: Workspace,
    pub cleanup: Vec<PathBuf>,
    pub fields: ManifestFields,
    pub tools: Vec<ResolvedTool>,
    pub customization_script: Option<PathBuf>,
    pub fresh_history: bool,
}

/// Result of input validation.
#[derive(Debug, Clone)]
pub enum Validation {
    /// The requested name is already the current name.
    Unchanged { workspace: Workspace },
    /// The rename may proceed.
    Proceed(Box<RenamePlan>),
}

/// Non-fatal hook installation failure, surfaced for manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookWarning {
    pub workspace: PathBuf,
    pub failures: Vec<String>,
}

impl std::fmt::Display for HookWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hooks were not fully installed in {}: {}",
            self.workspace.display(),
            self.failures.join("; ")
        )
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Workspace path at the end of the run.
    pub workspace: PathBuf,
    /// Path before relocation, when this run moved the workspace.
    pub previous: Option<PathBuf>,
    pub state: RunState,
    pub completed: Vec<Step>,
    pub removed: Vec<PathBuf>,
    pub hook_warning: Option<HookWarning>,
}

impl RunReport {
    fn new(workspace: &Path, previous: Option<&Path>, state: RunState) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            previous: previous.map(Path::to_path_buf),
            state,
            completed: Vec::new(),
            removed: Vec::new(),
            hook_warning: None,
        }
    }

    fn advance(&mut self, step: Step) {
        self.state = step.completed_state();
        self.completed.push(step);
    }
}

/// Outcome of a full rename.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Unchanged { workspace: Workspace },
    Completed(RunReport),
}

/// Main bootstrap service.
pub struct BootstrapService {
    filesystem: Box<dyn Filesystem>,
    environment: Box<dyn EnvironmentManager>,
    hooks: Box<dyn HookInstaller>,
    tools: Box<dyn ToolLocator>,
    git: Option<Box<dyn GitRepository>>,
    settings: BootstrapSettings,
}

impl BootstrapService {
    /// Create a new bootstrap service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        environment: Box<dyn EnvironmentManager>,
        hooks: Box<dyn HookInstaller>,
        tools: Box<dyn ToolLocator>,
        settings: BootstrapSettings,
    ) -> Self {
        Self {
            filesystem,
            environment,
            hooks,
            tools,
            git: None,
            settings,
        }
    }

    /// Enable the opt-in history reset step.
    pub fn with_git(mut self, git: Box<dyn GitRepository>) -> Self {
        self.git = Some(git);
        self
    }

    pub fn settings(&self) -> &BootstrapSettings {
        &self.settings
    }

    /// Validate, then execute.
    pub fn rename(
        &self,
        request: &RenameRequest,
        progress: &dyn ProgressReporter,
    ) -> RebrandResult<RunOutcome> {
        match self.validate(request)? {
            Validation::Unchanged { workspace } => Ok(RunOutcome::Unchanged { workspace }),
            Validation::Proceed(plan) => self.execute(&plan, progress).map(RunOutcome::Completed),
        }
    }

    /// Step 1: check the request against the workspace and build a plan.
    ///
    /// Performs no mutation. Besides the name checks this resolves every
    /// external tool and parses the manifest, so that problems surface
    /// while the workspace is still untouched.
    #[instrument(
        skip_all,
        fields(
            workspace = %request.workspace.path().display(),
            requested = %request.requested
        )
    )]
    pub fn validate(&self, request: &RenameRequest) -> RebrandResult<Validation> {
        let name = ProjectName::parse(&request.requested)?;
        let source = request.workspace.clone();

        if name.as_str() == source.current_name() {
            info!("Requested name matches the current name; nothing to do");
            return Ok(Validation::Unchanged { workspace: source });
        }

        if !self.filesystem.is_dir(source.path()) {
            return Err(DomainError::InvalidWorkspace {
                path: source.path().to_path_buf(),
                reason: "not an existing directory".into(),
            }
            .into());
        }

        let target = source.relocated(&name);
        if self.filesystem.exists(target.path()) {
            return Err(ApplicationError::Conflict {
                path: target.path().to_path_buf(),
            }
            .into());
        }

        let tools = self.preflight_tools(request.fresh_history)?;

        let fields = ManifestFields::new(name.clone(), request.overrides.clone());
        let manifest = self
            .filesystem
            .read_to_string(&source.join(&self.settings.manifest_file))?;
        let current = manifest_editor::project_name(&manifest)?;
        // Trial rewrite: a manifest the rewriter cannot handle must fail here,
        // not after the directory has moved.
        manifest_editor::rewrite(&manifest, &fields)?;
        debug!(manifest_name = %current, "Manifest accepted");

        let cleanup = self.cleanup_targets(&source)?;
        let customization_script = self.customization_script(&source);

        info!(target = %target.path().display(), "Rename validated");
        Ok(Validation::Proceed(Box::new(RenamePlan {
            name,
            source,
            target,
            cleanup,
            fields,
            tools,
            customization_script,
            fresh_history: request.fresh_history,
        })))
    }

    /// Steps 2-7 for a validated plan.
    #[instrument(
        skip_all,
        fields(
            from = %plan.source.path().display(),
            to = %plan.target.path().display()
        )
    )]
    pub fn execute(
        &self,
        plan: &RenamePlan,
        progress: &dyn ProgressReporter,
    ) -> RebrandResult<RunReport> {
        let mut report = RunReport::new(
            plan.source.path(),
            Some(plan.source.path()),
            RunState::Validated,
        );
        report.completed.push(Step::Validate);

        // 2. Clean: the last point where aborting leaves a valid workspace.
        progress.step_started(Step::Clean, plan.source.path());
        let removed = self
            .clean(&plan.source, progress)
            .map_err(|e| RebrandError::step_failed(Step::Clean, plan.source.path(), e))?;
        report.removed = removed;
        report.advance(Step::Clean);
        progress.step_finished(Step::Clean);

        // 3. Relocate
        progress.step_started(Step::Relocate, plan.source.path());
        self.relocate(&plan.source, &plan.target)
            .map_err(|e| RebrandError::step_failed(Step::Relocate, plan.source.path(), e))?;
        report.workspace = plan.target.path().to_path_buf();
        report.advance(Step::Relocate);
        progress.step_finished(Step::Relocate);
        info!(workspace = %plan.target.path().display(), "Workspace relocated");

        // 4-7 run from the new location.
        self.run_from(
            Step::RebuildEnvironment,
            &plan.target,
            &plan.fields,
            plan.fresh_history,
            report,
            progress,
        )
    }

    /// Re-run steps from `from` onward in an already relocated workspace.
    ///
    /// The project name is taken from the workspace directory name. Resuming
    /// from [`Step::ResetHistory`] implies `fresh_history`.
    #[instrument(skip_all, fields(workspace = %workspace.path().display(), from = %from))]
    pub fn resume(
        &self,
        workspace: &Workspace,
        from: Step,
        overrides: MetadataOverrides,
        fresh_history: bool,
        progress: &dyn ProgressReporter,
    ) -> RebrandResult<RunReport> {
        if !from.is_resumable() {
            return Err(DomainError::StepNotResumable {
                step: from.to_string(),
            }
            .into());
        }
        if !self.filesystem.is_dir(workspace.path()) {
            return Err(DomainError::InvalidWorkspace {
                path: workspace.path().to_path_buf(),
                reason: "not an existing directory".into(),
            }
            .into());
        }

        let name = ProjectName::parse(workspace.current_name())?;
        let fresh_history = fresh_history || from == Step::ResetHistory;
        self.preflight_tools(fresh_history)?;

        let fields = ManifestFields::new(name, overrides);
        let report = RunReport::new(workspace.path(), None, RunState::Relocated);
        self.run_from(from, workspace, &fields, fresh_history, report, progress)
    }

    fn run_from(
        &self,
        from: Step,
        workspace: &Workspace,
        fields: &ManifestFields,
        fresh_history: bool,
        mut report: RunReport,
        progress: &dyn ProgressReporter,
    ) -> RebrandResult<RunReport> {
        let failed = |step: Step| {
            move |e: RebrandError| RebrandError::step_failed(step, workspace.path(), e)
        };

        if from <= Step::RebuildEnvironment {
            progress.step_started(Step::RebuildEnvironment, workspace.path());
            self.rebuild_environment(workspace)
                .map_err(failed(Step::RebuildEnvironment))?;
            report.advance(Step::RebuildEnvironment);
            progress.step_finished(Step::RebuildEnvironment);
        }

        if from <= Step::RewriteMetadata {
            progress.step_started(Step::RewriteMetadata, workspace.path());
            self.rewrite_metadata(workspace, fields)
                .map_err(failed(Step::RewriteMetadata))?;
            report.advance(Step::RewriteMetadata);
            progress.step_finished(Step::RewriteMetadata);
        }

        if fresh_history && from <= Step::ResetHistory {
            progress.step_started(Step::ResetHistory, workspace.path());
            self.reset_history(workspace, fields)
                .map_err(failed(Step::ResetHistory))?;
            report.advance(Step::ResetHistory);
            progress.step_finished(Step::ResetHistory);
        }

        progress.step_started(Step::InstallHooks, workspace.path());
        match self.install_hooks(workspace) {
            None => report.advance(Step::InstallHooks),
            Some(warning) => {
                warn!(%warning, "Hook installation needs manual follow-up");
                report.hook_warning = Some(warning);
            }
        }
        progress.step_finished(Step::InstallHooks);

        info!(state = %report.state, "Run finished");
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Individual steps
    // -------------------------------------------------------------------------

    /// Paths the cleaner would remove right now.
    ///
    /// The environment directory is always a target, whether or not it is
    /// also listed in `clean_paths`.
    pub fn cleanup_targets(&self, workspace: &Workspace) -> RebrandResult<Vec<PathBuf>> {
        let env_dir = workspace.join(&self.settings.env_dir);
        let mut targets: Vec<PathBuf> = Vec::new();
        for path in std::iter::once(env_dir.clone())
            .chain(self.settings.clean_paths.iter().map(|p| workspace.join(p)))
        {
            if !targets.contains(&path) && self.filesystem.exists(&path) {
                targets.push(path);
            }
        }

        let skip = [workspace.join(GIT_DIR), env_dir];
        let caches = self.filesystem.find_dirs_named(
            workspace.path(),
            &self.settings.bytecode_dir,
            &skip,
        )?;
        for cache in caches {
            if !targets.iter().any(|t| cache.starts_with(t)) {
                targets.push(cache);
            }
        }

        Ok(targets)
    }

    /// Step 2: delete the environment and caches. Missing paths are skipped.
    pub fn clean(
        &self,
        workspace: &Workspace,
        progress: &dyn ProgressReporter,
    ) -> RebrandResult<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for path in self.cleanup_targets(workspace)? {
            if self.filesystem.remove_path(&path)? {
                debug!(path = %path.display(), "Removed");
                progress.path_removed(&path);
                removed.push(path);
            }
        }
        info!(count = removed.len(), "Workspace cleaned");
        Ok(removed)
    }

    /// Step 3: move the workspace directory.
    pub fn relocate(&self, source: &Workspace, target: &Workspace) -> RebrandResult<()> {
        // Re-check immediately before the move; the rename itself also
        // refuses an existing target.
        if self.filesystem.exists(target.path()) {
            return Err(ApplicationError::Conflict {
                path: target.path().to_path_buf(),
            }
            .into());
        }
        self.filesystem
            .rename_no_replace(source.path(), target.path())
    }

    /// Step 4: recreate the environment from the lock file.
    pub fn rebuild_environment(&self, workspace: &Workspace) -> RebrandResult<()> {
        let lock_file = workspace.join(&self.settings.lock_file);
        debug!(lock_file = %lock_file.display(), "Recreating environment");
        self.environment.recreate(workspace.path(), &lock_file)
    }

    /// Step 5: rewrite the identity fields of the manifest in place.
    pub fn rewrite_metadata(
        &self,
        workspace: &Workspace,
        fields: &ManifestFields,
    ) -> RebrandResult<()> {
        let path = workspace.join(&self.settings.manifest_file);
        let source = self.filesystem.read_to_string(&path)?;
        let updated = manifest_editor::rewrite(&source, fields)?;

        if updated == source {
            debug!(path = %path.display(), "Manifest already up to date");
            return Ok(());
        }
        self.filesystem.write_file(&path, &updated)?;
        info!(path = %path.display(), fields = ?fields.touched_keys(), "Manifest updated");
        Ok(())
    }

    /// Step 6 (opt-in): drop the template's history and start a new one.
    ///
    /// Removes `.git`, initialises a repository on the configured branch,
    /// registers the repository URL as a remote when one is known, then
    /// commits the whole tree. Re-running starts over from an empty history.
    pub fn reset_history(
        &self,
        workspace: &Workspace,
        fields: &ManifestFields,
    ) -> RebrandResult<()> {
        let git = self.git()?;
        let git_dir = workspace.join(GIT_DIR);
        if self.filesystem.remove_path(&git_dir)? {
            debug!(path = %git_dir.display(), "Removed template history");
        }

        git.init(workspace.path(), &self.settings.history_branch)?;
        if let Some(url) = &fields.overrides.repository_url {
            git.add_remote(workspace.path(), &self.settings.history_remote, url)?;
        }
        git.commit_all(
            workspace.path(),
            &format!("Initial commit for {}", fields.name.as_str()),
        )?;

        info!(branch = %self.settings.history_branch, "Fresh history created");
        Ok(())
    }

    /// Step 7: install hooks, then run the customization script if present.
    ///
    /// Failures never abort the run; they come back as a warning.
    pub fn install_hooks(&self, workspace: &Workspace) -> Option<HookWarning> {
        let mut failures = Vec::new();

        if let Err(e) = self.hooks.install(workspace.path()) {
            failures.push(e.to_string());
        }

        if let Some(script) = self.customization_script(workspace) {
            debug!(script = %script.display(), "Running hook customization");
            if let Err(e) = self.hooks.customize(workspace.path(), &script) {
                failures.push(e.to_string());
            }
        }

        (!failures.is_empty()).then(|| HookWarning {
            workspace: workspace.path().to_path_buf(),
            failures,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn customization_script(&self, workspace: &Workspace) -> Option<PathBuf> {
        let script = workspace.join(self.settings.customization_script.as_ref()?);
        self.filesystem.exists(&script).then_some(script)
    }

    fn git(&self) -> RebrandResult<&dyn GitRepository> {
        self.git.as_deref().ok_or_else(|| {
            ApplicationError::GitFailed {
                reason: "no git driver is configured for this run".into(),
            }
            .into()
        })
    }

    fn preflight_tools(&self, fresh_history: bool) -> RebrandResult<Vec<ResolvedTool>> {
        let mut programs = self.environment.programs();
        let extra = if fresh_history {
            self.git()?.programs()
        } else {
            Vec::new()
        };
        for program in self.hooks.programs().into_iter().chain(extra) {
            if !programs.contains(&program) {
                programs.push(program);
            }
        }

        programs
            .into_iter()
            .map(|program| match self.tools.resolve(&program) {
                Some(path) => {
                    debug!(%program, path = %path.display(), "Tool resolved");
                    Ok(ResolvedTool { program, path })
                }
                None => Err(ApplicationError::MissingTool { program }.into()),
            })
            .collect()
    }
}
