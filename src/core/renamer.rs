//! Rename orchestration: runs every stage in order against one
//! [`ProjectContext`] and folds the outcomes into a [`RunReport`].
//!
//! Stages never abort the run on their own. A fatal stage is recorded and the
//! next stage runs; only a retryable source module failure halts the run,
//! because the config stage needs the confirmed module folder name.

use serde::Serialize;

use crate::backup::{self, BackupManager};
use crate::context::ProjectContext;
use crate::defaults::RenamerConfig;
use crate::error::Result;
use crate::events::EventLog;
use crate::generator::{self, EngineInstall};
use crate::housekeeping;
use crate::pipeline::{self, RunStatus, RunSummary, Stage, StageOutcome, StageResult};
use crate::{descriptor, project_config, source_module, targets};

/// What the caller asked for beyond the mandatory edits.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub backup: bool,
    pub clean_cache: bool,
    pub delete_solution: bool,
    pub engine: Option<EngineInstall>,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            backup: true,
            clean_cache: false,
            delete_solution: false,
            engine: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub context: ProjectContext,
    pub status: RunStatus,
    /// The caller should collect a corrected module folder name and run again.
    pub retryable: bool,
    pub stages: Vec<StageResult>,
    pub summary: RunSummary,
    pub log: EventLog,
}

impl RunReport {
    pub fn stage(&self, stage: Stage) -> Option<&StageResult> {
        self.stages.iter().find(|result| result.stage == stage)
    }
}

/// Why a stage does not apply to this run, if it doesn't.
pub fn skip_reason(stage: Stage, ctx: &ProjectContext, options: &RenameOptions) -> Option<&'static str> {
    match stage {
        Stage::Descriptor | Stage::Config => None,
        Stage::Targets | Stage::SourceModule if !ctx.is_source_project => {
            Some("Blueprint-only project has no C++ source")
        }
        Stage::Targets | Stage::SourceModule => None,
        Stage::Cache if !options.clean_cache => Some("Cache cleanup not requested"),
        Stage::Cache => None,
        Stage::Solution if !options.delete_solution => Some("Solution cleanup not requested"),
        Stage::Solution => None,
        Stage::Generate if options.engine.is_none() => Some("No engine directory given"),
        Stage::Generate if !ctx.is_source_project => {
            Some("Blueprint-only project has no project files to generate")
        }
        Stage::Generate => None,
    }
}

fn run_stage(
    stage: Stage,
    ctx: &mut ProjectContext,
    backups: &BackupManager,
    options: &RenameOptions,
    config: &RenamerConfig,
    log: &mut EventLog,
) -> Result<()> {
    match stage {
        Stage::Descriptor => descriptor::run(ctx, backups, &config.descriptor_extension, log),
        Stage::Targets => targets::run(ctx, backups, config, log),
        Stage::SourceModule => source_module::run(ctx, backups, config, log),
        Stage::Config => project_config::run(ctx, backups, config, log),
        Stage::Cache => {
            housekeeping::delete_cache_directories(&ctx.root, &config.cache_directories, log);
            Ok(())
        }
        Stage::Solution => housekeeping::delete_stale_solution_files(
            &ctx.root,
            &config.solution_extension,
            backups,
            ctx.is_source_project,
            log,
        )
        .map(|_| ()),
        Stage::Generate => match &options.engine {
            Some(engine) => {
                generator::generate_project_files(engine, &ctx.descriptor_path)?;
                log.success(
                    stage.as_str(),
                    Some(&ctx.descriptor_path),
                    "Generated project files",
                );
                Ok(())
            }
            None => Ok(()),
        },
    }
}

/// Run every stage against `ctx`.
pub fn run(mut ctx: ProjectContext, options: &RenameOptions, config: &RenamerConfig) -> RunReport {
    let mut log = EventLog::new();

    let backups = if options.backup {
        let root = backup::backup_root_for(&ctx.root, &config.backup_folder_name);
        ctx.backup_root = Some(root.clone());
        BackupManager::new(&ctx.root, root, Some(ctx.root.join(&config.backup_folder_name)))
    } else {
        BackupManager::disabled(&ctx.root)
    };

    crate::log_status!(
        "rename",
        "Renaming {} to {}",
        ctx.old_project_name,
        ctx.new_project_name
    );

    let mut stages = Vec::with_capacity(Stage::ALL.len());
    let mut halted: Option<String> = None;

    for stage in Stage::ALL {
        if let Some(reason) = &halted {
            stages.push(StageResult::not_run(stage, reason.clone()));
            continue;
        }
        if let Some(reason) = skip_reason(stage, &ctx, options) {
            log.success(stage.as_str(), None, format!("Skipped: {}", reason));
            stages.push(StageResult::skipped(stage, reason));
            continue;
        }

        let errors_before = log.errors;
        let result = run_stage(stage, &mut ctx, &backups, options, config, &mut log);
        let (outcome, error) = StageOutcome::from_result(result);
        if let Some(err) = &error {
            log.failure(stage.as_str(), None, err);
        }

        if matches!(outcome, StageOutcome::Retryable { .. }) {
            halted = Some(format!("Stopped after retryable {} failure", stage.as_str()));
        }

        let logged_errors = (log.errors - errors_before) as usize;
        stages.push(StageResult::finished(stage, outcome, error.as_ref(), logged_errors));
    }

    let (status, mut summary) = pipeline::summarize(&stages);
    if status != RunStatus::Retryable && ctx.is_source_project {
        summary.next_actions.push(
            "When the editor asks to rebuild missing or out of date modules on first open, answer Yes"
                .to_string(),
        );
    }

    RunReport {
        retryable: status == RunStatus::Retryable,
        context: ctx,
        status,
        stages,
        summary,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn context(is_source_project: bool) -> ProjectContext {
        let root = Path::new("/p");
        ProjectContext {
            root: root.to_path_buf(),
            old_project_name: "MyGame".to_string(),
            new_project_name: "Awesome".to_string(),
            is_source_project,
            source_module_name: is_source_project.then(|| "MyGame".to_string()),
            descriptor_module_name: is_source_project.then(|| "MyGame".to_string()),
            descriptor_path: root.join("MyGame.uproject"),
            source_dir: root.join("Source"),
            config_dir: root.join("Config"),
            backup_root: None,
        }
    }

    #[test]
    fn blueprint_projects_skip_source_stages() {
        let ctx = context(false);
        let options = RenameOptions::default();
        assert!(skip_reason(Stage::Targets, &ctx, &options).is_some());
        assert!(skip_reason(Stage::SourceModule, &ctx, &options).is_some());
        assert!(skip_reason(Stage::Descriptor, &ctx, &options).is_none());
        assert!(skip_reason(Stage::Config, &ctx, &options).is_none());
    }

    #[test]
    fn optional_stages_follow_options() {
        let ctx = context(true);
        let mut options = RenameOptions::default();
        assert!(skip_reason(Stage::Cache, &ctx, &options).is_some());
        assert!(skip_reason(Stage::Solution, &ctx, &options).is_some());
        assert!(skip_reason(Stage::Generate, &ctx, &options).is_some());

        options.clean_cache = true;
        options.delete_solution = true;
        options.engine = Some(EngineInstall::new("/UE", generator::EngineVersion::Ue5));
        assert!(skip_reason(Stage::Cache, &ctx, &options).is_none());
        assert!(skip_reason(Stage::Solution, &ctx, &options).is_none());
        assert!(skip_reason(Stage::Generate, &ctx, &options).is_none());
    }
}
