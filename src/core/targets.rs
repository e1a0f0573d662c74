//! Build target files (`<Name>.Target.cs`, `<Name>Editor.Target.cs`) directly
//! under `Source/`.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::backup::BackupManager;
use crate::context::ProjectContext;
use crate::defaults::RenamerConfig;
use crate::error::{Error, Result};
use crate::events::EventLog;
use crate::patcher::EditOperation;
use crate::utils::io;

const STAGE: &str = "targets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Game,
    Editor,
}

impl TargetKind {
    fn label(&self) -> &'static str {
        match self {
            TargetKind::Game => "Target file",
            TargetKind::Editor => "Editor Target file",
        }
    }
}

/// A target file found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    pub path: PathBuf,
    pub kind: TargetKind,
    /// File name with the kind's suffix removed.
    pub stem: String,
    pub suffix: String,
}

/// Classify a file name. The editor suffix is checked first since every
/// editor target also ends with the plain target suffix.
pub fn classify(file_name: &str, config: &RenamerConfig) -> Option<(TargetKind, String, String)> {
    let editor_suffix = config.editor_target_suffix();
    let target_suffix = config.target_suffix();

    if let Some(stem) = file_name.strip_suffix(&editor_suffix) {
        if !stem.is_empty() {
            return Some((TargetKind::Editor, stem.to_string(), editor_suffix));
        }
    }
    if let Some(stem) = file_name.strip_suffix(&target_suffix) {
        if !stem.is_empty() {
            return Some((TargetKind::Game, stem.to_string(), target_suffix));
        }
    }
    None
}

/// Target files directly inside `source_dir` (non-recursive).
pub fn find_target_files(source_dir: &Path, config: &RenamerConfig) -> Result<Vec<TargetFile>> {
    let files = io::list_files(source_dir)?;
    Ok(files
        .into_iter()
        .filter_map(|path| {
            let name = io::file_name(&path);
            classify(&name, config).map(|(kind, stem, suffix)| TargetFile {
                path,
                kind,
                stem,
                suffix,
            })
        })
        .collect())
}

/// Split a target stem into the project name it starts with and the
/// qualifier after it (`MyGameServer` → `MyGame`, `Server`). The longest
/// matching name wins; a stem matching none is all base.
pub fn split_stem<'a>(stem: &'a str, names: &[&str]) -> (&'a str, &'a str) {
    names
        .iter()
        .filter(|name| !name.is_empty() && stem.starts_with(*name))
        .max_by_key(|name| name.len())
        .map(|name| stem.split_at(name.len()))
        .unwrap_or((stem, ""))
}

/// Rename one target file to `<new_name><qualifier><suffix>` and replace the
/// old base name inside. `names` are the names the stem may start with.
/// Returns the new path; an existing file at that path is never replaced.
pub fn rename_target(target: &TargetFile, names: &[&str], new_name: &str) -> Result<PathBuf> {
    let (base, qualifier) = split_stem(&target.stem, names);
    let new_path = target
        .path
        .with_file_name(format!("{}{}{}", new_name, qualifier, target.suffix));
    if new_path != target.path {
        io::rename_path(&target.path, &new_path)?;
    }
    EditOperation::new(&new_path, base, new_name).apply()?;
    Ok(new_path)
}

/// Names a target stem can start with: the descriptor stem, the module names
/// and the new name itself on a re-run.
fn stem_names(ctx: &ProjectContext) -> Vec<&str> {
    let mut names = vec![ctx.old_project_name.as_str(), ctx.new_project_name.as_str()];
    names.extend(ctx.descriptor_module_name.as_deref());
    names.extend(ctx.source_module_name.as_deref());
    names.sort_unstable();
    names.dedup();
    names
}

/// Targets stage. Missing target kinds and per-file failures are logged as
/// errors without aborting; a missing source directory fails the stage.
pub fn run(
    ctx: &ProjectContext,
    backups: &BackupManager,
    config: &RenamerConfig,
    log: &mut EventLog,
) -> Result<()> {
    if !ctx.source_dir.is_dir() {
        return Err(Error::file_not_found(
            "Source directory",
            ctx.source_dir.to_string_lossy(),
        ));
    }

    let targets = find_target_files(&ctx.source_dir, config)?;
    let names = stem_names(ctx);

    // Targets named after the project claim their new names before any
    // unrelated target falls back to the bare new name.
    let mut ordered: Vec<&TargetFile> = targets.iter().collect();
    ordered.sort_by_key(|target| !names.iter().any(|name| target.stem.starts_with(name)));

    for target in ordered {
        backups.backup_file(STAGE, &target.path, log);
        match rename_target(target, &names, &ctx.new_project_name) {
            Ok(new_path) => log.success(
                STAGE,
                Some(&new_path),
                format!("Renamed and updated {}", target.kind.label()),
            ),
            Err(err) => log.failure(STAGE, Some(&target.path), &err),
        }
    }

    for kind in [TargetKind::Game, TargetKind::Editor] {
        if !targets.iter().any(|t| t.kind == kind) {
            log.error(
                STAGE,
                Some(&ctx.source_dir),
                format!("No {} found in the Source directory", kind.label()),
            );
        }
    }

    Ok(())
}
