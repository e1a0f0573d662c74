//! Primary C++ module folder under `Source/`: API export macros, build-rule
//! file, primary `.cpp`/`.h` pair and the folder itself.
//!
//! Every precondition for the renames is checked before the first rename, so
//! a retryable failure (wrong folder, missing build file, missing primary
//! pair) leaves the folder and its files under their old names. Header macro
//! patching may already have happened at that point; it is idempotent.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::backup::BackupManager;
use crate::context::ProjectContext;
use crate::defaults::RenamerConfig;
use crate::error::{Error, Result};
use crate::events::EventLog;
use crate::patcher;
use crate::utils::io;

const STAGE: &str = "source_module";

const HEADER_EXTENSION: &str = "h";

/// `MyGame` → `MYGAME_API`.
pub fn api_macro(name: &str) -> String {
    format!("{}_API", name.to_uppercase())
}

/// `IMPLEMENT_PRIMARY_GAME_MODULE( FDefaultGameModuleImpl, X, "X" );`
pub fn primary_module_macro(name: &str) -> String {
    format!(
        "IMPLEMENT_PRIMARY_GAME_MODULE( FDefaultGameModuleImpl, {}, \"{}\" );",
        name, name
    )
}

pub fn include_directive(name: &str) -> String {
    format!("#include \"{}.h\"", name)
}

/// Files the module stage is about to rename, resolved up front.
#[derive(Debug, Clone)]
pub struct ModuleFiles {
    pub build_file: PathBuf,
    pub cpp_file: PathBuf,
    pub header_file: PathBuf,
    /// Other build-rule files in the folder; left as they are.
    pub ignored_build_files: Vec<PathBuf>,
}

/// Replace the API macro in every header below `dir`. Per-file failures are
/// logged; returns the number of headers changed.
pub fn patch_headers(dir: &Path, old_name: &str, new_name: &str, log: &mut EventLog) -> usize {
    let old_macro = api_macro(old_name);
    let new_macro = api_macro(new_name);
    let mut changed = 0;

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(HEADER_EXTENSION)
        {
            continue;
        }
        match patcher::patch_file(path, &[(old_macro.as_str(), new_macro.as_str())]) {
            Ok(result) if result.written => {
                changed += 1;
                log.success(
                    STAGE,
                    Some(path),
                    format!("Replaced {} with {} ({}x)", old_macro, new_macro, result.replacements),
                );
            }
            Ok(_) => {}
            Err(err) => log.failure(STAGE, Some(path), &err),
        }
    }

    changed
}

/// Locate the build-rule file and primary pair directly inside `dir`.
///
/// Missing files are retryable errors: the caller should ask for a different
/// folder name.
pub fn locate_module_files(dir: &Path, module: &str, config: &RenamerConfig) -> Result<ModuleFiles> {
    let build_suffix = config.build_suffix();
    let candidates: Vec<PathBuf> = io::list_files(dir)?
        .into_iter()
        .filter(|path| io::file_name(path).ends_with(&build_suffix))
        .collect();

    let preferred = dir.join(format!("{}{}", module, build_suffix));
    let build_file = if candidates.contains(&preferred) {
        preferred
    } else {
        candidates.first().cloned().ok_or_else(|| {
            Error::file_not_found(format!("{} file", build_suffix), dir.to_string_lossy())
                .retryable()
                .with_hint("Check that the folder name matches the module folder under Source/")
        })?
    };
    let ignored_build_files = candidates.into_iter().filter(|path| *path != build_file).collect();

    let cpp_file = dir.join(format!("{}.cpp", module));
    let header_file = dir.join(format!("{}.{}", module, HEADER_EXTENSION));
    for (path, kind) in [(&cpp_file, "primary module .cpp file"), (&header_file, "primary module .h file")] {
        if !path.is_file() {
            return Err(Error::file_not_found(kind, path.to_string_lossy())
                .retryable()
                .with_hint("Check that the folder name matches the module folder under Source/"));
        }
    }

    Ok(ModuleFiles {
        build_file,
        cpp_file,
        header_file,
        ignored_build_files,
    })
}

/// Fail before any rename when a destination is taken by another file.
fn ensure_free(renames: &[(&Path, &Path)]) -> Result<()> {
    for (from, to) in renames {
        if from != to && to.exists() {
            return Err(Error::file_already_exists(from.to_string_lossy(), to.to_string_lossy()));
        }
    }
    Ok(())
}

fn rename_if_needed(from: &Path, to: &Path, log: &mut EventLog) -> Result<()> {
    if from == to {
        return Ok(());
    }
    io::rename_path(from, to)?;
    log.success(STAGE, Some(to), format!("Renamed {} to {}", io::file_name(from), io::file_name(to)));
    Ok(())
}

/// Source module stage.
pub fn run(
    ctx: &ProjectContext,
    backups: &BackupManager,
    config: &RenamerConfig,
    log: &mut EventLog,
) -> Result<()> {
    let module = ctx.source_module().map_err(Error::retryable)?.to_string();
    let new_name = ctx.new_project_name.as_str();
    let module_dir = ctx.source_dir.join(&module);
    let new_dir = ctx.source_dir.join(new_name);

    if !module_dir.is_dir() {
        if module != new_name && new_dir.is_dir() && new_dir.join(format!("{}.cpp", new_name)).is_file() {
            log.warning(
                STAGE,
                Some(&new_dir),
                format!("Folder {} not found but {} exists; treating module as already renamed", module, new_name),
            );
            return Ok(());
        }
        return Err(Error::file_not_found("source module folder", module_dir.to_string_lossy())
            .retryable()
            .with_hint("Pass --module with the EXACT name of the folder holding the C++ source files"));
    }

    backups.backup_folder(STAGE, &module_dir, log);

    patch_headers(&module_dir, &module, new_name, log);

    let files = locate_module_files(&module_dir, &module, config)?;
    for ignored in &files.ignored_build_files {
        log.warning(
            STAGE,
            Some(ignored),
            format!(
                "Ignoring extra build-rule file {}; only {} is renamed",
                io::file_name(ignored),
                io::file_name(&files.build_file)
            ),
        );
    }

    let new_build = module_dir.join(format!("{}{}", new_name, config.build_suffix()));
    let new_cpp = module_dir.join(format!("{}.cpp", new_name));
    let new_header = module_dir.join(format!("{}.{}", new_name, HEADER_EXTENSION));
    ensure_free(&[
        (files.build_file.as_path(), new_build.as_path()),
        (files.cpp_file.as_path(), new_cpp.as_path()),
        (files.header_file.as_path(), new_header.as_path()),
        (module_dir.as_path(), new_dir.as_path()),
    ])?;

    patcher::patch_file(&files.build_file, &[(module.as_str(), new_name)])?;
    rename_if_needed(&files.build_file, &new_build, log)?;

    let old_include = include_directive(&module);
    let new_include = include_directive(new_name);
    let old_macro = primary_module_macro(&module);
    let new_macro = primary_module_macro(new_name);
    patcher::patch_file(
        &files.cpp_file,
        &[
            (old_include.as_str(), new_include.as_str()),
            (old_macro.as_str(), new_macro.as_str()),
        ],
    )?;
    rename_if_needed(&files.cpp_file, &new_cpp, log)?;
    rename_if_needed(&files.header_file, &new_header, log)?;

    if module_dir != new_dir {
        io::rename_path(&module_dir, &new_dir)?;
        log.success(STAGE, Some(&new_dir), "Renamed C++ source folder");
    }

    Ok(())
}
