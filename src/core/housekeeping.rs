//! Optional cleanup after a rename: cached build output and stale solution
//! files that still reference the old name.

use std::path::{Path, PathBuf};

use crate::backup::BackupManager;
use crate::error::Result;
use crate::events::EventLog;
use crate::utils::io;

const CACHE_STAGE: &str = "cache";
const SOLUTION_STAGE: &str = "solution";

/// Remove each configured cache directory under `root`. Absent directories
/// are skipped silently; a failed removal is logged and the rest continue.
/// Returns the directories removed.
pub fn delete_cache_directories(root: &Path, names: &[String], log: &mut EventLog) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for name in names {
        let dir = root.join(name);
        if !dir.is_dir() {
            continue;
        }
        match io::remove_dir(&dir) {
            Ok(()) => {
                log.success(CACHE_STAGE, Some(&dir), format!("Deleted {}", name));
                removed.push(dir);
            }
            Err(err) => log.failure(CACHE_STAGE, Some(&dir), &err),
        }
    }
    removed
}

/// Solution files directly inside `root`.
pub fn find_solution_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    Ok(io::list_files(root)?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect())
}

/// Delete every solution file at `root`, backing each one up first when
/// `backup` is set. Returns the files deleted.
pub fn delete_stale_solution_files(
    root: &Path,
    extension: &str,
    backups: &BackupManager,
    backup: bool,
    log: &mut EventLog,
) -> Result<Vec<PathBuf>> {
    let mut deleted = Vec::new();
    for file in find_solution_files(root, extension)? {
        if backup {
            backups.backup_file(SOLUTION_STAGE, &file, log);
        }
        match io::remove_file(&file) {
            Ok(()) => {
                log.success(SOLUTION_STAGE, Some(&file), "Deleted stale solution file");
                deleted.push(file);
            }
            Err(err) => log.failure(SOLUTION_STAGE, Some(&file), &err),
        }
    }
    Ok(deleted)
}
