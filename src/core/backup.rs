//! Best-effort snapshots of files and folders taken before they are edited.
//!
//! A backup of `<root>/a/b.txt` lands at `<backup_root>/a/b.txt`. Failures are
//! recorded in the event log and never stop the edit that follows.

use chrono::Local;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::events::EventLog;
use crate::utils::io;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `<project_root>/<folder_name>/<YYYY-MM-DD_HH-MM-SS>` for a run starting now.
pub fn backup_root_for(project_root: &Path, folder_name: &str) -> PathBuf {
    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    project_root.join(folder_name).join(stamp)
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    project_root: PathBuf,
    backup_root: Option<PathBuf>,
    exclude: Option<PathBuf>,
}

impl BackupManager {
    /// Backups into `backup_root`. Anything under `exclude` (the folder that
    /// holds every run's backups) is never copied.
    pub fn new(project_root: &Path, backup_root: PathBuf, exclude: Option<PathBuf>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            backup_root: Some(backup_root),
            exclude,
        }
    }

    /// All backup calls become silent no-ops.
    pub fn disabled(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            backup_root: None,
            exclude: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backup_root.is_some()
    }

    /// Where `path` would be copied, if it lives under the project root.
    pub fn backup_path_for(&self, path: &Path) -> Option<PathBuf> {
        let backup_root = self.backup_root.as_ref()?;
        let relative = path.strip_prefix(&self.project_root).ok()?;
        Some(backup_root.join(relative))
    }

    /// Copy a single file. Returns whether a copy was written.
    pub fn backup_file(&self, stage: &str, path: &Path, log: &mut EventLog) -> bool {
        let Some(dest) = self.prepare(stage, path, log) else {
            return false;
        };

        match io::copy_file(path, &dest) {
            Ok(()) => {
                log.success(stage, Some(path), format!("Backed up to {}", dest.display()));
                true
            }
            Err(err) => {
                log.failure(stage, Some(path), &err);
                false
            }
        }
    }

    /// Copy a directory tree. Returns whether every file was copied.
    pub fn backup_folder(&self, stage: &str, path: &Path, log: &mut EventLog) -> bool {
        let Some(dest) = self.prepare(stage, path, log) else {
            return false;
        };

        let mut copied = 0usize;
        let mut complete = true;
        let walker = WalkDir::new(path).into_iter().filter_entry(|entry| {
            self.exclude
                .as_ref()
                .map_or(true, |excluded| !entry.path().starts_with(excluded))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    complete = false;
                    log.error(stage, Some(path), format!("Backup walk failed: {}", e));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(path) else {
                continue;
            };
            if let Err(err) = io::copy_file(entry.path(), &dest.join(relative)) {
                complete = false;
                log.failure(stage, Some(entry.path()), &err);
            } else {
                copied += 1;
            }
        }

        if complete {
            log.success(
                stage,
                Some(path),
                format!("Backed up {} file(s) to {}", copied, dest.display()),
            );
        }
        complete
    }

    fn prepare(&self, stage: &str, path: &Path, log: &mut EventLog) -> Option<PathBuf> {
        if !self.is_enabled() {
            return None;
        }
        if !path.exists() {
            log.warning(stage, Some(path), "Nothing to back up, path does not exist");
            return None;
        }
        let dest = self.backup_path_for(path);
        if dest.is_none() {
            log.warning(stage, Some(path), "Path is outside the project root, not backed up");
        }
        dest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn manager(root: &Path) -> BackupManager {
        BackupManager::new(
            root,
            root.join("RenameBackups/2024-01-01_00-00-00"),
            Some(root.join("RenameBackups")),
        )
    }

    #[test]
    fn backup_root_uses_timestamp_folder() {
        let root = Path::new("/p");
        let backup = backup_root_for(root, "RenameBackups");
        let stamp = backup.file_name().unwrap().to_string_lossy().to_string();

        assert!(backup.starts_with("/p/RenameBackups"));
        assert!(chrono::NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn backup_file_preserves_relative_path() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Config")).unwrap();
        fs::write(root.join("Config/DefaultEngine.ini"), "[URL]").unwrap();
        let backups = manager(root);
        let mut log = EventLog::new();

        assert!(backups.backup_file("config", &root.join("Config/DefaultEngine.ini"), &mut log));

        let copy = root.join("RenameBackups/2024-01-01_00-00-00/Config/DefaultEngine.ini");
        assert_eq!(fs::read_to_string(copy).unwrap(), "[URL]");
    }

    #[test]
    fn backup_file_missing_source_warns() {
        let dir = tempdir().unwrap();
        let backups = manager(dir.path());
        let mut log = EventLog::new();

        assert!(!backups.backup_file("config", &dir.path().join("missing.ini"), &mut log));
        assert_eq!(log.warnings, 1);
        assert_eq!(log.errors, 0);
    }

    #[test]
    fn backup_folder_copies_tree_and_overwrites() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let module = root.join("Source/MyGame");
        fs::create_dir_all(module.join("Public")).unwrap();
        fs::write(module.join("MyGame.h"), "v1").unwrap();
        fs::write(module.join("Public/Actor.h"), "actor").unwrap();
        let backups = manager(root);
        let mut log = EventLog::new();

        assert!(backups.backup_folder("source_module", &module, &mut log));
        fs::write(module.join("MyGame.h"), "v2").unwrap();
        assert!(backups.backup_folder("source_module", &module, &mut log));

        let dest = root.join("RenameBackups/2024-01-01_00-00-00/Source/MyGame");
        assert_eq!(fs::read_to_string(dest.join("MyGame.h")).unwrap(), "v2");
        assert_eq!(fs::read_to_string(dest.join("Public/Actor.h")).unwrap(), "actor");
    }

    #[test]
    fn backup_folder_skips_backup_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("RenameBackups/old")).unwrap();
        fs::write(root.join("RenameBackups/old/a.txt"), "a").unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        let backups = manager(root);
        let mut log = EventLog::new();

        backups.backup_folder("test", root, &mut log);

        let dest = root.join("RenameBackups/2024-01-01_00-00-00");
        assert!(dest.join("b.txt").exists());
        assert!(!dest.join("RenameBackups").exists());
    }

    #[test]
    fn disabled_manager_is_silent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let backups = BackupManager::disabled(dir.path());
        let mut log = EventLog::new();

        assert!(!backups.backup_file("test", &dir.path().join("a.txt"), &mut log));
        assert!(log.events.is_empty());
    }
}
