//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn io_error(e: std::io::Error, operation: &str, path: &Path) -> Error {
    Error::internal_io(e.to_string(), Some(format!("{} {}", operation, path.display())))
}

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| io_error(e, operation, path))
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// Readers always see either the old content or the new content. If the
/// temp write fails the original is left untouched and the temp file removed.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    if let Err(e) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::internal_io(
            e.to_string(),
            Some(format!("{} (write temp)", operation)),
        ));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation)))
    })?;

    Ok(())
}

/// Rename a file or directory. Refuses to replace an existing entry at `to`
/// unless it is `from` itself (a case-only rename on a case-insensitive
/// file system).
pub fn rename_path(from: &Path, to: &Path) -> Result<()> {
    if from != to && to.exists() && !same_entry(from, to) {
        return Err(Error::file_already_exists(
            from.to_string_lossy(),
            to.to_string_lossy(),
        ));
    }
    fs::rename(from, to).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("rename {} → {}", from.display(), to.display())),
        )
    })
}

fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(from, to).map(|_| ()).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("copy {} → {}", from.display(), to.display())),
        )
    })
}

/// Regular files directly inside `dir`, sorted by path.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_entries(dir, |path| path.is_file())
}

/// Subdirectories directly inside `dir`, sorted by path.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    list_entries(dir, |path| path.is_dir())
}

fn list_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| io_error(e, "list directory", dir))?;

    let mut result: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| keep(path))
        .collect();
    result.sort();
    Ok(result)
}

/// File name of `path` as an owned string ("" when there is none).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| io_error(e, "create directory", dir))
}

pub fn remove_dir(dir: &Path) -> Result<()> {
    fs::remove_dir_all(dir).map_err(|e| io_error(e, "delete directory", dir))
}

pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| io_error(e, "delete file", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.txt"), "test read");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn write_file_atomic_replaces_content_and_cleans_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Game.uproject");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new", "test write").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("Game.uproject.tmp").exists());
    }

    #[test]
    fn write_file_atomic_fails_for_missing_directory() {
        let result = write_file_atomic(
            Path::new("/nonexistent/dir/file.txt"),
            "content",
            "test write",
        );
        assert_eq!(result.unwrap_err().code.as_str(), "internal.io_error");
    }

    #[test]
    fn list_files_and_dirs_are_sorted_and_separated() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Source")).unwrap();
        fs::write(dir.path().join("b.sln"), "").unwrap();
        fs::write(dir.path().join("a.uproject"), "").unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, ["a.uproject", "b.sln"]);

        let dirs = list_dirs(dir.path()).unwrap();
        assert_eq!(dirs, [dir.path().join("Source")]);
    }

    #[test]
    fn rename_path_refuses_to_replace_existing_file() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("MyGameServer.Target.cs");
        let to = dir.path().join("Awesome.Target.cs");
        fs::write(&from, "server").unwrap();
        fs::write(&to, "game").unwrap();

        let err = rename_path(&from, &to).unwrap_err();

        assert_eq!(err.code.as_str(), "file.already_exists");
        assert_eq!(fs::read_to_string(&from).unwrap(), "server");
        assert_eq!(fs::read_to_string(&to).unwrap(), "game");
    }

    #[test]
    fn rename_path_moves_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("MyGame")).unwrap();
        fs::write(dir.path().join("MyGame/MyGame.cpp"), "").unwrap();

        rename_path(&dir.path().join("MyGame"), &dir.path().join("Awesome")).unwrap();

        assert!(dir.path().join("Awesome/MyGame.cpp").is_file());
        assert!(!dir.path().join("MyGame").exists());
    }

    #[test]
    fn copy_file_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "a").unwrap();
        let dest = dir.path().join("nested/deeper/a.txt");

        copy_file(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest).unwrap(), "a");
    }
}
