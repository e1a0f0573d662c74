//! Load → replace → atomic write, the primitive every rename stage uses.
//!
//! A file is read whole, patched in memory and written back through a temp
//! file swapped in with a rename. A read failure leaves the file untouched; a
//! write failure never leaves it half-written. Unchanged files are not
//! rewritten at all, which keeps re-runs on a renamed project quiet.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::{io, parser};

/// One literal substitution against one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOperation {
    pub path: PathBuf,
    pub find: String,
    pub replace: String,
}

impl EditOperation {
    pub fn new(path: impl Into<PathBuf>, find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            find: find.into(),
            replace: replace.into(),
        }
    }

    pub fn apply(&self) -> Result<PatchResult> {
        patch_file(&self.path, &[(self.find.as_str(), self.replace.as_str())])
    }
}

/// What a patch did to a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchResult {
    pub replacements: usize,
    pub written: bool,
}

/// Apply an ordered list of literal replacements to in-memory content.
///
/// Each pair runs over the output of the previous one.
pub fn patch_content(content: &str, replacements: &[(&str, &str)]) -> (String, usize) {
    let mut current = content.to_string();
    let mut total = 0;
    for (find, replace) in replacements {
        let (next, count) = parser::replace_literal(&current, find, replace);
        current = next;
        total += count;
    }
    (current, total)
}

/// Patch a file in place with an ordered list of literal replacements.
pub fn patch_file(path: &Path, replacements: &[(&str, &str)]) -> Result<PatchResult> {
    let content = io::read_file(path, "read for patch")?;
    let (patched, count) = patch_content(&content, replacements);
    commit(path, &content, &patched, count)
}

/// Apply a whole-document transform to a file; used for structural edits.
pub fn rewrite_file<F>(path: &Path, transform: F) -> Result<PatchResult>
where
    F: FnOnce(&str) -> (String, usize),
{
    let content = io::read_file(path, "read for rewrite")?;
    let (patched, count) = transform(&content);
    commit(path, &content, &patched, count)
}

fn commit(path: &Path, original: &str, patched: &str, replacements: usize) -> Result<PatchResult> {
    if patched == original {
        return Ok(PatchResult {
            replacements,
            written: false,
        });
    }
    io::write_file_atomic(path, patched, "write patched file")?;
    Ok(PatchResult {
        replacements,
        written: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn patch_file_applies_replacements_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("MyGame.cpp");
        fs::write(&path, "#include \"MyGame.h\"\nMyGame").unwrap();

        let result = patch_file(
            &path,
            &[("#include \"MyGame.h\"", "#include \"Awesome.h\""), ("MyGame", "X")],
        )
        .unwrap();

        assert_eq!(result.replacements, 2);
        assert!(result.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "#include \"Awesome.h\"\nX");
    }

    #[test]
    fn patch_file_skips_write_when_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ini");
        fs::write(&path, "nothing here").unwrap();

        let result = patch_file(&path, &[("MyGame", "Awesome")]).unwrap();

        assert_eq!(result, PatchResult { replacements: 0, written: false });
    }

    #[test]
    fn patch_file_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = patch_file(&dir.path().join("missing.h"), &[("a", "b")]).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn patch_then_reverse_restores_original() {
        let original = "MYGAME_API class UMyGameInstance; // MyGame";
        let (forward, _) = patch_content(original, &[("MyGame", "Awesome")]);
        let (back, _) = patch_content(&forward, &[("Awesome", "MyGame")]);
        assert_eq!(back, original);
    }

    #[test]
    fn edit_operation_applies_single_substitution() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("DefaultGame.ini");
        fs::write(&path, "ProjectName=MyGame\n").unwrap();

        let op = EditOperation::new(&path, "MyGame", "Awesome");
        op.apply().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "ProjectName=Awesome\n");
    }
}
