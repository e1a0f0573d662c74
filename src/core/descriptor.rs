//! Project descriptor (`.uproject`) edits.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::backup::BackupManager;
use crate::context::ProjectContext;
use crate::error::{Error, Result};
use crate::events::EventLog;
use crate::patcher;
use crate::utils::{io, parser};

const STAGE: &str = "descriptor";

static MODULE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // "Modules": [ { "Name": "<X>"  with any whitespace between tokens
    Regex::new(r#""Modules"\s*:\s*\[\s*\{\s*"Name"\s*:\s*"([^"]+)""#).unwrap()
});

/// Name of the first module declared in descriptor content.
pub fn find_module_name(content: &str) -> Option<String> {
    parser::extract_first(content, &MODULE_NAME_PATTERN)
}

/// Replace every occurrence of the descriptor's first module name with
/// `new_name`. Returns the old module name.
pub fn rename_module(descriptor: &Path, new_name: &str) -> Result<String> {
    let content = io::read_file(descriptor, "read project descriptor")?;
    let old_name = find_module_name(&content)
        .ok_or_else(|| Error::module_name_missing(descriptor.to_string_lossy()))?;

    patcher::patch_file(descriptor, &[(old_name.as_str(), new_name)])?;
    Ok(old_name)
}

/// `<dir>/<new_name>.<extension>` next to the current descriptor.
pub fn renamed_path(descriptor: &Path, new_name: &str, extension: &str) -> PathBuf {
    descriptor.with_file_name(format!("{}.{}", new_name, extension))
}

/// Descriptor stage: back up, rewrite the module name (source projects only),
/// rename the file. A failed file rename is logged and leaves
/// `ctx.descriptor_path` pointing at the old file.
pub fn run(
    ctx: &mut ProjectContext,
    backups: &BackupManager,
    extension: &str,
    log: &mut EventLog,
) -> Result<()> {
    backups.backup_file(STAGE, &ctx.descriptor_path, log);

    if ctx.is_source_project {
        let old_name = rename_module(&ctx.descriptor_path, &ctx.new_project_name)?;
        log.success(
            STAGE,
            Some(&ctx.descriptor_path),
            format!(
                "Module name changed from {} to {}",
                old_name, ctx.new_project_name
            ),
        );
    } else {
        log.success(
            STAGE,
            Some(&ctx.descriptor_path),
            "Blueprint-only project, no module name to change",
        );
    }

    let new_path = renamed_path(&ctx.descriptor_path, &ctx.new_project_name, extension);
    if new_path == ctx.descriptor_path {
        log.success(STAGE, Some(&new_path), "Project file already has the new name");
        return Ok(());
    }

    match io::rename_path(&ctx.descriptor_path, &new_path) {
        Ok(()) => {
            log.success(
                STAGE,
                Some(&new_path),
                format!("Renamed project file to {}", io::file_name(&new_path)),
            );
            ctx.descriptor_path = new_path;
        }
        Err(err) => log.failure(STAGE, Some(&ctx.descriptor_path), &err),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DESCRIPTOR: &str = r#"{
	"FileVersion": 3,
	"EngineAssociation": "5.3",
	"Modules": [
		{
			"Name": "MyGame",
			"Type": "Runtime",
			"LoadingPhase": "Default",
			"AdditionalDependencies": [ "MyGameCore" ]
		}
	]
}"#;

    #[test]
    fn find_module_name_reads_first_module() {
        assert_eq!(find_module_name(DESCRIPTOR), Some("MyGame".to_string()));
    }

    #[test]
    fn find_module_name_tolerates_whitespace() {
        let compact = r#"{"Modules":[{"Name":"Foo","Type":"Runtime"}]}"#;
        let spread = "{ \"Modules\"  :\n [ \n\t {  \n \"Name\" :   \"Foo\" , \"Type\": \"Runtime\" } ] }";
        assert_eq!(find_module_name(compact), Some("Foo".to_string()));
        assert_eq!(find_module_name(spread), Some("Foo".to_string()));
    }

    #[test]
    fn find_module_name_ignores_name_outside_modules() {
        let content = r#"{"Plugins": [{"Name": "OnlineSubsystem"}]}"#;
        assert_eq!(find_module_name(content), None);
    }

    #[test]
    fn rename_module_replaces_all_occurrences() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("MyGame.uproject");
        fs::write(&path, DESCRIPTOR).unwrap();

        let old = rename_module(&path, "Awesome").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(old, "MyGame");
        assert!(content.contains(r#""Name": "Awesome""#));
        assert!(content.contains("AwesomeCore"));
        assert!(!content.contains("MyGame"));
    }

    #[test]
    fn rename_module_without_modules_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Bp.uproject");
        fs::write(&path, r#"{"FileVersion": 3}"#).unwrap();

        let err = rename_module(&path, "Awesome").unwrap_err();
        assert_eq!(err.code.as_str(), "parse.module_name_missing");
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"FileVersion": 3}"#);
    }

    #[test]
    fn renamed_path_stays_in_directory() {
        let path = renamed_path(Path::new("/p/MyGame.uproject"), "Awesome", "uproject");
        assert_eq!(path, Path::new("/p/Awesome.uproject"));
    }
}
