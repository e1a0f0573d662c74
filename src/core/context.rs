//! Per-run project state, discovered from disk and threaded through every
//! stage.
//!
//! Discovery always reads the current filesystem, so running again on a
//! project that an earlier run left half-renamed starts from what is actually
//! there rather than from the names the first run saw.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::defaults::RenamerConfig;
use crate::descriptor;
use crate::error::{Error, Result};
use crate::utils::{io, validation};

pub const SOURCE_DIR: &str = "Source";
pub const CONFIG_DIR: &str = "Config";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub root: PathBuf,
    /// Descriptor file stem at discovery time.
    pub old_project_name: String,
    pub new_project_name: String,
    /// The descriptor declares at least one C++ module.
    pub is_source_project: bool,
    /// Folder under `Source/` holding the primary module.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_module_name: Option<String>,
    /// First module named in the descriptor at discovery time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor_module_name: Option<String>,
    pub descriptor_path: PathBuf,
    pub source_dir: PathBuf,
    pub config_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_root: Option<PathBuf>,
}

impl ProjectContext {
    /// Validate inputs and discover the project at `root`.
    ///
    /// `source_module` defaults to the descriptor's first module name.
    pub fn discover(
        root: &Path,
        new_name: &str,
        source_module: Option<&str>,
        config: &RenamerConfig,
    ) -> Result<Self> {
        let new_name = validation::project_name(new_name)?;
        let descriptor_path = find_descriptor(root, &config.descriptor_extension)?;
        let content = io::read_file(&descriptor_path, "read project descriptor")?;
        let descriptor_module_name = descriptor::find_module_name(&content);

        let source_module_name = match source_module {
            Some(name) => Some(
                validation::require_non_empty(name, "module", "Source module folder name cannot be empty")?
                    .to_string(),
            ),
            None => descriptor_module_name.clone(),
        };

        let old_project_name = descriptor_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            root: root.to_path_buf(),
            old_project_name,
            new_project_name: new_name.to_string(),
            is_source_project: descriptor_module_name.is_some(),
            source_module_name,
            descriptor_module_name,
            descriptor_path,
            source_dir: root.join(SOURCE_DIR),
            config_dir: root.join(CONFIG_DIR),
            backup_root: None,
        })
    }

    /// The source module folder name, required by the module and config stages.
    pub fn source_module(&self) -> Result<&str> {
        validation::require_with_hints(
            self.source_module_name.as_deref(),
            "module",
            "No source module folder name known for this project",
            vec!["Pass --module with the folder under Source/ that holds the C++ module".to_string()],
        )
    }

    /// Identifier that config files currently use for the project.
    pub fn config_rename_from(&self) -> &str {
        self.source_module_name
            .as_deref()
            .unwrap_or(&self.old_project_name)
    }
}

/// The single descriptor file directly inside `root`.
pub fn find_descriptor(root: &Path, extension: &str) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(Error::project_not_found(root.to_string_lossy()));
    }

    let found: Vec<PathBuf> = io::list_files(root)?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();

    match found.len() {
        0 => Err(Error::descriptor_not_found(root.to_string_lossy())),
        1 => Ok(found.into_iter().next().unwrap_or_default()),
        _ => Err(Error::descriptor_ambiguous(
            root.to_string_lossy(),
            found.iter().map(|p| io::file_name(p)).collect(),
        )),
    }
}

/// Read-only view of a project, for `inspect`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInspection {
    pub root: String,
    pub descriptor: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    pub is_source_project: bool,
    pub source_modules: Vec<String>,
    pub target_files: Vec<String>,
    pub config_files: Vec<String>,
    pub solution_files: Vec<String>,
    pub cache_directories: Vec<String>,
}

pub fn inspect(root: &Path, config: &RenamerConfig) -> Result<ProjectInspection> {
    let descriptor_path = find_descriptor(root, &config.descriptor_extension)?;
    let content = io::read_file(&descriptor_path, "read project descriptor")?;
    let module_name = descriptor::find_module_name(&content);

    let source_dir = root.join(SOURCE_DIR);
    let (source_modules, target_files) = if source_dir.is_dir() {
        let build_suffix = config.build_suffix();
        let modules = io::list_dirs(&source_dir)?
            .into_iter()
            .filter(|dir| {
                io::list_files(dir)
                    .map(|files| files.iter().any(|f| io::file_name(f).ends_with(&build_suffix)))
                    .unwrap_or(false)
            })
            .map(|dir| io::file_name(&dir))
            .collect();
        let target_suffix = config.target_suffix();
        let targets = io::list_files(&source_dir)?
            .iter()
            .map(|f| io::file_name(f))
            .filter(|name| name.ends_with(&target_suffix))
            .collect();
        (modules, targets)
    } else {
        (Vec::new(), Vec::new())
    };

    let config_dir = root.join(CONFIG_DIR);
    let config_files = if config_dir.is_dir() {
        io::list_files(&config_dir)?
            .iter()
            .map(|f| io::file_name(f))
            .collect()
    } else {
        Vec::new()
    };

    let solution_files = io::list_files(root)?
        .into_iter()
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == config.solution_extension.as_str())
        })
        .map(|path| io::file_name(&path))
        .collect();

    let cache_directories = config
        .cache_directories
        .iter()
        .filter(|name| root.join(name).is_dir())
        .cloned()
        .collect();

    Ok(ProjectInspection {
        root: root.to_string_lossy().to_string(),
        descriptor: io::file_name(&descriptor_path),
        project_name: descriptor_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
        is_source_project: module_name.is_some(),
        module_name,
        source_modules,
        target_files,
        config_files,
        solution_files,
        cache_directories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_descriptor(root: &Path, name: &str, module: Option<&str>) {
        let body = match module {
            Some(m) => format!(r#"{{"FileVersion": 3, "Modules": [{{"Name": "{}"}}]}}"#, m),
            None => r#"{"FileVersion": 3}"#.to_string(),
        };
        fs::write(root.join(format!("{}.uproject", name)), body).unwrap();
    }

    #[test]
    fn discover_reads_descriptor_and_defaults_module() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path(), "MyGame", Some("MyGame"));

        let ctx = ProjectContext::discover(dir.path(), "Awesome", None, &RenamerConfig::default())
            .unwrap();

        assert_eq!(ctx.old_project_name, "MyGame");
        assert!(ctx.is_source_project);
        assert_eq!(ctx.source_module_name.as_deref(), Some("MyGame"));
        assert_eq!(ctx.source_dir, dir.path().join("Source"));
    }

    #[test]
    fn discover_prefers_explicit_module_folder() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path(), "MyGame", Some("MyGame"));

        let ctx = ProjectContext::discover(
            dir.path(),
            "Awesome",
            Some("GameCode"),
            &RenamerConfig::default(),
        )
        .unwrap();

        assert_eq!(ctx.source_module().unwrap(), "GameCode");
        assert_eq!(ctx.descriptor_module_name.as_deref(), Some("MyGame"));
    }

    #[test]
    fn discover_blueprint_project() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path(), "BpGame", None);

        let ctx = ProjectContext::discover(dir.path(), "Awesome", None, &RenamerConfig::default())
            .unwrap();

        assert!(!ctx.is_source_project);
        assert!(ctx.source_module().is_err());
        assert_eq!(ctx.config_rename_from(), "BpGame");
    }

    #[test]
    fn discover_rejects_invalid_name_before_touching_disk() {
        let err = ProjectContext::discover(
            Path::new("/nonexistent"),
            "Bad:Name",
            None,
            &RenamerConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_name");
    }

    #[test]
    fn find_descriptor_requires_exactly_one() {
        let dir = tempdir().unwrap();
        let err = find_descriptor(dir.path(), "uproject").unwrap_err();
        assert_eq!(err.code.as_str(), "project.descriptor_not_found");

        write_descriptor(dir.path(), "A", None);
        write_descriptor(dir.path(), "B", None);
        let err = find_descriptor(dir.path(), "uproject").unwrap_err();
        assert_eq!(err.code.as_str(), "project.descriptor_ambiguous");
    }

    #[test]
    fn find_descriptor_missing_root() {
        let err = find_descriptor(Path::new("/nonexistent/root"), "uproject").unwrap_err();
        assert_eq!(err.code.as_str(), "project.not_found");
    }

    #[test]
    fn inspect_lists_project_layout() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_descriptor(root, "MyGame", Some("MyGame"));
        fs::create_dir_all(root.join("Source/MyGame")).unwrap();
        fs::create_dir_all(root.join("Source/NotAModule")).unwrap();
        fs::write(root.join("Source/MyGame/MyGame.Build.cs"), "").unwrap();
        fs::write(root.join("Source/MyGame.Target.cs"), "").unwrap();
        fs::write(root.join("Source/MyGameEditor.Target.cs"), "").unwrap();
        fs::create_dir_all(root.join("Config")).unwrap();
        fs::write(root.join("Config/DefaultEngine.ini"), "").unwrap();
        fs::create_dir_all(root.join("Saved")).unwrap();
        fs::write(root.join("MyGame.sln"), "").unwrap();

        let info = inspect(root, &RenamerConfig::default()).unwrap();

        assert_eq!(info.project_name, "MyGame");
        assert_eq!(info.source_modules, ["MyGame"]);
        assert_eq!(info.target_files, ["MyGame.Target.cs", "MyGameEditor.Target.cs"]);
        assert_eq!(info.config_files, ["DefaultEngine.ini"]);
        assert_eq!(info.solution_files, ["MyGame.sln"]);
        assert_eq!(info.cache_directories, ["Saved"]);
    }
}
