use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

/// File name looked up in the project root when no config path is given.
pub const CONFIG_FILE_NAME: &str = "ue-renamer.json";

/// All configurable defaults that can be overridden via ue-renamer.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamerConfig {
    #[serde(default = "default_backup_folder_name")]
    pub backup_folder_name: String,

    #[serde(default = "default_cache_directories")]
    pub cache_directories: Vec<String>,

    #[serde(default = "default_descriptor_extension")]
    pub descriptor_extension: String,

    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    #[serde(default = "default_engine_defaults_file")]
    pub engine_defaults_file: String,

    #[serde(default = "default_solution_extension")]
    pub solution_extension: String,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            backup_folder_name: default_backup_folder_name(),
            cache_directories: default_cache_directories(),
            descriptor_extension: default_descriptor_extension(),
            script_extension: default_script_extension(),
            engine_defaults_file: default_engine_defaults_file(),
            solution_extension: default_solution_extension(),
        }
    }
}

// =============================================================================
// Default value functions (the fixed Unreal project layout)
// =============================================================================

fn default_backup_folder_name() -> String {
    "RenameBackups".to_string()
}

fn default_cache_directories() -> Vec<String> {
    vec![
        "Saved".to_string(),
        "Intermediate".to_string(),
        "Binaries".to_string(),
    ]
}

fn default_descriptor_extension() -> String {
    "uproject".to_string()
}

fn default_script_extension() -> String {
    "cs".to_string()
}

fn default_engine_defaults_file() -> String {
    "DefaultEngine.ini".to_string()
}

fn default_solution_extension() -> String {
    "sln".to_string()
}

impl RenamerConfig {
    /// Suffix of editor target files, e.g. `Editor.Target.cs`.
    pub fn editor_target_suffix(&self) -> String {
        format!("Editor.Target.{}", self.script_extension)
    }

    /// Suffix of game target files, e.g. `.Target.cs`.
    pub fn target_suffix(&self) -> String {
        format!(".Target.{}", self.script_extension)
    }

    /// Suffix of module build-rule files, e.g. `.Build.cs`.
    pub fn build_suffix(&self) -> String {
        format!(".Build.{}", self.script_extension)
    }

    fn validate(self) -> Result<Self> {
        if self.backup_folder_name.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "backup_folder_name",
                Some(self.backup_folder_name),
                "must not be empty",
            ));
        }
        for (key, value) in [
            ("descriptor_extension", &self.descriptor_extension),
            ("script_extension", &self.script_extension),
            ("solution_extension", &self.solution_extension),
        ] {
            if value.is_empty() || value.starts_with('.') {
                return Err(Error::config_invalid_value(
                    key,
                    Some(value.clone()),
                    "must be a bare extension without a leading dot",
                ));
            }
        }
        Ok(self)
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `<root>/ue-renamer.json` is used
/// when present and the built-in defaults otherwise.
pub fn load(explicit: Option<&Path>, root: &Path) -> Result<RenamerConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = root.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                return Ok(RenamerConfig::default());
            }
            candidate
        }
    };

    let content = io::read_file(&path, "read config")?;
    let config: RenamerConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.to_string_lossy(), e))?;
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_unreal_layout() {
        let config = RenamerConfig::default();
        assert_eq!(config.cache_directories, ["Saved", "Intermediate", "Binaries"]);
        assert_eq!(config.editor_target_suffix(), "Editor.Target.cs");
        assert_eq!(config.target_suffix(), ".Target.cs");
        assert_eq!(config.build_suffix(), ".Build.cs");
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load(None, dir.path()).unwrap();
        assert_eq!(config.backup_folder_name, "RenameBackups");
    }

    #[test]
    fn load_merges_partial_file_with_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"backup_folder_name": "Snapshots"}"#,
        )
        .unwrap();

        let config = load(None, dir.path()).unwrap();
        assert_eq!(config.backup_folder_name, "Snapshots");
        assert_eq!(config.descriptor_extension, "uproject");
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = load(Some(&path), dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn load_rejects_dotted_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{"script_extension": ".cs"}"#).unwrap();

        let err = load(Some(&path), dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn load_explicit_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load(Some(&dir.path().join("missing.json")), dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }
}
