//! Regenerate IDE project files by running the engine's UnrealBuildTool
//! against the renamed descriptor.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, GeneratorFailedDetails, Result};
use crate::utils::command::{self, CapturedOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineVersion {
    #[serde(rename = "4")]
    Ue4,
    #[serde(rename = "5")]
    Ue5,
}

impl EngineVersion {
    pub fn from_major(major: u8) -> Result<Self> {
        match major {
            4 => Ok(EngineVersion::Ue4),
            5 => Ok(EngineVersion::Ue5),
            other => Err(Error::validation_invalid_argument(
                "engine_version",
                format!("Unsupported engine major version {}; expected 4 or 5", other),
                Some(other.to_string()),
                None,
            )),
        }
    }

    /// Tool location relative to the engine directory.
    pub fn tool_relative_path(&self) -> PathBuf {
        let dotnet = Path::new("Engine").join("Binaries").join("DotNET");
        match self {
            EngineVersion::Ue4 => dotnet.join("UnrealBuildTool.exe"),
            EngineVersion::Ue5 => dotnet.join("UnrealBuildTool").join("UnrealBuildTool.exe"),
        }
    }
}

/// Engine installation used to regenerate project files.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInstall {
    pub engine_dir: PathBuf,
    pub version: EngineVersion,
}

impl EngineInstall {
    pub fn new(engine_dir: impl Into<PathBuf>, version: EngineVersion) -> Self {
        Self {
            engine_dir: engine_dir.into(),
            version,
        }
    }

    pub fn tool_path(&self) -> PathBuf {
        self.engine_dir.join(self.version.tool_relative_path())
    }

    /// The engine directory must exist and contain the build tool.
    pub fn validate(&self) -> Result<PathBuf> {
        if !self.engine_dir.is_dir() {
            return Err(Error::validation_invalid_argument(
                "engine_dir",
                "Engine directory does not exist",
                Some(self.engine_dir.to_string_lossy().to_string()),
                None,
            ));
        }
        let tool = self.tool_path();
        if !tool.is_file() {
            return Err(Error::generator_tool_not_found(tool.to_string_lossy()));
        }
        Ok(tool)
    }
}

pub fn generator_args(descriptor: &Path) -> Vec<String> {
    vec![
        "-projectfiles".to_string(),
        format!("-project={}", descriptor.display()),
        "-game".to_string(),
        "-engine".to_string(),
    ]
}

/// Run the build tool for `descriptor`. A non-zero exit is an error carrying
/// the captured output; the output is otherwise not interpreted.
pub fn generate_project_files(engine: &EngineInstall, descriptor: &Path) -> Result<CapturedOutput> {
    let tool = engine.validate()?;
    let args = generator_args(descriptor);

    crate::log_status!(
        "generate",
        "Running {}",
        command::display_command(&tool, &args)
    );
    let output = command::run_captured(&tool, &args, "UnrealBuildTool")?;

    if !output.success() {
        return Err(Error::generator_failed(GeneratorFailedDetails {
            command: command::display_command(&tool, &args),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        }));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn tool_paths_differ_by_major_version() {
        let ue4 = EngineInstall::new("/UE", EngineVersion::Ue4);
        let ue5 = EngineInstall::new("/UE", EngineVersion::Ue5);
        assert_eq!(
            ue4.tool_path(),
            Path::new("/UE/Engine/Binaries/DotNET/UnrealBuildTool.exe")
        );
        assert_eq!(
            ue5.tool_path(),
            Path::new("/UE/Engine/Binaries/DotNET/UnrealBuildTool/UnrealBuildTool.exe")
        );
    }

    #[test]
    fn from_major_rejects_other_versions() {
        assert_eq!(EngineVersion::from_major(5).unwrap(), EngineVersion::Ue5);
        let err = EngineVersion::from_major(3).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn validate_missing_engine_dir_is_validation_error() {
        let engine = EngineInstall::new("/nonexistent/UE_5.3", EngineVersion::Ue5);
        let err = engine.validate().unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn validate_missing_tool_is_not_found() {
        let dir = tempdir().unwrap();
        let engine = EngineInstall::new(dir.path(), EngineVersion::Ue4);
        let err = engine.validate().unwrap_err();
        assert_eq!(err.code.as_str(), "generator.tool_not_found");

        let tool = engine.tool_path();
        fs::create_dir_all(tool.parent().unwrap()).unwrap();
        fs::write(&tool, "").unwrap();
        assert_eq!(engine.validate().unwrap(), tool);
    }

    #[test]
    fn generator_args_pass_descriptor() {
        let args = generator_args(Path::new("/p/Awesome.uproject"));
        assert_eq!(
            args,
            ["-projectfiles", "-project=/p/Awesome.uproject", "-game", "-engine"]
        );
    }
}
