use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationInvalidName,

    ProjectNotFound,
    ProjectDescriptorNotFound,
    ProjectDescriptorAmbiguous,
    FileNotFound,
    FileAlreadyExists,

    ParseModuleNameMissing,

    GeneratorToolNotFound,
    GeneratorFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidName => "validation.invalid_name",

            ErrorCode::ProjectNotFound => "project.not_found",
            ErrorCode::ProjectDescriptorNotFound => "project.descriptor_not_found",
            ErrorCode::ProjectDescriptorAmbiguous => "project.descriptor_ambiguous",
            ErrorCode::FileNotFound => "file.not_found",
            ErrorCode::FileAlreadyExists => "file.already_exists",

            ErrorCode::ParseModuleNameMissing => "parse.module_name_missing",

            ErrorCode::GeneratorToolNotFound => "generator.tool_not_found",
            ErrorCode::GeneratorFailed => "generator.failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidNameDetails {
    pub name: String,
    pub rule: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorAmbiguousDetails {
    pub root: String,
    pub found: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNotFoundDetails {
    pub kind: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAlreadyExistsDetails {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorFailedDetails {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_name(
        name: impl Into<String>,
        rule: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidNameDetails {
            name: name.into(),
            rule: rule.into(),
            problem: problem.clone(),
        });

        Self::new(ErrorCode::ValidationInvalidName, problem, details)
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn project_not_found(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            "Project root directory not found",
            to_details(PathDetails { path: path.into() }),
        )
        .with_hint("Pass the directory that contains the .uproject file")
    }

    pub fn descriptor_not_found(root: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProjectDescriptorNotFound,
            "No .uproject file found in the project root",
            to_details(PathDetails { path: root.into() }),
        )
    }

    pub fn descriptor_ambiguous(root: impl Into<String>, found: Vec<String>) -> Self {
        let details = to_details(DescriptorAmbiguousDetails {
            root: root.into(),
            found,
        });

        Self::new(
            ErrorCode::ProjectDescriptorAmbiguous,
            "More than one .uproject file found in the project root",
            details,
        )
        .with_hint("Remove the stale descriptor so exactly one .uproject remains")
    }

    pub fn file_not_found(kind: impl Into<String>, path: impl Into<String>) -> Self {
        let kind = kind.into();
        let message = format!("No {} found", kind);
        Self::new(
            ErrorCode::FileNotFound,
            message,
            to_details(FileNotFoundDetails {
                kind,
                path: path.into(),
            }),
        )
    }

    /// A rename whose destination is already taken by another file.
    pub fn file_already_exists(from: impl Into<String>, to: impl Into<String>) -> Self {
        let to = to.into();
        let message = format!("{} already exists", to);
        Self::new(
            ErrorCode::FileAlreadyExists,
            message,
            to_details(FileAlreadyExistsDetails {
                from: from.into(),
                to,
            }),
        )
        .with_hint("Move or delete the existing file, then run the rename again")
    }

    pub fn module_name_missing(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ParseModuleNameMissing,
            "Could not find the module name in the .uproject file",
            to_details(PathDetails { path: path.into() }),
        )
    }

    pub fn generator_tool_not_found(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GeneratorToolNotFound,
            "UnrealBuildTool not found",
            to_details(PathDetails { path: path.into() }),
        )
        .with_hint("Check the engine directory and engine major version")
    }

    pub fn generator_failed(details: GeneratorFailedDetails) -> Self {
        Self::new(
            ErrorCode::GeneratorFailed,
            "Project file generation failed",
            to_details(details),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// Mark the error as recoverable by re-collecting input and calling again.
    pub fn retryable(mut self) -> Self {
        self.retryable = Some(true);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable.unwrap_or(false)
    }

    /// Short human-readable line: the message plus the most specific detail.
    pub fn summary(&self) -> String {
        let detail = self
            .details
            .get("error")
            .or_else(|| self.details.get("path"))
            .and_then(Value::as_str);

        match detail {
            Some(detail) => format!("{}: {}", self.message, detail),
            None => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_dotted_names() {
        assert_eq!(ErrorCode::InternalIoError.as_str(), "internal.io_error");
        assert_eq!(
            ErrorCode::ParseModuleNameMissing.as_str(),
            "parse.module_name_missing"
        );
    }

    #[test]
    fn retryable_flag_round_trips() {
        let err = Error::file_not_found(".Build.cs file", "/p/Source/Game");
        assert!(!err.is_retryable());
        assert!(err.retryable().is_retryable());
    }

    #[test]
    fn summary_includes_io_detail() {
        let err = Error::internal_io("permission denied", Some("write".to_string()));
        assert_eq!(err.summary(), "IO error: permission denied");
    }

    #[test]
    fn file_not_found_names_kind() {
        let err = Error::file_not_found("Editor Target file", "/p/Source");
        assert_eq!(err.message, "No Editor Target file found");
        assert_eq!(err.details["kind"], "Editor Target file");
    }
}
