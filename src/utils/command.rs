//! Command execution primitives with consistent error handling.

use std::path::Path;
use std::process::{Command, Output};

use serde::Serialize;

use crate::error::{Error, Result};

/// Captured result of an external process that ran to completion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run a program and capture its output regardless of exit status.
///
/// Only a failure to spawn is an error; a non-zero exit is reported through
/// `CapturedOutput::exit_code` so the caller decides what it means.
pub fn run_captured(program: &Path, args: &[String], context: &str) -> Result<CapturedOutput> {
    let output = Command::new(program).args(args).output().map_err(|e| {
        Error::internal_io(
            format!("Failed to run {}: {}", context, e),
            Some(context.to_string()),
        )
    })?;

    Ok(CapturedOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: error_text(&output),
    })
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else if output.status.success() {
        String::new()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

/// Render a program and its arguments as a single display string.
pub fn display_command(program: &Path, args: &[String]) -> String {
    let mut parts = vec![quote(&program.to_string_lossy())];
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

fn quote(part: &str) -> String {
    if part.contains(' ') {
        format!("\"{}\"", part)
    } else {
        part.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_command_quotes_spaced_parts() {
        let rendered = display_command(
            Path::new("/Epic Games/UnrealBuildTool.exe"),
            &["-projectfiles".to_string(), "-project=/a b/G.uproject".to_string()],
        );
        assert_eq!(
            rendered,
            "\"/Epic Games/UnrealBuildTool.exe\" -projectfiles \"-project=/a b/G.uproject\""
        );
    }

    #[test]
    fn run_captured_errors_when_program_missing() {
        let err = run_captured(Path::new("/nonexistent/tool"), &[], "generate").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[cfg(unix)]
    #[test]
    fn run_captured_reports_nonzero_exit() {
        let out = run_captured(Path::new("false"), &[], "false").unwrap();
        assert!(!out.success());
    }
}
