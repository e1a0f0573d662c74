//! Stage bookkeeping for a rename run: stage identifiers, per-stage outcomes
//! and the run summary.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rename stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Descriptor,
    Targets,
    SourceModule,
    Config,
    Cache,
    Solution,
    Generate,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Descriptor,
        Stage::Targets,
        Stage::SourceModule,
        Stage::Config,
        Stage::Cache,
        Stage::Solution,
        Stage::Generate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Descriptor => "descriptor",
            Stage::Targets => "targets",
            Stage::SourceModule => "source_module",
            Stage::Config => "config",
            Stage::Cache => "cache",
            Stage::Solution => "solution",
            Stage::Generate => "generate",
        }
    }
}

/// Typed result of running one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageOutcome {
    Ok,
    Retryable { reason: String },
    Fatal { reason: String },
}

impl StageOutcome {
    pub fn from_result(result: Result<()>) -> (Self, Option<Error>) {
        match result {
            Ok(()) => (StageOutcome::Ok, None),
            Err(err) if err.is_retryable() => (
                StageOutcome::Retryable {
                    reason: err.summary(),
                },
                Some(err),
            ),
            Err(err) => (
                StageOutcome::Fatal {
                    reason: err.summary(),
                },
                Some(err),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    PartialSuccess,
    Retryable,
    Failed,
    Skipped,
    NotRun,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    pub stage: Stage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl StageResult {
    pub fn skipped(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            reason: Some(reason.into()),
            error_code: None,
        }
    }

    pub fn not_run(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::NotRun,
            reason: Some(reason.into()),
            error_code: None,
        }
    }

    /// Fold a stage outcome and the number of error events the stage logged
    /// into a status.
    pub fn finished(
        stage: Stage,
        outcome: StageOutcome,
        error: Option<&Error>,
        logged_errors: usize,
    ) -> Self {
        let error_code = error.map(|e| e.code.as_str().to_string());
        match outcome {
            StageOutcome::Ok if logged_errors == 0 => Self {
                stage,
                status: StageStatus::Success,
                reason: None,
                error_code,
            },
            StageOutcome::Ok => Self {
                stage,
                status: StageStatus::PartialSuccess,
                reason: Some(format!("{} error(s) reported", logged_errors)),
                error_code,
            },
            StageOutcome::Retryable { reason } => Self {
                stage,
                status: StageStatus::Retryable,
                reason: Some(reason),
                error_code,
            },
            StageOutcome::Fatal { reason } => Self {
                stage,
                status: StageStatus::Failed,
                reason: Some(reason),
                error_code,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    PartialSuccess,
    Retryable,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_stages: usize,
    pub succeeded: usize,
    pub partial: usize,
    pub failed: usize,
    pub skipped: usize,
    pub not_run: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_actions: Vec<String>,
}

pub fn summarize(stages: &[StageResult]) -> (RunStatus, RunSummary) {
    let mut summary = RunSummary {
        total_stages: stages.len(),
        ..RunSummary::default()
    };
    let mut retryable = false;

    for result in stages {
        match result.status {
            StageStatus::Success => summary.succeeded += 1,
            StageStatus::PartialSuccess => summary.partial += 1,
            StageStatus::Failed => summary.failed += 1,
            StageStatus::Retryable => {
                retryable = true;
                summary.failed += 1;
            }
            StageStatus::Skipped => summary.skipped += 1,
            StageStatus::NotRun => summary.not_run += 1,
        }
    }

    let status = if retryable {
        summary
            .next_actions
            .push("Re-run with --module set to the folder under Source/ that holds the C++ module".to_string());
        RunStatus::Retryable
    } else if summary.failed > 0 {
        RunStatus::Failed
    } else if summary.partial > 0 {
        RunStatus::PartialSuccess
    } else {
        RunStatus::Success
    };

    if status != RunStatus::Success {
        summary
            .next_actions
            .push("Review the error events; the project may reference both old and new names".to_string());
    }

    (status, summary)
}
