//! Status events emitted by every stage of a rename run.
//!
//! Each recorded event is also echoed to stderr through `log_status!`, so the
//! terminal shows progress while the JSON report keeps the full history.

use serde::Serialize;
use std::path::Path;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Warning,
    Error,
}

/// One status line: which stage, what it touched, how it went.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub stage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub outcome: Outcome,
    pub message: String,
}

/// Ordered event sink for one run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    pub events: Vec<StatusEvent>,
    pub warnings: u32,
    pub errors: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, stage: &str, target: Option<&Path>, message: impl Into<String>) {
        self.record(stage, target, Outcome::Success, message.into());
    }

    pub fn warning(&mut self, stage: &str, target: Option<&Path>, message: impl Into<String>) {
        self.warnings += 1;
        self.record(stage, target, Outcome::Warning, message.into());
    }

    pub fn error(&mut self, stage: &str, target: Option<&Path>, message: impl Into<String>) {
        self.errors += 1;
        self.record(stage, target, Outcome::Error, message.into());
    }

    /// Record a failed operation using the error's summary line.
    pub fn failure(&mut self, stage: &str, target: Option<&Path>, err: &Error) {
        self.error(stage, target, err.summary());
    }

    fn record(&mut self, stage: &str, target: Option<&Path>, outcome: Outcome, message: String) {
        let target = target.map(|p| p.display().to_string());
        match (&target, outcome) {
            (Some(t), Outcome::Success) => crate::log_status!("rename", "{}: {} ({})", stage, message, t),
            (Some(t), _) => crate::log_status!("rename", "{}: {:?}: {} ({})", stage, outcome, message, t),
            (None, Outcome::Success) => crate::log_status!("rename", "{}: {}", stage, message),
            (None, _) => crate::log_status!("rename", "{}: {:?}: {}", stage, outcome, message),
        }
        self.events.push(StatusEvent {
            stage: stage.to_string(),
            target,
            outcome,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_warnings_and_errors() {
        let mut log = EventLog::new();
        log.success("descriptor", None, "renamed");
        log.warning("backup", Some(Path::new("/p/a")), "missing");
        log.error("targets", None, "no target");

        assert_eq!(log.events.len(), 3);
        assert_eq!(log.warnings, 1);
        assert_eq!(log.errors, 1);
    }

    #[test]
    fn serializes_outcome_snake_case() {
        let mut log = EventLog::new();
        log.warning("backup", None, "skipped");
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["events"][0]["outcome"], "warning");
        assert!(json["events"][0].get("target").is_none());
    }
}
