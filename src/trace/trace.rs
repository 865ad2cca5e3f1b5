use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Pipeline stage names as they appear in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Scenarios,
    Scripts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Started,
    Completed,
    Failed,
}

/// One line of the stage journal.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub stage: Stage,
    pub status: StageStatus,

    pub artifact: Option<String>,
    pub records: Option<usize>,
    pub error: Option<String>,
}

impl TraceEvent {
    pub fn now(stage: Stage, status: StageStatus) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            stage,
            status,
            artifact: None,
            records: None,
            error: None,
        }
    }

    pub fn with_artifact(mut self, path: &Path) -> Self {
        self.artifact = Some(path.display().to_string());
        self
    }

    pub fn with_records(mut self, count: usize) -> Self {
        self.records = Some(count);
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
