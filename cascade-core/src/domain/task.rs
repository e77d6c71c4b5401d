//! Task run domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single execution attempt of a task within a workflow
///
/// Structure shared between the scheduler (creates) and the logging
/// subsystem (derives log paths and upload metadata from it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRun {
    pub workflow_id: String,
    pub task_id: String,
    pub execution_date: chrono::DateTime<chrono::Utc>,
    pub try_number: u32,
    /// Internal runs are not user-facing task output and are never
    /// uploaded to remote log storage.
    pub raw: bool,
}

impl TaskRun {
    /// Creates a new task run for the given workflow/task pair
    pub fn new(
        workflow_id: impl Into<String>,
        task_id: impl Into<String>,
        execution_date: chrono::DateTime<chrono::Utc>,
        try_number: u32,
    ) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            task_id: task_id.into(),
            execution_date,
            try_number,
            raw: false,
        }
    }

    /// Marks this run as an internal (raw) run
    pub fn as_raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Structured metadata identifying this run, attached to remote log
    /// uploads so a reader can locate the originating task attempt.
    pub fn log_labels(&self) -> HashMap<String, String> {
        HashMap::from([
            ("workflow_id".to_string(), self.workflow_id.clone()),
            ("task_id".to_string(), self.task_id.clone()),
            (
                "execution_date".to_string(),
                self.execution_date.to_rfc3339(),
            ),
            ("try_number".to_string(), self.try_number.to_string()),
        ])
    }
}
