use crate::error::ExecutionError;
use crate::node::PipelineGraph;
use crate::trace::RunTrace;
use serde::{Deserialize, Serialize};

/// A pipeline plus the value to feed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInput {
    pub graph: PipelineGraph,
    /// Overrides the source node's own text when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl RunInput {
    pub fn new(graph: PipelineGraph) -> Self {
        Self { graph, input: None }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// Outcome of one run. A failed run keeps whatever trace it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
    pub trace: RunTrace,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn new(
        run_id: impl Into<String>,
        result: Result<String, ExecutionError>,
        trace: RunTrace,
        duration_ms: u64,
    ) -> Self {
        let (status, output, error) = match result {
            Ok(output) => (RunStatus::Succeeded, Some(output), None),
            Err(error) => (RunStatus::Failed, None, Some(error)),
        };
        Self {
            run_id: run_id.into(),
            status,
            output,
            error,
            trace,
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// Back to a `Result`, dropping the trace
    pub fn into_result(self) -> Result<String, ExecutionError> {
        match (self.output, self.error) {
            (_, Some(error)) => Err(error),
            (Some(output), None) => Ok(output),
            (None, None) => Ok(String::new()),
        }
    }
}
