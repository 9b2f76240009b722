use crate::error::ErrorKind;
use crate::node::NodeType;
use crate::state::RunStatus;
use serde::{Deserialize, Serialize};

/// Live progress of a pipeline run
///
/// Emitted in processing order so a renderer can update each node as soon as
/// it finishes, instead of waiting for the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// Run started
    InitStream {
        run_id: String,
        timestamp: i64,
    },

    /// A node is about to be processed
    NodeStarted {
        node_id: String,
        node_type: NodeType,
    },

    /// A node finished and produced its value
    NodeOutput {
        node_id: String,
        output: String,
    },

    /// A decision node's evaluator verdict
    Condition {
        node_id: String,
        result: bool,
    },

    /// One repeat-node iteration (1-based index)
    Iteration {
        node_id: String,
        index: usize,
        output: String,
        continued: bool,
    },

    /// Run failed
    Error {
        kind: ErrorKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        node_id: Option<String>,
        message: String,
    },

    /// Run finished (successfully or not)
    EndStream {
        status: RunStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        total_duration_ms: u64,
    },
}

impl RunEvent {
    /// Stable name of the event type (matches the serde tag)
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitStream { .. } => "init_stream",
            Self::NodeStarted { .. } => "node_started",
            Self::NodeOutput { .. } => "node_output",
            Self::Condition { .. } => "condition",
            Self::Iteration { .. } => "iteration",
            Self::Error { .. } => "error",
            Self::EndStream { .. } => "end_stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_tag() {
        let event = RunEvent::Iteration {
            node_id: "r1".to_string(),
            index: 2,
            output: "draft".to_string(),
            continued: true,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], event.name());
        assert_eq!(json["index"], 2);
    }
}
