use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One repeat-node iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub output: String,
    /// Whether the condition asked for another iteration
    pub continued: bool,
}

/// What a single node produced during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_output: Option<String>,
    /// Last verdict of a decision node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub iterations: Vec<IterationRecord>,
}

/// Per-node display data of one run. Written by the engine, read by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunTrace {
    nodes: HashMap<String, NodeTrace>,
}

impl RunTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, node_id: &str) -> Option<&NodeTrace> {
        self.nodes.get(node_id)
    }

    pub fn last_output(&self, node_id: &str) -> Option<&str> {
        self.nodes.get(node_id)?.last_output.as_deref()
    }

    pub fn iterations(&self, node_id: &str) -> &[IterationRecord] {
        self.nodes
            .get(node_id)
            .map(|trace| trace.iterations.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn record_output(&mut self, node_id: &str, output: &str) {
        self.entry(node_id).last_output = Some(output.to_string());
    }

    pub fn record_condition(&mut self, node_id: &str, result: bool) {
        self.entry(node_id).condition = Some(result);
    }

    pub fn push_iteration(&mut self, node_id: &str, record: IterationRecord) {
        self.entry(node_id).iterations.push(record);
    }

    fn entry(&mut self, node_id: &str) -> &mut NodeTrace {
        self.nodes.entry(node_id.to_string()).or_default()
    }
}
