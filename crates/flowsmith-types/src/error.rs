use crate::node::{Node, NodeType};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed pipeline: missing boundaries, empty input, missing config
    ValidationError,
    /// A decision selected a route id that names no node
    RoutingError,
    /// Visit cap or (fail policy) iteration cap reached
    LimitExceeded,
    /// The text-generation service failed
    ServiceError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::RoutingError => "routing_error",
            Self::LimitExceeded => "limit_exceeded",
            Self::ServiceError => "service_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a run, attributed to the node being processed when it happened
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}{}: {message}", node_suffix(.node_id, .node_type))]
pub struct ExecutionError {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    pub message: String,
}

fn node_suffix(node_id: &Option<String>, node_type: &Option<NodeType>) -> String {
    match (node_id, node_type) {
        (Some(id), Some(node_type)) => format!(" at {} node '{}'", node_type, id),
        (Some(id), None) => format!(" at node '{}'", id),
        _ => String::new(),
    }
}

impl ExecutionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            node_id: None,
            node_type: None,
            message: message.into(),
        }
    }

    /// Attribute the error to `node`
    pub fn at(mut self, node: &Node) -> Self {
        self.node_id = Some(node.id.clone());
        self.node_type = Some(node.node_type());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn routing(node: &Node, target_id: &str) -> Self {
        Self::new(
            ErrorKind::RoutingError,
            format!("route target '{}' does not exist", target_id),
        )
        .at(node)
    }

    pub fn limit(node: &Node, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LimitExceeded, message).at(node)
    }

    pub fn service(node: &Node, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceError, message).at(node)
    }
}
