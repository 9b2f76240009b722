use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge handle used by a decision node for its `true` route
pub const BRANCH_HANDLE_TRUE: &str = "true";
/// Edge handle used by a decision node for its `false` route
pub const BRANCH_HANDLE_FALSE: &str = "false";

/// One step of a pipeline.
///
/// Nodes are immutable data: the editor builds them, the engine only reads
/// them. `prompt` is the node's prompt template; on a source node it holds the
/// pipeline's input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn source(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, text, NodeKind::Source)
    }

    pub fn transform(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(id, prompt, NodeKind::Transform { config: None })
    }

    pub fn decision(
        id: impl Into<String>,
        condition_prompt: impl Into<String>,
        route_on_true: impl Into<String>,
        route_on_false: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            "",
            NodeKind::Decision {
                config: DecisionConfig {
                    condition_prompt: condition_prompt.into(),
                    route_on_true: route_on_true.into(),
                    route_on_false: route_on_false.into(),
                },
            },
        )
    }

    pub fn repeat(
        id: impl Into<String>,
        prompt: impl Into<String>,
        condition_prompt: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            prompt,
            NodeKind::Repeat {
                config: RepeatConfig {
                    condition_prompt: condition_prompt.into(),
                },
            },
        )
    }

    pub fn sink(id: impl Into<String>) -> Self {
        Self::new(id, "", NodeKind::Sink)
    }

    pub fn new(id: impl Into<String>, prompt: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}

/// Kind-specific node data. Adding a kind means extending this enum and the
/// engine's match over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Pipeline entry; passes its value through
    Source,
    /// One text-generation call over the current value
    Transform {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<TransformConfig>,
    },
    /// Evaluates a condition and runs exactly one route
    Decision {
        #[serde(default)]
        config: DecisionConfig,
    },
    /// Transform + condition, repeated while the condition holds
    Repeat {
        #[serde(default)]
        config: RepeatConfig,
    },
    /// Pipeline exit; passes its value through
    Sink,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Source => NodeType::Source,
            Self::Transform { .. } => NodeType::Transform,
            Self::Decision { .. } => NodeType::Decision,
            Self::Repeat { .. } => NodeType::Repeat,
            Self::Sink => NodeType::Sink,
        }
    }
}

/// Field-less tag of a node's kind, used in errors and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Source,
    Transform,
    Decision,
    Repeat,
    Sink,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Transform => "transform",
            Self::Decision => "decision",
            Self::Repeat => "repeat",
            Self::Sink => "sink",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor-side mode tag of a transform node. Carried for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Default,
    Analyze,
    Transform,
    Filter,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub mode: TransformMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionConfig {
    #[serde(default)]
    pub condition_prompt: String,
    #[serde(default)]
    pub route_on_true: String,
    #[serde(default)]
    pub route_on_false: String,
}

impl DecisionConfig {
    /// Node id selected by the evaluator's verdict
    pub fn route(&self, verdict: bool) -> &str {
        if verdict {
            &self.route_on_true
        } else {
            &self.route_on_false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepeatConfig {
    #[serde(default)]
    pub condition_prompt: String,
}

/// Directed connection drawn in the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    /// Edges leaving a decision through its `true`/`false` handles
    pub fn is_branch(&self) -> bool {
        matches!(
            self.source_handle.as_deref(),
            Some(BRANCH_HANDLE_TRUE) | Some(BRANCH_HANDLE_FALSE)
        )
    }
}

/// Complete pipeline as produced by the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineGraph {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl PipelineGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Chain `nodes` in declaration order
    pub fn linear(nodes: Vec<Node>) -> Self {
        let edges = nodes
            .windows(2)
            .map(|pair| Edge::new(pair[0].id.clone(), pair[1].id.clone()))
            .collect();
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.node_type() == node_type)
    }

    /// First edge continuing the main path out of `id`
    pub fn next_edge(&self, id: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|edge| edge.source == id && !edge.is_branch())
    }
}
