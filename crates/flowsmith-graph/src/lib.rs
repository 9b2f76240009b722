pub mod service;
pub mod nodes;
pub mod context;
pub mod pipeline;
pub mod engine;
pub mod builder;

pub use service::{ChatGenerator, TextGenerator};
pub use nodes::{ConditionEvaluator, TransformInvoker};
pub use context::{ExecutionContext, GuardState, IterationGuard};
pub use engine::{Engine, EventSender};
pub use builder::EngineBuilder;

// Re-export key types from flowsmith-types
pub use flowsmith_types::{
    ConditionParsing, Edge, EngineConfig, ErrorKind, ExecutionError, IterationCapPolicy,
    IterationRecord, LLMConfig, Node, NodeKind, NodeTrace, NodeType, PipelineGraph, RunEvent,
    RunInput, RunReport, RunStatus, RunTrace,
};
