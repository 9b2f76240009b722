//! Shared data model for Flowsmith pipelines.
//!
//! Everything in here is plain data: the graph an editor hands to the engine,
//! the configuration that bounds a run, and the trace, events and errors the
//! engine hands back.

pub mod node;
pub mod config;
pub mod error;
pub mod events;
pub mod trace;
pub mod state;

pub use node::{
    DecisionConfig, Edge, Node, NodeKind, NodeType, PipelineGraph, RepeatConfig,
    TransformConfig, TransformMode, BRANCH_HANDLE_FALSE, BRANCH_HANDLE_TRUE,
};
pub use config::{ConditionParsing, EngineConfig, IterationCapPolicy, LLMConfig};
pub use error::{ErrorKind, ExecutionError};
pub use events::RunEvent;
pub use trace::{IterationRecord, NodeTrace, RunTrace};
pub use state::{RunInput, RunReport, RunStatus};
