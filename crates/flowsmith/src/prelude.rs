//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use flowsmith::prelude::*;
//! ```

pub use crate::{
    Engine, EngineBuilder, EngineConfig, ExecutionContext, ExecutionError, ErrorKind,
    IterationCapPolicy, LLMConfig, Node, PipelineGraph, Edge, RunEvent, RunReport, RunTrace,
    TextGenerator, ChatClient, OpenAIClient, ProviderConfig, ClientFactory,
};
