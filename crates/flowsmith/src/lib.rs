//! # Flowsmith
//!
//! Execution engine for pipelines of text-processing steps, each delegating
//! the actual text work to a generative-text service.
//!
//! ## Overview
//!
//! A pipeline is a graph of nodes drawn by an editor:
//!
//! - **source / sink**: pipeline boundaries, pass the value through
//! - **transform**: one service call over the current value
//! - **decision**: evaluates a condition and runs exactly one route
//! - **repeat**: transform + condition, repeated while the condition holds
//!
//! Every run is bounded: at most 50 node processing events, and at most 10
//! iterations per repeat-node activation (both configurable).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowsmith::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(OpenAIClient::new(std::env::var("OPENAI_API_KEY")?)?);
//!
//!     let engine = Engine::builder()
//!         .chat_client(client, LLMConfig::new("gpt-4o"))
//!         .build()?;
//!
//!     let graph = PipelineGraph::linear(vec![
//!         Node::source("s1", "Rust is a language empowering everyone..."),
//!         Node::transform("t1", "Summarize in one sentence: {input}"),
//!         Node::sink("o1"),
//!     ]);
//!
//!     let report = engine.run_pipeline(&graph, None).await;
//!     match report.into_result() {
//!         Ok(output) => println!("{}", output),
//!         Err(error) => eprintln!("{}", error),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`flowsmith-types`**: graph model, configuration, trace, events, errors
//! - **`flowsmith-llm`**: provider-agnostic chat client (OpenAI)
//! - **`flowsmith-graph`**: the engine, transform invoker, condition evaluator
//!
//! ## License
//!
//! MIT

pub mod prelude;

pub use flowsmith_graph::{
    pipeline, ChatGenerator, ConditionEvaluator, Engine, EngineBuilder, EventSender,
    ExecutionContext, GuardState, IterationGuard, TextGenerator, TransformInvoker,
};

pub use flowsmith_types::{
    ConditionParsing, DecisionConfig, Edge, EngineConfig, ErrorKind, ExecutionError,
    IterationCapPolicy, IterationRecord, LLMConfig, Node, NodeKind, NodeTrace, NodeType,
    PipelineGraph, RepeatConfig, RunEvent, RunInput, RunReport, RunStatus, RunTrace,
    TransformConfig, TransformMode,
};

pub use flowsmith_llm::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, ClientFactory, Content, Message,
    OpenAIClient, OpenAIConfig, ProviderConfig,
};
