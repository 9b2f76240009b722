use crate::builder::EngineBuilder;
use crate::context::{ExecutionContext, GuardState, IterationGuard};
use crate::nodes::{ConditionEvaluator, TransformInvoker};
use crate::pipeline;
use crate::service::TextGenerator;
use flowsmith_types::{
    DecisionConfig, EngineConfig, ExecutionError, IterationCapPolicy, IterationRecord, Node,
    NodeKind, PipelineGraph, RepeatConfig, RunEvent, RunReport, RunStatus, RunTrace,
};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

pub type EventSender = mpsc::Sender<RunEvent>;

/// Interprets pipeline graphs.
///
/// The engine holds no per-run state: every run gets its own
/// `ExecutionContext` and `RunTrace`, so one engine can serve concurrent runs.
#[derive(Clone)]
pub struct Engine {
    transform: TransformInvoker,
    evaluator: ConditionEvaluator,
    config: EngineConfig,
}

impl Engine {
    pub fn new(generator: Arc<dyn TextGenerator>, config: EngineConfig) -> Self {
        Self {
            transform: TransformInvoker::new(generator.clone()),
            evaluator: ConditionEvaluator::new(generator, config.condition_parsing),
            config,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process `nodes` in order, starting from `start`.
    ///
    /// Decision routes are looked up among `nodes`.
    pub async fn run(
        &self,
        nodes: &[Node],
        start: impl Into<String>,
        ctx: &mut ExecutionContext,
        trace: &mut RunTrace,
    ) -> Result<String, ExecutionError> {
        let path: Vec<&Node> = nodes.iter().collect();
        self.run_path(nodes, &path, start, ctx, trace).await
    }

    /// Process `path` in order; decision routes are looked up among `nodes`
    pub async fn run_path(
        &self,
        nodes: &[Node],
        path: &[&Node],
        start: impl Into<String>,
        ctx: &mut ExecutionContext,
        trace: &mut RunTrace,
    ) -> Result<String, ExecutionError> {
        pipeline::validate_nodes(nodes)?;
        let run = Run {
            engine: self,
            nodes,
            graph: None,
            events: None,
        };
        run.process(path.to_vec(), start.into(), ctx, trace).await
    }

    /// Validate, resolve the main path, and execute a whole editor graph
    pub async fn run_pipeline(&self, graph: &PipelineGraph, input: Option<&str>) -> RunReport {
        self.run_pipeline_with_events(graph, input, None).await
    }

    /// Spawn execution in background, return event receiver
    pub fn spawn_run(&self, graph: PipelineGraph, input: Option<String>) -> mpsc::Receiver<RunEvent> {
        let (tx, rx) = mpsc::channel(1000);
        let engine = self.clone();

        tokio::spawn(async move {
            let report = engine
                .run_pipeline_with_events(&graph, input.as_deref(), Some(&tx))
                .await;
            tracing::debug!(run_id = %report.run_id, status = ?report.status, "Background run finished");
        });

        rx
    }

    async fn run_pipeline_with_events(
        &self,
        graph: &PipelineGraph,
        input: Option<&str>,
        events: Option<&EventSender>,
    ) -> RunReport {
        let run_id = uuid::Uuid::new_v4().to_string();
        let start_time = Instant::now();
        let run = Run {
            engine: self,
            nodes: &graph.nodes,
            graph: Some(graph),
            events,
        };

        run.emit(RunEvent::InitStream {
            run_id: run_id.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
        .await;

        tracing::info!(run_id = %run_id, nodes = graph.nodes.len(), "Pipeline run started");

        let mut trace = RunTrace::new();
        let result = self.execute_pipeline(&run, graph, input, &mut trace).await;
        let total_duration = start_time.elapsed().as_millis() as u64;

        let status = match &result {
            Ok(_) => {
                tracing::info!(run_id = %run_id, duration_ms = total_duration, "Pipeline run succeeded");
                RunStatus::Succeeded
            }
            Err(error) => {
                tracing::error!(run_id = %run_id, "Pipeline run failed: {}", error);
                run.emit(RunEvent::Error {
                    kind: error.kind,
                    node_id: error.node_id.clone(),
                    message: error.message.clone(),
                })
                .await;
                RunStatus::Failed
            }
        };

        run.emit(RunEvent::EndStream {
            status,
            output: result.as_ref().ok().cloned(),
            total_duration_ms: total_duration,
        })
        .await;

        RunReport::new(run_id, result, trace, total_duration)
    }

    async fn execute_pipeline(
        &self,
        run: &Run<'_>,
        graph: &PipelineGraph,
        input: Option<&str>,
        trace: &mut RunTrace,
    ) -> Result<String, ExecutionError> {
        pipeline::validate(graph)?;
        let path = pipeline::resolve_path(graph)?;
        let start = pipeline::initial_value(graph, input)?;

        let mut ctx = ExecutionContext::new();
        let output = run.process(path, start, &mut ctx, trace).await?;

        tracing::debug!(visits = ctx.visits(), "Pipeline path processed");
        Ok(output)
    }
}

/// Borrowed view of one run: the engine, the node set routes resolve against,
/// the edges route chains follow (whole-graph runs only), and where to report
/// progress.
struct Run<'a> {
    engine: &'a Engine,
    nodes: &'a [Node],
    graph: Option<&'a PipelineGraph>,
    events: Option<&'a EventSender>,
}

impl<'a> Run<'a> {
    /// Boxed so decision nodes can recurse into their route target
    fn process<'r>(
        &'r self,
        sequence: Vec<&'a Node>,
        mut value: String,
        ctx: &'r mut ExecutionContext,
        trace: &'r mut RunTrace,
    ) -> BoxFuture<'r, Result<String, ExecutionError>>
    where
        'a: 'r,
    {
        async move {
            for node in sequence {
                value = self.process_node(node, value, ctx, trace).await?;
            }
            Ok(value)
        }
        .boxed()
    }

    async fn process_node(
        &self,
        node: &'a Node,
        value: String,
        ctx: &mut ExecutionContext,
        trace: &mut RunTrace,
    ) -> Result<String, ExecutionError> {
        let max_visits = self.engine.config.max_visits;
        ctx.record_visit(&node.id, max_visits).map_err(|exceeded| {
            tracing::warn!(node_id = %node.id, visits = exceeded.visits, "Visit cap exceeded");
            ExecutionError::limit(node, format!("visit cap of {} exceeded", exceeded.cap))
        })?;

        tracing::debug!(node_id = %node.id, node_type = %node.node_type(), "Processing node");
        self.emit(RunEvent::NodeStarted {
            node_id: node.id.clone(),
            node_type: node.node_type(),
        })
        .await;

        let output = match &node.kind {
            NodeKind::Source | NodeKind::Sink => value,
            NodeKind::Transform { .. } => self
                .engine
                .transform
                .apply(&node.prompt, &value)
                .await
                .map_err(|e| service_error(node, e))?,
            NodeKind::Decision { config } => {
                self.decide(node, config, value, ctx, trace).await?
            }
            NodeKind::Repeat { config } => self.repeat(node, config, value, ctx, trace).await?,
        };

        trace.record_output(&node.id, &output);
        self.emit(RunEvent::NodeOutput {
            node_id: node.id.clone(),
            output: output.clone(),
        })
        .await;

        Ok(output)
    }

    async fn decide(
        &self,
        node: &'a Node,
        config: &'a DecisionConfig,
        value: String,
        ctx: &mut ExecutionContext,
        trace: &mut RunTrace,
    ) -> Result<String, ExecutionError> {
        let verdict = self
            .engine
            .evaluator
            .evaluate(&config.condition_prompt, &value)
            .await
            .map_err(|e| service_error(node, e))?;

        trace.record_condition(&node.id, verdict);
        self.emit(RunEvent::Condition {
            node_id: node.id.clone(),
            result: verdict,
        })
        .await;

        let target_id = config.route(verdict);
        let target = self
            .nodes
            .iter()
            .find(|candidate| candidate.id == target_id)
            .ok_or_else(|| ExecutionError::routing(node, target_id))?;

        let segment = match self.graph {
            Some(graph) => pipeline::route_segment(graph, node, &target.id),
            None => vec![target],
        };

        tracing::debug!(
            node_id = %node.id,
            verdict,
            target = %target.id,
            route_len = segment.len(),
            "Following route"
        );
        self.process(segment, value, ctx, trace).await
    }

    async fn repeat(
        &self,
        node: &'a Node,
        config: &'a RepeatConfig,
        mut value: String,
        ctx: &mut ExecutionContext,
        trace: &mut RunTrace,
    ) -> Result<String, ExecutionError> {
        let mut guard = IterationGuard::new(self.engine.config.max_iterations);

        loop {
            let output = self
                .engine
                .transform
                .apply(&node.prompt, &value)
                .await
                .map_err(|e| service_error(node, e))?;
            let continued = self
                .engine
                .evaluator
                .evaluate(&config.condition_prompt, &output)
                .await
                .map_err(|e| service_error(node, e))?;

            ctx.record_iteration(&node.id);
            trace.push_iteration(
                &node.id,
                IterationRecord {
                    output: output.clone(),
                    continued,
                },
            );
            value = output;

            let state = guard.advance(continued);
            self.emit(RunEvent::Iteration {
                node_id: node.id.clone(),
                index: guard.completed(),
                output: value.clone(),
                continued,
            })
            .await;

            match state {
                GuardState::Running(_) => continue,
                GuardState::Done => break,
                GuardState::CapExceeded => match self.engine.config.iteration_cap_policy {
                    IterationCapPolicy::Stop => {
                        tracing::warn!(
                            node_id = %node.id,
                            iterations = guard.completed(),
                            "Iteration cap reached, stopping loop"
                        );
                        break;
                    }
                    IterationCapPolicy::Fail => {
                        return Err(ExecutionError::limit(
                            node,
                            format!("iteration cap of {} exceeded", guard.cap()),
                        ));
                    }
                },
            }
        }

        Ok(value)
    }

    async fn emit(&self, event: RunEvent) {
        if let Some(tx) = self.events {
            // A dropped receiver only means nobody is watching
            let _ = tx.send(event).await;
        }
    }
}

fn service_error(node: &Node, error: anyhow::Error) -> ExecutionError {
    tracing::error!(node_id = %node.id, "Service call failed: {:#}", error);
    ExecutionError::service(node, format!("{:#}", error))
}
