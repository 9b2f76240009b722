mod common;

use common::{echo_prompt, fixed};
use flowsmith_graph::{
    Edge, Engine, EngineConfig, ErrorKind, Node, PipelineGraph, RunEvent, RunStatus,
};
use flowsmith_types::{BRANCH_HANDLE_FALSE, BRANCH_HANDLE_TRUE};

fn refine_graph() -> PipelineGraph {
    PipelineGraph::new(
        vec![
            Node::sink("o1"),
            Node::repeat("r1", "Polish: {input}", "Could it be better?"),
            Node::source("s1", "rough draft"),
            Node::transform("t1", "Fix spelling: {input}"),
        ],
        vec![Edge::new("s1", "t1"), Edge::new("t1", "r1"), Edge::new("r1", "o1")],
    )
}

#[tokio::test]
async fn test_run_pipeline_uses_source_text() {
    let generator = echo_prompt("false");
    let engine = Engine::new(generator, EngineConfig::default());

    let report = engine.run_pipeline(&refine_graph(), None).await;

    assert!(report.is_success());
    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(
        report.output.as_deref(),
        Some("Polish: Fix spelling: rough draft")
    );
    assert_eq!(report.trace.last_output("s1"), Some("rough draft"));
    assert_eq!(report.trace.iterations("r1").len(), 1);
    assert!(report.error.is_none());
    assert!(!report.run_id.is_empty());
}

#[tokio::test]
async fn test_run_pipeline_input_overrides_source() {
    let engine = Engine::new(echo_prompt("false"), EngineConfig::default());

    let report = engine.run_pipeline(&refine_graph(), Some("other")).await;

    assert_eq!(report.trace.last_output("s1"), Some("other"));
    assert_eq!(report.into_result().unwrap(), "Polish: Fix spelling: other");
}

#[tokio::test]
async fn test_run_pipeline_validation_failure() {
    let generator = fixed("unused", "false");
    let engine = Engine::new(generator.clone(), EngineConfig::default());
    let graph = PipelineGraph::linear(vec![Node::source("s1", "text"), Node::transform("t1", "")]);

    let report = engine.run_pipeline(&graph, None).await;

    assert_eq!(report.status, RunStatus::Failed);
    let error = report.error.as_ref().unwrap();
    assert_eq!(error.kind, ErrorKind::ValidationError);
    assert!(error.message.contains("sink"));
    assert!(report.trace.is_empty());
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn test_run_pipeline_empty_start_value() {
    let engine = Engine::new(fixed("unused", "false"), EngineConfig::default());
    let graph = PipelineGraph::linear(vec![Node::source("s1", "   "), Node::sink("o1")]);

    let report = engine.run_pipeline(&graph, None).await;

    let error = report.into_result().unwrap_err();
    assert_eq!(error.kind, ErrorKind::ValidationError);
    assert_eq!(error.node_id.as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_run_pipeline_branch_route_with_plain_exit() {
    let engine = Engine::new(echo_prompt("true"), EngineConfig::default());
    let graph = PipelineGraph::new(
        vec![
            Node::source("s1", "ticket"),
            Node::decision("d1", "Is this urgent?", "t_yes", "t_no"),
            Node::transform("t_yes", "Escalate: {input}"),
            Node::transform("t_no", "Queue: {input}"),
            Node::sink("o1"),
        ],
        vec![
            Edge::new("s1", "d1"),
            Edge::new("d1", "t_yes").with_handle(BRANCH_HANDLE_TRUE),
            Edge::new("d1", "t_no").with_handle(BRANCH_HANDLE_FALSE),
            Edge::new("d1", "o1"),
        ],
    );

    let report = engine.run_pipeline(&graph, None).await;

    assert_eq!(report.output.as_deref(), Some("Escalate: ticket"));
    assert_eq!(report.trace.last_output("o1"), Some("Escalate: ticket"));
    assert!(!report.trace.contains("t_no"));
}

fn diamond_graph() -> PipelineGraph {
    PipelineGraph::new(
        vec![
            Node::source("s1", "ticket"),
            Node::decision("d1", "Is this urgent?", "t_yes", "t_no"),
            Node::transform("t_yes", "Escalate: {input}"),
            Node::transform("t_no", "Queue: {input}"),
            Node::sink("o1"),
        ],
        vec![
            Edge::new("s1", "d1"),
            Edge::new("d1", "t_yes").with_handle(BRANCH_HANDLE_TRUE),
            Edge::new("d1", "t_no").with_handle(BRANCH_HANDLE_FALSE),
            Edge::new("t_yes", "o1"),
            Edge::new("t_no", "o1"),
        ],
    )
}

#[tokio::test]
async fn test_run_pipeline_branches_rejoin_at_sink() {
    let engine = Engine::new(echo_prompt("true"), EngineConfig::default());

    let report = engine.run_pipeline(&diamond_graph(), None).await;

    assert_eq!(report.status, RunStatus::Succeeded, "{:?}", report.error);
    assert_eq!(report.output.as_deref(), Some("Escalate: ticket"));
    assert_eq!(report.trace.node("d1").unwrap().condition, Some(true));
    assert_eq!(report.trace.last_output("d1"), Some("Escalate: ticket"));
    assert!(!report.trace.contains("t_no"));
}

#[tokio::test]
async fn test_run_pipeline_false_branch_rejoins_at_sink() {
    let engine = Engine::new(echo_prompt("false"), EngineConfig::default());

    let report = engine.run_pipeline(&diamond_graph(), None).await;

    assert_eq!(report.output.as_deref(), Some("Queue: ticket"));
    assert!(!report.trace.contains("t_yes"));
}

#[tokio::test]
async fn test_run_pipeline_runs_whole_route_chain() {
    let generator = echo_prompt("true");
    let engine = Engine::new(generator.clone(), EngineConfig::default());
    let graph = PipelineGraph::new(
        vec![
            Node::source("s1", "ticket"),
            Node::decision("d1", "Is this urgent?", "t_yes", "t_no"),
            Node::transform("t_yes", "Escalate: {input}"),
            Node::transform("t_page", "Page on-call: {input}"),
            Node::transform("t_no", "Queue: {input}"),
            Node::transform("t_log", "Log: {input}"),
            Node::sink("o1"),
        ],
        vec![
            Edge::new("s1", "d1"),
            Edge::new("d1", "t_yes").with_handle(BRANCH_HANDLE_TRUE),
            Edge::new("d1", "t_no").with_handle(BRANCH_HANDLE_FALSE),
            Edge::new("t_yes", "t_page"),
            Edge::new("t_page", "t_log"),
            Edge::new("t_no", "t_log"),
            Edge::new("t_log", "o1"),
        ],
    );

    let report = engine.run_pipeline(&graph, None).await;

    assert_eq!(
        report.output.as_deref(),
        Some("Log: Page on-call: Escalate: ticket")
    );
    assert_eq!(generator.transform_calls(), 3);
    assert!(!report.trace.contains("t_no"));
}

#[tokio::test]
async fn test_failed_run_keeps_partial_trace() {
    let engine = Engine::new(
        fixed("again", "true"),
        EngineConfig::default()
            .with_iteration_cap_policy(flowsmith_graph::IterationCapPolicy::Fail),
    );

    let report = engine.run_pipeline(&refine_graph(), None).await;

    assert_eq!(report.status, RunStatus::Failed);
    assert!(report.output.is_none());
    assert_eq!(report.error.as_ref().unwrap().kind, ErrorKind::LimitExceeded);
    assert_eq!(report.trace.last_output("t1"), Some("again"));
    assert_eq!(report.trace.iterations("r1").len(), 10);
    assert!(!report.trace.contains("o1"));
}

async fn collect(mut rx: tokio::sync::mpsc::Receiver<RunEvent>) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_spawn_run_event_order() {
    let engine = Engine::new(echo_prompt("false"), EngineConfig::default());

    let events = collect(engine.spawn_run(refine_graph(), None)).await;
    let names: Vec<&str> = events.iter().map(|event| event.name()).collect();

    assert_eq!(
        names,
        [
            "init_stream",
            "node_started",
            "node_output",
            "node_started",
            "node_output",
            "node_started",
            "iteration",
            "node_output",
            "node_started",
            "node_output",
            "end_stream",
        ]
    );

    match events.last().unwrap() {
        RunEvent::EndStream { status, output, .. } => {
            assert_eq!(*status, RunStatus::Succeeded);
            assert_eq!(output.as_deref(), Some("Polish: Fix spelling: rough draft"));
        }
        other => panic!("expected end_stream, got {:?}", other),
    }
}

#[tokio::test]
async fn test_spawn_run_reports_error_before_end() {
    let engine = Engine::new(fixed("x", "false"), EngineConfig::default());
    let graph = PipelineGraph::linear(vec![Node::source("s1", "text")]);

    let events = collect(engine.spawn_run(graph, None)).await;

    assert_eq!(events.len(), 3);
    match &events[1] {
        RunEvent::Error { kind, node_id, .. } => {
            assert_eq!(*kind, ErrorKind::ValidationError);
            assert!(node_id.is_none());
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert!(matches!(
        events[2],
        RunEvent::EndStream { status: RunStatus::Failed, output: None, .. }
    ));
}
