use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use flowsmith_types::{RunEvent, RunInput};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{error::ApiResult, routes::pipelines::preflight, state::AppState};

/// Run a pipeline and stream its progress using Server-Sent Events
///
/// One SSE event per run event; the SSE event name is the run event type.
pub async fn run_pipeline_stream(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunInput>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    preflight(&req)?;

    let event_receiver = state.engine.spawn_run(req.graph, req.input);

    let sse_stream = ReceiverStream::new(event_receiver)
        .map(|event| Ok::<Event, Infallible>(to_sse(&event)));

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

fn to_sse(event: &RunEvent) -> Event {
    Event::default()
        .event(event.name())
        .json_data(event)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to encode {} event: {}", event.name(), e);
            Event::default()
                .event("error")
                .data("event could not be encoded")
        })
}
