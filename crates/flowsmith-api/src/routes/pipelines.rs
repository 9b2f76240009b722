use axum::{extract::State, Json};
use flowsmith_graph::pipeline;
use flowsmith_types::{ErrorKind, RunInput, RunReport};
use std::sync::Arc;

use crate::{error::{ApiError, ApiResult}, state::AppState};

/// Run a pipeline to completion and return its report
///
/// A pipeline that fails validation is rejected with 400. Failures during
/// execution still answer 200: the report carries the error and the trace
/// captured up to that point.
pub async fn run_pipeline(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunInput>,
) -> ApiResult<Json<RunReport>> {
    preflight(&req)?;

    let report = state
        .engine
        .run_pipeline(&req.graph, req.input.as_deref())
        .await;

    if let Some(error) = report
        .error
        .as_ref()
        .filter(|error| error.kind == ErrorKind::ValidationError)
    {
        return Err(ApiError::InvalidPipeline(error.clone()));
    }

    Ok(Json(report))
}

/// Checks that need no service call: structure, path and start value
pub(crate) fn preflight(req: &RunInput) -> ApiResult<()> {
    pipeline::validate(&req.graph)
        .and_then(|_| pipeline::resolve_path(&req.graph).map(|_| ()))
        .and_then(|_| pipeline::initial_value(&req.graph, req.input.as_deref()).map(|_| ()))
        .map_err(|error| {
            tracing::debug!("Rejected pipeline: {}", error);
            ApiError::InvalidPipeline(error)
        })
}
