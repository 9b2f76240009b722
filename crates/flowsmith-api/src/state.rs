use std::sync::Arc;
use flowsmith_graph::Engine;
use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The Engine keeps no per-run state, so one instance serves every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(config: Config, engine: Engine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
