use std::sync::Arc;

use crate::llm_client::ModelCaller;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The model caller is constructed once at startup and injected here; it is
/// the only state that outlives a single request.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn ModelCaller>,
}
