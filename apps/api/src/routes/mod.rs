pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::forge::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/forge", post(handlers::handle_forge))
        .with_state(state)
}
