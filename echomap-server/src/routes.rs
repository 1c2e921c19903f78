//! Route definitions for the EchoMap server.

use axum::{
    Router,
    routing::get
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer
};

use crate::handlers;
use crate::state::AppState;

/// Creates the Axum router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Browser map clients may be served from another origin
    let cors = if state.config.cors_permissive {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route(
            "/notes",
            get(handlers::list_notes).post(handlers::create_note)
        )
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
