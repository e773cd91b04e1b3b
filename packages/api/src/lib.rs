// ABOUTME: HTTP API layer for Offerkit providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{get, post, put},
    Router,
};

pub mod proposals_handlers;
pub mod response;
pub mod state;

pub use state::AppState;

/// Creates the proposals API router
pub fn create_proposals_router() -> Router<AppState> {
    Router::new()
        .route("/", get(proposals_handlers::list_proposals))
        .route("/", post(proposals_handlers::save_proposal))
        .route("/generate", post(proposals_handlers::generate_proposal))
        .route("/{id}/status", put(proposals_handlers::update_status))
}

/// Creates the health API router
pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/", get(proposals_handlers::health))
}
