pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::intel::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Signals
        .route(
            "/api/v1/contacts/:id/signals",
            post(handlers::handle_record_signal),
        )
        .route(
            "/api/v1/contacts/:id/signals/scored",
            get(handlers::handle_scored_signals),
        )
        .route(
            "/api/v1/contacts/:id/signals/top",
            get(handlers::handle_top_signals),
        )
        // Posts and wedges
        .route("/api/v1/contacts/:id/posts", post(handlers::handle_record_post))
        .route(
            "/api/v1/contacts/:id/wedges",
            get(handlers::handle_detect_wedges),
        )
        // Playbooks
        .route(
            "/api/v1/contacts/:id/playbook",
            post(handlers::handle_generate_playbook).get(handlers::handle_latest_playbook),
        )
        .with_state(state)
}
