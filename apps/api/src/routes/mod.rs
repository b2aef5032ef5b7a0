pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::generation::handlers as generation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Model / stateless generation
        .route("/api/v1/model", get(generation::handle_model_status))
        .route("/api/v1/model/load", post(generation::handle_model_load))
        .route("/api/v1/questions/preview", post(generation::handle_preview))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/generate", post(session::handle_generate))
        .route(
            "/api/v1/sessions/:id/answers",
            put(session::handle_replace_answers).patch(session::handle_set_answer),
        )
        .route("/api/v1/sessions/:id/submit", post(session::handle_submit))
        .route(
            "/api/v1/sessions/:id/submission",
            get(session::handle_get_submission),
        )
        .with_state(state)
}
