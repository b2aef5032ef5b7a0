//! Axum route handlers for the stateless Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::orchestrator::{parse_tech_stack, GenerationResult, Strategy};
use crate::llm_client::handle::ModelStatus;
use crate::session::models::EMPTY_TECH_STACK_MESSAGE;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub tech_stack: String,
    pub strategy: Option<Strategy>,
}

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub available: bool,
    pub status: ModelStatus,
    pub default_strategy: Strategy,
    pub model: String,
    pub max_tokens: u32,
}

/// POST /api/v1/questions/preview
///
/// Generates questions for a tech stack without touching any session.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let techs = parse_tech_stack(&request.tech_stack);
    if techs.is_empty() {
        return Err(AppError::Validation(EMPTY_TECH_STACK_MESSAGE.to_string()));
    }

    Ok(Json(state.orchestrator.generate(request.strategy, &techs).await))
}

/// POST /api/v1/model/load
///
/// Loads the model ahead of the first generation. A failed load is remembered and
/// reported here; generation keeps falling back to templates.
pub async fn handle_model_load(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    if let Err(e) = state.model.warm_up().await {
        tracing::warn!("Model warm-up failed: {e}");
    }
    handle_model_status(State(state)).await
}

/// GET /api/v1/model
pub async fn handle_model_status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        available: state.model.is_available(),
        status: state.model.status(),
        default_strategy: state.orchestrator.default_strategy(),
        model: state.config.llm.model.clone(),
        max_tokens: state.config.llm.max_tokens,
    })
}
