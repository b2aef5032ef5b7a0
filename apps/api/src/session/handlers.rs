//! Axum route handlers for the Session API: the form, answer and submit actions.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::Strategy;
use crate::generation::{AnswerSet, QuestionSet};
use crate::persistence::{load_record, SessionRecord};
use crate::session::models::{CandidateForm, Session};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    /// Initial position of the "use AI" toggle.
    pub default_strategy: Strategy,
    pub model_available: bool,
}

/// Everything held for the session, for the debug panel.
#[derive(Debug, Serialize)]
pub struct SessionDebugResponse {
    pub model_available: bool,
    pub session: Session,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub session_id: Uuid,
    pub questions: QuestionSet,
    pub answers: AnswerSet,
    pub strategy_used: Strategy,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceAnswersRequest {
    pub answers: AnswerSet,
}

#[derive(Debug, Deserialize)]
pub struct SetAnswerRequest {
    pub technology: String,
    /// Zero-based position in the technology's question list.
    pub index: usize,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswersResponse {
    pub answers: AnswerSet,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub saved_to: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session = state.sessions.create().await;
    info!("Created session {}", session.id);

    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id,
            default_strategy: state.orchestrator.default_strategy(),
            model_available: state.orchestrator.model_available(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDebugResponse>, AppError> {
    let session = state.sessions.get(session_id).await?;
    Ok(Json(SessionDebugResponse {
        model_available: state.orchestrator.model_available(),
        session,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    info!("Ended session {session_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/generate
///
/// Validates the candidate form, generates questions with the selected strategy,
/// and resets the session's answers.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(form): Json<CandidateForm>,
) -> Result<Json<GenerateResponse>, AppError> {
    // Fail fast on an unknown session before spending time on generation.
    state.sessions.get(session_id).await?;

    let (candidate, strategy) = form.into_candidate()?;
    let result = state
        .orchestrator
        .generate(strategy, &candidate.tech_stack_list)
        .await;

    let response = GenerateResponse {
        session_id,
        questions: result.questions.clone(),
        answers: result.answers.clone(),
        strategy_used: result.strategy_used,
        warnings: result.warnings.clone(),
    };

    state
        .sessions
        .update(session_id, |session| {
            session.apply_generation(candidate, result);
            Ok(())
        })
        .await?;

    Ok(Json(response))
}

/// PUT /api/v1/sessions/:id/answers
pub async fn handle_replace_answers(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ReplaceAnswersRequest>,
) -> Result<Json<AnswersResponse>, AppError> {
    let answers = state
        .sessions
        .update(session_id, |session| {
            session.replace_answers(request.answers)?;
            Ok(session.answers.clone())
        })
        .await?;
    Ok(Json(AnswersResponse { answers }))
}

/// PATCH /api/v1/sessions/:id/answers
pub async fn handle_set_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SetAnswerRequest>,
) -> Result<Json<AnswersResponse>, AppError> {
    let answers = state
        .sessions
        .update(session_id, |session| {
            session.set_answer(&request.technology, request.index, request.answer)?;
            Ok(session.answers.clone())
        })
        .await?;
    Ok(Json(AnswersResponse { answers }))
}

/// POST /api/v1/sessions/:id/submit
///
/// Persists candidate info, questions and answers. Aborts without writing when
/// the candidate context is missing. The body is optional; a body that is not a
/// valid `SubmitRequest` is rejected.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    request: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let request = match request {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => SubmitRequest::default(),
        Err(rejection) => {
            return Err(AppError::Validation(format!(
                "Invalid submit body: {}",
                rejection.body_text()
            )))
        }
    };
    let session = state.sessions.get(session_id).await?;
    let (candidate, questions, answers) = session.submission()?;

    let path = state
        .writer
        .save(candidate, questions, answers, request.filename.as_deref())
        .await?;

    state
        .sessions
        .update(session_id, |session| {
            session.last_saved_to = Some(path.clone());
            Ok(())
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            saved_to: path.display().to_string(),
        }),
    ))
}

/// GET /api/v1/sessions/:id/submission
///
/// Reads back the record written by the most recent submit.
pub async fn handle_get_submission(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionRecord>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let path = session.last_saved_to.ok_or_else(|| {
        AppError::NotFound(format!("Session {session_id} has not been submitted"))
    })?;
    Ok(Json(load_record(&path).await?))
}
