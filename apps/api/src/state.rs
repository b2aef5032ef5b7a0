use std::sync::Arc;

use crate::config::Config;
use crate::generation::model::ModelQuestionGenerator;
use crate::generation::orchestrator::QuestionOrchestrator;
use crate::llm_client::ModelHandle;
use crate::persistence::SessionWriter;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owned model handle: loaded lazily, shared by every session, calls serialized.
    pub model: Arc<ModelHandle>,
    pub orchestrator: QuestionOrchestrator,
    pub sessions: SessionStore,
    pub writer: SessionWriter,
}

impl AppState {
    pub fn new(config: Config, model: Arc<ModelHandle>) -> Self {
        let orchestrator = QuestionOrchestrator::new(
            ModelQuestionGenerator::new(model.clone()),
            config.llm.max_tokens,
        );
        let writer = SessionWriter::from_config(&config);

        Self {
            config,
            model,
            orchestrator,
            sessions: SessionStore::new(),
            writer,
        }
    }
}
