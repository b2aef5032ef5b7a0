//! Model-backed question generator.
//!
//! Flow: build prompt → ModelHandle::complete → parse "Technology:" / "- " lines.
//! Any failure, or output with no recognizable groups, falls back to the template
//! generator for the full list. Partial groups are returned as-is; the orchestrator
//! fills the gaps.

use std::sync::Arc;

use tracing::{info, warn};

use super::prompts::{build_question_prompt, QUESTION_TEMPERATURE};
use super::templates::template_questions;
use super::QuestionSet;
use crate::llm_client::{LlmError, ModelHandle};

/// Questions plus any user-facing warning raised on the way.
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub questions: QuestionSet,
    pub warning: Option<String>,
    /// False when the template fallback produced the questions.
    pub from_model: bool,
}

impl ModelOutcome {
    fn fallback(techs: &[String], warning: Option<String>) -> Self {
        Self {
            questions: template_questions(techs),
            warning,
            from_model: false,
        }
    }
}

#[derive(Clone)]
pub struct ModelQuestionGenerator {
    model: Arc<ModelHandle>,
}

impl ModelQuestionGenerator {
    pub fn new(model: Arc<ModelHandle>) -> Self {
        Self { model }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_available()
    }

    pub async fn generate(&self, techs: &[String], max_tokens: u32) -> ModelOutcome {
        let prompt = build_question_prompt(techs);

        let result = self
            .model
            .complete(&prompt, max_tokens, QUESTION_TEMPERATURE)
            .await
            .and_then(|completion| {
                completion
                    .text()
                    .map(|text| text.trim().to_string())
                    .ok_or(LlmError::EmptyContent)
            });

        let text = match result {
            Ok(text) => text,
            Err(LlmError::Unavailable(reason)) => {
                info!("Model unavailable ({reason}), using template questions");
                return ModelOutcome::fallback(techs, None);
            }
            Err(e) => {
                warn!("LLM call failed: {e}");
                return ModelOutcome::fallback(techs, Some(format!("LLM call failed: {e}")));
            }
        };

        let parsed = parse_model_output(&text);
        if parsed.is_empty() {
            warn!("Model output contained no 'Technology:' groups, using template questions");
            return ModelOutcome::fallback(techs, None);
        }

        info!("Model produced questions for {} technologies", parsed.len());
        ModelOutcome {
            questions: parsed,
            warning: None,
            from_model: true,
        }
    }
}

/// Parses `Technology: <name>` headers followed by `- <question>` bullets.
///
/// Bullets before the first header, blank lines and any other text are ignored.
/// A repeated header starts its group over.
pub fn parse_model_output(text: &str) -> QuestionSet {
    let mut parsed = QuestionSet::new();
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.to_lowercase().starts_with("technology:") {
            let tech = line
                .split_once(':')
                .map(|(_, rest)| rest.trim())
                .unwrap_or_default()
                .to_string();
            parsed.insert(tech.clone(), Vec::new());
            current = Some(tech);
        } else if line.starts_with('-') {
            if let Some(group) = current.as_ref().and_then(|tech| parsed.get_mut(tech)) {
                let question = line.trim_start_matches(['-', ' ']).trim();
                group.push(question.to_string());
            }
        }
    }

    parsed
}
