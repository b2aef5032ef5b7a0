//! Question orchestration: picks a strategy, runs it, and enforces the
//! QuestionSet/AnswerSet invariants.
//!
//! Flow: strategy → QuestionSet → fill_gaps (every listed tech gets questions) →
//!       blank_answers (one empty answer per question).

use serde::{Deserialize, Serialize};
use tracing::info;

use super::keyword::keyword_questions;
use super::model::ModelQuestionGenerator;
use super::templates::{questions_for, template_questions};
use super::{flatten, AnswerSet, QuestionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Model,
    Template,
    Keyword,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub questions: QuestionSet,
    pub answers: AnswerSet,
    pub strategy_used: Strategy,
    /// Non-fatal problems to show the candidate, e.g. a failed model call.
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct QuestionOrchestrator {
    model: ModelQuestionGenerator,
    max_tokens: u32,
}

impl QuestionOrchestrator {
    pub fn new(model: ModelQuestionGenerator, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }

    pub fn model_available(&self) -> bool {
        self.model.is_available()
    }

    /// Model when one is available, templates otherwise.
    pub fn default_strategy(&self) -> Strategy {
        if self.model_available() {
            Strategy::Model
        } else {
            Strategy::Template
        }
    }

    /// Generates questions for a non-empty tech list. Never fails: model problems
    /// downgrade to templates and surface as warnings.
    pub async fn generate(
        &self,
        requested: Option<Strategy>,
        techs: &[String],
    ) -> GenerationResult {
        let mut strategy = requested.unwrap_or_else(|| self.default_strategy());
        if strategy == Strategy::Model && !self.model_available() {
            strategy = Strategy::Template;
        }

        let mut warnings = Vec::new();
        let mut questions = match strategy {
            Strategy::Template => template_questions(techs),
            Strategy::Keyword => keyword_questions(&techs.join(", ")),
            Strategy::Model => {
                let outcome = self.model.generate(techs, self.max_tokens).await;
                if !outcome.from_model {
                    strategy = Strategy::Template;
                }
                warnings.extend(outcome.warning);
                outcome.questions
            }
        };

        let filled = fill_gaps(&mut questions, techs);
        let answers = blank_answers(&questions);

        info!(
            "Generated {} questions in {} groups via {:?} ({} gap-filled)",
            flatten(&questions).len(),
            questions.len(),
            strategy,
            filled
        );

        GenerationResult {
            questions,
            answers,
            strategy_used: strategy,
            warnings,
        }
    }
}

/// Splits the comma-separated form field into trimmed, non-empty tokens.
/// Order and duplicates are kept.
pub fn parse_tech_stack(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Adds template questions for every listed tech that is missing or empty.
/// Returns how many entries were filled.
pub fn fill_gaps(questions: &mut QuestionSet, techs: &[String]) -> usize {
    let mut filled = 0;
    for tech in techs {
        let missing = questions.get(tech).map_or(true, |qs| qs.is_empty());
        if missing {
            questions.insert(tech.clone(), questions_for(tech));
            filled += 1;
        }
    }
    filled
}

/// One empty answer per question, for every technology.
pub fn blank_answers(questions: &QuestionSet) -> AnswerSet {
    questions
        .iter()
        .map(|(tech, qs)| (tech.clone(), vec![String::new(); qs.len()]))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::generation::templates::GENERAL_KEY;
    use crate::llm_client::handle::testing::{handle_with, ScriptedModel};
    use crate::llm_client::ModelHandle;

    fn techs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn orchestrator(handle: ModelHandle) -> QuestionOrchestrator {
        QuestionOrchestrator::new(ModelQuestionGenerator::new(Arc::new(handle)), 300)
    }

    fn assert_invariants(result: &GenerationResult, list: &[String]) {
        for tech in list {
            assert!(
                result.questions.get(tech).is_some_and(|qs| !qs.is_empty()),
                "{tech} has no questions"
            );
        }
        assert_eq!(result.questions.len(), result.answers.len());
        for (tech, qs) in &result.questions {
            let answers = &result.answers[tech];
            assert_eq!(answers.len(), qs.len());
            assert!(answers.iter().all(String::is_empty));
        }
    }

    #[test]
    fn test_parse_tech_stack_trims_and_drops_empty() {
        assert_eq!(
            parse_tech_stack(" Python, ,SQL ,, Django,Python "),
            vec!["Python", "SQL", "Django", "Python"]
        );
        assert!(parse_tech_stack(" , ").is_empty());
        assert!(parse_tech_stack("").is_empty());
    }

    #[test]
    fn test_fill_gaps_adds_missing_and_empty_entries() {
        let mut questions = QuestionSet::new();
        questions.insert("Rust".to_string(), vec!["What is borrowing?".to_string()]);
        questions.insert("Go".to_string(), vec![]);

        let filled = fill_gaps(&mut questions, &techs(&["Rust", "Go", "Kafka"]));

        assert_eq!(filled, 2);
        assert_eq!(questions["Rust"], vec!["What is borrowing?"]);
        assert_eq!(questions["Go"], questions_for("Go"));
        assert_eq!(questions["Kafka"], questions_for("Kafka"));
    }

    #[tokio::test]
    async fn test_model_strategy_partial_output_is_gap_filled() {
        let reply = "Technology: Python\n- What is a metaclass?\nTechnology: Docker\n";
        let list = techs(&["Python", "Docker", "SQL"]);
        let orch = orchestrator(handle_with(Some(ScriptedModel::replying(reply))).0);

        let result = orch.generate(None, &list).await;

        assert_eq!(result.strategy_used, Strategy::Model);
        assert_eq!(result.questions["Python"], vec!["What is a metaclass?"]);
        assert_eq!(result.questions["Docker"], questions_for("Docker"));
        assert_eq!(result.questions["SQL"], questions_for("SQL"));
        assert_invariants(&result, &list);
    }

    #[tokio::test]
    async fn test_model_keys_outside_the_list_are_kept() {
        let reply = "Technology: python\n- Lowercase key?\n";
        let list = techs(&["Python"]);
        let orch = orchestrator(handle_with(Some(ScriptedModel::replying(reply))).0);

        let result = orch.generate(Some(Strategy::Model), &list).await;

        assert!(result.questions.contains_key("python"));
        assert!(result.questions.contains_key("Python"));
        assert_invariants(&result, &list);
    }

    #[tokio::test]
    async fn test_keyword_strategy_is_gap_filled_for_user_tokens() {
        let list = techs(&["Python", "Django", "Rust"]);
        let orch = orchestrator(ModelHandle::disabled());

        let result = orch.generate(Some(Strategy::Keyword), &list).await;

        assert_eq!(result.strategy_used, Strategy::Keyword);
        assert!(result.questions.contains_key("python"));
        assert!(result.questions.contains_key("django"));
        assert_invariants(&result, &list);
    }

    #[tokio::test]
    async fn test_keyword_strategy_without_matches_keeps_general() {
        let list = techs(&["Rust"]);
        let orch = orchestrator(ModelHandle::disabled());

        let result = orch.generate(Some(Strategy::Keyword), &list).await;

        assert!(result.questions.contains_key(GENERAL_KEY));
        assert_invariants(&result, &list);
    }

    #[tokio::test]
    async fn test_model_request_without_model_downgrades_to_template() {
        let list = techs(&["Rust", "Go"]);
        let orch = orchestrator(ModelHandle::disabled());

        assert_eq!(orch.default_strategy(), Strategy::Template);
        let result = orch.generate(Some(Strategy::Model), &list).await;

        assert_eq!(result.strategy_used, Strategy::Template);
        assert_eq!(result.questions, template_questions(&list));
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_reports_warning_and_uses_templates() {
        let list = techs(&["Rust"]);
        let orch = orchestrator(handle_with(Some(ScriptedModel::failing())).0);

        assert_eq!(orch.default_strategy(), Strategy::Model);
        let result = orch.generate(None, &list).await;

        assert_eq!(result.strategy_used, Strategy::Template);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.questions, template_questions(&list));
        // call failures leave the model enabled
        assert_eq!(orch.default_strategy(), Strategy::Model);
    }

    #[tokio::test]
    async fn test_failed_load_switches_default_to_template() {
        let list = techs(&["Rust"]);
        let orch = orchestrator(handle_with(None).0);

        assert_eq!(orch.default_strategy(), Strategy::Model);
        let result = orch.generate(None, &list).await;

        assert_eq!(result.strategy_used, Strategy::Template);
        assert!(result.warnings.is_empty());
        assert_eq!(orch.default_strategy(), Strategy::Template);
    }
}
