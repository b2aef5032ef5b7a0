// Question generation: template, keyword and model-backed strategies, plus the
// orchestrator that picks one and fills the gaps.
// All model calls go through llm_client::ModelHandle.

use indexmap::IndexMap;

pub mod handlers;
pub mod keyword;
pub mod model;
pub mod orchestrator;
pub mod prompts;
pub mod templates;

/// Technology → ordered interview questions. Insertion order is preserved.
pub type QuestionSet = IndexMap<String, Vec<String>>;

/// Technology → answers, positionally aligned with the `QuestionSet`.
pub type AnswerSet = IndexMap<String, Vec<String>>;

/// Every question in group order, without the technology keys.
pub fn flatten(questions: &QuestionSet) -> Vec<String> {
    questions.values().flatten().cloned().collect()
}
