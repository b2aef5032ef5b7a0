use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::{parse_tech_stack, GenerationResult, Strategy};
use crate::generation::{AnswerSet, QuestionSet};

pub const EMPTY_TECH_STACK_MESSAGE: &str =
    "Please enter your tech stack (comma-separated). Example: `Python, SQL, Django`";

/// Candidate details as entered on the form. Replaced wholesale on each form submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub years_experience: String,
    pub desired_positions: String,
    pub location: String,
    pub tech_stack_list: Vec<String>,
}

/// Request body of the candidate form. Free-text fields may be left blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub years_experience: String,
    pub desired_positions: String,
    pub location: String,
    /// Comma-separated, e.g. "Python, SQL, Django".
    pub tech_stack: String,
    /// Generation toggle. `None` picks the model when one is available.
    pub strategy: Option<Strategy>,
}

impl CandidateForm {
    /// Validates the form. An empty tech stack is rejected before any generation runs.
    pub fn into_candidate(self) -> Result<(CandidateInfo, Option<Strategy>), AppError> {
        let tech_stack_list = parse_tech_stack(&self.tech_stack);
        if tech_stack_list.is_empty() {
            return Err(AppError::Validation(EMPTY_TECH_STACK_MESSAGE.to_string()));
        }

        Ok((
            CandidateInfo {
                full_name: self.full_name,
                email: self.email,
                phone: self.phone,
                years_experience: self.years_experience,
                desired_positions: self.desired_positions,
                location: self.location,
                tech_stack_list,
            },
            self.strategy,
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub candidate: Option<CandidateInfo>,
    pub questions: QuestionSet,
    pub answers: AnswerSet,
    pub generated: bool,
    pub strategy_used: Option<Strategy>,
    pub warnings: Vec<String>,
    pub last_saved_to: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate: None,
            questions: QuestionSet::new(),
            answers: AnswerSet::new(),
            generated: false,
            strategy_used: None,
            warnings: Vec::new(),
            last_saved_to: None,
            created_at: Utc::now(),
        }
    }

    /// Stores the candidate and a fresh question/answer set. Previous answers are discarded.
    pub fn apply_generation(&mut self, candidate: CandidateInfo, result: GenerationResult) {
        self.candidate = Some(candidate);
        self.questions = result.questions;
        self.answers = result.answers;
        self.strategy_used = Some(result.strategy_used);
        self.warnings = result.warnings;
        self.generated = true;
    }

    pub fn set_answer(&mut self, tech: &str, index: usize, text: String) -> Result<(), AppError> {
        let answers = self
            .answers
            .get_mut(tech)
            .ok_or_else(|| AppError::NotFound(format!("No questions for technology '{tech}'")))?;
        let slot = answers.get_mut(index).ok_or_else(|| {
            AppError::NotFound(format!("Question {index} does not exist for '{tech}'"))
        })?;
        *slot = text;
        Ok(())
    }

    /// Replaces answers for the given technologies. Each list must line up with its
    /// question list; nothing is changed if any entry is invalid.
    pub fn replace_answers(&mut self, updates: AnswerSet) -> Result<(), AppError> {
        for (tech, answers) in &updates {
            let questions = self.questions.get(tech).ok_or_else(|| {
                AppError::NotFound(format!("No questions for technology '{tech}'"))
            })?;
            if answers.len() != questions.len() {
                return Err(AppError::Validation(format!(
                    "'{tech}' has {} questions but {} answers were given",
                    questions.len(),
                    answers.len()
                )));
            }
        }

        for (tech, answers) in updates {
            self.answers.insert(tech, answers);
        }
        Ok(())
    }

    /// Everything needed to persist the session, or the reason it can't be saved yet.
    pub fn submission(&self) -> Result<(&CandidateInfo, &QuestionSet, &AnswerSet), AppError> {
        if !self.generated || self.questions.is_empty() {
            return Err(AppError::NoQuestions);
        }
        let candidate = self.candidate.as_ref().ok_or(AppError::MissingCandidate)?;
        Ok((candidate, &self.questions, &self.answers))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
