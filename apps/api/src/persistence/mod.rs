//! Persistence: writes a submitted session to disk as pretty-printed JSON.
//!
//! Shape: `{candidate_info, questions, answers, timestamp}`. Each write replaces the
//! destination file. No atomic rename; a crash mid-write can leave a truncated file.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::{AnswerSet, QuestionSet};
use crate::session::models::CandidateInfo;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILENAME_SUFFIX_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub candidate_info: CandidateInfo,
    pub questions: QuestionSet,
    pub answers: AnswerSet,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct SessionWriter {
    output_dir: PathBuf,
    default_filename: String,
    timestamped: bool,
}

impl SessionWriter {
    pub fn new(output_dir: PathBuf, default_filename: String, timestamped: bool) -> Self {
        Self {
            output_dir,
            default_filename,
            timestamped,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.output_dir.clone(),
            config.output_filename.clone(),
            config.timestamped_filenames,
        )
    }

    /// Writes the record and returns the path written.
    /// An explicit `filename` is used verbatim; it must be a bare file name.
    pub async fn save(
        &self,
        candidate: &CandidateInfo,
        questions: &QuestionSet,
        answers: &AnswerSet,
        filename: Option<&str>,
    ) -> Result<PathBuf, AppError> {
        let now = Local::now();
        let filename = match filename {
            Some(name) => name.to_string(),
            None if self.timestamped => {
                let suffix = now.format(FILENAME_SUFFIX_FORMAT).to_string();
                with_suffix(&self.default_filename, &suffix)
            }
            None => self.default_filename.clone(),
        };
        validate_filename(&filename)?;

        let record = SessionRecord {
            candidate_info: candidate.clone(),
            questions: questions.clone(),
            answers: answers.clone(),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        };
        let body = serde_json::to_string_pretty(&record)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(&filename);
        tokio::fs::write(&path, body).await?;

        info!(
            "Saved submission for {} to {}",
            candidate.full_name,
            path.display()
        );
        Ok(path)
    }
}

pub async fn load_record(path: &Path) -> Result<SessionRecord, AppError> {
    let body = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&body)?)
}

fn validate_filename(name: &str) -> Result<(), AppError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(AppError::Validation(format!(
            "Invalid filename '{name}': use a plain file name without directories"
        )));
    }
    Ok(())
}

/// `candidate_data.json` + `20250101_120000` → `candidate_data_20250101_120000.json`
fn with_suffix(filename: &str, suffix: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{filename}_{suffix}"),
    }
}
