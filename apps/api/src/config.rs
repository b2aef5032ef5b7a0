use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; a missing `LLM_BASE_URL` means no model is available.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm: LlmSettings,
    pub output_dir: PathBuf,
    pub output_filename: String,
    /// Append `_YYYYMMDD_HHMMSS` to the default filename so submissions don't overwrite each other.
    pub timestamped_filenames: bool,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible completions server (e.g. a local llama.cpp server).
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: Option<u64>,
}

pub const DEFAULT_OUTPUT_FILENAME: &str = "candidate_data.json";
pub const DEFAULT_MAX_TOKENS: u32 = 300;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm: LlmSettings {
                base_url: optional_env("LLM_BASE_URL"),
                model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "local-model".to_string()),
                max_tokens: parse_env("LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)
                    .context("LLM_MAX_TOKENS must be a positive integer")?,
                timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            },
            output_dir: optional_env("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            output_filename: optional_env("OUTPUT_FILENAME")
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILENAME.to_string()),
            timestamped_filenames: parse_env("TIMESTAMPED_FILENAMES", false)
                .context("TIMESTAMPED_FILENAMES must be true or false")?,
        })
    }
}

/// Treats unset and blank variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config used by handler and persistence tests: no model, output into `dir`.
    pub fn for_tests(dir: &std::path::Path) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            llm: LlmSettings {
                base_url: None,
                model: "test-model".to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                timeout_secs: None,
            },
            output_dir: dir.to_path_buf(),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            timestamped_filenames: false,
        }
    }
}
