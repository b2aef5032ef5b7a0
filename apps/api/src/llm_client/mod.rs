//! LLM Client: the single point of entry for all text-generation calls.
//!
//! No other module talks to the model server directly. Callers go through a
//! `ModelHandle`, which owns the lazily loaded `TextGenerator`.
//!
//! The HTTP implementation speaks the OpenAI-compatible completions API, which is
//! what a local llama.cpp server exposes for a GGUF model.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::LlmSettings;

pub mod handle;

pub use handle::{ModelHandle, ModelLoader};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("model unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

/// Raw completion response. Generated text lives at `choices[0].text`.
#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Completion {
    /// Text of the first choice, if the model produced one.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// The external model interface: prompt, token budget and sampling temperature in,
/// completion out. Implementations need not be safe for concurrent calls;
/// `ModelHandle` serializes them. A completion with no choices is treated as
/// `LlmError::EmptyContent` by callers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion, LlmError>;
}

/// HTTP client for an OpenAI-compatible `/v1/completions` endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: &str, model: &str, timeout: Option<Duration>) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Checks that the server is up and serving models. Used as the "load" step.
    pub async fn probe(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion, LlmError> {
        let request_body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let completion: Completion = response.json().await?;
        if completion.choices.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

/// Loads an `LlmClient` from settings and probes the server once.
pub struct HttpModelLoader {
    settings: LlmSettings,
}

impl HttpModelLoader {
    pub fn new(settings: LlmSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self) -> Result<Arc<dyn TextGenerator>, LlmError> {
        let base_url = self
            .settings
            .base_url
            .as_deref()
            .ok_or_else(|| LlmError::Unavailable("LLM_BASE_URL is not set".to_string()))?;

        let client = LlmClient::new(
            base_url,
            &self.settings.model,
            self.settings.timeout_secs.map(Duration::from_secs),
        )?;
        client.probe().await?;

        info!("Model server at {base_url} is ready (model: {})", self.settings.model);
        Ok(Arc::new(client))
    }
}
