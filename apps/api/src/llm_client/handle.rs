//! Owned, lazily loaded model handle.
//!
//! Created once at startup and injected through `AppState`. The model is loaded on
//! first use and reused afterwards. A failed load is remembered: later calls
//! short-circuit with `LlmError::Unavailable` instead of loading again.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{Completion, LlmError, TextGenerator};

/// Produces a ready `TextGenerator`. Called at most once per successful load.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn TextGenerator>, LlmError>;
}

enum LoadState {
    Unloaded,
    Ready(Arc<dyn TextGenerator>),
    Failed(String),
}

/// Status reported to the UI and the debug endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    NotConfigured,
    Unloaded,
    Ready,
    Failed,
}

const UNLOADED: u8 = 0;
const READY: u8 = 1;
const FAILED: u8 = 2;

pub struct ModelHandle {
    loader: Option<Box<dyn ModelLoader>>,
    // Held for the whole call, which also serializes model invocations across sessions.
    state: Mutex<LoadState>,
    // Mirrors `state` so status reads never wait on an in-flight call.
    load_status: AtomicU8,
}

impl ModelHandle {
    pub fn new(loader: Box<dyn ModelLoader>) -> Self {
        Self {
            loader: Some(loader),
            state: Mutex::new(LoadState::Unloaded),
            load_status: AtomicU8::new(UNLOADED),
        }
    }

    /// A handle with no model behind it. Every call reports `Unavailable`.
    pub fn disabled() -> Self {
        Self {
            loader: None,
            state: Mutex::new(LoadState::Unloaded),
            load_status: AtomicU8::new(UNLOADED),
        }
    }

    /// True when a model is configured and has not failed to load.
    pub fn is_available(&self) -> bool {
        self.loader.is_some() && self.load_status.load(Ordering::SeqCst) != FAILED
    }

    /// Current load state. Does not wait for a running completion.
    pub fn status(&self) -> ModelStatus {
        if self.loader.is_none() {
            return ModelStatus::NotConfigured;
        }
        match self.load_status.load(Ordering::SeqCst) {
            READY => ModelStatus::Ready,
            FAILED => ModelStatus::Failed,
            _ => ModelStatus::Unloaded,
        }
    }

    /// Loads the model now instead of on first completion.
    pub async fn warm_up(&self) -> Result<(), LlmError> {
        if self.status() == ModelStatus::Ready {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await.map(|_| ())
    }

    pub async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion, LlmError> {
        let mut state = self.state.lock().await;
        let model = self.ensure_loaded(&mut state).await?;
        model.complete(prompt, max_tokens, temperature).await
    }

    /// Drops a loaded model. The next call loads it again.
    /// A remembered load failure is kept.
    pub async fn release(&self) {
        let mut state = self.state.lock().await;
        if matches!(*state, LoadState::Ready(_)) {
            *state = LoadState::Unloaded;
            self.load_status.store(UNLOADED, Ordering::SeqCst);
            info!("Model released");
        }
    }

    async fn ensure_loaded(
        &self,
        state: &mut LoadState,
    ) -> Result<Arc<dyn TextGenerator>, LlmError> {
        match state {
            LoadState::Ready(model) => return Ok(model.clone()),
            LoadState::Failed(reason) => return Err(LlmError::Unavailable(reason.clone())),
            LoadState::Unloaded => {}
        }

        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| LlmError::Unavailable("no model configured".to_string()))?;

        info!("Loading text-generation model...");
        match loader.load().await {
            Ok(model) => {
                *state = LoadState::Ready(model.clone());
                self.load_status.store(READY, Ordering::SeqCst);
                Ok(model)
            }
            Err(e) => {
                warn!("Model load failed, falling back to templates from now on: {e}");
                let reason = e.to_string();
                *state = LoadState::Failed(reason.clone());
                self.load_status.store(FAILED, Ordering::SeqCst);
                Err(LlmError::Unavailable(reason))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted generators and loaders shared by tests across the crate.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::ModelLoader;
    use crate::llm_client::{Choice, Completion, LlmError, TextGenerator};

    /// Returns fixed choices, or fails every call when `choices` is `None`.
    pub struct ScriptedModel {
        pub choices: Option<Vec<String>>,
        pub calls: AtomicUsize,
    }

    impl ScriptedModel {
        pub fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                choices: Some(vec![text.to_string()]),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                choices: None,
                calls: AtomicUsize::new(0),
            })
        }

        /// Succeeds with an empty `choices` list.
        pub fn without_choices() -> Arc<Self> {
            Arc::new(Self {
                choices: Some(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedModel {
        async fn complete(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<Completion, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.choices {
                Some(choices) => Ok(Completion {
                    choices: choices
                        .iter()
                        .map(|text| Choice { text: text.clone() })
                        .collect(),
                    usage: None,
                }),
                None => Err(LlmError::Api {
                    status: 500,
                    message: "model crashed".to_string(),
                }),
            }
        }
    }

    /// Hands out a prepared model, or fails when `model` is `None`. Counts loads.
    pub struct CountingLoader {
        pub model: Option<Arc<ScriptedModel>>,
        pub loads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ModelLoader for CountingLoader {
        async fn load(&self) -> Result<Arc<dyn TextGenerator>, LlmError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            match &self.model {
                Some(model) => Ok(model.clone() as Arc<dyn TextGenerator>),
                None => Err(LlmError::Unavailable("model file not found".to_string())),
            }
        }
    }

    pub fn handle_with(
        model: Option<Arc<ScriptedModel>>,
    ) -> (super::ModelHandle, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let loader = CountingLoader {
            model,
            loads: loads.clone(),
        };
        (super::ModelHandle::new(Box::new(loader)), loads)
    }
}
