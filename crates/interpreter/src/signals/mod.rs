//! The five independent interpretation signals.
//!
//! Each signal is a pure function of the question (domain detection also
//! reads a catalog). Signals never observe each other; they return
//! `Result` and the analyzer converts failures into neutral defaults.

pub mod domain;
pub mod entities;
pub mod intent;
pub mod terms;
pub mod time_range;

use querylens_core::error::AnalysisError;
use querylens_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;

/// Model settings shared by the model-backed signals.
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.0,
            max_tokens: 512,
        }
    }
}

/// The `classify(prompt) -> text` capability.
pub struct Classifier {
    provider: Option<Arc<dyn Provider>>,
    settings: ClassifierSettings,
}

impl Classifier {
    pub fn new(provider: Option<Arc<dyn Provider>>, settings: ClassifierSettings) -> Self {
        Self { provider, settings }
    }

    /// Send `question` under `instruction` and return the raw reply.
    pub async fn classify(&self, instruction: &str, question: &str) -> Result<String, AnalysisError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AnalysisError::MissingDependency("text-generation provider".into()))?;

        let mut request = ProviderRequest::new(&self.settings.model, question).with_system(instruction);
        request.temperature = self.settings.temperature;
        request.max_tokens = Some(self.settings.max_tokens);

        let response = provider.complete(request).await?;
        tracing::trace!(
            provider = provider.name(),
            reply_len = response.content.len(),
            "Classifier reply received"
        );
        Ok(response.content)
    }
}
