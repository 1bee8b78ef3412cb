//! Generative text capability.
//!
//! The pipeline only needs "prompt in, text out". Backends implement
//! [`TextGenerationService`]; the content generator depends on nothing else,
//! so tests can substitute the doubles in [`crate::mock`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::llms::LlmError;

/// Trait for services that turn a prompt into model-written text.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Generate text for a single user prompt.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on any failure; callers treat every variant as
    /// retryable.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Name of the backend, used in logs.
    fn provider_name(&self) -> &'static str;
}

/// Type alias for an Arc-wrapped text service.
pub type SharedTextService = Arc<dyn TextGenerationService>;
