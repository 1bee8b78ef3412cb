//! Content generator: prompt, call, retry, clean.
//!
//! Every failure is retried the same way, after a fixed delay, until the
//! configured number of attempts is spent. The last error is then wrapped in a
//! [`GenerationError`] that records how many attempts were made.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::Configuration;
use crate::llms::{Gemini, GeminiConfig, LlmError};
use crate::prompts::scenario_prompt;
use crate::text::SharedTextService;

/// Emphasis marker stripped from model output before it is spoken.
pub const EMPHASIS_MARKUP: char = '*';

/// Text generation failed on every attempt.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Error after {attempts} attempts: {source}")]
pub struct GenerationError {
    /// Attempts made, equal to the configured retry count.
    pub attempts: u32,
    /// The error from the last attempt.
    #[source]
    pub source: LlmError,
}

impl GenerationError {
    /// Create a generation error.
    #[must_use]
    pub const fn new(attempts: u32, source: LlmError) -> Self {
        Self { attempts, source }
    }
}

/// Produces one cleaned narration per call to [`generate_content`].
///
/// [`generate_content`]: ContentGenerator::generate_content
#[derive(Clone)]
pub struct ContentGenerator {
    service: SharedTextService,
    seed: u32,
    attempts: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for ContentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentGenerator")
            .field("provider", &self.service.provider_name())
            .field("seed", &self.seed)
            .field("attempts", &self.attempts)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl ContentGenerator {
    /// Delay between failed attempts.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

    /// Create a generator over `service` with a caller-chosen `seed`.
    #[must_use]
    pub fn new(config: &Configuration, service: SharedTextService, seed: u32) -> Self {
        Self {
            service,
            seed,
            attempts: config.attempts(),
            retry_delay: Self::DEFAULT_RETRY_DELAY,
        }
    }

    /// Create a generator backed by Gemini, using the configured credential.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the Gemini client cannot be created (for
    /// instance when the API key is empty).
    pub fn from_config(config: &Configuration, seed: u32) -> Result<Self, LlmError> {
        let gemini = Gemini::new(GeminiConfig::from_settings(config))?;
        Ok(Self::new(config, std::sync::Arc::new(gemini), seed))
    }

    /// Override the delay between failed attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// The seed embedded in every prompt from this generator.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Attempts made before giving up.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The prompt sent to the text service.
    #[must_use]
    pub fn prompt(&self) -> String {
        scenario_prompt(self.seed)
    }

    /// Ask the text service for a narration and clean the result.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] carrying the last underlying error once all
    /// attempts have failed.
    pub async fn generate_content(&self) -> Result<String, GenerationError> {
        let prompt = self.prompt();
        let provider = self.service.provider_name();
        let mut attempt = 1;

        loop {
            match self.service.generate(&prompt).await {
                Ok(raw) => {
                    info!(provider, attempt, chars = raw.len(), "narration generated");
                    return Ok(clean_text(&raw));
                }
                Err(err) if attempt < self.attempts => {
                    warn!(
                        provider,
                        attempt,
                        attempts = self.attempts,
                        error = %err,
                        "text generation failed, trying again"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(GenerationError::new(self.attempts, err)),
            }
        }
    }
}

/// Strip emphasis markup and surrounding whitespace from model output.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.replace(EMPHASIS_MARKUP, "").trim().to_owned()
}
