//! Unified error types for the whatif pipeline.
//!
//! Each stage owns a narrow error type:
//! - [`ConfigError`] for reading or writing `config.json`
//! - [`LlmError`] for a single call to the generative text service
//! - [`GenerationError`] once the content generator has used up its attempts
//! - [`SynthesisError`] for the speech engine (never retried)
//!
//! [`Error`] wraps all of them at the request boundary, where the HTTP layer
//! turns it into a uniform failure response.

pub use crate::audio::SynthesisError;
pub use crate::config::ConfigError;
pub use crate::content_generator::GenerationError;
pub use crate::llms::LlmError;

/// Result type alias for whatif operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the whatif pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration file could not be read, parsed or written.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The generative backend could not be constructed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Text generation failed on every attempt.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Speech synthesis failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The pipeline task was cancelled or panicked.
    #[error("pipeline task failed: {0}")]
    Task(String),
}

impl Error {
    /// Create a task error with a message.
    #[must_use]
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}
