//! Generative text backends.
//!
//! - [`gemini`] - Google Generative Language API (Gemini models)

mod error;
pub mod gemini;

pub use error::LlmError;
pub use gemini::{Gemini, GeminiConfig};
