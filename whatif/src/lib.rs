//! Whatif - narrated hypothetical scenarios
//!
//! This crate asks a generative text model for a short "what would happen
//! if...?" narration, speaks it with a local Coqui TTS model, and serves the
//! text and the resulting WAV file over HTTP.

pub mod audio;
pub mod audio_generator;
pub mod config;
pub mod content_generator;
pub mod error;
pub mod llms;
pub mod mock;
pub mod pipeline;
pub mod prelude;
pub mod prompts;
pub mod server;
pub mod text;
pub mod tts;

pub use error::{Error, LlmError, Result};
