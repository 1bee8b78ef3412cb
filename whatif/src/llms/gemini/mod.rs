//! Gemini API client.
//!
//! Implements [`TextGenerationService`](crate::text::TextGenerationService) on
//! top of the `generateContent` REST endpoint. Only single-turn text prompts
//! are supported.

mod client;
mod config;
mod types;

pub use client::Gemini;
pub use config::GeminiConfig;
