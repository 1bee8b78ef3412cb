//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use whatif::prelude::*;
//! ```

pub use crate::audio::{
    SharedSpeechService, SpeechSynthesisService, SynthesisError, Voice, wav_duration_secs,
};
pub use crate::audio_generator::AudioGenerator;
pub use crate::config::{
    ConfigError, Configuration, DEFAULT_CONFIG_PATH, load_config, save_config,
};
pub use crate::content_generator::{ContentGenerator, GenerationError, clean_text};
pub use crate::error::{Error, LlmError, Result};
pub use crate::llms::{Gemini, GeminiConfig};
pub use crate::pipeline::{Backends, LiveBackends, Narration, run_pipeline};
pub use crate::server::{AppState, GenerateResponse, router};
pub use crate::text::{SharedTextService, TextGenerationService};
pub use crate::tts::{CoquiCli, CoquiServer};
