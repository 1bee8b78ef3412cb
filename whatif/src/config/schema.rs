//! Configuration schema.
//!
//! The five documented keys are always written. The optional keys are left out
//! of the file until a user adds them by hand, so a freshly created
//! `config.json` holds exactly the defaults below.

use serde::{Deserialize, Serialize};

/// Settings for one pipeline run, as stored in `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Credential for the Gemini API.
    pub gemini_api_key: String,

    /// Directory receiving generated `.wav` files.
    pub output_dir: String,

    /// Coqui model identifier (e.g., `tts_models/en/vctk/vits`).
    pub tts_model: String,

    /// Speaker identifier for multi-speaker models (e.g., `p230`).
    pub tts_speaker: String,

    /// Number of attempts made against the text service before giving up.
    pub max_retries: u32,

    /// Gemini model override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,

    /// Gemini API base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,

    /// Base URL of a running Coqui `tts-server`. When set it replaces the
    /// local `tts` program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_server_url: Option<String>,

    /// Program name of the Coqui command-line synthesizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_command: Option<String>,
}

impl Configuration {
    /// Default output directory.
    pub const DEFAULT_OUTPUT_DIR: &'static str = "output";
    /// Default Coqui model.
    pub const DEFAULT_TTS_MODEL: &'static str = "tts_models/en/vctk/vits";
    /// Default VCTK speaker.
    pub const DEFAULT_TTS_SPEAKER: &'static str = "p230";
    /// Default attempt count.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    /// Default Coqui program name.
    pub const DEFAULT_TTS_COMMAND: &'static str = "tts";

    /// Attempts the content generator makes. Zero is treated as one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Coqui program to run, falling back to `tts`.
    #[must_use]
    pub fn tts_command(&self) -> &str {
        self.tts_command
            .as_deref()
            .unwrap_or(Self::DEFAULT_TTS_COMMAND)
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the attempt count.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            output_dir: Self::DEFAULT_OUTPUT_DIR.to_owned(),
            tts_model: Self::DEFAULT_TTS_MODEL.to_owned(),
            tts_speaker: Self::DEFAULT_TTS_SPEAKER.to_owned(),
            max_retries: Self::DEFAULT_MAX_RETRIES,
            gemini_model: None,
            gemini_base_url: None,
            tts_server_url: None,
            tts_command: None,
        }
    }
}
