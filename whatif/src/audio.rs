//! Speech synthesis capability.
//!
//! [`SpeechSynthesisService`] writes a WAV file for a piece of text spoken by a
//! given [`Voice`]. Engines are opaque: the call either leaves a file at the
//! requested path or returns a [`SynthesisError`]. Nothing here retries.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;

use async_trait::async_trait;

/// Speaker selection for multi-speaker models.
///
/// An empty id means "model default" and is not forwarded to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Voice {
    /// Speaker identifier (e.g., VCTK `p230`).
    pub id: String,
}

impl Voice {
    /// Create a voice with the given speaker id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The speaker id, or `None` for the model default.
    #[must_use]
    pub fn speaker(&self) -> Option<&str> {
        let id = self.id.trim();
        (!id.is_empty()).then_some(id)
    }
}

impl<S: Into<String>> From<S> for Voice {
    fn from(s: S) -> Self {
        Self::new(s)
    }
}

/// Error raised while producing an audio file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SynthesisError {
    /// The engine process could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The engine process exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    Exit {
        /// Program that was launched.
        program: String,
        /// Exit status.
        status: ExitStatus,
        /// Tail of the process stderr.
        stderr: String,
    },

    /// The engine server answered with an error status.
    #[error("TTS server returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The engine server could not be reached.
    #[error("TTS server request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid engine URL.
    #[error("invalid TTS server URL: {0}")]
    Url(#[from] url::ParseError),

    /// Reading or writing the audio file failed.
    #[error("audio I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine reported success but left no file behind.
    #[error("synthesis produced no file at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Trait for engines that speak text into a WAV file.
#[async_trait]
pub trait SpeechSynthesisService: Send + Sync {
    /// Synthesize `text` with `voice`, writing WAV data to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if the engine fails or the file cannot be
    /// written.
    async fn synthesize(&self, text: &str, voice: &Voice, path: &Path)
    -> Result<(), SynthesisError>;

    /// Name of the engine, used in logs.
    fn engine_name(&self) -> &'static str;
}

/// Type alias for an Arc-wrapped synthesis service.
pub type SharedSpeechService = Arc<dyn SpeechSynthesisService>;

/// Duration in seconds of the WAV file at `path`, read from its header.
///
/// # Errors
///
/// Returns [`hound::Error`] if the file is not a readable WAV file.
pub fn wav_duration_secs(path: &Path) -> Result<f64, hound::Error> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let frames = reader.duration();
    Ok(f64::from(frames) / f64::from(spec.sample_rate.max(1)))
}
