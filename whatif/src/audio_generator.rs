//! Audio generator: turn cleaned narration into a timestamped WAV file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::audio::{SharedSpeechService, SynthesisError, Voice, wav_duration_secs};
use crate::config::Configuration;
use crate::tts;

/// Prefix of every generated audio file name.
pub const ARTIFACT_PREFIX: &str = "audio_";

/// Writes one audio file per call to [`generate_audio`].
///
/// Two calls finishing in the same second write the same file; the later one
/// wins.
///
/// [`generate_audio`]: AudioGenerator::generate_audio
#[derive(Clone)]
pub struct AudioGenerator {
    service: SharedSpeechService,
    output_dir: PathBuf,
    voice: Voice,
}

impl std::fmt::Debug for AudioGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioGenerator")
            .field("engine", &self.service.engine_name())
            .field("output_dir", &self.output_dir)
            .field("voice", &self.voice)
            .finish()
    }
}

impl AudioGenerator {
    /// Create a generator writing to the configured directory with the
    /// configured speaker.
    #[must_use]
    pub fn new(config: &Configuration, service: SharedSpeechService) -> Self {
        Self {
            service,
            output_dir: PathBuf::from(&config.output_dir),
            voice: Voice::new(config.tts_speaker.clone()),
        }
    }

    /// Create a generator backed by Coqui, bound to the configured model.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if the backend cannot be created.
    pub fn from_config(config: &Configuration) -> Result<Self, SynthesisError> {
        Ok(Self::new(config, tts::from_config(config)?))
    }

    /// Directory receiving audio files.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Speaker used for synthesis.
    #[must_use]
    pub const fn voice(&self) -> &Voice {
        &self.voice
    }

    /// Speak `text` into `<output_dir>/audio_<YYYYMMDD_HHMMSS>.wav`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if the directory cannot be created, the engine
    /// fails, or no file is left behind.
    pub async fn generate_audio(&self, text: &str) -> Result<PathBuf, SynthesisError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(artifact_name(Local::now()));
        info!(
            engine = self.service.engine_name(),
            speaker = %self.voice.id,
            path = %path.display(),
            "synthesizing narration"
        );

        self.service.synthesize(text, &self.voice, &path).await?;

        if !tokio::fs::try_exists(&path).await? {
            return Err(SynthesisError::MissingOutput(path));
        }

        let header_path = path.clone();
        match tokio::task::spawn_blocking(move || wav_duration_secs(&header_path)).await {
            Ok(Ok(secs)) => info!(path = %path.display(), duration_secs = secs, "audio written"),
            Ok(Err(err)) => {
                warn!(path = %path.display(), error = %err, "audio written, header unreadable");
            }
            Err(err) => warn!(path = %path.display(), error = %err, "audio written, header check failed"),
        }

        Ok(path)
    }
}

/// File name of the artifact produced at `now`.
#[must_use]
pub fn artifact_name(now: DateTime<Local>) -> String {
    format!("{ARTIFACT_PREFIX}{}.wav", now.format("%Y%m%d_%H%M%S"))
}
