//! One narration run: configuration, text, audio.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::audio::SharedSpeechService;
use crate::audio_generator::AudioGenerator;
use crate::config::Configuration;
use crate::content_generator::ContentGenerator;
use crate::error::Result;
use crate::llms::{Gemini, GeminiConfig};
use crate::text::SharedTextService;
use crate::tts;

/// Factory for the external services used by a run.
///
/// Called once per request with that request's configuration.
pub trait Backends: Send + Sync {
    /// Text service for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be constructed.
    fn text_service(&self, config: &Configuration) -> Result<SharedTextService>;

    /// Speech service for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be constructed.
    fn speech_service(&self, config: &Configuration) -> Result<SharedSpeechService>;
}

/// Gemini for text, Coqui for speech.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveBackends;

impl Backends for LiveBackends {
    fn text_service(&self, config: &Configuration) -> Result<SharedTextService> {
        let gemini = Gemini::new(GeminiConfig::from_settings(config))?;
        debug!(model = gemini.model(), base_url = gemini.base_url(), "using gemini");
        Ok(Arc::new(gemini))
    }

    fn speech_service(&self, config: &Configuration) -> Result<SharedSpeechService> {
        Ok(tts::from_config(config)?)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    /// Cleaned narration text.
    pub text: String,
    /// Path of the written audio file.
    pub file: PathBuf,
}

impl Narration {
    /// File name of the audio artifact.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Generate text with `seed`, then speak it into the output directory.
///
/// # Errors
///
/// Returns the first failure of either stage; no audio is attempted when text
/// generation fails.
pub async fn run_pipeline(
    config: &Configuration,
    backends: &dyn Backends,
    seed: u32,
    retry_delay: Duration,
) -> Result<Narration> {
    let content = ContentGenerator::new(config, backends.text_service(config)?, seed)
        .with_retry_delay(retry_delay);
    let audio = AudioGenerator::new(config, backends.speech_service(config)?);

    info!(
        seed,
        attempts = content.attempts(),
        output_dir = %audio.output_dir().display(),
        "generating narration"
    );
    let text = content.generate_content().await?;
    let file = audio.generate_audio(&text).await?;

    Ok(Narration { text, file })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::clone_on_ref_ptr)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::{FailingTextService, ScriptedTextService, StubSynthesizer};

    struct Stubs {
        text: SharedTextService,
        speech: Arc<StubSynthesizer>,
    }

    impl Backends for Stubs {
        fn text_service(&self, _: &Configuration) -> Result<SharedTextService> {
            Ok(self.text.clone())
        }

        fn speech_service(&self, _: &Configuration) -> Result<SharedSpeechService> {
            Ok(self.speech.clone())
        }
    }

    fn config_in(dir: &assert_fs::TempDir) -> Configuration {
        Configuration::default().with_output_dir(dir.path().join("out").to_string_lossy())
    }

    #[tokio::test]
    async fn produces_text_and_file() {
        let dir = assert_fs::TempDir::new().unwrap();
        let stubs = Stubs {
            text: Arc::new(ScriptedTextService::answering(" What *if* cats ruled? ")),
            speech: Arc::new(StubSynthesizer::new()),
        };

        let narration = run_pipeline(&config_in(&dir), &stubs, 7, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(narration.text, "What if cats ruled?");
        assert!(narration.file.exists());
        assert!(narration.file_name().starts_with("audio_"));
    }

    #[tokio::test]
    async fn text_failure_skips_synthesis() {
        let dir = assert_fs::TempDir::new().unwrap();
        let stubs = Stubs {
            text: Arc::new(FailingTextService::new("offline")),
            speech: Arc::new(StubSynthesizer::new()),
        };

        let err = run_pipeline(&config_in(&dir), &stubs, 7, Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        assert_eq!(stubs.speech.calls(), 0);
    }

    #[tokio::test]
    async fn synthesis_failure_discards_text() {
        let dir = assert_fs::TempDir::new().unwrap();
        let config = config_in(&dir);
        let stubs = Stubs {
            text: Arc::new(ScriptedTextService::answering("What if *the sea* froze?")),
            speech: Arc::new(StubSynthesizer::failing("voice p999 missing")),
        };

        let err = run_pipeline(&config, &stubs, 7, Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Synthesis(_)));
        assert!(err.to_string().contains("voice p999 missing"));
        assert_eq!(stubs.speech.calls(), 1);
        let written = std::fs::read_dir(&config.output_dir).unwrap().count();
        assert_eq!(written, 0);
    }

    #[test]
    fn live_backends_reject_missing_key() {
        let err = LiveBackends
            .text_service(&Configuration::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Llm(_)));
        assert!(LiveBackends.speech_service(&Configuration::default()).is_ok());
    }
}
