//! Test doubles for the text and speech capabilities.
//!
//! These let the pipeline and the HTTP layer run without network access or a
//! Coqui installation.
//!
//! ```rust,ignore
//! use whatif::mock::{ScriptedTextService, StubSynthesizer};
//!
//! // Fails twice, then answers.
//! let text = ScriptedTextService::failing_then(2, "What if *the moon* left?");
//! let speech = StubSynthesizer::new();
//! ```

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::audio::{SpeechSynthesisService, SynthesisError, Voice};
use crate::llms::LlmError;
use crate::text::TextGenerationService;

/// Text service that fails a fixed number of times, then answers.
#[derive(Debug)]
pub struct ScriptedTextService {
    failures: usize,
    response: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedTextService {
    /// Fail the first `failures` calls, then return `response` forever.
    #[must_use]
    pub fn failing_then(failures: usize, response: impl Into<String>) -> Self {
        Self {
            failures,
            response: response.into(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Always return `response`.
    #[must_use]
    pub fn answering(response: impl Into<String>) -> Self {
        Self::failing_then(0, response)
    }

    /// Number of `generate` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompt of the most recent call.
    #[must_use]
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerationService for ScriptedTextService {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_owned());
        }

        if index < self.failures {
            Err(LlmError::network(format!(
                "scripted failure {} of {}",
                index + 1,
                self.failures
            )))
        } else {
            Ok(self.response.clone())
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Text service that always fails with the same message.
#[derive(Debug)]
pub struct FailingTextService {
    message: String,
    calls: AtomicUsize,
}

impl FailingTextService {
    /// Fail every call with a network error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerationService for FailingTextService {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::network(self.message.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

/// Speech engine that writes a short silent WAV file.
#[derive(Debug, Default)]
pub struct StubSynthesizer {
    calls: AtomicUsize,
    fail_with: Option<String>,
}

impl StubSynthesizer {
    /// Sample rate of the generated silence.
    pub const SAMPLE_RATE: u32 = 16_000;

    /// Create a stub that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stub that always fails with `message` and writes nothing.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(message.into()),
        }
    }

    /// Number of `synthesize` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesisService for StubSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        _voice: &Voice,
        path: &Path,
    ) -> Result<(), SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(SynthesisError::Io(std::io::Error::other(message.clone())));
        }

        // A tenth of a second of silence per word keeps file sizes honest.
        let words = u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX);
        let samples = words.max(1).saturating_mul(Self::SAMPLE_RATE / 10);
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: Self::SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let to_io = |e: hound::Error| SynthesisError::Io(std::io::Error::other(e));

        let mut writer = hound::WavWriter::create(path, spec).map_err(to_io)?;
        for _ in 0..samples {
            writer.write_sample(0_i16).map_err(to_io)?;
        }
        writer.finalize().map_err(to_io)?;
        Ok(())
    }

    fn engine_name(&self) -> &'static str {
        "stub"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_service_fails_then_answers() {
        let service = ScriptedTextService::failing_then(2, "done");

        assert!(service.generate("a").await.is_err());
        assert!(service.generate("b").await.is_err());
        assert_eq!(service.generate("c").await.unwrap(), "done");
        assert_eq!(service.generate("d").await.unwrap(), "done");
        assert_eq!(service.calls(), 4);
        assert_eq!(service.last_prompt().as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn failing_service_counts_calls() {
        let service = FailingTextService::new("nope");
        let err = service.generate("x").await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn stub_synthesizer_writes_wav() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("out.wav");

        StubSynthesizer::new()
            .synthesize("one two three", &Voice::new("p230"), &path)
            .await
            .unwrap();

        let secs = crate::audio::wav_duration_secs(&path).unwrap();
        assert!((secs - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn failing_synthesizer_writes_nothing() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("out.wav");

        let stub = StubSynthesizer::failing("voice not found");
        let err = stub.synthesize("x", &Voice::default(), &path).await.unwrap_err();
        assert!(err.to_string().contains("voice not found"));
        assert!(!path.exists());
        assert_eq!(stub.calls(), 1);
    }
}
