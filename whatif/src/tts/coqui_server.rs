//! Coqui `tts-server` HTTP backend.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::audio::{SpeechSynthesisService, SynthesisError, Voice};

/// Calls `GET {base}/api/tts?text=..&speaker_id=..` and saves the WAV body.
#[derive(Debug, Clone)]
pub struct CoquiServer {
    endpoint: Url,
    client: Client,
}

impl CoquiServer {
    /// Synthesis of a one-minute narration on CPU can be slow.
    pub const TIMEOUT: Duration = Duration::from_secs(600);

    /// Create a backend for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if the URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str) -> Result<Self, SynthesisError> {
        let endpoint = Url::parse(&format!("{}/api/tts", base_url.trim().trim_end_matches('/')))?;
        let client = Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self { endpoint, client })
    }

    fn request_url(&self, text: &str, voice: &Voice) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("text", text);
            if let Some(speaker) = voice.speaker() {
                query.append_pair("speaker_id", speaker);
            }
        }
        url
    }
}

#[async_trait]
impl SpeechSynthesisService for CoquiServer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &Voice,
        path: &Path,
    ) -> Result<(), SynthesisError> {
        debug!(endpoint = %self.endpoint, path = %path.display(), "requesting coqui tts-server");

        let response = self.client.get(self.request_url(text, voice)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        tokio::fs::write(path, &audio).await?;
        Ok(())
    }

    fn engine_name(&self) -> &'static str {
        "coqui-server"
    }
}
