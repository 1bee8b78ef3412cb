//! Gemini API client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::llms::LlmError;
use crate::text::TextGenerationService;

use super::config::GeminiConfig;
use super::types::{GeminiErrorResponse, GenerateContentRequest, GenerateContentResponse};

const PROVIDER: &str = "gemini";

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct Gemini {
    config: Arc<GeminiConfig>,
    client: Client,
}

impl Gemini {
    /// Create a new Gemini client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Auth`] if the API key is empty, or
    /// [`LlmError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::auth(
                PROVIDER,
                "API key is required (set gemini_api_key in config.json)",
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Get the model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build the `generateContent` URL for the configured model.
    pub(crate) fn generate_url(&self) -> String {
        let model = self
            .config
            .model
            .strip_prefix("models/")
            .unwrap_or(&self.config.model);
        format!("{}/models/{model}:generateContent", self.config.base_url)
    }

    /// Parse an error response from Gemini.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            let error = error_response.error;
            let code = error
                .status
                .or_else(|| error.code.map(|c| c.to_string()))
                .unwrap_or_else(|| status.to_string());

            return match status {
                401 | 403 => LlmError::auth(PROVIDER, error.message),
                429 => LlmError::rate_limited(PROVIDER),
                _ => LlmError::provider_code(PROVIDER, code, error.message),
            };
        }

        LlmError::http_status(status, body.to_owned())
    }
}

#[async_trait]
impl TextGenerationService for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = self.generate_url();
        let body = GenerateContentRequest::user_prompt(prompt);

        debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.text().ok_or_else(|| {
            let got = parsed
                .block_reason()
                .map_or_else(|| "no candidates".to_owned(), |r| format!("blocked ({r})"));
            LlmError::response_format("candidate text", got)
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::{Value, json};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1beta")
    }

    fn client(base_url: &str) -> Gemini {
        Gemini::new(
            GeminiConfig::new("test-key")
                .with_base_url(base_url)
                .with_model("gemini-test"),
        )
        .unwrap()
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = Gemini::new(GeminiConfig::new("")).unwrap_err();
        assert!(matches!(err, LlmError::Auth { .. }));
    }

    #[test]
    fn settings_reach_the_client() {
        let gemini = client("http://127.0.0.1:9/v1beta/");
        assert_eq!(gemini.model(), "gemini-test");
        assert_eq!(gemini.base_url(), "http://127.0.0.1:9/v1beta");
    }

    #[test]
    fn generate_url_strips_models_prefix() {
        let gemini = Gemini::new(GeminiConfig::new("k").with_model("models/gemini-pro")).unwrap();
        assert_eq!(
            gemini.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn parse_error_maps_status() {
        let body = r#"{"error":{"code":403,"message":"denied","status":"PERMISSION_DENIED"}}"#;
        assert!(matches!(Gemini::parse_error(403, body), LlmError::Auth { .. }));
        assert!(matches!(
            Gemini::parse_error(429, body),
            LlmError::RateLimited { .. }
        ));

        let body = r#"{"error":{"code":400,"message":"bad","status":"INVALID_ARGUMENT"}}"#;
        match Gemini::parse_error(400, body) {
            LlmError::Provider { code, message, .. } => {
                assert_eq!(code.as_deref(), Some("INVALID_ARGUMENT"));
                assert_eq!(message, "bad");
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert!(matches!(
            Gemini::parse_error(502, "<html>"),
            LlmError::HttpStatus { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn generate_returns_candidate_text() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|headers: HeaderMap, axum::Json(body): axum::Json<Value>| async move {
                assert_eq!(headers["x-goog-api-key"], "test-key");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt");
                axum::Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "**What if** pigs flew?" }] } }]
                }))
            }),
        );
        let base = serve(router).await;

        let text = client(&base).generate("prompt").await.unwrap();
        assert_eq!(text, "**What if** pigs flew?");
    }

    #[tokio::test]
    async fn generate_surfaces_api_errors() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    axum::Json(json!({
                        "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
                    })),
                )
            }),
        );
        let base = serve(router).await;

        let err = client(&base).generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("API key not valid."));
    }

    #[tokio::test]
    async fn generate_rejects_blocked_prompt() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { axum::Json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })) }),
        );
        let base = serve(router).await;

        let err = client(&base).generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::ResponseFormat { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }
}
