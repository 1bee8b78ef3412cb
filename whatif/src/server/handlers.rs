//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ApiError;
use super::{AppState, OUTPUT_ROUTE};
use crate::error::Error;

const INDEX_HTML: &str = include_str!("index.html");

/// Body of a successful `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Cleaned narration text.
    pub text: String,
    /// Download path of the audio file, e.g. `/output/audio_20240101_120000.wav`.
    pub file_path: String,
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `POST /generate`
///
/// The run happens in its own task, so a client that disconnects does not
/// cancel synthesis half way.
///
/// # Errors
///
/// Returns [`ApiError`] for any failure of the run.
pub async fn generate(State(state): State<AppState>) -> Result<Json<GenerateResponse>, ApiError> {
    debug!(config = %state.config_path().display(), "generate requested");
    let narration = tokio::spawn(async move { state.run().await })
        .await
        .map_err(|e| Error::task(e.to_string()))??;

    let file_path = format!("{OUTPUT_ROUTE}/{}", narration.file_name());
    info!(%file_path, chars = narration.text.len(), "narration ready");

    Ok(Json(GenerateResponse {
        text: narration.text,
        file_path,
    }))
}
