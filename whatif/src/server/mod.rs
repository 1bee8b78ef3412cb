//! HTTP application.
//!
//! | Route               | Behaviour                                   |
//! |---------------------|---------------------------------------------|
//! | `GET /`             | Index page                                  |
//! | `POST /generate`    | Run the pipeline, `{"text", "file_path"}`   |
//! | `GET /output/<f>`   | Download a generated audio file             |

mod error;
mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use handlers::GenerateResponse;

use crate::config::load_config;
use crate::content_generator::ContentGenerator;
use crate::error::Result;
use crate::pipeline::{Backends, LiveBackends, Narration, run_pipeline};
use crate::prompts::random_seed;

/// URL prefix under which the output directory is served.
pub const OUTPUT_ROUTE: &str = "/output";

/// Shared handler state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    config_path: PathBuf,
    backends: Arc<dyn Backends>,
    retry_delay: Duration,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config_path", &self.config_path)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State reading `config_path` on every request and using Gemini and Coqui.
    #[must_use]
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self::with_backends(config_path, Arc::new(LiveBackends))
    }

    /// State using custom backends.
    #[must_use]
    pub fn with_backends(config_path: impl Into<PathBuf>, backends: Arc<dyn Backends>) -> Self {
        Self {
            config_path: config_path.into(),
            backends,
            retry_delay: ContentGenerator::DEFAULT_RETRY_DELAY,
        }
    }

    /// Override the delay between text generation attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// One request's worth of work: fresh config, fresh seed, full pipeline.
    async fn run(self) -> Result<Narration> {
        let config = load_config(&self.config_path).await?;
        run_pipeline(
            &config,
            self.backends.as_ref(),
            random_seed(),
            self.retry_delay,
        )
        .await
    }
}

/// Build the application router.
///
/// `output_dir` is fixed here; requests that change `output_dir` in the config
/// file write elsewhere but downloads are still served from this directory.
pub fn router(state: AppState, output_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/generate", post(handlers::generate))
        .nest_service(OUTPUT_ROUTE, ServeDir::new(output_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
