//! Configuration management.
//!
//! Settings live in a JSON file (`config.json` by default). Loading a path that
//! does not exist writes the defaults there first, creating parent directories
//! as needed, so the first run leaves an editable file behind.
//!
//! Field contents are not validated. A bad API key or model id surfaces later
//! as an error from the external service.

mod schema;

pub use schema::Configuration;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

/// Default config file path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("config I/O error ({path}): {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// JSON parsing error.
    #[error("config parse error ({path}): {source}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// JSON serialization error.
    #[error("config serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load configuration from `path`, writing defaults there if it is missing.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed, or if the
/// defaults cannot be written.
pub async fn load_config(path: impl AsRef<Path>) -> ConfigResult<Configuration> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path)
        .await
        .map_err(|e| ConfigError::io(path, e))?
    {
        let config = Configuration::default();
        save_config(&config, path).await?;
        info!(path = %path.display(), "created default config file");
        return Ok(config);
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::io(path, e))?;
    let config: Configuration = serde_json::from_str(&content).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Save configuration to `path` as JSON indented by four spaces.
///
/// # Errors
///
/// Returns [`ConfigError`] if the parent directory or the file cannot be
/// written.
pub async fn save_config(config: &Configuration, path: impl AsRef<Path>) -> ConfigResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::io(parent, e))?;
    }

    let content = to_pretty_json(config)?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ConfigError::io(path, e))?;
    debug!(path = %path.display(), "saved config file");

    Ok(())
}

fn to_pretty_json(config: &Configuration) -> ConfigResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser).map_err(ConfigError::Serialize)?;
    buf.push(b'\n');
    Ok(buf)
}
