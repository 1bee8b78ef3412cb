//! Speech synthesis backends.
//!
//! - [`CoquiCli`] runs the Coqui `tts` program locally on CPU.
//! - [`CoquiServer`] calls a running Coqui `tts-server`.
//!
//! [`from_config`] picks one: the server when `tts_server_url` is set,
//! otherwise the local program.

mod coqui_cli;
mod coqui_server;

use std::sync::Arc;

pub use coqui_cli::CoquiCli;
pub use coqui_server::CoquiServer;

use crate::audio::{SharedSpeechService, SynthesisError};
use crate::config::Configuration;

/// Build the synthesis backend described by `config`.
///
/// # Errors
///
/// Returns [`SynthesisError`] if the server client cannot be created.
pub fn from_config(config: &Configuration) -> Result<SharedSpeechService, SynthesisError> {
    match config.tts_server_url.as_deref() {
        Some(url) if !url.trim().is_empty() => Ok(Arc::new(CoquiServer::new(url)?)),
        _ => Ok(Arc::new(CoquiCli::new(
            config.tts_command(),
            config.tts_model.clone(),
        ))),
    }
}
