//! Coqui TTS command-line backend.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::audio::{SpeechSynthesisService, SynthesisError, Voice};

/// Bytes of stderr kept in [`SynthesisError::Exit`].
const STDERR_TAIL: usize = 2048;

/// Runs `tts --text .. --model_name .. --out_path .. --device cpu`.
///
/// The model is loaded by the child process on every call; nothing is cached
/// between requests.
#[derive(Debug, Clone)]
pub struct CoquiCli {
    program: String,
    model: String,
}

impl CoquiCli {
    /// Execution device passed to Coqui.
    pub const DEVICE: &'static str = "cpu";

    /// Create a backend running `program` with `model`.
    #[must_use]
    pub fn new(program: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
        }
    }

    fn command(&self, text: &str, voice: &Voice, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--text")
            .arg(text)
            .arg("--model_name")
            .arg(&self.model)
            .arg("--out_path")
            .arg(path)
            .arg("--device")
            .arg(Self::DEVICE);
        if let Some(speaker) = voice.speaker() {
            cmd.arg("--speaker_idx").arg(speaker);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl SpeechSynthesisService for CoquiCli {
    async fn synthesize(
        &self,
        text: &str,
        voice: &Voice,
        path: &Path,
    ) -> Result<(), SynthesisError> {
        debug!(program = %self.program, model = %self.model, path = %path.display(), "running coqui tts");

        let output = self
            .command(text, voice, path)
            .output()
            .await
            .map_err(|source| SynthesisError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SynthesisError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        Ok(())
    }

    fn engine_name(&self) -> &'static str {
        "coqui-cli"
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let start = text.len().saturating_sub(STDERR_TAIL);
    let start = (start..text.len())
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(text.len());
    text[start..].to_owned()
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use super::*;
    use assert_fs::TempDir;

    /// Writes an executable shell script standing in for `tts`.
    fn fake_tts(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-tts");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    const RECORDING_SCRIPT: &str = r#"
printf '%s\n' "$@" > "$(dirname "$0")/args.txt"
while [ $# -gt 0 ]; do
  if [ "$1" = "--out_path" ]; then out="$2"; fi
  shift
done
printf 'RIFF' > "$out"
"#;

    #[tokio::test]
    async fn passes_model_speaker_and_device() {
        let dir = TempDir::new().unwrap();
        let program = fake_tts(&dir, RECORDING_SCRIPT);
        let out = dir.path().join("audio.wav");

        let backend = CoquiCli::new(program.to_string_lossy(), "tts_models/en/vctk/vits");
        backend
            .synthesize("Hello there.", &Voice::new("p230"), &out)
            .await
            .unwrap();

        assert!(out.exists());
        let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        let args: Vec<&str> = args.lines().collect();
        assert_eq!(
            args,
            [
                "--text",
                "Hello there.",
                "--model_name",
                "tts_models/en/vctk/vits",
                "--out_path",
                out.to_str().unwrap(),
                "--device",
                "cpu",
                "--speaker_idx",
                "p230",
            ]
        );
    }

    #[tokio::test]
    async fn omits_speaker_when_empty() {
        let dir = TempDir::new().unwrap();
        let program = fake_tts(&dir, RECORDING_SCRIPT);
        let out = dir.path().join("audio.wav");

        CoquiCli::new(program.to_string_lossy(), "tts_models/en/ljspeech/vits")
            .synthesize("Hi.", &Voice::default(), &out)
            .await
            .unwrap();

        let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert!(!args.contains("--speaker_idx"));
    }

    #[tokio::test]
    async fn non_zero_exit_reports_stderr() {
        let dir = TempDir::new().unwrap();
        let program = fake_tts(&dir, "echo 'speaker p999 not found' >&2\nexit 3");
        let out = dir.path().join("audio.wav");

        let err = CoquiCli::new(program.to_string_lossy(), "m")
            .synthesize("Hi.", &Voice::new("p999"), &out)
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::Exit { .. }));
        assert!(err.to_string().contains("speaker p999 not found"));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let dir = TempDir::new().unwrap();
        let err = CoquiCli::new("/nonexistent/coqui-tts", "m")
            .synthesize("Hi.", &Voice::default(), &dir.path().join("a.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Spawn { .. }));
    }

    #[test]
    fn stderr_tail_keeps_the_end() {
        let long = "x".repeat(STDERR_TAIL + 10) + "END";
        let tail = stderr_tail(long.as_bytes());
        assert_eq!(tail.len(), STDERR_TAIL);
        assert!(tail.ends_with("END"));
        assert_eq!(stderr_tail(b"  short \n"), "short");
    }
}
