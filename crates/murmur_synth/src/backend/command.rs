//! A backend that runs an external synthesis program.
//!
//! The program receives the canonical options as a JSON object on stdin and
//! must write the audio bytes to stdout. A non-zero exit status is a backend
//! failure whose message is the program's stderr; well-known `sysexits.h`
//! codes select the error kind.

use std::collections::BTreeMap;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

use murmur_common::CanonicalOptions;
use murmur_config::ConfigError;
use tracing::debug;

use super::{BackendError, BackendErrorKind, SpeechBackend, SynthesizedAudio};

/// Speech backend driven by an external command.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: PathBuf,
    args: Vec<String>,
    content_type: Option<String>,
}

impl CommandBackend {
    /// Creates a backend that runs `program` with `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            content_type: None,
        }
    }

    /// Declares the content type of the program's output instead of deriving
    /// it from the `OutputFormat` option.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Builds the backend from a service's client options.
    ///
    /// Recognized keys: `program` (required string), `args` (array of
    /// strings) and `content_type` (string). Other keys are ignored.
    pub fn from_client_options(
        options: &BTreeMap<String, toml::Value>,
    ) -> Result<Self, ConfigError> {
        let program = match options.get("program") {
            Some(toml::Value::String(p)) if !p.is_empty() => p.clone(),
            Some(toml::Value::String(_)) | None => {
                return Err(ConfigError::MissingField(
                    "client_options.program".to_string(),
                ))
            }
            Some(_) => {
                return Err(ConfigError::ValidationError(
                    "client_options.program must be a string".to_string(),
                ))
            }
        };

        let args = match options.get("args") {
            None => Vec::new(),
            Some(toml::Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ConfigError::ValidationError(
                            "client_options.args must be an array of strings".to_string(),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(ConfigError::ValidationError(
                    "client_options.args must be an array of strings".to_string(),
                ))
            }
        };

        let mut backend = Self::new(program, args);
        match options.get("content_type") {
            None => {}
            Some(toml::Value::String(ct)) => backend = backend.with_content_type(ct.clone()),
            Some(_) => {
                return Err(ConfigError::ValidationError(
                    "client_options.content_type must be a string".to_string(),
                ))
            }
        }
        Ok(backend)
    }
}

impl SpeechBackend for CommandBackend {
    fn name(&self) -> &str {
        "command"
    }

    fn synthesize(
        &self,
        _text: &str,
        options: &CanonicalOptions,
    ) -> Result<SynthesizedAudio, BackendError> {
        let payload = serde_json::to_vec(options).map_err(|e| {
            BackendError::new(BackendErrorKind::InvalidParameter, e.to_string())
        })?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!(command = ?cmd, "running synthesis command");
        let mut child = cmd.spawn().map_err(|e| {
            BackendError::transport(format!(
                "failed to start {}: {e}",
                self.program.display()
            ))
        })?;
        // Stdin is fed from its own thread while stdout and stderr are
        // drained here; a program that streams output before reading all of
        // its input would otherwise block both pipes.
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|scope| {
            let writer = stdin.map(|stdin| scope.spawn(move || write_payload(stdin, &payload)));
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, written)
        });
        let output = output.map_err(|e| BackendError::transport(e.to_string()))?;
        written.map_err(|e| BackendError::transport(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.program.display(), output.status)
            } else {
                stderr
            };
            return Err(BackendError::new(classify_exit(output.status.code()), message));
        }

        let content_type = self
            .content_type
            .clone()
            .unwrap_or_else(|| content_type_for(options.get("OutputFormat")).to_string());
        Ok(SynthesizedAudio {
            audio: output.stdout,
            content_type,
        })
    }
}

/// Writes the request to the program's stdin and closes it.
///
/// A program that exits without reading its input is judged by its exit
/// status, so a broken pipe is not an error here.
fn write_payload(mut stdin: ChildStdin, payload: &[u8]) -> io::Result<()> {
    match stdin.write_all(payload) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Maps `sysexits.h` exit codes onto error kinds.
fn classify_exit(code: Option<i32>) -> BackendErrorKind {
    match code {
        Some(64) | Some(65) => BackendErrorKind::InvalidParameter,
        Some(69) => BackendErrorKind::Transport,
        Some(75) => BackendErrorKind::Quota,
        Some(77) => BackendErrorKind::Auth,
        _ => BackendErrorKind::Rejected,
    }
}

/// Content type for an `OutputFormat` value.
pub fn content_type_for(output_format: Option<&str>) -> &'static str {
    match output_format {
        Some("mp3") => "audio/mpeg",
        Some("ogg_vorbis") => "audio/ogg",
        Some("pcm") => "audio/pcm",
        Some("json") => "application/x-json-stream",
        _ => "application/octet-stream",
    }
}
