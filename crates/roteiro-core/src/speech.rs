//! Speech capture.
//!
//! A [`SpeechRecognizer`] opens a [`CaptureStream`] of finalized utterances.
//! The stream is a channel fed by a background task; dropping the stream or
//! calling [`CaptureStream::stop`] cancels the task.
//!
//! [`CommandRecognizer`] delegates recognition to an external program that
//! prints one utterance per stdout line and receives the locale as its last
//! argument.

use std::fmt;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::SpeechConfig;
use crate::script::SceneId;

const EVENT_BUFFER: usize = 32;

/// Something that happened on a capture stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A finalized utterance.
    Final(String),
    /// The recognizer finished normally.
    Ended,
    /// The recognizer stopped with an error.
    Failed(String),
}

/// Errors opening a capture stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// No recognizer is available on this host.
    Unavailable,
    /// The recognizer could not be started.
    Start(String),
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::Unavailable => write!(f, "speech recognition is not available"),
            SpeechError::Start(msg) => write!(f, "failed to start speech capture: {msg}"),
        }
    }
}

impl std::error::Error for SpeechError {}

/// Receiving end of a running capture.
#[derive(Debug)]
pub struct CaptureStream {
    events: mpsc::Receiver<CaptureEvent>,
    cancel: CancellationToken,
}

impl CaptureStream {
    pub fn new(events: mpsc::Receiver<CaptureEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Waits for the next event. Returns `None` once the producer is gone.
    pub async fn next(&mut self) -> Option<CaptureEvent> {
        self.events.recv().await
    }

    /// Stops the capture. No further events are produced after this.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Source of capture streams.
pub trait SpeechRecognizer: Send + Sync {
    /// Opens a stream of finalized utterances for `scene_id`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// [`SpeechError::Unavailable`] when the host cannot recognize speech,
    /// [`SpeechError::Start`] when the recognizer fails to launch.
    fn start(&self, scene_id: &SceneId, locale: &str) -> Result<CaptureStream, SpeechError>;
}

/// Recognizer backed by an external program.
#[derive(Debug, Clone, Default)]
pub struct CommandRecognizer {
    command: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.command.clone())
    }

    fn program(&self) -> Option<&str> {
        self.command
            .first()
            .map(String::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn start(&self, scene_id: &SceneId, locale: &str) -> Result<CaptureStream, SpeechError> {
        let program = self.program().ok_or(SpeechError::Unavailable)?;

        let mut child = Command::new(program)
            .args(&self.command[1..])
            .arg(locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Start(format!("'{program}': {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SpeechError::Start("recognizer stdout not captured".to_string()))?;
        let stderr = child.stderr.take().map(|s| tokio::spawn(read_to_string(s)));

        tracing::info!(scene = %scene_id, program, locale, "speech recognizer started");

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        tokio::spawn(pump_utterances(
            child,
            stdout,
            stderr,
            tx,
            cancel.clone(),
        ));

        Ok(CaptureStream::new(rx, cancel))
    }
}

async fn read_to_string(mut reader: impl AsyncRead + Unpin) -> String {
    let mut buf = String::new();
    // Partial output is still useful in an error message.
    let _ = reader.read_to_string(&mut buf).await;
    buf
}

/// Forwards stdout lines as utterances, then reports how the program exited.
async fn pump_utterances(
    mut child: Child,
    stdout: impl AsyncRead + Unpin,
    stderr: Option<tokio::task::JoinHandle<String>>,
    tx: mpsc::Sender<CaptureEvent>,
    cancel: CancellationToken,
) {
    let mut lines = BufReader::new(stdout).lines();

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                let _ = child.kill().await;
                tracing::debug!("speech recognizer stopped");
                return;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    if tx.send(CaptureEvent::Final(text.to_string())).await.is_err() {
                        let _ = child.kill().await;
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = child.kill().await;
                    let _ = tx
                        .send(CaptureEvent::Failed(format!("reading recognizer output: {e}")))
                        .await;
                    return;
                }
            }
        }
    }

    let status = tokio::select! {
        () = cancel.cancelled() => {
            let _ = child.kill().await;
            return;
        }
        status = child.wait() => status,
    };

    let event = match status {
        Ok(status) if status.success() => CaptureEvent::Ended,
        Ok(status) => {
            let stderr = match stderr {
                Some(handle) => handle.await.unwrap_or_default(),
                None => String::new(),
            };
            let stderr = stderr.trim();
            let code = status.code().unwrap_or(-1);
            if stderr.is_empty() {
                CaptureEvent::Failed(format!("recognizer exited with code {code}"))
            } else {
                CaptureEvent::Failed(format!("recognizer exited with code {code}: {stderr}"))
            }
        }
        Err(e) => CaptureEvent::Failed(format!("waiting for recognizer: {e}")),
    };
    let _ = tx.send(event).await;
}
