use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use std::borrow::Cow;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader, Lines, Stdin,
};
use tokio::process::Command;

/// Upper bound on recognizer output kept in memory, per stream. Anything
/// beyond is not a spoken phrase and is discarded unread.
const MAX_TRANSCRIPT_BYTES: u64 = 64 * 1024;

/// How long an external recognizer may listen before it is abandoned.
const RECOGNIZER_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No speech recognizer available: {0}")]
    Unavailable(String),

    #[error("Recognizer returned no speech")]
    Empty,

    // Input source is exhausted; the shell should stop triggering
    #[error("Speech input closed")]
    Closed,

    #[error("Recognizer I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Recognizer timed out after {0} seconds")]
    Timeout(u64),
}

#[async_trait]
pub trait SpeechCapture: Send {
    /// Captures one utterance. On success the text is trimmed and non-empty.
    async fn capture(&mut self) -> Result<String, CaptureError>;
}

/// Typed input standing in for a microphone: one line is one utterance.
pub struct ConsoleCapture<R> {
    lines: Lines<R>,
}

impl ConsoleCapture<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleCapture<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechCapture for ConsoleCapture<R> {
    async fn capture(&mut self) -> Result<String, CaptureError> {
        match self.lines.next_line().await? {
            None => Err(CaptureError::Closed),
            Some(line) => first_alternative(&line).ok_or(CaptureError::Empty),
        }
    }
}

/// Runs an external recognizer (e.g. a script that records and transcribes)
/// once per trigger and reads the transcription from its standard output.
/// When the recognizer prints several alternatives, one per line, the first
/// non-blank one wins.
#[derive(Debug, Clone)]
pub struct RecognizerCommand {
    program: String,
    args: Vec<String>,
}

impl RecognizerCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a command line on whitespace. No shell quoting is interpreted.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

#[async_trait]
impl SpeechCapture for RecognizerCommand {
    async fn capture(&mut self) -> Result<String, CaptureError> {
        log::debug!("[Speech] Starting recognizer: {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    CaptureError::Unavailable(format!("{}: {}", self.program, e))
                }
                _ => CaptureError::Io(e),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let collect = async {
            let (stdout, stderr) = tokio::try_join!(read_capped(stdout), read_capped(stderr))?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout, stderr))
        };
        let (status, stdout, stderr) = tokio::time::timeout(RECOGNIZER_TIMEOUT, collect)
            .await
            .map_err(|_| CaptureError::Timeout(RECOGNIZER_TIMEOUT.as_secs()))??;

        if !status.success() {
            let stderr = decode_capped(&stderr);
            log::error!("[Speech] Recognizer failed ({}): {}", status, stderr.trim());
            return Err(CaptureError::Unavailable(format!(
                "recognizer exited with {}",
                status
            )));
        }

        first_alternative(&decode_capped(&stdout)).ok_or(CaptureError::Empty)
    }
}

/// Keeps the first `MAX_TRANSCRIPT_BYTES` of a stream and drains the rest so
/// the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut kept = Vec::new();
    if let Some(mut reader) = reader {
        (&mut reader)
            .take(MAX_TRANSCRIPT_BYTES)
            .read_to_end(&mut kept)
            .await?;
        let discarded = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
        if discarded > 0 {
            log::warn!("[Speech] Discarded {} bytes of recognizer output", discarded);
        }
    }
    Ok(kept)
}

/// Decodes capped output. A character cut in half by the cap is dropped
/// rather than replaced.
fn decode_capped(bytes: &[u8]) -> Cow<'_, str> {
    let end = match std::str::from_utf8(bytes) {
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        _ => bytes.len(),
    };
    String::from_utf8_lossy(&bytes[..end])
}

fn first_alternative(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
