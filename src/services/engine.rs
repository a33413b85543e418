// Conversion engine backend
//
// The conversion pipeline runs out of process. The engine binary is spawned
// per job and streams newline-delimited JSON messages on stdout: log lines,
// progress counters, and finally the structured result. This module owns the
// subprocess lifecycle and turns the stream into typed [`EngineEvent`]s.

use crate::models::{ConversionOutcome, LogEntry, Progress};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Event streamed by the engine while a job runs.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Log(LogEntry),
    Progress(Progress),
}

/// Errors that can occur while running the engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input path: {0}")]
    InvalidPath(String),

    #[error("Engine executable not found: {0}")]
    NotAvailable(Utf8PathBuf),

    #[error("Conversion job failed: {0}")]
    Job(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Process error: {0}")]
    Process(#[from] std::io::Error),

    #[error("Malformed engine message: {0}")]
    Protocol(String),
}

/// Backend capability the shell drives a conversion through.
///
/// Kept as a trait so integration tests can run the shell against an in-memory
/// fake instead of a real subprocess.
pub trait ConversionBackend: Send + Sync {
    /// Whether the backend can currently accept jobs.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Validate and canonicalize a raw user-supplied path.
    fn normalize_path(
        &self,
        raw: &str,
    ) -> impl Future<Output = Result<Utf8PathBuf, EngineError>> + Send;

    /// Run one conversion job to completion.
    fn start_job(
        &self,
        input: &Utf8Path,
    ) -> impl Future<Output = Result<ConversionOutcome, EngineError>> + Send;

    /// Register a stream of events emitted during jobs. Every receiver gets
    /// every event; senders for dropped receivers are pruned lazily.
    fn subscribe_events(&self) -> mpsc::UnboundedReceiver<EngineEvent>;

    /// Reveal a path in the platform file manager.
    fn reveal_path(&self, path: &Utf8Path) -> Result<(), EngineError>;
}

/// One message on the engine's stdout stream.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EngineMessage {
    Log {
        #[serde(flatten)]
        entry: LogEntry,
    },
    Progress {
        #[serde(flatten)]
        progress: Progress,
    },
    Result {
        #[serde(flatten)]
        outcome: ConversionOutcome,
    },
}

/// Subprocess-backed engine client.
pub struct EngineClient {
    executable: Utf8PathBuf,
    job_timeout: Duration,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<EngineEvent>>>,
}

impl EngineClient {
    pub fn new(executable: Utf8PathBuf, job_timeout: Duration) -> Self {
        Self {
            executable,
            job_timeout,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Fan an event out to all live subscribers, dropping closed ones.
    fn emit(&self, event: EngineEvent) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    fn handle_line(&self, line: &str) -> Option<ConversionOutcome> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        match serde_json::from_str::<EngineMessage>(trimmed) {
            Ok(EngineMessage::Log { entry }) => {
                self.emit(EngineEvent::Log(entry));
                None
            }
            Ok(EngineMessage::Progress { progress }) => {
                self.emit(EngineEvent::Progress(progress));
                None
            }
            Ok(EngineMessage::Result { outcome }) => Some(outcome),
            Err(e) => {
                tracing::warn!("Skipping malformed engine message: {} ({})", trimmed, e);
                None
            }
        }
    }

    async fn run_job(&self, input: &Utf8Path) -> Result<ConversionOutcome, EngineError> {
        tracing::info!("Executing: {} --input {}", self.executable, input);
        let start = Instant::now();

        let mut child = Command::new(self.executable.as_std_path())
            .arg("--input")
            .arg(input.as_str())
            .arg("--events")
            .arg("ndjson")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("Engine stdout not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Protocol("Engine stderr not captured".to_string()))?;

        // Drain stderr concurrently; a chatty engine must not fill the pipe
        // and stall the stdout loop.
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut captured = Vec::new();
            while let Ok(Some(line)) = lines.next_line().await {
                captured.push(line);
            }
            captured
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut outcome = None;
        while let Some(line) = lines.next_line().await? {
            if let Some(result) = self.handle_line(&line) {
                outcome = Some(result);
            }
        }

        let status = child.wait().await?;
        let stderr_lines = stderr_task.await.unwrap_or_default();
        let duration = start.elapsed();
        let exit_code = status.code().unwrap_or(-1);

        tracing::info!(
            "Engine process completed in {:.2}s with exit code {}",
            duration.as_secs_f32(),
            exit_code
        );

        if !status.success() {
            let detail = stderr_lines
                .last()
                .map(String::as_str)
                .unwrap_or("no error output");
            return Err(EngineError::Job(format!(
                "exit code {}: {}",
                exit_code, detail
            )));
        }

        outcome.ok_or_else(|| {
            EngineError::Protocol("Engine exited without emitting a result".to_string())
        })
    }
}

impl ConversionBackend for EngineClient {
    async fn is_available(&self) -> bool {
        self.executable.as_std_path().exists()
    }

    async fn normalize_path(&self, raw: &str) -> Result<Utf8PathBuf, EngineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidPath("empty path".to_string()));
        }

        let canonical = tokio::fs::canonicalize(trimmed)
            .await
            .map_err(|e| EngineError::InvalidPath(format!("{}: {}", trimmed, e)))?;

        Utf8PathBuf::from_path_buf(canonical)
            .map_err(|p| EngineError::InvalidPath(format!("non-UTF-8 path: {}", p.display())))
    }

    async fn start_job(&self, input: &Utf8Path) -> Result<ConversionOutcome, EngineError> {
        if !self.is_available().await {
            return Err(EngineError::NotAvailable(self.executable.clone()));
        }

        timeout(self.job_timeout, self.run_job(input))
            .await
            .map_err(|_| {
                tracing::warn!("Engine process timed out after {:?}", self.job_timeout);
                EngineError::Timeout(self.job_timeout)
            })?
    }

    fn subscribe_events(&self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    fn reveal_path(&self, path: &Utf8Path) -> Result<(), EngineError> {
        let opener = if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };

        std::process::Command::new(opener)
            .arg(path.as_str())
            .spawn()?;
        Ok(())
    }
}
