//! Integration tests for the Shell conversion workflow
//!
//! These tests drive the shell against an in-memory backend and verify:
//! - The full success path: status summary, stored result, processing flag
//! - The guarantee that is_processing resets on every exit path
//! - Input guards (no selection, job already running, invalid path)
//! - Drop/dialog handling effects on state
//! - Engine event pumping into the store

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskdeck::models::{ConversionOutcome, FileRecord};
use taskdeck::services::engine::{ConversionBackend, EngineError, EngineEvent};
use taskdeck::services::{DialogSelection, DropItem, DropPayload, ItemKind};
use taskdeck::{LogEntry, LogLevel, Progress, Shell, StateStore};
use tokio::sync::mpsc;

/// Scriptable in-memory backend.
struct FakeBackend {
    available: bool,
    fail_with: Option<String>,
    events: Vec<EngineEvent>,
    outcome: ConversionOutcome,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<EngineEvent>>>,
    jobs_started: AtomicUsize,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            available: true,
            fail_with: None,
            events: Vec::new(),
            outcome: outcome_with(7, 10),
            subscribers: Mutex::new(Vec::new()),
            jobs_started: AtomicUsize::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        let mut backend = Self::new();
        backend.fail_with = Some(message.to_string());
        backend
    }

    fn jobs_started(&self) -> usize {
        self.jobs_started.load(Ordering::SeqCst)
    }
}

impl ConversionBackend for FakeBackend {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn normalize_path(&self, raw: &str) -> Result<Utf8PathBuf, EngineError> {
        if raw.contains("bad") {
            Err(EngineError::InvalidPath(raw.to_string()))
        } else {
            Ok(Utf8PathBuf::from(raw))
        }
    }

    async fn start_job(&self, _input: &Utf8Path) -> Result<ConversionOutcome, EngineError> {
        self.jobs_started.fetch_add(1, Ordering::SeqCst);
        {
            let subscribers = self.subscribers.lock().unwrap();
            for event in &self.events {
                for tx in subscribers.iter() {
                    let _ = tx.send(event.clone());
                }
            }
        }
        match &self.fail_with {
            Some(message) => Err(EngineError::Job(message.clone())),
            None => Ok(self.outcome.clone()),
        }
    }

    fn subscribe_events(&self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    fn reveal_path(&self, _path: &Utf8Path) -> Result<(), EngineError> {
        Ok(())
    }
}

fn outcome_with(processed: usize, total: usize) -> ConversionOutcome {
    let entries = (0..total)
        .map(|i| {
            let mut record = FileRecord::new(
                format!("file{}.txt", i),
                format!("sub/file{}.txt", i),
                "txt".to_string(),
                1024,
                String::new(),
                String::new(),
            );
            record.processed = i < processed;
            if !record.processed {
                record.skip_reason = Some("unsupported type".to_string());
            }
            record
        })
        .collect();

    ConversionOutcome {
        entries,
        staging_path: "/tmp/staging".to_string(),
        output_path: "/tmp/out".to_string(),
        report_path: "/tmp/report.csv".to_string(),
    }
}

fn shell_with(backend: FakeBackend) -> (Arc<StateStore>, Shell<FakeBackend>, Arc<FakeBackend>) {
    let store = Arc::new(StateStore::new());
    let backend = Arc::new(backend);
    let shell = Shell::new(Arc::clone(&store), Arc::clone(&backend));
    (store, shell, backend)
}

fn has_log(store: &StateStore, level: LogLevel, fragment: &str) -> bool {
    store.read(|s| {
        s.logs
            .iter()
            .any(|e| e.level == level && e.message.contains(fragment))
    })
}

#[tokio::test]
async fn test_successful_conversion_updates_status_and_result() {
    let (store, shell, _backend) = shell_with(FakeBackend::new());
    store.set_selected_path(Some(Utf8PathBuf::from("/input.zip")));

    shell.run_conversion().await;

    let state = store.snapshot();
    assert!(!state.is_processing);
    assert_eq!(state.status_message, "7 of 10 files processed");
    assert_eq!(state.result.unwrap().processed_count(), 7);
}

#[tokio::test]
async fn test_failed_job_resets_processing_and_logs_error() {
    let (store, shell, _backend) = shell_with(FakeBackend::failing("engine crashed"));
    store.set_selected_path(Some(Utf8PathBuf::from("/input.zip")));

    shell.run_conversion().await;

    let state = store.snapshot();
    assert!(!state.is_processing);
    assert_eq!(state.status_message, "Conversion failed");
    assert!(state.result.is_none());
    assert!(has_log(&store, LogLevel::Error, "engine crashed"));
}

#[tokio::test]
async fn test_invalid_path_skips_job_and_resets_processing() {
    let (store, shell, backend) = shell_with(FakeBackend::new());
    store.set_selected_path(Some(Utf8PathBuf::from("/bad/input.zip")));

    shell.run_conversion().await;

    let state = store.snapshot();
    assert!(!state.is_processing);
    assert_eq!(state.status_message, "Invalid input path");
    assert!(has_log(&store, LogLevel::Warning, "Input rejected"));
    assert_eq!(backend.jobs_started(), 0);
}

#[tokio::test]
async fn test_conversion_without_selection_is_a_noop() {
    let (store, shell, backend) = shell_with(FakeBackend::new());

    shell.run_conversion().await;

    let state = store.snapshot();
    assert!(!state.is_processing);
    assert!(state.status_message.is_empty());
    assert_eq!(backend.jobs_started(), 0);
}

#[tokio::test]
async fn test_conversion_blocked_while_job_running() {
    let (store, shell, backend) = shell_with(FakeBackend::new());
    store.set_selected_path(Some(Utf8PathBuf::from("/input.zip")));
    store.set_processing(true);

    shell.run_conversion().await;

    assert_eq!(backend.jobs_started(), 0);
    // The guard leaves the running job's flag alone.
    assert!(store.read(|s| s.is_processing));
}

#[tokio::test]
async fn test_previous_result_cleared_at_job_start() {
    let (store, shell, _backend) = shell_with(FakeBackend::failing("second run fails"));
    store.set_result(Some(outcome_with(1, 1)));
    store.set_selected_path(Some(Utf8PathBuf::from("/input.zip")));

    shell.run_conversion().await;

    // The stale result from the earlier job must not survive a failed run.
    assert!(store.read(|s| s.result.is_none()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_engine_events_are_pumped_into_the_store() {
    let mut backend = FakeBackend::new();
    backend.events = vec![
        EngineEvent::Log(LogEntry::info("engine says hi")),
        EngineEvent::Progress(Progress::new(5, 10, "Converting files")),
    ];
    let (store, shell, _backend) = shell_with(backend);
    store.set_selected_path(Some(Utf8PathBuf::from("/input.zip")));

    let _pump = shell.pump_events();
    shell.run_conversion().await;

    // Give the pump task a beat to drain the channel.
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(has_log(&store, LogLevel::Info, "engine says hi"));
    assert_eq!(
        store.read(|s| s.progress.clone()),
        Progress::new(5, 10, "Converting files")
    );
}

#[tokio::test]
async fn test_drop_failure_logs_error_and_keeps_selection() {
    let (store, shell, _backend) = shell_with(FakeBackend::new());
    store.set_selected_path(Some(Utf8PathBuf::from("/existing.zip")));

    // Item list with a file item that exposes no path: nothing resolvable.
    let payload = DropPayload {
        items: vec![DropItem {
            kind: ItemKind::File,
            full_path: None,
        }],
        ..Default::default()
    };
    shell.handle_drop(&payload);

    assert!(has_log(&store, LogLevel::Error, "no usable file path"));
    assert_eq!(
        store.read(|s| s.selected_path.clone()),
        Some(Utf8PathBuf::from("/existing.zip"))
    );
}

#[tokio::test]
async fn test_drop_success_updates_selection() {
    let (store, shell, _backend) = shell_with(FakeBackend::new());

    let payload = DropPayload {
        native_paths: vec!["/dropped/input.zip".to_string()],
        ..Default::default()
    };
    shell.handle_drop(&payload);

    assert_eq!(
        store.read(|s| s.selected_path.clone()),
        Some(Utf8PathBuf::from("/dropped/input.zip"))
    );
    assert!(has_log(&store, LogLevel::Info, "Input selected"));
}

#[tokio::test]
async fn test_cancelled_dialog_changes_nothing() {
    let (store, shell, _backend) = shell_with(FakeBackend::new());

    shell.handle_dialog(DialogSelection::Cancelled);

    let state = store.snapshot();
    assert!(state.selected_path.is_none());
    assert!(state.logs.is_empty());
}
