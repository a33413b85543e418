// Shell - top-level coordinator for the conversion task view
//
// The shell owns the state store and the backend and wires them to the views:
// - drop/dialog input -> InputResolver -> selected path
// - Convert action -> backend job with a guaranteed is_processing reset
// - engine event stream -> state store (log + progress)
// - state notifications -> LogView / ProgressView updates
//
// It holds no widget handles itself; views attach through the store's
// subscription mechanism and re-read state when notified.

use crate::metrics::Metrics;
use crate::models::LogLevel;
use crate::services::engine::{ConversionBackend, EngineEvent};
use crate::services::input::{DialogSelection, DropPayload, InputError, InputResolver};
use crate::state::{StateStore, SubscriptionId};
use crate::view::{LogView, ProgressView, RenderSurface};
use camino::Utf8Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Coordinates input handling, job execution and view updates.
pub struct Shell<B: ConversionBackend> {
    store: Arc<StateStore>,
    backend: Arc<B>,
    metrics: Option<Arc<Metrics>>,
}

impl<B: ConversionBackend + 'static> Shell<B> {
    pub fn new(store: Arc<StateStore>, backend: Arc<B>) -> Self {
        Self {
            store,
            backend,
            metrics: None,
        }
    }

    pub fn with_metrics(store: Arc<StateStore>, backend: Arc<B>, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            backend,
            metrics: Some(metrics),
        }
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Subscribe a log view to state changes. The view renders the current
    /// state immediately so it never shows a stale surface.
    pub fn attach_log_view<S>(&self, view: LogView<S>) -> SubscriptionId
    where
        S: RenderSurface + Send + 'static,
    {
        let view = Arc::new(Mutex::new(view));
        {
            let state = self.store.snapshot();
            if let Ok(mut view) = view.lock() {
                view.update(&state.logs, state.level_filter);
            }
        }
        self.store.subscribe(move |state| {
            if let Ok(mut view) = view.lock() {
                view.update(&state.logs, state.level_filter);
            }
        })
    }

    /// Subscribe a progress view to state changes.
    pub fn attach_progress_view<S>(&self, view: ProgressView<S>) -> SubscriptionId
    where
        S: RenderSurface + Send + 'static,
    {
        let view = Arc::new(Mutex::new(view));
        {
            let state = self.store.snapshot();
            if let Ok(mut view) = view.lock() {
                view.update(&state.progress, state.is_processing);
            }
        }
        self.store.subscribe(move |state| {
            if let Ok(mut view) = view.lock() {
                view.update(&state.progress, state.is_processing);
            }
        })
    }

    /// Forward engine events into the state store for as long as the backend
    /// keeps the channel open.
    pub fn pump_events(&self) -> tokio::task::JoinHandle<()> {
        let mut events = self.backend.subscribe_events();
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    EngineEvent::Log(entry) => store.add_log_entry(entry),
                    EngineEvent::Progress(progress) => store.update_progress(progress),
                }
            }
            tracing::debug!("Engine event stream closed");
        })
    }

    /// Handle a drag-and-drop payload. On success the selected path changes;
    /// on failure only an error entry is logged and the selection is kept.
    pub fn handle_drop(&self, payload: &DropPayload) {
        let resolution = InputResolver::resolve_drop(payload);
        for (level, note) in &resolution.notes {
            self.store.log(*level, note.clone());
        }

        match resolution.outcome {
            Ok(path) => {
                tracing::info!("Drop resolved to {}", path);
                self.store.set_selected_path(Some(path));
            }
            Err(InputError::NoUsablePath) => {
                self.store
                    .log(LogLevel::Error, "Drop contained no usable file path");
            }
        }
    }

    /// Handle a file-dialog result. A cancelled or empty selection changes
    /// nothing.
    pub fn handle_dialog(&self, selection: DialogSelection) {
        if let Some(path) = InputResolver::resolve_dialog(selection) {
            self.store.log(LogLevel::Info, format!("Input selected: {}", path));
            self.store.set_selected_path(Some(path));
        }
    }

    /// Run one conversion job for the currently selected path.
    ///
    /// Every exit path, success or failure, leaves `is_processing == false`.
    pub async fn run_conversion(&self) {
        let selected = self.store.read(|s| {
            if s.can_start_job() {
                s.selected_path.clone()
            } else {
                None
            }
        });

        let Some(input) = selected else {
            tracing::debug!("Convert request ignored: no selection or job already running");
            return;
        };

        self.store.set_result(None);
        self.store.set_processing(true);
        self.store.set_status_message("Validating input...");
        let start = Instant::now();

        let input = match self.backend.normalize_path(input.as_str()).await {
            Ok(path) => path,
            Err(e) => {
                self.store
                    .log(LogLevel::Warning, format!("Input rejected: {}", e));
                self.store.set_status_message("Invalid input path");
                self.store.set_processing(false);
                return;
            }
        };

        self.store
            .log(LogLevel::Info, format!("Starting conversion of {}", input));
        self.store.set_status_message("Processing...");

        let result = self.backend.start_job(&input).await;
        let duration = start.elapsed();

        match result {
            Ok(outcome) => {
                self.store.set_status_message(outcome.summary());
                self.store
                    .log(LogLevel::Info, format!("Conversion finished: {}", outcome.summary()));
                self.store.set_result(Some(outcome));
                if let Some(metrics) = &self.metrics {
                    metrics.record_job_completed(duration);
                }
            }
            Err(e) => {
                self.store.set_status_message("Conversion failed");
                self.store
                    .log(LogLevel::Error, format!("Conversion failed: {}", e));
                if let Some(metrics) = &self.metrics {
                    metrics.record_job_failed(duration);
                }
            }
        }

        self.store.set_processing(false);
    }

    /// Reveal one of the output locations in the platform file manager.
    /// Failure is logged, never fatal.
    pub fn reveal(&self, path: &Utf8Path) {
        if let Err(e) = self.backend.reveal_path(path) {
            self.store
                .log(LogLevel::Warning, format!("Could not open {}: {}", path, e));
        }
    }

    /// Open a native file picker and apply its result like a dialog payload.
    pub fn pick_input_file(&self) {
        let selection = match rfd::FileDialog::new()
            .set_title("Select input file")
            .pick_file()
        {
            Some(path) => DialogSelection::Single(path.to_string_lossy().into_owned()),
            None => DialogSelection::Cancelled,
        };
        self.handle_dialog(selection);
    }

    /// Folder variant of the picker; the engine converts folders as well as
    /// archives.
    pub fn pick_input_folder(&self) {
        let selection = match rfd::FileDialog::new()
            .set_title("Select input folder")
            .pick_folder()
        {
            Some(path) => DialogSelection::Single(path.to_string_lossy().into_owned()),
            None => DialogSelection::Cancelled,
        };
        self.handle_dialog(selection);
    }
}
