//! TaskDeck - File Conversion Dashboard Shell
//!
//! Main entry point for the headless console front-end.
//!
//! # Overview
//!
//! This binary wires the library crate together:
//! - Logging infrastructure (file rotation + console output)
//! - Tokio async runtime (4 worker threads for subprocess execution)
//! - State store ([`StateStore`]) with subscriber fan-out
//! - Configuration loading ([`ConfigManager`])
//! - Shell ([`Shell`]) driving the conversion engine and the views
//!
//! # Execution Flow
//!
//! 1. Initialize logging → logs/taskdeck_<timestamp>.log
//! 2. Create tokio runtime with 4 worker threads
//! 3. Load YAML configuration from TaskDeck Data/
//! 4. Create StateStore and attach console-backed log/progress views
//! 5. Check engine availability; an unavailable engine blocks conversions
//! 6. If an input path was passed on the command line, run one conversion
//! 7. Shutdown the tokio runtime with 5s timeout

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use taskdeck::metrics::Metrics;
use taskdeck::services::{DialogSelection, EngineClient};
use taskdeck::view::{ConsoleSurface, LogView, ProgressView};
use taskdeck::{APP_NAME, ConfigManager, LogLevel, Shell, StateStore, VERSION};

fn main() -> Result<()> {
    // Setup logging with both file and console output
    taskdeck::logging::setup_logging_with_console("logs", "taskdeck", false, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(4)
        .thread_name("taskdeck-worker")
        .build()?;

    tracing::info!("Tokio runtime initialized with {} worker threads", 4);

    // Load configuration
    let config_manager = ConfigManager::new("TaskDeck Data")?;
    let config = config_manager.load_user_config()?;

    // Metrics and state store
    let metrics = Arc::new(Metrics::new());
    let store = Arc::new(StateStore::with_metrics(Arc::clone(&metrics)));

    // Apply the configured log panel threshold
    match config.ui.log_filter.parse::<LogLevel>() {
        Ok(filter) => store.set_level_filter(filter),
        Err(e) => tracing::warn!("Ignoring invalid log_filter in config: {}", e),
    }

    // Conversion engine backend
    let backend = Arc::new(EngineClient::new(
        config.engine.executable.clone(),
        Duration::from_secs(config.engine.timeout_secs),
    ));

    let shell = Shell::with_metrics(
        Arc::clone(&store),
        Arc::clone(&backend),
        Arc::clone(&metrics),
    );

    // Console-backed views subscribe to the store; panel echo to stdout
    // follows the config knob
    shell.attach_log_view(LogView::with_metrics(
        ConsoleSurface::with_echo(config.ui.echo_console),
        Arc::clone(&metrics),
    ));
    shell.attach_progress_view(ProgressView::new(ConsoleSurface::with_echo(
        config.ui.echo_console,
    )));

    runtime.block_on(async {
        use taskdeck::services::ConversionBackend;

        // Engine events feed the store for the lifetime of the backend
        let _pump = shell.pump_events();

        if !backend.is_available().await {
            store.set_status_message("Conversion engine unavailable");
            store.log(
                LogLevel::Error,
                format!(
                    "Conversion engine not found at {}; conversions are disabled",
                    config.engine.executable
                ),
            );
        }

        // One-shot mode: convert the path given on the command line
        if let Some(input) = std::env::args().nth(1) {
            shell.handle_dialog(DialogSelection::Single(input));
            shell.run_conversion().await;
        } else {
            store.set_status_message("Ready");
            tracing::info!("No input path given; exiting after startup checks");
        }
    });

    metrics.log_summary();

    // Shutdown the tokio runtime gracefully
    runtime.shutdown_timeout(Duration::from_secs(5));

    tracing::info!("Application shutdown complete");
    Ok(())
}
