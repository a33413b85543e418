use crate::models::log::{LogEntry, LogLevel};
use crate::models::report::ConversionOutcome;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Progress counters pushed by the engine while a job runs.
///
/// `category` names the pipeline phase currently executing (for example
/// "Decompressing archives" or "Converting files").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    #[serde(rename = "task_category")]
    pub category: String,
}

impl Progress {
    pub fn new(current: usize, total: usize, category: impl Into<String>) -> Self {
        Self {
            current,
            total,
            category: category.into(),
        }
    }
}

/// Single source of truth for everything the task view renders.
///
/// # Access Discipline
///
/// `AppState` is owned by [`crate::state::StateStore`] and mutated exclusively
/// through its named operations. Views hold no copy; they re-read state through
/// [`read()`](crate::state::StateStore::read) when notified.
///
/// # Related Types
///
/// - [`crate::state::StateStore`]: observable wrapper with subscriber fan-out
/// - [`crate::models::LogEntry`]: the append-only log sequence element
/// - [`crate::models::ConversionOutcome`]: result payload of a finished job
#[derive(Clone, Debug)]
pub struct AppState {
    // Selection
    pub selected_path: Option<Utf8PathBuf>,

    // Runtime state
    pub is_processing: bool,
    pub status_message: String,

    // Log panel
    pub logs: Vec<LogEntry>,
    pub level_filter: LogLevel,

    // Job output
    pub result: Option<ConversionOutcome>,
    pub progress: Progress,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            selected_path: None,
            is_processing: false,
            status_message: String::new(),
            logs: Vec::new(),
            level_filter: LogLevel::Info,
            result: None,
            progress: Progress::default(),
        }
    }
}

impl AppState {
    /// Check whether a conversion can be started right now.
    pub fn can_start_job(&self) -> bool {
        self.selected_path.is_some() && !self.is_processing
    }

    /// Entries in `logs` admitted by the current display filter.
    pub fn visible_log_count(&self) -> usize {
        self.logs
            .iter()
            .filter(|e| self.level_filter.admits(e.level))
            .count()
    }
}
