//! Data models for the TaskDeck shell.
//!
//! This module contains the core data structures shared across the application:
//! - [`AppState`]: the central state container the observable store wraps
//! - [`LogEntry`] / [`LogLevel`]: the append-only log sequence and its severity scale
//! - [`Progress`]: phase/counter updates streamed by the conversion engine
//! - [`FileRecord`] / [`ConversionOutcome`]: per-file outcome records and the job result
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: wire-facing structs derive `Serialize`/`Deserialize` for the
//!   engine's NDJSON event stream and the YAML user config
//! - **Cloneable**: `AppState` is snapshot-cloned by [`StateStore`](crate::state::StateStore)
//! - **Passive**: state updates go through the store's named operations, never
//!   through direct field writes from consumers

pub mod app_state;
pub mod log;
pub mod report;

pub use app_state::{AppState, Progress};
pub use log::{LogEntry, LogLevel};
pub use report::{ConversionOutcome, FileRecord, format_file_size};
