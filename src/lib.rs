// TaskDeck - File Conversion Dashboard Shell
//
// This is the library crate containing the state store, views, input
// resolution and the conversion engine client. The binary crate (main.rs)
// provides the headless console front-end.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod shell;
pub mod state;
pub mod view;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, UserConfig};
pub use models::{AppState, LogEntry, LogLevel, Progress};
pub use shell::Shell;
pub use state::{StateStore, SubscriptionId};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
