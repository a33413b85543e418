// State management module
//
// This module provides the StateStore which wraps AppState with thread-safe
// access and fans out synchronous change notifications to registered views.

use crate::metrics::Metrics;
use crate::models::{AppState, ConversionOutcome, LogEntry, LogLevel, Progress};
use camino::Utf8PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Identifies a registered subscriber; returned by [`StateStore::subscribe`]
/// and redeemed by [`StateStore::unsubscribe`].
pub type SubscriptionId = u64;

type Subscriber = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Observable state store with synchronous subscriber fan-out.
///
/// This is the central state component:
/// - Holds [`AppState`] behind `Arc<RwLock<T>>` for thread-safe access
/// - Every named mutation operation applies its update, then synchronously
///   invokes every registered subscriber with a snapshot of the state taken
///   at delivery time
/// - Subscribers are invoked in registration order
///
/// # Notification contract
///
/// Mutations never diff: writing a value equal to the current one still
/// notifies. The subscriber list is snapshotted before delivery, so a
/// subscriber may unsubscribe (itself or others) or trigger further mutations
/// mid-notification without corrupting the delivery in flight. The state write
/// lock is released before subscribers run, which is what makes re-entrant
/// mutation from a subscriber possible.
///
/// # Usage
///
/// Always go through the named operations instead of touching [`AppState`]:
/// - [`read()`](Self::read) / [`snapshot()`](Self::snapshot) for reading
/// - `set_*`, `update_progress`, `add_log_entry`, `clear_logs`, `reset` for writes
/// - [`subscribe()`](Self::subscribe) for listening to changes
pub struct StateStore {
    /// The application state protected by RwLock for thread-safe access
    state: Arc<RwLock<AppState>>,

    /// Registered subscribers in registration order
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,

    /// Source for subscription ids
    next_id: AtomicU64,

    /// Optional metrics sink for notification counters
    metrics: Option<Arc<Metrics>>,
}

impl StateStore {
    /// Create a new StateStore with default state and no metrics sink.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            metrics: None,
        }
    }

    /// Create a StateStore that records notification counters into `metrics`.
    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics: Some(metrics),
            ..Self::new()
        }
    }

    /// Get a read-only snapshot of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state.
    ///
    /// # Example
    /// ```ignore
    /// let busy = store.read(|state| state.is_processing);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Apply a mutation and notify every subscriber.
    ///
    /// The write lock is held only while `update_fn` runs; subscribers see the
    /// state through a snapshot taken after the lock is released.
    pub fn update<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut AppState),
    {
        {
            let mut state = self.state.write().unwrap();
            update_fn(&mut state);
        }
        self.notify();
    }

    /// Register a subscriber. Returns the id used to unsubscribe.
    ///
    /// Subscribers are invoked synchronously, in registration order, after
    /// every mutation.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().unwrap().push((id, Arc::new(f)));
        tracing::debug!("Subscriber {} registered", id);
        id
    }

    /// Remove a subscriber. Returns false if the id was not registered.
    ///
    /// Removing a subscriber during a live notification does not affect the
    /// deliveries already in flight for that notification.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.lock().unwrap();
        let before = subs.len();
        subs.retain(|(sub_id, _)| *sub_id != id);
        let removed = subs.len() != before;
        if removed {
            tracing::debug!("Subscriber {} removed", id);
        }
        removed
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    /// Deliver a notification to every subscriber registered right now.
    ///
    /// The list is snapshotted first and the list lock released, so callbacks
    /// may subscribe, unsubscribe, or mutate state without deadlocking.
    ///
    /// The state itself is re-read per delivery, not once per notification: a
    /// subscriber that mutates state mid-notification must not cause later
    /// subscribers to observe the pre-mutation state after the nested
    /// notification already showed them the newer one.
    fn notify(&self) {
        let snapshot: Vec<Subscriber> = {
            let subs = self.subscribers.lock().unwrap();
            subs.iter().map(|(_, f)| Arc::clone(f)).collect()
        };

        if snapshot.is_empty() {
            return;
        }

        for subscriber in snapshot {
            let state = self.snapshot();
            subscriber(&state);
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_notification();
        }
    }

    // ===== Named mutation operations =====
    //
    // Each operation is total: it cannot fail, and it always notifies, even
    // when the written value equals the current one.

    /// Set or clear the currently selected input location.
    pub fn set_selected_path(&self, path: Option<Utf8PathBuf>) {
        self.update(|state| {
            state.selected_path = path;
        });
    }

    /// Flip the job-in-flight flag.
    pub fn set_processing(&self, processing: bool) {
        self.update(|state| {
            state.is_processing = processing;
        });
    }

    /// Record (or clear) the result of a finished job.
    pub fn set_result(&self, result: Option<ConversionOutcome>) {
        self.update(|state| {
            state.result = result;
        });
    }

    /// Change the display filter. Never touches the stored log entries.
    pub fn set_level_filter(&self, filter: LogLevel) {
        self.update(|state| {
            state.level_filter = filter;
        });
    }

    /// Replace the progress counters with the latest push from the engine.
    pub fn update_progress(&self, progress: Progress) {
        self.update(|state| {
            state.progress = progress;
        });
    }

    /// Set the status line shown under the task card.
    pub fn set_status_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|state| {
            state.status_message = message;
        });
    }

    /// Append one entry to the log sequence.
    pub fn add_log_entry(&self, entry: LogEntry) {
        if let Some(metrics) = &self.metrics {
            metrics.record_log_entry();
        }
        self.update(|state| {
            state.logs.push(entry);
        });
    }

    /// Convenience wrapper around [`add_log_entry`](Self::add_log_entry).
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.add_log_entry(LogEntry::new(level, message));
    }

    /// Drop every stored log entry. This is the only operation that shrinks
    /// the log sequence.
    pub fn clear_logs(&self) {
        self.update(|state| {
            state.logs.clear();
        });
    }

    /// Return every field to its initial value with a single notification.
    pub fn reset(&self) {
        self.update(|state| {
            *state = AppState::default();
        });
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
