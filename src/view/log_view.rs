// Incremental log panel renderer
//
// The log panel can receive thousands of streamed entries per job. Re-drawing
// the whole list for every entry is O(total) per update; this renderer does
// O(new entries) by tracking a high-water mark of raw entries already drawn.
// A full re-render happens only when previously drawn output is provably
// stale: the display filter changed, or the log shrank (which only an explicit
// clear can cause).

use crate::metrics::Metrics;
use crate::models::{LogEntry, LogLevel};
use crate::view::surface::{NodeId, RenderSurface};
use std::sync::Arc;

/// Text shown when the filtered log is empty.
pub const EMPTY_PLACEHOLDER: &str = "No log entries";

/// Renders the filtered log sequence into a [`RenderSurface`].
///
/// View-local bookkeeping, deliberately not part of the application state:
/// - `last_rendered_count`: high-water mark of *raw* entries already
///   considered. Raw, not filtered, so a later filter switch can recompute the
///   visible subset of historical entries without remembering which raw
///   entries were hidden.
/// - `last_filter`: the filter the current surface contents were drawn under.
pub struct LogView<S: RenderSurface> {
    surface: S,
    last_rendered_count: usize,
    last_filter: LogLevel,
    placeholder: Option<NodeId>,
    metrics: Option<Arc<Metrics>>,
}

impl<S: RenderSurface> LogView<S> {
    /// Create a view over `surface`. The surface starts on the empty-state
    /// placeholder.
    pub fn new(mut surface: S) -> Self {
        let placeholder = Some(surface.append(EMPTY_PLACEHOLDER));
        Self {
            surface,
            last_rendered_count: 0,
            last_filter: LogLevel::Info,
            placeholder,
            metrics: None,
        }
    }

    pub fn with_metrics(surface: S, metrics: Arc<Metrics>) -> Self {
        let mut view = Self::new(surface);
        view.metrics = Some(metrics);
        view
    }

    /// Bring the surface up to date with `(logs, filter)`.
    ///
    /// Chooses between three paths:
    /// 1. full render — filter changed, or the log shrank (clear/reset);
    /// 2. incremental append — only new entries beyond the high-water mark;
    /// 3. no-op — nothing changed.
    pub fn update(&mut self, logs: &[LogEntry], filter: LogLevel) {
        if filter != self.last_filter || logs.len() < self.last_rendered_count {
            self.render_full(logs, filter);
        } else if logs.len() > self.last_rendered_count {
            self.append_new(logs, filter);
        }
        // Equal length, same filter: nothing to do.
    }

    /// Discard everything and re-render the admitted subset of `logs`.
    fn render_full(&mut self, logs: &[LogEntry], filter: LogLevel) {
        tracing::debug!(
            total = logs.len(),
            %filter,
            "Full log panel re-render"
        );

        self.surface.clear();
        self.placeholder = None;

        let mut rendered = 0usize;
        for entry in logs {
            if filter.admits(entry.level) {
                self.surface.append(&entry.display_line());
                rendered += 1;
            }
        }

        // High-water mark tracks raw count, not the filtered count.
        self.last_rendered_count = logs.len();
        self.last_filter = filter;

        if rendered == 0 {
            self.placeholder = Some(self.surface.append(EMPTY_PLACEHOLDER));
        } else {
            self.surface.scroll_to_end();
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_full_render();
        }
    }

    /// Append only the entries past the high-water mark.
    fn append_new(&mut self, logs: &[LogEntry], filter: LogLevel) {
        let fresh = &logs[self.last_rendered_count..];
        let mut appended = 0usize;

        for entry in fresh {
            if filter.admits(entry.level) {
                if let Some(id) = self.placeholder.take() {
                    self.surface.remove(id);
                }
                self.surface.append(&entry.display_line());
                appended += 1;
            }
        }

        self.last_rendered_count = logs.len();

        if appended > 0 {
            self.surface.scroll_to_end();
            if let Some(metrics) = &self.metrics {
                metrics.record_incremental_render();
            }
        }
    }

    /// High-water mark of raw entries already considered.
    pub fn last_rendered_count(&self) -> usize {
        self.last_rendered_count
    }

    /// Filter the current surface contents were drawn under.
    pub fn last_filter(&self) -> LogLevel {
        self.last_filter
    }

    /// Whether the empty-state placeholder is currently shown.
    pub fn showing_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
