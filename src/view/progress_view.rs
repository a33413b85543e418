// Progress line renderer
//
// Unlike the log panel there is nothing incremental here: the progress line is
// cheap to recompute, so every update replaces the surface contents with the
// output of a pure rendering function.

use crate::models::Progress;
use crate::view::surface::RenderSurface;

/// Stateless render-on-read view over the progress counters.
pub struct ProgressView<S: RenderSurface> {
    surface: S,
}

impl<S: RenderSurface> ProgressView<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Pure rendering function: identical inputs produce identical output.
    pub fn render_line(progress: &Progress, is_processing: bool) -> String {
        if is_processing {
            if progress.total > 0 {
                format!(
                    "{}: {}/{}",
                    progress.category, progress.current, progress.total
                )
            } else if progress.category.is_empty() {
                "Working...".to_string()
            } else {
                format!("{}...", progress.category)
            }
        } else if progress.total > 0 {
            format!("Done: {}/{}", progress.current, progress.total)
        } else {
            "Idle".to_string()
        }
    }

    /// Replace the surface contents with the current progress line.
    pub fn update(&mut self, progress: &Progress, is_processing: bool) {
        let line = Self::render_line(progress, is_processing);
        self.surface.clear();
        self.surface.append(&line);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
