// View module - rendering pipeline for the task view
//
// This module contains:
// - RenderSurface: the capability a concrete display must provide
// - LogView: incremental log panel renderer with high-water-mark bookkeeping
// - ProgressView: pure, idempotent progress line renderer

pub mod log_view;
pub mod progress_view;
pub mod surface;

pub use log_view::{EMPTY_PLACEHOLDER, LogView};
pub use progress_view::ProgressView;
pub use surface::{ConsoleSurface, MemorySurface, NodeId, RenderSurface};
