// Drop/dialog input resolution
//
// Drag-and-drop payloads arrive from several partially reliable sources: the
// native OS drop event, the webview's file list, the webview's item list, and
// the file dialog. Each source is modeled as a pure strategy from payload to
// optional path, tried in fixed priority order with short-circuit on the first
// hit. Everything a strategy attempted is reported back as a diagnostic note
// so failed resolutions can be diagnosed from the log panel.

use crate::models::LogLevel;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Raw drop event as delivered by the surrounding UI layer.
///
/// Any combination of the three sources may be populated; empty vectors mean
/// the source supplied nothing.
#[derive(Debug, Clone, Default)]
pub struct DropPayload {
    /// Paths from the native OS-level drag event.
    pub native_paths: Vec<String>,
    /// Entries from the webview file-list payload.
    pub files: Vec<DroppedFile>,
    /// Entries from the webview item-list payload.
    pub items: Vec<DropItem>,
}

/// One entry of a webview file-list payload.
#[derive(Debug, Clone)]
pub struct DroppedFile {
    pub name: String,
    /// Direct filesystem path, when the webview exposes one.
    pub full_path: Option<String>,
    /// Relative/virtual path fallback. Unreliable for folders.
    pub relative_path: Option<String>,
}

/// One entry of a webview item-list payload.
#[derive(Debug, Clone)]
pub struct DropItem {
    pub kind: ItemKind,
    pub full_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Text,
}

/// Dialog return value. An empty list and a cancelled dialog both mean
/// "no selection", which is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogSelection {
    Single(String),
    Many(Vec<String>),
    Cancelled,
}

/// Errors from drop resolution
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("No usable path in drop payload")]
    NoUsablePath,
}

/// Outcome of a drop resolution: the verdict plus every diagnostic note the
/// attempted strategies produced, in attempt order.
#[derive(Debug)]
pub struct Resolution {
    pub outcome: Result<Utf8PathBuf, InputError>,
    pub notes: Vec<(LogLevel, String)>,
}

/// Resolves heterogeneous drop/dialog inputs into one canonical path.
pub struct InputResolver;

impl InputResolver {
    /// Resolve a drop event. Strategies run in priority order; the first hit
    /// wins and later strategies are not consulted.
    pub fn resolve_drop(payload: &DropPayload) -> Resolution {
        let mut notes = Vec::new();

        // 1. Native OS path list
        if let Some(path) = Self::from_native_paths(payload) {
            if payload.native_paths.len() > 1 {
                notes.push((
                    LogLevel::Info,
                    format!(
                        "{} paths dropped; using the first: {}",
                        payload.native_paths.len(),
                        path
                    ),
                ));
            }
            notes.push((LogLevel::Info, format!("Input selected: {}", path)));
            return Resolution {
                outcome: Ok(path),
                notes,
            };
        }
        notes.push((
            LogLevel::Info,
            "Native drop payload had no usable path".to_string(),
        ));

        // 2. File list with a direct filesystem path
        if let Some(path) = Self::from_file_direct(payload) {
            notes.push((LogLevel::Info, format!("Input selected: {}", path)));
            return Resolution {
                outcome: Ok(path),
                notes,
            };
        }
        notes.push((
            LogLevel::Info,
            "File-list payload exposed no direct path".to_string(),
        ));

        // 3. File list with only a relative/virtual path
        if let Some(path) = Self::from_file_relative(payload) {
            notes.push((
                LogLevel::Warning,
                format!(
                    "Using relative path from drop payload: {} (folders may not resolve reliably)",
                    path
                ),
            ));
            return Resolution {
                outcome: Ok(path),
                notes,
            };
        }
        notes.push((
            LogLevel::Info,
            "File-list payload exposed no relative path".to_string(),
        ));

        // 4. Item list
        if let Some(path) = Self::from_item_list(payload) {
            notes.push((LogLevel::Info, format!("Input selected: {}", path)));
            return Resolution {
                outcome: Ok(path),
                notes,
            };
        }
        notes.push((
            LogLevel::Info,
            "Item-list payload had no file item with a path".to_string(),
        ));

        Resolution {
            outcome: Err(InputError::NoUsablePath),
            notes,
        }
    }

    /// Resolve a dialog return value. `None` means the user made no selection.
    pub fn resolve_dialog(selection: DialogSelection) -> Option<Utf8PathBuf> {
        match selection {
            DialogSelection::Single(path) if !path.trim().is_empty() => {
                Some(Utf8PathBuf::from(path))
            }
            DialogSelection::Single(_) => None,
            DialogSelection::Many(paths) => paths
                .into_iter()
                .find(|p| !p.trim().is_empty())
                .map(Utf8PathBuf::from),
            DialogSelection::Cancelled => None,
        }
    }

    // ===== Strategies (pure functions over the payload) =====

    fn from_native_paths(payload: &DropPayload) -> Option<Utf8PathBuf> {
        payload
            .native_paths
            .iter()
            .find(|p| !p.trim().is_empty())
            .map(Utf8PathBuf::from)
    }

    fn from_file_direct(payload: &DropPayload) -> Option<Utf8PathBuf> {
        payload
            .files
            .iter()
            .find_map(|f| f.full_path.as_deref().filter(|p| !p.trim().is_empty()))
            .map(Utf8PathBuf::from)
    }

    fn from_file_relative(payload: &DropPayload) -> Option<Utf8PathBuf> {
        payload
            .files
            .iter()
            .find_map(|f| f.relative_path.as_deref().filter(|p| !p.trim().is_empty()))
            .map(Utf8PathBuf::from)
    }

    fn from_item_list(payload: &DropPayload) -> Option<Utf8PathBuf> {
        payload
            .items
            .iter()
            .filter(|item| item.kind == ItemKind::File)
            .find_map(|item| item.full_path.as_deref().filter(|p| !p.trim().is_empty()))
            .map(Utf8PathBuf::from)
    }
}
