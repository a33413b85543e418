// Render surface abstraction
//
// The incremental log renderer must not care whether it is drawing into a
// webview DOM, a native list widget, or a test buffer. This module defines the
// small capability set the renderers need, plus two concrete surfaces: an
// in-memory buffer (tests, headless use) and a console echo wrapper.

#[cfg(test)]
use mockall::automock;

/// Stable identity of one rendered node.
///
/// Ids are never reused within a surface's lifetime, so tests can verify that
/// incremental appends leave previously rendered nodes untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Capability set a display surface must provide to the renderers.
///
/// `append` returns the new node's id; `remove` and `clear` are the only ways
/// rendered output ever disappears.
#[cfg_attr(test, automock)]
pub trait RenderSurface {
    /// Append one line of text, returning its stable node id.
    fn append(&mut self, text: &str) -> NodeId;

    /// Remove a single node. Unknown ids are ignored.
    fn remove(&mut self, id: NodeId);

    /// Discard all rendered output.
    fn clear(&mut self);

    /// Keep the newest output visible.
    fn scroll_to_end(&mut self);
}

/// In-memory surface used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemorySurface {
    nodes: Vec<(NodeId, String)>,
    next_id: u64,
    scroll_requests: u64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered lines in display order.
    pub fn lines(&self) -> Vec<String> {
        self.nodes.iter().map(|(_, text)| text.clone()).collect()
    }

    /// Node ids in display order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn scroll_requests(&self) -> u64 {
        self.scroll_requests
    }
}

impl RenderSurface for MemorySurface {
    fn append(&mut self, text: &str) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.push((id, text.to_string()));
        id
    }

    fn remove(&mut self, id: NodeId) {
        self.nodes.retain(|(node_id, _)| *node_id != id);
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn scroll_to_end(&mut self) {
        self.scroll_requests += 1;
    }
}

/// Surface that mirrors every append to stdout while keeping the in-memory
/// buffer, so the binary has a visible log panel without a widget toolkit.
/// The mirror follows the `echo_console` config knob; with echo off it
/// behaves like a plain buffer.
#[derive(Debug)]
pub struct ConsoleSurface {
    inner: MemorySurface,
    echo: bool,
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::with_echo(true)
    }
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_echo(echo: bool) -> Self {
        Self {
            inner: MemorySurface::new(),
            echo,
        }
    }

    pub fn echoes(&self) -> bool {
        self.echo
    }

    pub fn buffer(&self) -> &MemorySurface {
        &self.inner
    }
}

impl RenderSurface for ConsoleSurface {
    fn append(&mut self, text: &str) -> NodeId {
        if self.echo {
            println!("{}", text);
        }
        self.inner.append(text)
    }

    fn remove(&mut self, id: NodeId) {
        self.inner.remove(id);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn scroll_to_end(&mut self) {
        self.inner.scroll_to_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_monotonic_ids() {
        let mut surface = MemorySurface::new();
        let a = surface.append("a");
        let b = surface.append("b");
        assert!(b.0 > a.0);
        assert_eq!(surface.lines(), vec!["a", "b"]);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut surface = MemorySurface::new();
        let a = surface.append("a");
        surface.clear();
        let b = surface.append("b");
        assert_ne!(a, b);
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn test_console_surface_buffers_with_echo_off() {
        let mut surface = ConsoleSurface::with_echo(false);
        assert!(!surface.echoes());

        surface.append("quiet line");
        assert_eq!(surface.buffer().lines(), vec!["quiet line"]);
    }

    #[test]
    fn test_remove_is_targeted() {
        let mut surface = MemorySurface::new();
        let a = surface.append("a");
        surface.append("b");
        surface.remove(a);
        assert_eq!(surface.lines(), vec!["b"]);

        // Unknown id is a no-op
        surface.remove(NodeId(999));
        assert_eq!(surface.len(), 1);
    }
}
