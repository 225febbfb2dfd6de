pub mod gesture;

mod registry;

use serde::{Deserialize, Serialize};

use crate::layout::{Bounds, DockSide, Point, Size};

pub use registry::{TaskbarEntry, WindowRegistry};

/// Which edge of another window a window is attached to.
///
/// `Left` means this window sits against the target's left edge (its right
/// edge touches `target.x`); `Right` means its left edge touches the
/// target's right edge. `Top`/`Bottom` follow the same pattern vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl WindowEdge {
    pub fn is_horizontal(self) -> bool {
        matches!(self, WindowEdge::Left | WindowEdge::Right)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowAttachment {
    pub window_id: String,
    pub edge: WindowEdge,
}

/// Snap relationships a window currently holds.
///
/// An empty descriptor means the window is free-floating and its stored
/// position is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticSnap {
    #[serde(skip_serializing_if = "is_false")]
    pub left: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub right: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub top: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub bottom: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowAttachment>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MagneticSnap {
    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.top || self.bottom) && self.window.is_none()
    }

    pub fn target_id(&self) -> Option<&str> {
        self.window.as_ref().map(|w| w.window_id.as_str())
    }

    pub fn attached_to(window_id: impl Into<String>, edge: WindowEdge) -> Self {
        Self {
            window: Some(WindowAttachment {
                window_id: window_id.into(),
                edge,
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub closeable: bool,
    pub minimizable: bool,
    pub resizable: bool,
    /// Falls back to `resizable` when unset.
    pub resizable_x: Option<bool>,
    /// Falls back to `resizable` when unset.
    pub resizable_y: Option<bool>,
    pub dockable: bool,
    /// Pinned windows ignore drag and resize gestures.
    pub pinned: bool,
    pub lock_size: bool,
    pub lock_height: bool,
    pub show_in_dock: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            closeable: true,
            minimizable: true,
            resizable: true,
            resizable_x: None,
            resizable_y: None,
            dockable: true,
            pinned: false,
            lock_size: false,
            lock_height: false,
            show_in_dock: true,
        }
    }
}

impl Capabilities {
    pub fn resizable_x(&self) -> bool {
        !self.lock_size && self.resizable_x.unwrap_or(self.resizable)
    }

    pub fn resizable_y(&self) -> bool {
        !self.lock_size && !self.lock_height && self.resizable_y.unwrap_or(self.resizable)
    }
}

/// Creation-time parameters for a window. Ignored (apart from re-focusing)
/// when a window with the same id is already open.
#[derive(Debug, Clone)]
pub struct WindowConfig<C> {
    pub id: String,
    pub title: Option<String>,
    /// `None` centers the window in the viewport.
    pub position: Option<Point>,
    /// `None` uses the engine's default window size.
    pub size: Option<Size>,
    pub min_size: Option<Size>,
    pub capabilities: Capabilities,
    pub content: C,
}

impl<C> WindowConfig<C> {
    pub fn new(id: impl Into<String>, content: C) -> Self {
        Self {
            id: id.into(),
            title: None,
            position: None,
            size: None,
            min_size: None,
            capabilities: Capabilities::default(),
            content,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn with_min_size(mut self, width: u32, height: u32) -> Self {
        self.min_size = Some(Size::new(width, height));
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// Geometry a window falls back to on reset and under the lock flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowDefaults {
    pub(crate) position: Option<Point>,
    pub(crate) size: Size,
}

/// One open panel. Only the registry mutates it.
#[derive(Debug, Clone)]
pub struct WindowState<C> {
    pub id: String,
    pub title: Option<String>,
    pub position: Point,
    pub size: Size,
    pub min_size: Size,
    pub z_index: u64,
    pub is_focused: bool,
    pub is_minimized: bool,
    pub capabilities: Capabilities,
    pub docked: DockSide,
    /// Geometry captured when the window was docked; present only while docked.
    pub before_docked: Option<Bounds>,
    pub magnetic_snap: MagneticSnap,
    pub content: C,
    pub(crate) defaults: WindowDefaults,
    pub(crate) open_order: usize,
}

impl<C> WindowState<C> {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_parts(self.position, self.size)
    }

    pub fn is_visible(&self) -> bool {
        !self.is_minimized
    }

    pub fn title_or_id(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn default_size(&self) -> Size {
        self.defaults.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resizable_axes_follow_resizable_unless_overridden() {
        let mut caps = Capabilities {
            resizable: false,
            ..Capabilities::default()
        };
        assert!(!caps.resizable_x());
        assert!(!caps.resizable_y());
        caps.resizable_y = Some(true);
        assert!(caps.resizable_y());
        caps.lock_height = true;
        assert!(!caps.resizable_y());
    }

    #[test]
    fn lock_size_disables_both_axes() {
        let caps = Capabilities {
            lock_size: true,
            ..Capabilities::default()
        };
        assert!(!caps.resizable_x());
        assert!(!caps.resizable_y());
    }

    #[test]
    fn magnetic_snap_serializes_compactly() {
        let snap = MagneticSnap::attached_to("chat", WindowEdge::Right);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"window":{"window_id":"chat","edge":"right"}}"#);
        let empty: MagneticSnap = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
