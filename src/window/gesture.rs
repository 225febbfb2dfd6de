//! Pointer gestures: header drags and edge resizes.
//!
//! Pointer moves are coalesced. [`GestureController::pointer_move`] only
//! records the latest pointer position; the snap/clamp/persist cycle runs at
//! most once per animation frame in [`GestureController::commit_frame`].
//! Releasing the pointer flushes the pending position and, for a drag that
//! ends in a dock hot-zone, docks the window.

use super::WindowRegistry;
use crate::layout::floating::{ResizeConstraints, ResizeEdge, apply_resize_drag};
use crate::layout::{Bounds, DockSide, Point, dock_zone, extent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDrag {
    pub id: String,
    pub initial: Point,
    pub pointer_start: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeDrag {
    pub id: String,
    pub edge: ResizeEdge,
    pub start: Bounds,
    pub pointer_start: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Drag(HeaderDrag),
    Resize(ResizeDrag),
}

impl Gesture {
    pub fn window_id(&self) -> &str {
        match self {
            Gesture::Drag(drag) => &drag.id,
            Gesture::Resize(resize) => &resize.id,
        }
    }
}

#[derive(Debug, Default)]
pub struct GestureController {
    active: Option<Gesture>,
    pending: Option<Point>,
    dock_preview: DockSide,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Dock side the current drag would dock into if released now.
    pub fn dock_side(&self) -> DockSide {
        self.dock_preview
    }

    /// Half-screen area to highlight while a drag hovers a dock hot-zone.
    pub fn dock_preview<C>(&self, registry: &WindowRegistry<C>) -> Option<Bounds> {
        self.dock_preview
            .is_docked()
            .then(|| registry.get_docked_bounds(self.dock_preview))
    }

    /// Pointer pressed on a window's drag region. Focuses the window and,
    /// unless it is pinned, starts a drag. A docked window is undocked first
    /// and placed so the pointer stays over its header.
    pub fn pointer_down_header<C>(
        &mut self,
        registry: &mut WindowRegistry<C>,
        id: &str,
        pointer: Point,
    ) -> bool {
        let Some(window) = registry.get(id) else {
            return false;
        };
        let pinned = window.capabilities.pinned;
        let docked = window.docked.is_docked().then(|| window.bounds());
        registry.focus(id);
        if pinned {
            return false;
        }

        if let Some(docked) = docked {
            registry.undock(id);
            if let Some(restored) = registry.get(id).map(|w| w.bounds()) {
                let max_dx = extent(restored.width.saturating_sub(1));
                let max_dy = extent(restored.height.saturating_sub(1));
                let dx = (pointer.x - docked.x).clamp(0, max_dx);
                let dy = (pointer.y - docked.y).clamp(0, max_dy);
                registry.update_position(id, Point::new(pointer.x - dx, pointer.y - dy));
            }
        }

        let Some(initial) = registry.get(id).map(|w| w.position) else {
            return false;
        };
        tracing::trace!(window_id = %id, "drag started");
        self.active = Some(Gesture::Drag(HeaderDrag {
            id: id.to_string(),
            initial,
            pointer_start: pointer,
        }));
        self.pending = None;
        self.dock_preview = DockSide::None;
        true
    }

    /// Pointer pressed on a resize edge. Docked, pinned and fixed-size
    /// windows are focused but not resized.
    pub fn pointer_down_edge<C>(
        &mut self,
        registry: &mut WindowRegistry<C>,
        id: &str,
        edge: ResizeEdge,
        pointer: Point,
    ) -> bool {
        let Some(window) = registry.get(id) else {
            return false;
        };
        let caps = window.capabilities;
        let resizable = !window.docked.is_docked()
            && !caps.pinned
            && (caps.resizable_x() || caps.resizable_y());
        let start = window.bounds();
        registry.focus(id);
        if !resizable {
            return false;
        }
        self.active = Some(Gesture::Resize(ResizeDrag {
            id: id.to_string(),
            edge,
            start,
            pointer_start: pointer,
        }));
        self.pending = None;
        self.dock_preview = DockSide::None;
        true
    }

    /// Records the latest pointer position; earlier pending positions are
    /// discarded.
    pub fn pointer_move(&mut self, pointer: Point) {
        if self.active.is_some() {
            self.pending = Some(pointer);
        }
    }

    /// Commits the pending pointer position, if any. Returns `true` when a
    /// position was committed.
    pub fn commit_frame<C>(&mut self, registry: &mut WindowRegistry<C>) -> bool {
        let Some(pointer) = self.pending.take() else {
            return false;
        };
        let Some(gesture) = self.active.as_ref() else {
            return false;
        };
        if !registry.contains(gesture.window_id()) {
            self.cancel();
            return false;
        }
        match gesture {
            Gesture::Drag(drag) => {
                let candidate = Point::new(
                    drag.initial.x + pointer.x - drag.pointer_start.x,
                    drag.initial.y + pointer.y - drag.pointer_start.y,
                );
                let Some(result) = registry.resolve_drag(&drag.id, candidate) else {
                    return false;
                };
                let dockable = registry
                    .get(&drag.id)
                    .is_some_and(|w| w.capabilities.dockable);
                tracing::trace!(window_id = %drag.id, ?result, "drag frame");
                registry.update_magnetic_snap(&drag.id, result.snap);
                registry.update_position(&drag.id, result.position);
                self.dock_preview = if dockable {
                    dock_zone(
                        pointer,
                        registry.viewport(),
                        registry.config().dock_threshold,
                    )
                } else {
                    DockSide::None
                };
            }
            Gesture::Resize(resize) => {
                let Some(window) = registry.get(&resize.id) else {
                    return false;
                };
                let constraints = ResizeConstraints {
                    resizable_x: window.capabilities.resizable_x(),
                    resizable_y: window.capabilities.resizable_y(),
                    min_size: window.min_size,
                };
                let delta = Point::new(
                    pointer.x - resize.pointer_start.x,
                    pointer.y - resize.pointer_start.y,
                );
                let next = apply_resize_drag(
                    resize.start,
                    resize.edge,
                    delta,
                    constraints,
                    registry.viewport(),
                );
                registry.update_magnetic_snap(&resize.id, Default::default());
                registry.update_bounds(&resize.id, next);
            }
        }
        registry.relax();
        true
    }

    /// Pointer released. Flushes the pending position and docks the window
    /// if a drag ended over a dock hot-zone. Returns the side docked into.
    pub fn pointer_up<C>(&mut self, registry: &mut WindowRegistry<C>, pointer: Point) -> DockSide {
        if self.active.is_none() {
            return DockSide::None;
        }
        self.pending = Some(pointer);
        self.commit_frame(registry);
        let side = self.dock_preview;
        let gesture = self.active.take();
        self.pending = None;
        self.dock_preview = DockSide::None;
        match gesture {
            Some(Gesture::Drag(drag)) if side.is_docked() => {
                registry.dock(&drag.id, side);
                registry.relax();
                side
            }
            _ => DockSide::None,
        }
    }

    /// Drops the gesture. The window keeps its last committed geometry.
    pub fn cancel(&mut self) {
        self.active = None;
        self.pending = None;
        self.dock_preview = DockSide::None;
    }
}
