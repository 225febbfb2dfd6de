use std::collections::BTreeMap;

use super::{MagneticSnap, WindowConfig, WindowDefaults, WindowState};
use crate::config::EngineConfig;
use crate::layout::relax::{chain_reaches, relax};
use crate::layout::snap::{SnapResult, SnapTarget, resolve_snap};
use crate::layout::{
    Bounds, DockSide, Point, Size, Viewport, clamp_position, docked_bounds, extent,
};
use crate::persistence::{LayoutStore, MemoryStore, StoredLayout, StoredWindowState};

/// A row in the taskbar listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: String,
    pub title: String,
    pub minimized: bool,
    pub focused: bool,
}

/// Authoritative collection of open windows.
///
/// Every operation is a synchronous transition of this container. Operations
/// naming an unknown id do nothing. Geometry mutations are written through to
/// the [`LayoutStore`]; store failures are logged and otherwise ignored.
pub struct WindowRegistry<C> {
    windows: BTreeMap<String, WindowState<C>>,
    viewport: Viewport,
    config: EngineConfig,
    store: Box<dyn LayoutStore>,
    stored: StoredLayout,
    next_z: u64,
    next_open_order: usize,
    viewport_source: Option<Box<dyn Fn() -> Option<Viewport>>>,
}

impl<C> std::fmt::Debug for WindowRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("windows", &self.windows.keys().collect::<Vec<_>>())
            .field("viewport", &self.viewport)
            .field("next_z", &self.next_z)
            .finish_non_exhaustive()
    }
}

impl<C> WindowRegistry<C> {
    pub fn new(viewport: Viewport, config: EngineConfig, store: impl LayoutStore + 'static) -> Self {
        let stored = load_stored(&store);
        Self {
            windows: BTreeMap::new(),
            viewport: viewport.bounded(),
            config,
            store: Box::new(store),
            stored,
            next_z: 1,
            next_open_order: 0,
            viewport_source: None,
        }
    }

    /// Installs the callback [`Self::viewport_changed`] reads the current
    /// viewport from. `None` from the callback means the size is unknown.
    pub fn with_viewport_source(
        mut self,
        source: impl Fn() -> Option<Viewport> + 'static,
    ) -> Self {
        self.viewport_source = Some(Box::new(source));
        self
    }

    /// Registry backed by a private in-memory store.
    pub fn in_memory(viewport: Viewport) -> Self {
        Self::new(viewport, EngineConfig::default(), MemoryStore::new())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get(&self, id: &str) -> Option<&WindowState<C>> {
        self.windows.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.windows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Open windows in id order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowState<C>> {
        self.windows.values()
    }

    pub fn focused(&self) -> Option<&WindowState<C>> {
        self.windows.values().find(|window| window.is_focused)
    }

    /// Last persisted record for `id`, if any.
    pub fn stored(&self, id: &str) -> Option<&StoredWindowState> {
        self.stored.get(id)
    }

    /// Opens a window, or re-focuses and restores it if `config.id` is
    /// already open. Returns `true` when a new window was created.
    pub fn open(&mut self, config: WindowConfig<C>) -> bool {
        if self.windows.contains_key(&config.id) {
            tracing::debug!(window_id = %config.id, "window already open, focusing");
            self.restore(&config.id);
            return false;
        }

        let WindowConfig {
            id,
            title,
            position,
            size,
            min_size,
            capabilities,
            content,
        } = config;
        let defaults = WindowDefaults {
            position,
            size: size.unwrap_or(self.config.default_window_size).bounded(),
        };
        let min_size = min_size.unwrap_or(self.config.min_window_size).bounded();
        let stored = self.stored.get(&id).cloned();

        let size = match &stored {
            Some(_) if capabilities.lock_size => defaults.size,
            Some(record) if capabilities.lock_height => {
                Size::new(record.size.width, defaults.size.height)
            }
            Some(record) => record.size,
            None => defaults.size,
        }
        .bounded();
        let size = Size::new(
            size.width.max(min_size.width),
            size.height.max(min_size.height),
        );
        let position = stored
            .as_ref()
            .map(|record| record.position)
            .unwrap_or_else(|| default_position(defaults, self.viewport));

        let mut window = WindowState {
            id: id.clone(),
            title,
            position: clamp_position(position, size, self.viewport),
            size,
            min_size,
            z_index: 0,
            is_focused: false,
            is_minimized: false,
            capabilities,
            docked: DockSide::None,
            before_docked: None,
            magnetic_snap: MagneticSnap::default(),
            content,
            defaults,
            open_order: self.next_open_order,
        };
        self.next_open_order = self.next_open_order.saturating_add(1);

        if let Some(record) = stored {
            window.is_minimized = record.is_minimized && capabilities.minimizable;
            window.magnetic_snap = without_self_reference(&id, record.magnetic_snap);
            if record.docked.is_docked() && capabilities.dockable {
                window.before_docked = Some(
                    record
                        .before_docked
                        .map(|before| {
                            Bounds::from_parts(before.position(), before.size().bounded())
                        })
                        .unwrap_or_else(|| Bounds::from_parts(window.position, window.size)),
                );
                window.docked = record.docked;
                let bounds = docked_bounds(record.docked, self.viewport);
                window.position = bounds.position();
                window.size = bounds.size();
            }
        }

        // A window opened minimized stays below every other window until it
        // is restored, which raises it through focus.
        let minimized = window.is_minimized;
        tracing::debug!(
            window_id = %id,
            minimized,
            restored = self.stored.contains_key(&id),
            "opened window"
        );
        self.windows.insert(id.clone(), window);
        if !minimized {
            self.set_exclusive_focus(&id);
        }
        self.persist(&id);
        true
    }

    /// Opens a batch of windows, then relaxes once so snap relationships
    /// between windows of the batch resolve regardless of opening order.
    pub fn open_batch(&mut self, configs: impl IntoIterator<Item = WindowConfig<C>>) {
        for config in configs {
            self.open(config);
        }
        self.relax();
    }

    /// Removes a window. Its stored record is kept and reused if the id is
    /// opened again.
    pub fn close(&mut self, id: &str) -> bool {
        let Some(window) = self.windows.remove(id) else {
            return false;
        };
        tracing::debug!(window_id = %id, "closed window");
        if window.is_focused {
            self.select_fallback_focus();
        }
        true
    }

    /// Focuses a window and raises it above every other window. A minimized
    /// window is restored first.
    pub fn focus(&mut self, id: &str) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.is_minimized {
            window.is_minimized = false;
            self.persist(id);
        }
        self.set_exclusive_focus(id);
    }

    pub fn minimize(&mut self, id: &str) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.is_minimized {
            return;
        }
        let was_focused = window.is_focused;
        window.is_minimized = true;
        window.is_focused = false;
        tracing::debug!(window_id = %id, "minimized window");
        self.persist(id);
        if was_focused {
            self.select_fallback_focus();
        }
    }

    /// Un-minimizes (if needed), focuses and raises a window.
    pub fn restore(&mut self, id: &str) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        let was_minimized = window.is_minimized;
        window.is_minimized = false;
        self.set_exclusive_focus(id);
        if was_minimized {
            tracing::debug!(window_id = %id, "restored window");
            self.persist(id);
        }
    }

    /// Moves a window, clamped to the viewport. Ignored while docked.
    pub fn update_position(&mut self, id: &str, position: Point) {
        let viewport = self.viewport;
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.docked.is_docked() {
            tracing::debug!(window_id = %id, "ignoring move of docked window");
            return;
        }
        window.position = clamp_position(position, window.size, viewport);
        self.persist(id);
    }

    /// Resizes a window, honouring lock flags and the minimum size, then
    /// re-clamps its position. Ignored while docked.
    pub fn update_size(&mut self, id: &str, size: Size) {
        let Some(position) = self.windows.get(id).map(|window| window.position) else {
            return;
        };
        self.update_bounds(id, Bounds::from_parts(position, size));
    }

    /// Moves and resizes in one step with a single persistence write.
    pub fn update_bounds(&mut self, id: &str, bounds: Bounds) {
        let viewport = self.viewport;
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.docked.is_docked() {
            tracing::debug!(window_id = %id, "ignoring resize of docked window");
            return;
        }
        let caps = window.capabilities;
        let mut size = bounds.size().bounded();
        if caps.lock_size {
            size = window.defaults.size;
        } else if caps.lock_height {
            size.height = window.defaults.size.height;
        }
        size.width = size.width.max(window.min_size.width);
        size.height = size.height.max(window.min_size.height);
        window.size = size;
        window.position = clamp_position(bounds.position(), size, viewport);
        self.persist(id);
    }

    /// Replaces the caller-owned payload. Not persisted.
    pub fn update_content(&mut self, id: &str, content: C) {
        if let Some(window) = self.windows.get_mut(id) {
            window.content = content;
        }
    }

    pub fn dock(&mut self, id: &str, side: DockSide) {
        if side == DockSide::None {
            self.undock(id);
            return;
        }
        let viewport = self.viewport;
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if !window.capabilities.dockable {
            tracing::debug!(window_id = %id, "window is not dockable");
            return;
        }
        if !window.docked.is_docked() {
            window.before_docked = Some(window.bounds());
        }
        window.docked = side;
        let bounds = docked_bounds(side, viewport);
        window.position = bounds.position();
        window.size = bounds.size();
        tracing::debug!(window_id = %id, ?side, "docked window");
        self.persist(id);
    }

    pub fn undock(&mut self, id: &str) {
        let viewport = self.viewport;
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if !window.docked.is_docked() {
            return;
        }
        window.docked = DockSide::None;
        if let Some(before) = window.before_docked.take() {
            window.size = before.size();
            window.position = clamp_position(before.position(), before.size(), viewport);
        }
        tracing::debug!(window_id = %id, "undocked window");
        self.persist(id);
    }

    /// Replaces the snap descriptor. Persisted by the next geometry write.
    pub fn update_magnetic_snap(&mut self, id: &str, snap: MagneticSnap) {
        if let Some(window) = self.windows.get_mut(id) {
            window.magnetic_snap = without_self_reference(id, snap);
        }
    }

    pub fn get_docked_bounds(&self, side: DockSide) -> Bounds {
        docked_bounds(side, self.viewport)
    }

    /// Forgets all persisted geometry and returns every open window to its
    /// config defaults. Focus and stacking order are kept.
    pub fn reset_layout(&mut self) {
        self.stored.clear();
        if let Err(err) = self.store.save(&self.stored) {
            tracing::warn!(error = %err, "failed to clear stored layout");
        }
        let viewport = self.viewport;
        for window in self.windows.values_mut() {
            let size = Size::new(
                window.defaults.size.width.max(window.min_size.width),
                window.defaults.size.height.max(window.min_size.height),
            );
            let position = default_position(window.defaults, viewport);
            window.size = size;
            window.position = clamp_position(position, size, viewport);
            window.docked = DockSide::None;
            window.before_docked = None;
            window.magnetic_snap = MagneticSnap::default();
            window.is_minimized = false;
        }
        tracing::debug!(windows = self.windows.len(), "layout reset");
    }

    /// Viewport resize signal: adopts the new size and relaxes the layout.
    pub fn resize_viewport(&mut self, viewport: Viewport) -> Vec<String> {
        let viewport = viewport.bounded();
        if viewport == self.viewport {
            return Vec::new();
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.relax()
    }

    /// Viewport resize signal without a payload: reads the size from the
    /// viewport source and relaxes if it changed.
    pub fn viewport_changed(&mut self) -> Vec<String> {
        let Some(viewport) = self.viewport_source.as_ref().and_then(|source| source()) else {
            tracing::debug!("viewport changed but no size is available");
            return Vec::new();
        };
        self.resize_viewport(viewport)
    }

    /// Recomputes every window's geometry in dependency order and persists
    /// the windows that moved.
    pub fn relax(&mut self) -> Vec<String> {
        let changed = relax(&mut self.windows, self.viewport);
        for id in &changed {
            self.persist(id);
        }
        if !changed.is_empty() {
            tracing::trace!(?changed, "relaxed layout");
        }
        changed
    }

    /// Snaps a drag candidate for `id` against the screen and every other
    /// visible window. Non-dockable windows get the candidate back unchanged
    /// with an empty descriptor.
    pub fn resolve_drag(&self, id: &str, candidate: Point) -> Option<SnapResult> {
        let window = self.windows.get(id)?;
        if !window.capabilities.dockable {
            return Some(SnapResult {
                position: candidate,
                snap: MagneticSnap::default(),
            });
        }
        let targets: Vec<SnapTarget<'_>> = self
            .windows
            .values()
            .filter(|other| other.id != id && other.is_visible())
            .filter(|other| !chain_reaches(&self.windows, &other.id, id))
            .map(|other| SnapTarget {
                id: other.id.as_str(),
                bounds: other.bounds(),
            })
            .collect();
        Some(resolve_snap(
            candidate,
            window.size,
            self.viewport,
            &targets,
            self.config.magnetic_threshold,
        ))
    }

    /// Windows with `show_in_dock` set, in the order they were opened.
    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        let mut windows: Vec<&WindowState<C>> = self
            .windows
            .values()
            .filter(|window| window.capabilities.show_in_dock)
            .collect();
        windows.sort_by_key(|window| window.open_order);
        windows
            .into_iter()
            .map(|window| TaskbarEntry {
                id: window.id.clone(),
                title: window.title_or_id().to_string(),
                minimized: window.is_minimized,
                focused: window.is_focused,
            })
            .collect()
    }

    /// Visible windows bottom to top.
    pub fn windows_in_paint_order(&self) -> Vec<&WindowState<C>> {
        let mut windows: Vec<&WindowState<C>> =
            self.windows.values().filter(|w| w.is_visible()).collect();
        windows.sort_by_key(|window| window.z_index);
        windows
    }

    /// Topmost visible window containing `point`.
    pub fn topmost_at(&self, point: Point) -> Option<&WindowState<C>> {
        self.windows
            .values()
            .filter(|window| window.is_visible() && window.bounds().contains(point))
            .max_by_key(|window| window.z_index)
    }

    fn take_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z = self.next_z.saturating_add(1);
        z
    }

    fn set_exclusive_focus(&mut self, id: &str) {
        if !self.windows.contains_key(id) {
            return;
        }
        let z = self.take_z();
        for (window_id, window) in self.windows.iter_mut() {
            window.is_focused = window_id == id;
            if window.is_focused {
                window.z_index = z;
            }
        }
    }

    fn select_fallback_focus(&mut self) {
        let next = self
            .windows
            .values()
            .filter(|window| window.is_visible())
            .max_by_key(|window| window.z_index)
            .map(|window| window.id.clone());
        match next {
            Some(id) => self.set_exclusive_focus(&id),
            None => {
                for window in self.windows.values_mut() {
                    window.is_focused = false;
                }
            }
        }
    }

    fn persist(&mut self, id: &str) {
        let Some(window) = self.windows.get(id) else {
            return;
        };
        let record = StoredWindowState {
            position: window.position,
            size: window.size,
            is_minimized: window.is_minimized,
            docked: window.docked,
            magnetic_snap: window.magnetic_snap.clone(),
            before_docked: window.before_docked,
        };
        self.stored.insert(id.to_string(), record);
        if let Err(err) = self.store.save(&self.stored) {
            tracing::warn!(window_id = %id, error = %err, "failed to persist window geometry");
        }
    }
}

fn load_stored(store: &dyn LayoutStore) -> StoredLayout {
    match store.load() {
        Ok(layout) => layout,
        Err(err) => {
            tracing::warn!(error = %err, "stored layout unreadable, using defaults");
            StoredLayout::new()
        }
    }
}

fn default_position(defaults: WindowDefaults, viewport: Viewport) -> Point {
    defaults.position.unwrap_or_else(|| {
        Point::new(
            extent(viewport.width.saturating_sub(defaults.size.width) / 2),
            extent(viewport.height.saturating_sub(defaults.size.height) / 2),
        )
    })
}

fn without_self_reference(id: &str, mut snap: MagneticSnap) -> MagneticSnap {
    if snap.target_id() == Some(id) {
        tracing::warn!(window_id = %id, "dropping self-referencing magnetic snap");
        snap.window = None;
    }
    snap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{Capabilities, WindowEdge};

    fn registry() -> WindowRegistry<()> {
        WindowRegistry::in_memory(Viewport::new(200, 100))
    }

    #[test]
    fn open_focuses_new_window_and_unfocuses_others() {
        let mut wm = registry();
        assert!(wm.open(WindowConfig::new("chat", ())));
        assert!(wm.open(WindowConfig::new("inventory", ())));
        assert!(!wm.get("chat").unwrap().is_focused);
        assert!(wm.get("inventory").unwrap().is_focused);
        assert_eq!(wm.focused().map(|w| w.id.as_str()), Some("inventory"));
    }

    #[test]
    fn open_without_position_centers_window() {
        let mut wm = registry();
        wm.open(WindowConfig::new("login", ()).with_size(40, 20));
        assert_eq!(wm.get("login").unwrap().position, Point::new(80, 40));
    }

    #[test]
    fn minimizing_focused_window_moves_focus_to_topmost_visible() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()));
        wm.open(WindowConfig::new("b", ()));
        wm.open(WindowConfig::new("c", ()));
        wm.focus("a");
        wm.minimize("a");
        let a = wm.get("a").unwrap();
        assert!(a.is_minimized && !a.is_focused);
        let c = wm.get("c").unwrap();
        assert!(c.is_focused);
        assert!(wm.iter().all(|w| w.z_index <= c.z_index));
    }

    #[test]
    fn closing_last_window_clears_focus() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()));
        assert!(wm.close("a"));
        assert!(!wm.close("a"));
        assert!(wm.focused().is_none());
        assert!(wm.stored("a").is_some());
    }

    #[test]
    fn update_content_replaces_payload_without_persisting() {
        let mut wm: WindowRegistry<&str> = WindowRegistry::in_memory(Viewport::new(200, 100));
        wm.open(WindowConfig::new("chat", "hello"));
        let before = wm.stored("chat").cloned();
        wm.update_content("chat", "bye");
        assert_eq!(wm.get("chat").unwrap().content, "bye");
        assert_eq!(wm.stored("chat").cloned(), before);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut wm = registry();
        wm.focus("ghost");
        wm.minimize("ghost");
        wm.restore("ghost");
        wm.update_position("ghost", Point::new(1, 1));
        wm.update_size("ghost", Size::new(10, 10));
        wm.dock("ghost", DockSide::Left);
        wm.undock("ghost");
        wm.update_content("ghost", ());
        assert!(wm.is_empty());
    }

    #[test]
    fn update_size_respects_lock_height_and_minimum() {
        let mut wm = registry();
        let caps = Capabilities {
            lock_height: true,
            ..Capabilities::default()
        };
        wm.open(
            WindowConfig::new("turns", ())
                .with_size(50, 8)
                .with_position(0, 0)
                .with_capabilities(caps),
        );
        wm.update_size("turns", Size::new(70, 30));
        assert_eq!(wm.get("turns").unwrap().size, Size::new(70, 8));
        wm.update_size("turns", Size::new(1, 1));
        assert_eq!(wm.get("turns").unwrap().size, Size::new(6, 8));
    }

    #[test]
    fn resize_reclamps_position() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()).with_position(150, 80).with_size(40, 10));
        wm.update_size("a", Size::new(80, 30));
        let a = wm.get("a").unwrap();
        assert_eq!(a.position, Point::new(120, 70));
    }

    #[test]
    fn docked_window_ignores_low_level_moves() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()));
        wm.dock("a", DockSide::Right);
        wm.update_position("a", Point::new(3, 3));
        assert_eq!(wm.get("a").unwrap().bounds(), Bounds::new(100, 0, 100, 100));
    }

    #[test]
    fn non_dockable_window_stays_floating() {
        let mut wm = registry();
        let caps = Capabilities {
            dockable: false,
            ..Capabilities::default()
        };
        wm.open(WindowConfig::new("a", ()).with_capabilities(caps));
        let before = wm.get("a").unwrap().bounds();
        wm.dock("a", DockSide::Left);
        assert_eq!(wm.get("a").unwrap().docked, DockSide::None);
        assert_eq!(wm.get("a").unwrap().bounds(), before);
        let res = wm.resolve_drag("a", Point::new(2, 2)).unwrap();
        assert_eq!(res.position, Point::new(2, 2));
        assert!(res.snap.is_empty());
    }

    #[test]
    fn self_referencing_snap_is_dropped() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()));
        wm.update_magnetic_snap("a", MagneticSnap::attached_to("a", WindowEdge::Right));
        assert!(wm.get("a").unwrap().magnetic_snap.is_empty());
    }

    #[test]
    fn resolve_drag_refuses_to_form_a_cycle() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()).with_position(20, 20).with_size(30, 20));
        wm.open(WindowConfig::new("b", ()).with_position(50, 20).with_size(30, 20));
        wm.update_magnetic_snap("b", MagneticSnap::attached_to("a", WindowEdge::Right));
        // a's right edge lands 2 away from b's left edge
        let res = wm.resolve_drag("a", Point::new(22, 30)).unwrap();
        assert_eq!(res.snap.target_id(), None);
        assert_eq!(res.position, Point::new(22, 30));
    }

    #[test]
    fn taskbar_lists_flagged_windows_in_open_order() {
        let mut wm = registry();
        let hidden = Capabilities {
            show_in_dock: false,
            ..Capabilities::default()
        };
        wm.open(WindowConfig::new("z", ()).with_title("Zeta"));
        wm.open(WindowConfig::new("a", ()).with_capabilities(hidden));
        wm.open(WindowConfig::new("m", ()));
        wm.minimize("m");
        let entries = wm.taskbar_entries();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "m"]);
        assert_eq!(entries[0].title, "Zeta");
        assert!(entries[1].minimized);
    }

    #[test]
    fn topmost_hit_test_prefers_higher_z() {
        let mut wm = registry();
        wm.open(WindowConfig::new("under", ()).with_position(0, 0).with_size(20, 20));
        wm.open(WindowConfig::new("over", ()).with_position(10, 10).with_size(20, 20));
        assert_eq!(
            wm.topmost_at(Point::new(15, 15)).map(|w| w.id.as_str()),
            Some("over")
        );
        wm.focus("under");
        assert_eq!(
            wm.topmost_at(Point::new(15, 15)).map(|w| w.id.as_str()),
            Some("under")
        );
        assert!(wm.topmost_at(Point::new(150, 90)).is_none());
    }

    #[test]
    fn reset_layout_returns_windows_to_defaults() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()).with_position(5, 5).with_size(30, 10));
        wm.update_position("a", Point::new(60, 60));
        wm.dock("a", DockSide::Left);
        wm.reset_layout();
        let a = wm.get("a").unwrap();
        assert_eq!(a.bounds(), Bounds::new(5, 5, 30, 10));
        assert_eq!(a.docked, DockSide::None);
        assert!(wm.stored("a").is_none());
    }

    #[test]
    fn viewport_changed_reads_the_viewport_source() {
        use std::cell::Cell;
        use std::rc::Rc;

        let current = Rc::new(Cell::new(Some(Viewport::new(200, 100))));
        let source = Rc::clone(&current);
        let mut wm = WindowRegistry::<()>::in_memory(Viewport::new(200, 100))
            .with_viewport_source(move || source.get());
        wm.open(WindowConfig::new("a", ()).with_position(150, 50).with_size(50, 50));
        assert!(wm.viewport_changed().is_empty());

        current.set(Some(Viewport::new(100, 80)));
        assert_eq!(wm.viewport_changed(), vec!["a".to_string()]);
        assert_eq!(wm.viewport(), Viewport::new(100, 80));
        assert_eq!(wm.get("a").unwrap().position, Point::new(50, 30));

        current.set(None);
        assert!(wm.viewport_changed().is_empty());
        assert_eq!(wm.viewport(), Viewport::new(100, 80));
    }

    #[test]
    fn viewport_changed_without_a_source_is_ignored() {
        let mut wm = registry();
        wm.open(WindowConfig::new("a", ()));
        assert!(wm.viewport_changed().is_empty());
        assert_eq!(wm.viewport(), Viewport::new(200, 100));
    }
}
