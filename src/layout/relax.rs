//! Dependency-ordered relaxation.
//!
//! When the viewport changes (or a window other windows are snapped to
//! moves), every snapped window has to be re-derived from its snap rule.
//! Windows are processed in ascending dependency depth so that a window
//! attached to another is always recomputed after its target already sits
//! at its new position. A single pass is enough, and running it again on a
//! consistent layout changes nothing.
//!
//! Snap cycles (A attached to B, B attached to A) are not a supported
//! configuration. The depth walk stops at the first repeated window and
//! counts it as depth 0. Each relaxation pass logs one warning naming the
//! windows whose chain loops.

use std::collections::{BTreeMap, BTreeSet};

use super::snap::snapped_position;
use super::{Bounds, Viewport, clamp_position, docked_bounds};
use crate::window::WindowState;

/// Number of window-to-window attachments between `id` and a free-standing
/// anchor. Attachments to windows that no longer exist end the chain.
pub fn dependency_depth<C>(windows: &BTreeMap<String, WindowState<C>>, id: &str) -> usize {
    depth_walk(windows, id).0
}

/// Windows whose attachment chain loops back on itself.
pub fn snap_cycles<C>(windows: &BTreeMap<String, WindowState<C>>) -> BTreeSet<&str> {
    windows
        .keys()
        .filter(|id| depth_walk(windows, id).1)
        .map(String::as_str)
        .collect()
}

/// Depth of `id`, and whether the walk hit a window twice.
fn depth_walk<'a, C>(windows: &'a BTreeMap<String, WindowState<C>>, id: &'a str) -> (usize, bool) {
    let mut visited = BTreeSet::new();
    let mut cyclic = false;
    let depth = depth_inner(windows, id, &mut visited, &mut cyclic);
    (depth, cyclic)
}

fn depth_inner<'a, C>(
    windows: &'a BTreeMap<String, WindowState<C>>,
    id: &'a str,
    visited: &mut BTreeSet<&'a str>,
    cyclic: &mut bool,
) -> usize {
    if !visited.insert(id) {
        *cyclic = true;
        return 0;
    }
    let Some(target) = windows
        .get(id)
        .and_then(|window| window.magnetic_snap.target_id())
    else {
        return 0;
    };
    let Some((target_id, _)) = windows.get_key_value(target) else {
        return 0;
    };
    1 + depth_inner(windows, target_id.as_str(), visited, cyclic)
}

/// Whether following snap attachments from `from` ever reaches `to`.
pub fn chain_reaches<C>(windows: &BTreeMap<String, WindowState<C>>, from: &str, to: &str) -> bool {
    let mut visited = BTreeSet::new();
    let mut current = from;
    loop {
        if current == to {
            return true;
        }
        if !visited.insert(current) {
            return false;
        }
        let Some(next) = windows
            .get(current)
            .and_then(|window| window.magnetic_snap.target_id())
        else {
            return false;
        };
        current = next;
    }
}

/// Ids in processing order: ascending depth, ties by id.
pub fn relaxation_order<C>(windows: &BTreeMap<String, WindowState<C>>) -> Vec<String> {
    let mut cycles = Vec::new();
    let mut order: Vec<(usize, &String)> = windows
        .keys()
        .map(|id| {
            let (depth, cyclic) = depth_walk(windows, id);
            if cyclic {
                cycles.push(id.as_str());
            }
            (depth, id)
        })
        .collect();
    if !cycles.is_empty() {
        tracing::warn!(windows = ?cycles, "magnetic snap cycle detected");
    }
    order.sort_by_key(|(depth, _)| *depth);
    order.into_iter().map(|(_, id)| id.clone()).collect()
}

/// Re-fits every window to `viewport` and re-applies snap relationships.
/// Returns the ids whose position or size changed, in processing order.
pub fn relax<C>(windows: &mut BTreeMap<String, WindowState<C>>, viewport: Viewport) -> Vec<String> {
    let mut changed = Vec::new();
    for id in relaxation_order(windows) {
        let Some(next) = relaxed_bounds(windows, &id, viewport) else {
            continue;
        };
        if let Some(window) = windows.get_mut(&id)
            && window.bounds() != next
        {
            window.position = next.position();
            window.size = next.size();
            changed.push(id);
        }
    }
    changed
}

fn relaxed_bounds<C>(
    windows: &BTreeMap<String, WindowState<C>>,
    id: &str,
    viewport: Viewport,
) -> Option<Bounds> {
    let window = windows.get(id)?;
    if window.docked.is_docked() {
        return Some(docked_bounds(window.docked, viewport));
    }
    let snap = &window.magnetic_snap;
    let position = if snap.is_empty() {
        window.position
    } else {
        let target = snap
            .target_id()
            .and_then(|target_id| windows.get(target_id))
            .map(|target| target.bounds());
        snapped_position(snap, window.position, window.size, viewport, target)
    };
    let position = clamp_position(position, window.size, viewport);
    Some(Bounds::from_parts(position, window.size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Point, Size};
    use crate::tracing_sub::SubscriberMakeWriter;
    use crate::window::{MagneticSnap, WindowConfig, WindowEdge, WindowRegistry};

    fn windows(wm: &WindowRegistry<()>) -> BTreeMap<String, WindowState<()>> {
        wm.iter().map(|w| (w.id.clone(), w.clone())).collect()
    }

    fn chain() -> WindowRegistry<()> {
        let mut wm = WindowRegistry::in_memory(Viewport::new(300, 100));
        wm.open(WindowConfig::new("a", ()).with_position(10, 10).with_size(40, 20));
        wm.open(WindowConfig::new("b", ()).with_position(50, 10).with_size(40, 20));
        wm.open(WindowConfig::new("c", ()).with_position(90, 10).with_size(40, 20));
        wm.update_magnetic_snap("b", MagneticSnap::attached_to("a", WindowEdge::Right));
        wm.update_magnetic_snap("c", MagneticSnap::attached_to("b", WindowEdge::Right));
        wm
    }

    #[test]
    fn depth_counts_chained_attachments() {
        let map = windows(&chain());
        assert_eq!(dependency_depth(&map, "a"), 0);
        assert_eq!(dependency_depth(&map, "b"), 1);
        assert_eq!(dependency_depth(&map, "c"), 2);
        assert_eq!(relaxation_order(&map), vec!["a", "b", "c"]);
    }

    #[test]
    fn cycle_terminates() {
        let mut wm = chain();
        wm.update_magnetic_snap("a", MagneticSnap::attached_to("c", WindowEdge::Left));
        let map = windows(&wm);
        assert_eq!(dependency_depth(&map, "a"), 3);
        assert!(chain_reaches(&map, "a", "c"));
        assert!(!chain_reaches(&map, "a", "zzz"));
        assert_eq!(snap_cycles(&map).into_iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(snap_cycles(&windows(&chain())).is_empty());
    }

    #[test]
    fn cycle_is_reported_once_per_pass() {
        let mut wm = chain();
        wm.update_magnetic_snap("a", MagneticSnap::attached_to("c", WindowEdge::Left));
        let mut map = windows(&wm);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relax.log");
        let subscriber = tracing_subscriber::fmt()
            .with_writer(SubscriberMakeWriter::to_file(&path).unwrap())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            relax(&mut map, Viewport::new(300, 100));
            relax(&mut map, Viewport::new(300, 100));
        });

        let log = std::fs::read_to_string(&path).unwrap();
        assert_eq!(log.matches("magnetic snap cycle detected").count(), 2);
        assert!(log.contains(r#"["a", "b", "c"]"#));
    }

    #[test]
    fn stale_target_ends_chain() {
        let mut wm = chain();
        wm.close("a");
        let map = windows(&wm);
        assert_eq!(dependency_depth(&map, "b"), 0);
        assert_eq!(dependency_depth(&map, "c"), 1);
    }

    #[test]
    fn chained_windows_follow_moved_anchor() {
        let mut wm = chain();
        wm.update_position("a", Point::new(100, 40));
        let mut map = windows(&wm);
        let changed = relax(&mut map, Viewport::new(300, 100));
        assert_eq!(changed, vec!["b", "c"]);
        assert_eq!(map["b"].position, Point::new(140, 10));
        assert_eq!(map["c"].position, Point::new(180, 10));
        assert_eq!(map["c"].size, Size::new(40, 20));
    }
}
