//! Magnetic snapping for dragged windows.
//!
//! Given the position a drag would place a window at, [`resolve_snap`] pulls
//! the window onto nearby screen edges and onto the edges of other windows,
//! and reports the relationship it formed as a [`MagneticSnap`] so the layout
//! can be recomputed later (see [`crate::layout::relax`]).
//!
//! Screen edges are checked first. Window edges are checked against the
//! screen-adjusted position; when several window edges are in range the
//! nearest one wins and ties go to the earliest target in iteration order.
//! A window-edge snap on an axis replaces any screen-edge flag on that axis,
//! so the descriptor always explains the final position exactly.

use super::{Bounds, Point, Size, Viewport};
use crate::window::{MagneticSnap, WindowAttachment, WindowEdge};

/// Another window the dragged window may attach to.
#[derive(Debug, Clone, Copy)]
pub struct SnapTarget<'a> {
    pub id: &'a str,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapResult {
    pub position: Point,
    pub snap: MagneticSnap,
}

#[derive(Debug, Clone)]
struct WindowMatch {
    distance: i64,
    position: Point,
    attachment: WindowAttachment,
}

// Edge arithmetic runs in i64 so extreme extents cannot overflow.
fn narrow(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub fn resolve_snap(
    candidate: Point,
    size: Size,
    viewport: Viewport,
    targets: &[SnapTarget<'_>],
    threshold: u32,
) -> SnapResult {
    let t = i64::from(threshold);
    let w = i64::from(size.width);
    let h = i64::from(size.height);
    let vw = i64::from(viewport.width);
    let vh = i64::from(viewport.height);
    let mut x = i64::from(candidate.x);
    let mut y = i64::from(candidate.y);
    let mut snap = MagneticSnap::default();

    if x.abs() < t {
        x = 0;
        snap.left = true;
    } else if (x + w - vw).abs() < t {
        x = vw - w;
        snap.right = true;
    }
    if y.abs() < t {
        y = 0;
        snap.top = true;
    } else if (y + h - vh).abs() < t {
        y = vh - h;
        snap.bottom = true;
    }

    let mut best: Option<WindowMatch> = None;
    let mut consider = |distance: i64, (px, py): (i64, i64), target: &SnapTarget<'_>, edge| {
        if distance >= t {
            return;
        }
        if best.as_ref().is_some_and(|b| b.distance <= distance) {
            return;
        }
        best = Some(WindowMatch {
            distance,
            position: Point::new(narrow(px), narrow(py)),
            attachment: WindowAttachment {
                window_id: target.id.to_string(),
                edge,
            },
        });
    };

    for target in targets {
        let other_x = i64::from(target.bounds.x);
        let other_y = i64::from(target.bounds.y);
        let other_right = other_x + i64::from(target.bounds.width);
        let other_bottom = other_y + i64::from(target.bounds.height);
        let this_right = x + w;
        let this_bottom = y + h;

        let vertical_overlap = !(y > other_bottom || this_bottom < other_y);
        if vertical_overlap {
            consider(
                (this_right - other_x).abs(),
                (other_x - w, y),
                target,
                WindowEdge::Left,
            );
            consider(
                (x - other_right).abs(),
                (other_right, y),
                target,
                WindowEdge::Right,
            );
        }

        let horizontal_overlap = !(x > other_right || this_right < other_x);
        if horizontal_overlap {
            consider(
                (this_bottom - other_y).abs(),
                (x, other_y - h),
                target,
                WindowEdge::Top,
            );
            consider(
                (y - other_bottom).abs(),
                (x, other_bottom),
                target,
                WindowEdge::Bottom,
            );
        }
    }

    let mut position = Point::new(narrow(x), narrow(y));
    if let Some(found) = best {
        if found.attachment.edge.is_horizontal() {
            snap.left = false;
            snap.right = false;
        } else {
            snap.top = false;
            snap.bottom = false;
        }
        position = found.position;
        snap.window = Some(found.attachment);
    }

    SnapResult { position, snap }
}

/// Recomputes a snapped window's position from its descriptor.
///
/// Screen-edge flags are applied first, then the window attachment (if its
/// target still exists) overrides its axis. Axes the descriptor says nothing
/// about keep `current`. The result is not clamped.
pub fn snapped_position(
    snap: &MagneticSnap,
    current: Point,
    size: Size,
    viewport: Viewport,
    target: Option<Bounds>,
) -> Point {
    let w = i64::from(size.width);
    let h = i64::from(size.height);
    let mut x = i64::from(current.x);
    let mut y = i64::from(current.y);

    if snap.left {
        x = 0;
    } else if snap.right {
        x = i64::from(viewport.width) - w;
    }
    if snap.top {
        y = 0;
    } else if snap.bottom {
        y = i64::from(viewport.height) - h;
    }

    if let (Some(attachment), Some(other)) = (snap.window.as_ref(), target) {
        let other_x = i64::from(other.x);
        let other_y = i64::from(other.y);
        match attachment.edge {
            WindowEdge::Left => x = other_x - w,
            WindowEdge::Right => x = other_x + i64::from(other.width),
            WindowEdge::Top => y = other_y - h,
            WindowEdge::Bottom => y = other_y + i64::from(other.height),
        }
    }

    Point::new(narrow(x), narrow(y))
}
