use super::{Bounds, Point, Size, Viewport, extent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

/// Which axes a resize may change and how small the window may get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeConstraints {
    pub resizable_x: bool,
    pub resizable_y: bool,
    pub min_size: Size,
}

/// The edge under `point` for a window occupying `rect`, if any.
///
/// Corners take priority over the sides; the top row is left to the header
/// except for its two corner cells.
pub fn resize_edge_at(rect: Bounds, point: Point) -> Option<ResizeEdge> {
    if !rect.contains(point) || rect.width < 3 || rect.height < 3 {
        return None;
    }
    let left = point.x == rect.x;
    let right = point.x == rect.right() - 1;
    let top = point.y == rect.y;
    let bottom = point.y == rect.bottom() - 1;
    match (left, right, top, bottom) {
        (true, _, true, _) => Some(ResizeEdge::TopLeft),
        (_, true, true, _) => Some(ResizeEdge::TopRight),
        (true, _, _, true) => Some(ResizeEdge::BottomLeft),
        (_, true, _, true) => Some(ResizeEdge::BottomRight),
        (_, _, _, true) => Some(ResizeEdge::Bottom),
        (true, _, _, _) => Some(ResizeEdge::Left),
        (_, true, _, _) => Some(ResizeEdge::Right),
        _ => None,
    }
}

/// Applies a pointer delta to the grabbed edge of `start`.
///
/// Disabled axes ignore the delta. Width and height never drop below
/// `constraints.min_size`; shrinking past the minimum from a left/top edge
/// keeps the opposite edge fixed. Growth stops at the viewport edges.
pub fn apply_resize_drag(
    start: Bounds,
    edge: ResizeEdge,
    delta: Point,
    constraints: ResizeConstraints,
    viewport: Viewport,
) -> Bounds {
    let dx = if constraints.resizable_x { delta.x } else { 0 };
    let dy = if constraints.resizable_y { delta.y } else { 0 };
    let mut x = start.x;
    let mut y = start.y;
    let mut width = extent(start.width);
    let mut height = extent(start.height);

    if edge.moves_left() {
        x += dx;
        width -= dx;
    } else if edge.moves_right() {
        width += dx;
    }
    if edge.moves_top() {
        y += dy;
        height -= dy;
    } else if edge.moves_bottom() {
        height += dy;
    }

    let min_w = extent(constraints.min_size.width.max(1));
    let min_h = extent(constraints.min_size.height.max(1));
    if width < min_w {
        if edge.moves_left() {
            x -= min_w - width;
        }
        width = min_w;
    }
    if height < min_h {
        if edge.moves_top() {
            y -= min_h - height;
        }
        height = min_h;
    }

    let max_x = extent(viewport.width);
    let max_y = extent(viewport.height);
    if dx != 0 {
        if edge.moves_left() && x < 0 {
            width += x;
            x = 0;
        }
        if edge.moves_right() && x + width > max_x {
            width = max_x - x;
        }
    }
    if dy != 0 {
        if edge.moves_top() && y < 0 {
            height += y;
            y = 0;
        }
        if edge.moves_bottom() && y + height > max_y {
            height = max_y - y;
        }
    }

    Bounds {
        x,
        y,
        width: width.max(min_w.min(extent(start.width))).max(1) as u32,
        height: height.max(min_h.min(extent(start.height))).max(1) as u32,
    }
}
