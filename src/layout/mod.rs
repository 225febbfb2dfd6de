pub mod floating;
pub mod relax;
pub mod snap;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_EXTENT;

/// Top-left corner of a window in viewport units. Signed so raw drag
/// candidates can sit off-screen before they are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Caps both axes at [`MAX_EXTENT`].
    pub fn bounded(self) -> Self {
        Self::new(self.width.min(MAX_EXTENT), self.height.min(MAX_EXTENT))
    }
}

/// Position plus extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(extent(self.width))
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(extent(self.height))
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Current drawable area. The engine never caches anything derived from it;
/// every clamp and docked-bounds calculation reads the latest value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Caps both axes at [`MAX_EXTENT`].
    pub fn bounded(self) -> Self {
        Self::new(self.width.min(MAX_EXTENT), self.height.min(MAX_EXTENT))
    }
}

/// Which half of the viewport a window occupies, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockSide {
    #[default]
    None,
    Left,
    Right,
}

impl DockSide {
    pub fn is_docked(self) -> bool {
        self != DockSide::None
    }
}

/// Keeps a window of `size` inside the viewport.
///
/// `x` is clamped to `[0, max(0, viewport.width - width)]` and `y` likewise, so
/// a window wider (or taller) than the viewport collapses to `0` on that axis.
pub fn clamp_position(position: Point, size: Size, viewport: Viewport) -> Point {
    let max_x = extent(viewport.width.saturating_sub(size.width));
    let max_y = extent(viewport.height.saturating_sub(size.height));
    Point {
        x: position.x.clamp(0, max_x),
        y: position.y.clamp(0, max_y),
    }
}

pub fn docked_bounds(side: DockSide, viewport: Viewport) -> Bounds {
    let half = viewport.width / 2;
    match side {
        DockSide::None => Bounds::default(),
        DockSide::Left => Bounds::new(0, 0, half, viewport.height),
        DockSide::Right => Bounds::new(extent(half), 0, half, viewport.height),
    }
}

/// Dock hot-zone under the pointer. Only the horizontal position matters;
/// the zones span the full viewport height.
pub fn dock_zone(pointer: Point, viewport: Viewport, threshold: u32) -> DockSide {
    if viewport.width == 0 {
        return DockSide::None;
    }
    let right_zone = extent(viewport.width.saturating_sub(threshold));
    if pointer.x < extent(threshold) {
        DockSide::Left
    } else if pointer.x >= right_zone {
        DockSide::Right
    } else {
        DockSide::None
    }
}

/// An unsigned extent as a signed coordinate offset, saturating at `i32::MAX`.
pub(crate) fn extent(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
