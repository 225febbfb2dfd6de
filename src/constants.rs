//! Shared crate-wide constants.

/// Distance (in viewport units) under which a dragged window's edge is pulled
/// onto a screen edge or onto another window's edge.
pub const MAGNETIC_THRESHOLD: u32 = 10;

/// Distance from the left/right viewport edge at which releasing a drag docks
/// the window into that half of the screen. Twice [`MAGNETIC_THRESHOLD`].
pub const SNAP_THRESHOLD: u32 = MAGNETIC_THRESHOLD * 2;

/// Smallest width a window can be resized to.
pub const FLOATING_MIN_WIDTH: u32 = 6;

/// Smallest height a window can be resized to.
pub const FLOATING_MIN_HEIGHT: u32 = 3;

/// Largest width or height the engine accepts for a window or viewport.
/// Larger values (typically from a hand-edited layout file) are capped.
pub const MAX_EXTENT: u32 = 1 << 20;

/// Size given to windows whose config does not specify one.
pub const DEFAULT_WINDOW_WIDTH: u32 = 40;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 12;
