//! Floating window layout and docking engine.
//!
//! [`window::WindowRegistry`] owns every open panel: geometry, stacking,
//! focus, docking and magnetic snap relationships. Geometry is written
//! through to a [`persistence::LayoutStore`] and restored when a window with
//! the same id is opened again. [`window::gesture::GestureController`] turns
//! pointer input into coalesced, once-per-frame layout commits.

pub mod config;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod layout;
pub mod persistence;
pub mod runner;
pub mod tracing_sub;
pub mod window;
