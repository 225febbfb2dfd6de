//! Engine tuning knobs.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, FLOATING_MIN_HEIGHT, FLOATING_MIN_WIDTH,
    MAGNETIC_THRESHOLD, SNAP_THRESHOLD,
};
use crate::layout::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pull distance for edge and window-to-window snapping.
    pub magnetic_threshold: u32,
    /// Width of the left/right dock hot-zones.
    pub dock_threshold: u32,
    pub min_window_size: Size,
    pub default_window_size: Size,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            magnetic_threshold: MAGNETIC_THRESHOLD,
            dock_threshold: SNAP_THRESHOLD,
            min_window_size: Size::new(FLOATING_MIN_WIDTH, FLOATING_MIN_HEIGHT),
            default_window_size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file. Unreadable or malformed files fall back to
    /// the defaults.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "config unreadable, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "config malformed, using defaults");
                Self::default()
            }
        }
    }

    /// Sets the magnetic threshold and keeps the dock hot-zone at twice its
    /// width.
    pub fn with_magnetic_threshold(mut self, threshold: u32) -> Self {
        self.magnetic_threshold = threshold;
        self.dock_threshold = threshold.saturating_mul(2);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"magnetic_threshold": 4}}"#).unwrap();
        let config = EngineConfig::load(file.path());
        assert_eq!(config.magnetic_threshold, 4);
        assert_eq!(config.dock_threshold, SNAP_THRESHOLD);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert_eq!(EngineConfig::load(file.path()), EngineConfig::default());
    }

    #[test]
    fn dock_threshold_tracks_magnetic_threshold() {
        let config = EngineConfig::default().with_magnetic_threshold(3);
        assert_eq!(config.dock_threshold, 6);
    }
}
