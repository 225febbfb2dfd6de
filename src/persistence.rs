//! Per-window geometry persistence.
//!
//! The registry talks to storage only through [`LayoutStore`]. Stores hand
//! back whatever they can parse; the registry treats every error as "nothing
//! stored" and carries on with config defaults.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{Bounds, DockSide, Point, Size};
use crate::window::MagneticSnap;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("layout store i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("layout store holds malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted subset of a window's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWindowState {
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub is_minimized: bool,
    #[serde(default)]
    pub docked: DockSide,
    #[serde(default)]
    pub magnetic_snap: MagneticSnap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_docked: Option<Bounds>,
}

impl StoredWindowState {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            is_minimized: false,
            docked: DockSide::None,
            magnetic_snap: MagneticSnap::default(),
            before_docked: None,
        }
    }
}

pub type StoredLayout = BTreeMap<String, StoredWindowState>;

pub trait LayoutStore {
    fn load(&self) -> Result<StoredLayout, PersistError>;
    fn save(&mut self, layout: &StoredLayout) -> Result<(), PersistError>;
}

impl<T: LayoutStore + ?Sized> LayoutStore for Box<T> {
    fn load(&self) -> Result<StoredLayout, PersistError> {
        (**self).load()
    }

    fn save(&mut self, layout: &StoredLayout) -> Result<(), PersistError> {
        (**self).save(layout)
    }
}

/// Parses a stored layout document.
///
/// A document that is not a JSON object is an error. Individual entries that
/// fail to parse are dropped with a warning so one bad record does not cost
/// the user every other window's geometry.
pub fn parse_layout(text: &str) -> Result<StoredLayout, PersistError> {
    if text.trim().is_empty() {
        return Ok(StoredLayout::new());
    }
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(text)?;
    let mut layout = StoredLayout::new();
    for (id, value) in raw {
        match serde_json::from_value::<StoredWindowState>(value) {
            Ok(state) => {
                layout.insert(id, state);
            }
            Err(err) => {
                tracing::warn!(window_id = %id, error = %err, "dropping malformed stored window");
            }
        }
    }
    Ok(layout)
}

pub fn serialize_layout(layout: &StoredLayout) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(layout)?)
}

/// In-memory store. Clones share the same backing text, which lets a test
/// hand the "same storage" to a fresh registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw text, which need not be valid.
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            contents: Rc::new(RefCell::new(Some(text.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl LayoutStore for MemoryStore {
    fn load(&self) -> Result<StoredLayout, PersistError> {
        match self.contents.borrow().as_deref() {
            Some(text) => parse_layout(text),
            None => Ok(StoredLayout::new()),
        }
    }

    fn save(&mut self, layout: &StoredLayout) -> Result<(), PersistError> {
        let text = serialize_layout(layout)?;
        *self.contents.borrow_mut() = Some(text);
        Ok(())
    }
}

/// Stores the layout as a JSON document on disk. A missing file loads as an
/// empty layout.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LayoutStore for JsonFileStore {
    fn load(&self) -> Result<StoredLayout, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_layout(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(StoredLayout::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, layout: &StoredLayout) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serialize_layout(layout)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowEdge;

    #[test]
    fn parse_drops_only_malformed_entries() {
        let text = r#"{
            "chat": {"position": {"x": 1, "y": 2}, "size": {"width": 30, "height": 10}},
            "broken": {"position": "nope"}
        }"#;
        let layout = parse_layout(text).unwrap();
        assert_eq!(layout.len(), 1);
        let chat = &layout["chat"];
        assert_eq!(chat.position, Point::new(1, 2));
        assert_eq!(chat.docked, DockSide::None);
        assert!(chat.magnetic_snap.is_empty());
    }

    #[test]
    fn parse_rejects_non_object_document() {
        assert!(matches!(parse_layout("[1, 2"), Err(PersistError::Json(_))));
        assert!(parse_layout("   ").unwrap().is_empty());
    }

    #[test]
    fn memory_store_clones_share_contents() {
        let mut store = MemoryStore::new();
        let reader = store.clone();
        let mut layout = StoredLayout::new();
        let mut state = StoredWindowState::new(Point::new(3, 4), Size::new(20, 8));
        state.magnetic_snap = MagneticSnap::attached_to("chat", WindowEdge::Bottom);
        layout.insert("inventory".to_string(), state.clone());
        store.save(&layout).unwrap();
        assert_eq!(reader.load().unwrap()["inventory"], state);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }
}
