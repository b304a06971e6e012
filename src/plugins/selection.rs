//! Active-selection persistence
//!
//! Exclusive categories (AudioMixer, VideoMixer, Output) remember which
//! plugin is the current selection across restarts. The store is a small
//! JSON file mapping category tag to plugin name, written on every selection
//! change and read at registry initialization. A missing file reads as no
//! selections; read and write failures surface as `Persistence` errors and
//! never touch in-memory state.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FreeseerError, Result};

use super::category::Category;

/// The persisted selection map: category tag -> enabled plugin name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections {
    active: BTreeMap<String, String>,
}

impl Selections {
    /// The selected plugin name for a category, if any.
    pub fn get(&self, category: &Category) -> Option<&str> {
        self.active.get(category.as_str()).map(String::as_str)
    }

    /// Record a selection, replacing any previous one for the category.
    pub fn set(&mut self, category: &Category, name: impl Into<String>) {
        self.active.insert(category.as_str().to_string(), name.into());
    }

    /// Remove the selection for a category.
    pub fn clear(&mut self, category: &Category) {
        self.active.remove(category.as_str());
    }

    /// Iterate over (category tag, plugin name) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.active.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether no selections are recorded.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// JSON-file-backed store for active selections.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    /// Create a store backed by the given file path. The file is not
    /// touched until the first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted selections. A missing file is an empty map.
    pub fn load(&self) -> Result<Selections> {
        if !self.path.exists() {
            return Ok(Selections::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            FreeseerError::Persistence(format!("failed to read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            FreeseerError::Persistence(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    /// Write the selections, creating parent directories as needed.
    pub fn save(&self, selections: &Selections) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FreeseerError::Persistence(format!(
                    "failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let content = serde_json::to_string_pretty(selections)
            .map_err(|e| FreeseerError::Persistence(format!("failed to encode selections: {e}")))?;
        fs::write(&self.path, content).map_err(|e| {
            FreeseerError::Persistence(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = SelectionStore::new(tmp.path().join("plugin-selections.json"));
        let selections = store.load().unwrap();
        assert!(selections.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = SelectionStore::new(tmp.path().join("plugin-selections.json"));

        let mut selections = Selections::default();
        selections.set(&Category::AUDIO_MIXER, "Pulse Mixer");
        selections.set(&Category::OUTPUT, "Ogg Output");
        store.save(&selections).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, selections);
        assert_eq!(loaded.get(&Category::AUDIO_MIXER), Some("Pulse Mixer"));
        assert_eq!(loaded.get(&Category::VIDEO_MIXER), None);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let store = SelectionStore::new(tmp.path().join("nested/deeper/selections.json"));

        let mut selections = Selections::default();
        selections.set(&Category::OUTPUT, "Ogg Output");
        store.save(&selections).unwrap();

        assert_eq!(store.load().unwrap().get(&Category::OUTPUT), Some("Ogg Output"));
    }

    #[test]
    fn test_set_replaces_previous_selection() {
        let mut selections = Selections::default();
        selections.set(&Category::AUDIO_MIXER, "Old Mixer");
        selections.set(&Category::AUDIO_MIXER, "New Mixer");
        assert_eq!(selections.get(&Category::AUDIO_MIXER), Some("New Mixer"));
        assert_eq!(selections.iter().count(), 1);
    }

    #[test]
    fn test_clear_selection() {
        let mut selections = Selections::default();
        selections.set(&Category::AUDIO_MIXER, "Mixer");
        selections.clear(&Category::AUDIO_MIXER);
        assert!(selections.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_persistence_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plugin-selections.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SelectionStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(matches!(err, FreeseerError::Persistence(_)));
    }

    #[test]
    fn test_save_unwritable_path_is_persistence_error() {
        let tmp = TempDir::new().unwrap();
        // Parent "directory" is actually a file, so the write must fail.
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let store = SelectionStore::new(blocker.join("selections.json"));
        let err = store.save(&Selections::default()).unwrap_err();
        assert!(matches!(err, FreeseerError::Persistence(_)));
    }
}
