//! Per-user profile paths
//!
//! A `Profile` tells the plugin registry where to look: the per-user
//! configuration root (whose `plugins` subdirectory is the highest-priority
//! search path and which holds the selection store), an optional
//! source-tree plugin directory for development checkouts, and an optional
//! installed-package plugin directory. Either of the optional directories
//! may legitimately be absent depending on deployment mode.

use std::path::{Path, PathBuf};

/// Name of the per-user plugin override subdirectory.
const USER_PLUGIN_DIR: &str = "plugins";

/// File name of the persisted active-selection store.
const SELECTION_STORE_FILE: &str = "plugin-selections.json";

/// Filesystem locations for one user profile.
#[derive(Debug, Clone)]
pub struct Profile {
    config_root: PathBuf,
    source_tree_dir: Option<PathBuf>,
    install_dir: Option<PathBuf>,
}

impl Profile {
    /// Create a profile with an explicit configuration root.
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
            source_tree_dir: None,
            install_dir: None,
        }
    }

    /// Create a profile rooted at the platform configuration directory
    /// (`~/.config/freeseer` on Linux).
    pub fn from_env() -> Self {
        let root = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("freeseer");
        Self::new(root)
    }

    /// Add a source-tree plugin directory (development checkouts).
    pub fn with_source_tree_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_tree_dir = Some(dir.into());
        self
    }

    /// Add an installed-package plugin directory.
    pub fn with_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(dir.into());
        self
    }

    /// The per-user configuration root.
    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Plugin search directories in priority order: user override, then
    /// source tree, then installed package.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.config_root.join(USER_PLUGIN_DIR)];
        if let Some(dir) = &self.source_tree_dir {
            paths.push(dir.clone());
        }
        if let Some(dir) = &self.install_dir {
            paths.push(dir.clone());
        }
        paths
    }

    /// Path of the persisted active-selection store.
    pub fn selection_store_path(&self) -> PathBuf {
        self.config_root.join(SELECTION_STORE_FILE)
    }
}
