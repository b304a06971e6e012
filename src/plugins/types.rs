//! Core plugin types
//!
//! This module defines the runtime representation of a discovered plugin:
//! the resolved module reference, the informational metadata block, the
//! `PluginInstance` trait every implementation object satisfies, and the
//! `PluginDescriptor` record the registry hands out to callers.

use std::any::Any;
use std::path::{Path, PathBuf};

use super::category::{Capability, Category};

/// How a plugin's implementation is located on disk.
///
/// A plugin ships either as a single file next to its metadata file or as a
/// subdirectory of the same base name containing an entry-point file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleReference {
    /// A single implementation file co-located with the metadata file.
    File(PathBuf),

    /// A subdirectory containing the entry-point file.
    Directory {
        /// The module subdirectory.
        dir: PathBuf,
        /// The entry-point file inside `dir`.
        entry: PathBuf,
    },
}

impl ModuleReference {
    /// The module base name, as declared by the metadata file's `Module` key.
    pub fn base_name(&self) -> &str {
        let stem = match self {
            ModuleReference::File(path) => path.file_stem(),
            ModuleReference::Directory { dir, .. } => dir.file_name(),
        };
        stem.and_then(|s| s.to_str()).unwrap_or_default()
    }

    /// The on-disk path of the implementation (file or directory).
    pub fn path(&self) -> &Path {
        match self {
            ModuleReference::File(path) => path,
            ModuleReference::Directory { dir, .. } => dir,
        }
    }
}

/// Informational metadata from the `[Documentation]` section.
///
/// No runtime effect; surfaced in the host's plugin-chooser UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginMetadata {
    pub author: Option<String>,
    pub version: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

/// The trait every live plugin implementation object satisfies.
///
/// The registry never interprets domain operations. It checks the
/// capability set structurally at discovery time and otherwise treats the
/// instance as opaque; callers downcast via [`PluginInstance::as_any`] to
/// the concrete domain trait (audio source, importer, ...) they expect.
pub trait PluginInstance: Any + Send {
    /// The capabilities this implementation exposes. Checked against the
    /// declared category's contract when the plugin is accepted.
    fn capabilities(&self) -> Vec<Capability>;

    /// Upcast for downcasting to the concrete implementation type.
    fn as_any(&self) -> &dyn Any;
}

/// One discovered plugin: identity, module reference, metadata, and the
/// instantiated implementation.
///
/// Descriptors are owned by the registry for the lifetime of a scan and
/// replaced wholesale on re-scan. Consumers borrow them for the duration of
/// a single operation.
pub struct PluginDescriptor {
    name: String,
    category: Category,
    module: ModuleReference,
    metadata: PluginMetadata,
    /// Path of the metadata file this descriptor was built from.
    source: PathBuf,
    instance: Box<dyn PluginInstance>,
    enabled: bool,
}

impl PluginDescriptor {
    pub(crate) fn new(
        name: String,
        category: Category,
        module: ModuleReference,
        metadata: PluginMetadata,
        source: PathBuf,
        instance: Box<dyn PluginInstance>,
    ) -> Self {
        Self {
            name,
            category,
            module,
            metadata,
            source,
            instance,
            enabled: false,
        }
    }

    /// Human-readable plugin name, unique within its category.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category this plugin belongs to.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// How the implementation was located on disk.
    pub fn module(&self) -> &ModuleReference {
        &self.module
    }

    /// Informational metadata (author, version, website, description).
    pub fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    /// Path of the metadata file this descriptor was discovered from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The live implementation instance. Callers downcast to the domain
    /// trait they expect and invoke operations directly.
    pub fn instance(&self) -> &dyn PluginInstance {
        self.instance.as_ref()
    }

    /// Whether this plugin is the active selection for its category.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl std::fmt::Debug for dyn PluginInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginInstance")
            .field("capabilities", &self.capabilities())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("module", &self.module)
            .field("metadata", &self.metadata)
            .field("source", &self.source)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
