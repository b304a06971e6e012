//! Plugin instantiation
//!
//! Turning a resolved [`ModuleReference`] into a live implementation object
//! is behind the [`PluginLoader`] trait so the discovery and lookup logic
//! stays independent of the loading mechanism. The shipping loader is
//! [`FactoryLoader`]: plugin implementations are linked into the host binary
//! and registered as constructor closures keyed by module base name, so
//! "loading" is a table lookup. The metadata files on disk remain the source
//! of truth for which plugins exist and how they are described.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{FreeseerError, Result};

use super::types::{ModuleReference, PluginInstance};

/// File name stem of the entry-point file inside a module directory.
const ENTRY_POINT_STEM: &str = "plugin";

/// Instantiates plugin implementations from resolved module references.
pub trait PluginLoader {
    /// File extension (without the leading dot) of implementation files.
    /// Used by discovery to resolve module references on disk.
    fn impl_extension(&self) -> &str;

    /// Instantiate the implementation a module reference points at.
    fn load(&self, module: &ModuleReference) -> Result<Box<dyn PluginInstance>>;
}

/// Resolve a metadata file's `Module` declaration against the filesystem.
///
/// `dir` is the directory containing the metadata file. The implementation
/// is either a single co-located `<module>.<ext>` file or a `<module>/`
/// subdirectory containing `plugin.<ext>`.
pub fn resolve_module(dir: &Path, name: &str, module: &str, ext: &str) -> Result<ModuleReference> {
    let file = dir.join(format!("{module}.{ext}"));
    if file.is_file() {
        return Ok(ModuleReference::File(file));
    }

    let subdir = dir.join(module);
    if subdir.is_dir() {
        let entry = subdir.join(format!("{ENTRY_POINT_STEM}.{ext}"));
        if entry.is_file() {
            return Ok(ModuleReference::Directory { dir: subdir, entry });
        }
        return Err(FreeseerError::MissingImplementation {
            name: name.to_string(),
            reason: format!(
                "module directory {} has no {ENTRY_POINT_STEM}.{ext} entry point",
                subdir.display()
            ),
        });
    }

    Err(FreeseerError::MissingImplementation {
        name: name.to_string(),
        reason: format!(
            "no {module}.{ext} file or {module}/ directory in {}",
            dir.display()
        ),
    })
}

/// Constructor closure producing a fresh implementation instance.
pub type PluginFactory = Box<dyn Fn() -> Box<dyn PluginInstance> + Send>;

/// A [`PluginLoader`] backed by a table of registered constructors.
///
/// The host application registers one factory per module base name at
/// startup. A module reference that resolves on disk but has no registered
/// factory is reported as a missing implementation.
pub struct FactoryLoader {
    extension: String,
    factories: HashMap<String, PluginFactory>,
}

impl FactoryLoader {
    /// Create an empty loader resolving `<module>.<extension>` files.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            factories: HashMap::new(),
        }
    }

    /// Register a constructor for a module base name. Replaces any
    /// previously registered factory for the same module.
    pub fn register<F>(&mut self, module: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn PluginInstance> + Send + 'static,
    {
        self.factories.insert(module.into(), Box::new(factory));
    }

    /// Number of registered factories.
    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }
}

impl PluginLoader for FactoryLoader {
    fn impl_extension(&self) -> &str {
        &self.extension
    }

    fn load(&self, module: &ModuleReference) -> Result<Box<dyn PluginInstance>> {
        let base = module.base_name();
        let factory =
            self.factories
                .get(base)
                .ok_or_else(|| FreeseerError::MissingImplementation {
                    name: base.to_string(),
                    reason: format!("no factory registered for module '{base}'"),
                })?;
        Ok(factory())
    }
}
