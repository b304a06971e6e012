//! Plugin registry
//!
//! The `PluginRegistry` owns every discovered plugin descriptor and exposes
//! the lookup surface the host application uses: by name within a category,
//! all plugins, per-category views, and convenience accessors for the six
//! built-in categories. It also manages the persisted active selection of
//! exclusive categories.
//!
//! One registry instance serves the whole application; construct it once at
//! startup and pass it by reference to whoever needs it. All mutation goes
//! through `&mut self`, so a multi-threaded host wraps the registry in its
//! own lock; borrowed descriptors live only for the duration of one
//! operation.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::{FreeseerError, Result};
use crate::profile::Profile;

use super::category::{Category, CategoryTable};
use super::discovery::discover_plugins;
use super::loader::PluginLoader;
use super::selection::{SelectionStore, Selections};
use super::types::PluginDescriptor;

/// Registry of discovered plugins, plus the active selection per exclusive
/// category.
pub struct PluginRegistry {
    profile: Profile,
    table: CategoryTable,
    loader: Box<dyn PluginLoader>,
    store: SelectionStore,
    selections: Selections,
    descriptors: Vec<PluginDescriptor>,
    index: HashMap<(Category, String), usize>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("profile", &self.profile)
            .field("table", &self.table)
            .field("store", &self.store)
            .field("selections", &self.selections)
            .field("descriptors", &self.descriptors)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl PluginRegistry {
    /// Build a registry: read the persisted selections, run the initial
    /// discovery pass over the profile's search paths, and mark the
    /// restored selections enabled.
    ///
    /// An unreadable selection store is surfaced as `Persistence`; a
    /// missing store file is simply no selections.
    pub fn new(
        profile: Profile,
        table: CategoryTable,
        loader: Box<dyn PluginLoader>,
    ) -> Result<Self> {
        let store = SelectionStore::new(profile.selection_store_path());
        let selections = store.load()?;

        let mut registry = Self {
            profile,
            table,
            loader,
            store,
            selections,
            descriptors: Vec::new(),
            index: HashMap::new(),
        };
        registry.rescan()?;
        Ok(registry)
    }

    /// Discard all descriptors and re-run discovery over the profile's
    /// search paths. Idempotent for an unchanged filesystem. Persisted
    /// selections are re-applied; a selection naming a plugin that no
    /// longer exists is ignored with a logged notice.
    pub fn rescan(&mut self) -> Result<()> {
        let descriptors = discover_plugins(
            &self.profile.search_paths(),
            &self.table,
            self.loader.as_ref(),
        )?;

        self.index = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| ((d.category().clone(), d.name().to_string()), i))
            .collect();
        self.descriptors = descriptors;

        for (tag, name) in self.selections.iter() {
            let category = Category::new(tag);
            if !self.table.is_exclusive(&category) {
                warn!(category = tag, "ignoring persisted selection for non-exclusive category");
                continue;
            }
            match self.index.get(&(category, name.to_string())) {
                Some(&slot) => self.descriptors[slot].set_enabled(true),
                None => info!(
                    category = tag,
                    plugin = name,
                    "persisted selection no longer matches a discovered plugin"
                ),
            }
        }

        info!(plugins = self.descriptors.len(), "Plugin scan complete");
        Ok(())
    }

    /// The category table this registry enforces.
    pub fn categories(&self) -> &CategoryTable {
        &self.table
    }

    /// The profile this registry was built from.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Look up one plugin by name within a category. A name that exists
    /// only in another category is `NotFound`.
    pub fn get_plugin_by_name(&self, name: &str, category: &Category) -> Result<&PluginDescriptor> {
        self.index
            .get(&(category.clone(), name.to_string()))
            .map(|&slot| &self.descriptors[slot])
            .ok_or_else(|| FreeseerError::NotFound {
                name: name.to_string(),
                category: category.as_str().to_string(),
            })
    }

    /// All discovered plugins, in discovery order (search-path priority,
    /// then file name within a directory).
    pub fn get_all_plugins(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    /// All plugins of one category, in discovery order. Unregistered
    /// category tags are `InvalidCategory`.
    pub fn get_plugins_of_category(&self, category: &Category) -> Result<Vec<&PluginDescriptor>> {
        if !self.table.is_registered(category) {
            return Err(FreeseerError::InvalidCategory(
                category.as_str().to_string(),
            ));
        }
        Ok(self
            .descriptors
            .iter()
            .filter(|d| d.category() == category)
            .collect())
    }

    /// Audio capture source plugins.
    pub fn audio_inputs(&self) -> Result<Vec<&PluginDescriptor>> {
        self.get_plugins_of_category(&Category::AUDIO_INPUT)
    }

    /// Audio mixer plugins.
    pub fn audio_mixers(&self) -> Result<Vec<&PluginDescriptor>> {
        self.get_plugins_of_category(&Category::AUDIO_MIXER)
    }

    /// Video capture source plugins.
    pub fn video_inputs(&self) -> Result<Vec<&PluginDescriptor>> {
        self.get_plugins_of_category(&Category::VIDEO_INPUT)
    }

    /// Video mixer plugins.
    pub fn video_mixers(&self) -> Result<Vec<&PluginDescriptor>> {
        self.get_plugins_of_category(&Category::VIDEO_MIXER)
    }

    /// Talk-list importer plugins.
    pub fn importers(&self) -> Result<Vec<&PluginDescriptor>> {
        self.get_plugins_of_category(&Category::IMPORTER)
    }

    /// Recording output plugins.
    pub fn outputs(&self) -> Result<Vec<&PluginDescriptor>> {
        self.get_plugins_of_category(&Category::OUTPUT)
    }

    /// The currently enabled plugin of an exclusive category, if any.
    /// Unregistered category tags are `InvalidCategory`.
    pub fn active_plugin(&self, category: &Category) -> Result<Option<&PluginDescriptor>> {
        if !self.table.is_registered(category) {
            return Err(FreeseerError::InvalidCategory(
                category.as_str().to_string(),
            ));
        }
        Ok(self
            .descriptors
            .iter()
            .find(|d| d.category() == category && d.is_enabled()))
    }

    /// Make `name` the active selection of an exclusive category,
    /// deactivating any previous selection, and persist the change.
    ///
    /// The category must be registered and exclusive (`InvalidCategory`
    /// otherwise) and the plugin must exist (`NotFound`). If persisting
    /// fails the in-memory selection stays applied and `Persistence` is
    /// returned; the selection simply will not survive a restart.
    pub fn set_active(&mut self, category: &Category, name: &str) -> Result<()> {
        let slot = self.exclusive_slot(category, name)?;

        for descriptor in &mut self.descriptors {
            if descriptor.category() == category {
                descriptor.set_enabled(false);
            }
        }
        self.descriptors[slot].set_enabled(true);
        self.selections.set(category, name);

        info!(category = %category, plugin = name, "Active plugin selected");
        self.store.save(&self.selections)
    }

    /// Clear the active selection of an exclusive category and persist the
    /// change. Clearing a category with no selection is a no-op.
    pub fn clear_active(&mut self, category: &Category) -> Result<()> {
        self.require_exclusive(category)?;

        for descriptor in &mut self.descriptors {
            if descriptor.category() == category {
                descriptor.set_enabled(false);
            }
        }
        self.selections.clear(category);
        self.store.save(&self.selections)
    }

    fn exclusive_slot(&self, category: &Category, name: &str) -> Result<usize> {
        self.require_exclusive(category)?;
        self.index
            .get(&(category.clone(), name.to_string()))
            .copied()
            .ok_or_else(|| FreeseerError::NotFound {
                name: name.to_string(),
                category: category.as_str().to_string(),
            })
    }

    fn require_exclusive(&self, category: &Category) -> Result<()> {
        if !self.table.is_registered(category) {
            return Err(FreeseerError::InvalidCategory(
                category.as_str().to_string(),
            ));
        }
        if !self.table.is_exclusive(category) {
            return Err(FreeseerError::InvalidCategory(format!(
                "category '{category}' does not hold an exclusive selection"
            )));
        }
        Ok(())
    }
}
