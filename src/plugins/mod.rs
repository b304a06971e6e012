//! Plugin system for Freeseer
//!
//! This module is the discovery and lifecycle layer over the recording
//! application's plugins. Plugins are described by `.freeseer-plugin`
//! metadata files found under the profile's search directories; each file
//! names an implementation module, a category, and documentation fields.
//! Discovery parses the metadata, instantiates the implementation through a
//! pluggable loader, checks it against its category's capability contract,
//! and hands the resulting descriptors to the registry for lookup.
//!
//! # Architecture
//!
//! - **category**: category tags, capability tags, and the contract table
//! - **types**: `PluginDescriptor`, `PluginInstance`, `ModuleReference`, metadata block
//! - **metadata**: the `.freeseer-plugin` sectioned key/value parser
//! - **loader**: the `PluginLoader` abstraction and the factory-table loader
//! - **discovery**: the directory scan with priority tie-breaking
//! - **registry**: lookups, convenience accessors, active-selection handling
//! - **selection**: JSON persistence of active selections
//!
//! # Plugin Directory Structure
//!
//! ```text
//! ~/.config/freeseer/plugins/
//! ├── pulsesrc.freeseer-plugin
//! ├── pulsesrc.so
//! └── rss_importer/
//!     ├── rss_importer.freeseer-plugin
//!     └── rss_importer/
//!         └── plugin.so
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use freeseer::plugins::{Category, CategoryTable, FactoryLoader, PluginRegistry};
//! use freeseer::profile::Profile;
//!
//! let profile = Profile::from_env().with_install_dir("/usr/share/freeseer/plugins");
//! let loader = FactoryLoader::new("so");
//! // ... register one factory per linked plugin module ...
//!
//! let mut registry =
//!     PluginRegistry::new(profile, CategoryTable::with_builtins(), Box::new(loader)).unwrap();
//! for plugin in registry.audio_mixers().unwrap() {
//!     println!("mixer: {}", plugin.name());
//! }
//! registry.set_active(&Category::AUDIO_MIXER, "Pulse Mixer").unwrap();
//! ```

pub mod category;
mod discovery;
mod loader;
pub mod metadata;
pub mod registry;
mod selection;
pub mod types;

pub use category::{Capability, Category, CategoryContract, CategoryTable};
pub use discovery::{discover_plugins, load_plugin};
pub use loader::{resolve_module, FactoryLoader, PluginFactory, PluginLoader};
pub use metadata::{parse_metadata, read_metadata_file, MetadataFile, METADATA_EXT};
pub use registry::PluginRegistry;
pub use selection::{SelectionStore, Selections};
pub use types::{ModuleReference, PluginDescriptor, PluginInstance, PluginMetadata};
