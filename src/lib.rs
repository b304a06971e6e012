//! Freeseer plugin layer - discovery, lookup, and lifecycle for recording plugins

pub mod error;
pub mod plugins;
pub mod profile;

pub use error::{FreeseerError, Result};
pub use plugins::PluginRegistry;
pub use profile::Profile;
