//! Plugin discovery
//!
//! Scans the search directories for `.freeseer-plugin` metadata files,
//! parses them, resolves and instantiates the referenced implementations,
//! and enforces category capability contracts. Discovery is best-effort:
//! every per-plugin failure is logged and skipped so one broken plugin never
//! hides the rest.
//!
//! Search directories are visited in priority order (user override first).
//! When the same (name, category) pair appears in directories of different
//! priority the higher-priority hit wins and the later one is discarded with
//! a logged notice. Within a single directory, duplicates are last-wins by
//! enumeration order; entries are enumerated sorted by file name so the
//! outcome is stable for a given tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{FreeseerError, Result};

use super::category::{Category, CategoryTable};
use super::loader::{resolve_module, PluginLoader};
use super::metadata::{read_metadata_file, METADATA_EXT};
use super::types::PluginDescriptor;

/// Discover plugins across the given search directories.
///
/// Directories are scanned in priority order, non-recursively plus one
/// level into immediate subdirectories. Returns descriptors in discovery
/// order. Missing directories are skipped silently; per-plugin failures are
/// logged and skipped.
pub fn discover_plugins(
    search_paths: &[PathBuf],
    table: &CategoryTable,
    loader: &dyn PluginLoader,
) -> Result<Vec<PluginDescriptor>> {
    let mut descriptors: Vec<PluginDescriptor> = Vec::new();
    // (category, name) -> (search-path priority, index into descriptors)
    let mut index: HashMap<(Category, String), (usize, usize)> = HashMap::new();

    for (priority, dir) in search_paths.iter().enumerate() {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "search directory absent, skipping");
            continue;
        }

        for metadata_path in collect_metadata_files(dir)? {
            let descriptor = match load_plugin(&metadata_path, table, loader) {
                Ok(descriptor) => descriptor,
                Err(e @ FreeseerError::CapabilityMismatch { .. }) => {
                    // Declared intent, violated contract. Louder than a skip.
                    warn!(
                        file = %metadata_path.display(),
                        error = %e,
                        "Plugin rejected: capability contract violated"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        file = %metadata_path.display(),
                        error = %e,
                        "Failed to load plugin, skipping"
                    );
                    continue;
                }
            };

            let key = (descriptor.category().clone(), descriptor.name().to_string());
            match index.get(&key) {
                Some(&(winner_priority, _)) if winner_priority < priority => {
                    info!(
                        plugin = %key.1,
                        category = %key.0,
                        file = %metadata_path.display(),
                        "Duplicate plugin shadowed by higher-priority directory, discarding"
                    );
                }
                Some(&(_, slot)) => {
                    warn!(
                        plugin = %key.1,
                        category = %key.0,
                        file = %metadata_path.display(),
                        "Duplicate plugin within one directory, keeping the later entry"
                    );
                    descriptors[slot] = descriptor;
                }
                None => {
                    info!(
                        plugin = %key.1,
                        category = %key.0,
                        version = descriptor.metadata().version.as_deref().unwrap_or("unknown"),
                        "Discovered plugin"
                    );
                    index.insert(key, (priority, descriptors.len()));
                    descriptors.push(descriptor);
                }
            }
        }
    }

    Ok(descriptors)
}

/// Load a single plugin from its metadata file: parse, check the declared
/// category, resolve and instantiate the implementation, and verify the
/// capability contract.
pub fn load_plugin(
    metadata_path: &Path,
    table: &CategoryTable,
    loader: &dyn PluginLoader,
) -> Result<PluginDescriptor> {
    let parsed = read_metadata_file(metadata_path)?;

    let contract = table.contract(&parsed.category).ok_or_else(|| {
        FreeseerError::UnregisteredCategory {
            name: parsed.name.clone(),
            category: parsed.category.as_str().to_string(),
        }
    })?;

    let dir = metadata_path.parent().unwrap_or_else(|| Path::new("."));
    let module = resolve_module(dir, &parsed.name, &parsed.module, loader.impl_extension())?;

    let instance = loader.load(&module)?;

    let provided = instance.capabilities();
    for required in &contract.required {
        if !provided.contains(required) {
            return Err(FreeseerError::CapabilityMismatch {
                name: parsed.name,
                category: parsed.category.as_str().to_string(),
                missing: required.as_str().to_string(),
            });
        }
    }

    Ok(PluginDescriptor::new(
        parsed.name,
        parsed.category,
        module,
        parsed.metadata,
        metadata_path.to_path_buf(),
        instance,
    ))
}

/// Collect metadata file paths in `dir` and its immediate subdirectories,
/// sorted by file name at each level.
fn collect_metadata_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let entries = sorted_entries(dir)?;

    for entry in &entries {
        if entry.is_file() && has_metadata_ext(entry) {
            found.push(entry.clone());
        }
    }
    for entry in &entries {
        if entry.is_dir() {
            for sub in sorted_entries(entry)? {
                if sub.is_file() && has_metadata_ext(&sub) {
                    found.push(sub);
                }
            }
        }
    }

    Ok(found)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    Ok(entries)
}

fn has_metadata_ext(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(METADATA_EXT)
}
