//! Error types for the Freeseer plugin layer
//!
//! This module defines all error types used throughout the plugin registry.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.
//!
//! Discovery-time errors (malformed metadata, missing implementations,
//! unregistered categories, capability mismatches) are logged and skipped by
//! the scanner; they only appear as `Err` values when loading a single plugin
//! directly. Lookup-time and persistence errors are always surfaced to the
//! caller. Nothing in this crate treats an error as process-fatal.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for plugin registry operations.
#[derive(Error, Debug)]
pub enum FreeseerError {
    /// A plugin metadata file is unparsable or missing required keys.
    #[error("malformed metadata in {}: {reason}", path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    /// A metadata file references an implementation file or directory
    /// that does not exist, or no factory is registered for its module.
    #[error("missing implementation for plugin '{name}': {reason}")]
    MissingImplementation { name: String, reason: String },

    /// A metadata file declares a category absent from the category table.
    #[error("plugin '{name}' declares unregistered category '{category}'")]
    UnregisteredCategory { name: String, category: String },

    /// An implementation exists but does not satisfy the capability
    /// contract of its declared category.
    #[error("plugin '{name}' does not satisfy category '{category}': missing capability '{missing}'")]
    CapabilityMismatch {
        name: String,
        category: String,
        missing: String,
    },

    /// A name/category lookup matched nothing.
    #[error("no plugin named '{name}' in category '{category}'")]
    NotFound { name: String, category: String },

    /// A lookup or selection change named a category absent from the
    /// category table, or one without the required semantics.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// The active-selection store could not be read or written. In-memory
    /// selection state remains usable when this is returned.
    #[error("selection store error: {0}")]
    Persistence(String),

    /// Standard I/O errors from the filesystem walk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for plugin registry operations.
pub type Result<T> = std::result::Result<T, FreeseerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FreeseerError::NotFound {
            name: "pulsesrc".to_string(),
            category: "AudioInput".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no plugin named 'pulsesrc' in category 'AudioInput'"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FreeseerError = io_err.into();
        assert!(matches!(err, FreeseerError::Io(_)));
    }

    #[test]
    fn test_capability_mismatch_display() {
        let err = FreeseerError::CapabilityMismatch {
            name: "broken-mixer".to_string(),
            category: "AudioMixer".to_string(),
            missing: "create_audio_mixer".to_string(),
        };
        assert!(err.to_string().contains("broken-mixer"));
        assert!(err.to_string().contains("create_audio_mixer"));
    }

    #[test]
    fn test_malformed_metadata_display() {
        let err = FreeseerError::MalformedMetadata {
            path: PathBuf::from("/tmp/x.freeseer-plugin"),
            reason: "missing required key 'Module' in [Core]".to_string(),
        };
        assert!(err.to_string().contains("x.freeseer-plugin"));
        assert!(err.to_string().contains("Module"));
    }
}
