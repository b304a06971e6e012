//! Plugin categories and capability contracts
//!
//! Categories are an open tagged registry rather than a closed enum: the six
//! built-in tags cover the recording pipeline (audio/video inputs and mixers,
//! outputs, importers), and host applications may register additional ones.
//! Each category carries a `CategoryContract` naming the capabilities an
//! implementation must expose and whether the category holds a single active
//! selection at a time.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A category tag identifying the role a plugin fills.
///
/// Cheap to clone and compare. The built-in tags are available as constants;
/// project-defined categories are created with [`Category::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(Cow<'static, str>);

impl Category {
    /// Audio capture sources (microphones, loopback devices).
    pub const AUDIO_INPUT: Category = Category(Cow::Borrowed("AudioInput"));

    /// Audio mixers combining one or more audio inputs. Exclusive selection.
    pub const AUDIO_MIXER: Category = Category(Cow::Borrowed("AudioMixer"));

    /// Video capture sources (cameras, screen grabbers).
    pub const VIDEO_INPUT: Category = Category(Cow::Borrowed("VideoInput"));

    /// Video mixers combining one or more video inputs. Exclusive selection.
    pub const VIDEO_MIXER: Category = Category(Cow::Borrowed("VideoMixer"));

    /// Talk-list importers (CSV, RSS, spreadsheets).
    pub const IMPORTER: Category = Category(Cow::Borrowed("Importer"));

    /// Recording sinks (file muxers, streaming outputs). Exclusive selection.
    pub const OUTPUT: Category = Category(Cow::Borrowed("Output"));

    /// Create a project-defined category tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Category(Cow::Owned(tag.into()))
    }

    /// The category tag as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single operation an implementation must provide, named by tag.
///
/// Capability checks are structural: an implementation reports the
/// capabilities it exposes and discovery verifies the category's required
/// set is covered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    pub const CREATE_AUDIO_SOURCE: Capability = Capability(Cow::Borrowed("create_audio_source"));
    pub const CREATE_AUDIO_MIXER: Capability = Capability(Cow::Borrowed("create_audio_mixer"));
    pub const CREATE_VIDEO_SOURCE: Capability = Capability(Cow::Borrowed("create_video_source"));
    pub const CREATE_VIDEO_MIXER: Capability = Capability(Cow::Borrowed("create_video_mixer"));
    pub const PARSE_RECORDS: Capability = Capability(Cow::Borrowed("parse_records"));
    pub const CREATE_OUTPUT_SINK: Capability = Capability(Cow::Borrowed("create_output_sink"));

    /// Create a project-defined capability tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Capability(Cow::Owned(tag.into()))
    }

    /// The capability tag as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The contract a category imposes on its implementations.
#[derive(Debug, Clone)]
pub struct CategoryContract {
    /// Capabilities every implementation in the category must expose.
    pub required: Vec<Capability>,

    /// Whether the category holds at most one enabled plugin at a time
    /// (a "current selection" persisted across restarts).
    pub exclusive: bool,
}

/// Table mapping category tags to their capability contracts.
///
/// Discovery consults this table to reject plugins declaring unknown
/// categories and to enforce capability contracts before accepting an
/// implementation.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    contracts: HashMap<Category, CategoryContract>,
}

impl CategoryTable {
    /// Create an empty table with no registered categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table seeded with the six built-in categories.
    ///
    /// AudioMixer, VideoMixer, and Output are exclusive: the host records
    /// through exactly one mixer per stream and one output at a time.
    /// Inputs are non-exclusive (a mixer may combine several) and importers
    /// are invoked ad hoc.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.register(
            Category::AUDIO_INPUT,
            CategoryContract {
                required: vec![Capability::CREATE_AUDIO_SOURCE],
                exclusive: false,
            },
        );
        table.register(
            Category::AUDIO_MIXER,
            CategoryContract {
                required: vec![Capability::CREATE_AUDIO_MIXER],
                exclusive: true,
            },
        );
        table.register(
            Category::VIDEO_INPUT,
            CategoryContract {
                required: vec![Capability::CREATE_VIDEO_SOURCE],
                exclusive: false,
            },
        );
        table.register(
            Category::VIDEO_MIXER,
            CategoryContract {
                required: vec![Capability::CREATE_VIDEO_MIXER],
                exclusive: true,
            },
        );
        table.register(
            Category::IMPORTER,
            CategoryContract {
                required: vec![Capability::PARSE_RECORDS],
                exclusive: false,
            },
        );
        table.register(
            Category::OUTPUT,
            CategoryContract {
                required: vec![Capability::CREATE_OUTPUT_SINK],
                exclusive: true,
            },
        );
        table
    }

    /// Register a category contract. Replaces any existing contract for
    /// the same tag.
    pub fn register(&mut self, category: Category, contract: CategoryContract) {
        self.contracts.insert(category, contract);
    }

    /// Look up the contract for a category tag, if registered.
    pub fn contract(&self, category: &Category) -> Option<&CategoryContract> {
        self.contracts.get(category)
    }

    /// Whether a category tag is registered.
    pub fn is_registered(&self, category: &Category) -> bool {
        self.contracts.contains_key(category)
    }

    /// Whether a registered category holds an exclusive active selection.
    pub fn is_exclusive(&self, category: &Category) -> bool {
        self.contracts
            .get(category)
            .map(|c| c.exclusive)
            .unwrap_or(false)
    }

    /// All registered category tags, in no particular order.
    pub fn categories(&self) -> Vec<&Category> {
        self.contracts.keys().collect()
    }
}
