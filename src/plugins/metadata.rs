//! Plugin metadata file parsing
//!
//! Every plugin ships a `.freeseer-plugin` metadata file: a sectioned
//! key/value text format with a required `[Core]` section (Name, Module,
//! Category) and an optional `[Documentation]` section (Author, Version,
//! Website, Description).
//!
//! ```text
//! [Core]
//! Name = Audio Passthrough
//! Module = audiopassthrough
//! Category = AudioInput
//!
//! [Documentation]
//! Author = Freeseer Contributors
//! Version = 3.0.0
//! Website = http://freeseer.github.io
//! Description = Routes an existing audio source straight through
//! ```
//!
//! Comment lines start with `#` or `;`. Unknown sections and keys are
//! tolerated so newer plugins stay readable by older hosts. Duplicate keys
//! within a section are last-wins.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{FreeseerError, Result};

use super::category::Category;
use super::types::PluginMetadata;

/// File extension of plugin metadata files (without the leading dot).
pub const METADATA_EXT: &str = "freeseer-plugin";

/// Parsed contents of one metadata file, before the implementation is
/// resolved or instantiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFile {
    /// Plugin name from `[Core] Name`, unique within its category.
    pub name: String,

    /// Implementation base name from `[Core] Module`.
    pub module: String,

    /// Declared category from `[Core] Category`.
    pub category: Category,

    /// The `[Documentation]` block.
    pub metadata: PluginMetadata,
}

/// Read and parse a metadata file from disk.
pub fn read_metadata_file(path: &Path) -> Result<MetadataFile> {
    let content = fs::read_to_string(path).map_err(|e| FreeseerError::MalformedMetadata {
        path: path.to_path_buf(),
        reason: format!("unreadable: {e}"),
    })?;
    parse_metadata(&content, path)
}

/// Parse metadata file content. `path` is used for error reporting only.
pub fn parse_metadata(content: &str, path: &Path) -> Result<MetadataFile> {
    let sections = parse_sections(content, path)?;

    let core = sections
        .get("Core")
        .ok_or_else(|| malformed(path, "missing [Core] section"))?;

    let name = required_key(core, "Name", path)?;
    let module = required_key(core, "Module", path)?;
    let category = required_key(core, "Category", path)?;

    if !name_pattern().is_match(&name) {
        return Err(malformed(
            path,
            &format!(
                "invalid plugin name '{name}': must be 1-64 characters, \
                 alphanumeric start, then alphanumerics, spaces, '_' or '-'"
            ),
        ));
    }

    let empty = HashMap::new();
    let docs = sections.get("Documentation").unwrap_or(&empty);
    let metadata = PluginMetadata {
        author: docs.get("Author").cloned(),
        version: docs.get("Version").cloned(),
        website: docs.get("Website").cloned(),
        description: docs.get("Description").cloned(),
    };

    Ok(MetadataFile {
        name,
        module,
        category: Category::new(category),
        metadata,
    })
}

/// Split the raw text into `section -> key -> value` maps.
fn parse_sections(content: &str, path: &Path) -> Result<HashMap<String, HashMap<String, String>>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or_else(|| {
                malformed(path, &format!("unterminated section header at line {}", lineno + 1))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed(
                    path,
                    &format!("empty section name at line {}", lineno + 1),
                ));
            }
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(malformed(
                path,
                &format!("expected 'Key = Value' at line {}", lineno + 1),
            ));
        };

        let Some(section) = &current else {
            return Err(malformed(
                path,
                &format!("key outside any section at line {}", lineno + 1),
            ));
        };

        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(sections)
}

fn required_key(section: &HashMap<String, String>, key: &str, path: &Path) -> Result<String> {
    match section.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        Some(_) => Err(malformed(path, &format!("empty required key '{key}' in [Core]"))),
        None => Err(malformed(path, &format!("missing required key '{key}' in [Core]"))),
    }
}

fn malformed(path: &Path, reason: &str) -> FreeseerError {
    FreeseerError::MalformedMetadata {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9 _\-]{0,63}$").expect("valid name pattern")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID: &str = "\
[Core]
Name = Audio Passthrough
Module = audiopassthrough
Category = AudioInput

[Documentation]
Author = Freeseer Contributors
Version = 3.0.0
Website = http://freeseer.github.io
Description = Routes an existing audio source straight through
";

    fn path() -> PathBuf {
        PathBuf::from("/tmp/audiopassthrough.freeseer-plugin")
    }

    #[test]
    fn test_parse_valid_metadata() {
        let parsed = parse_metadata(VALID, &path()).unwrap();
        assert_eq!(parsed.name, "Audio Passthrough");
        assert_eq!(parsed.module, "audiopassthrough");
        assert_eq!(parsed.category, Category::AUDIO_INPUT);
        assert_eq!(
            parsed.metadata.author.as_deref(),
            Some("Freeseer Contributors")
        );
        assert_eq!(parsed.metadata.version.as_deref(), Some("3.0.0"));
        assert_eq!(
            parsed.metadata.website.as_deref(),
            Some("http://freeseer.github.io")
        );
        assert!(parsed
            .metadata
            .description
            .as_deref()
            .unwrap()
            .starts_with("Routes"));
    }

    #[test]
    fn test_parse_minimal_metadata() {
        let content = "[Core]\nName = X264 Encoder\nModule = x264enc\nCategory = Output\n";
        let parsed = parse_metadata(content, &path()).unwrap();
        assert_eq!(parsed.name, "X264 Encoder");
        assert_eq!(parsed.metadata, PluginMetadata::default());
    }

    #[test]
    fn test_parse_missing_module_key() {
        let content = "[Core]\nName = Broken\nCategory = Output\n";
        let err = parse_metadata(content, &path()).unwrap_err();
        assert!(matches!(err, FreeseerError::MalformedMetadata { .. }));
        assert!(err.to_string().contains("Module"));
    }

    #[test]
    fn test_parse_missing_core_section() {
        let content = "[Documentation]\nAuthor = Nobody\n";
        let err = parse_metadata(content, &path()).unwrap_err();
        assert!(err.to_string().contains("[Core]"));
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let content = "\
# header comment
[Core]
; another comment
Name = Commented
Module = commented
Category = Importer

";
        let parsed = parse_metadata(content, &path()).unwrap();
        assert_eq!(parsed.name, "Commented");
    }

    #[test]
    fn test_parse_unknown_section_and_keys_tolerated() {
        let content = "\
[Core]
Name = Forward Compatible
Module = fwd
Category = Importer
Flavor = experimental

[Future]
Anything = goes
";
        let parsed = parse_metadata(content, &path()).unwrap();
        assert_eq!(parsed.name, "Forward Compatible");
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let content = "\
[Core]
Name = First
Name = Second
Module = dup
Category = Importer
";
        let parsed = parse_metadata(content, &path()).unwrap();
        assert_eq!(parsed.name, "Second");
    }

    #[test]
    fn test_parse_key_outside_section() {
        let content = "Name = Stray\n[Core]\nModule = stray\nCategory = Importer\n";
        let err = parse_metadata(content, &path()).unwrap_err();
        assert!(err.to_string().contains("outside any section"));
    }

    #[test]
    fn test_parse_unterminated_section_header() {
        let content = "[Core\nName = Bad\n";
        let err = parse_metadata(content, &path()).unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_parse_garbage_line() {
        let content = "[Core]\nName = Ok\nthis is not a key value pair\n";
        let err = parse_metadata(content, &path()).unwrap_err();
        assert!(err.to_string().contains("Key = Value"));
    }

    #[test]
    fn test_parse_invalid_name_rejected() {
        let content = "[Core]\nName = -leading-hyphen\nModule = m\nCategory = Importer\n";
        let err = parse_metadata(content, &path()).unwrap_err();
        assert!(err.to_string().contains("invalid plugin name"));
    }

    #[test]
    fn test_parse_name_too_long_rejected() {
        let long = "a".repeat(65);
        let content = format!("[Core]\nName = {long}\nModule = m\nCategory = Importer\n");
        assert!(parse_metadata(&content, &path()).is_err());
    }

    #[test]
    fn test_parse_empty_required_value() {
        let content = "[Core]\nName = Empty Module\nModule =\nCategory = Importer\n";
        let err = parse_metadata(content, &path()).unwrap_err();
        assert!(err.to_string().contains("'Module'"));
    }

    #[test]
    fn test_parse_value_containing_equals() {
        let content = "\
[Core]
Name = Query Importer
Module = query
Category = Importer

[Documentation]
Website = http://example.com/?a=1&b=2
";
        let parsed = parse_metadata(content, &path()).unwrap();
        assert_eq!(
            parsed.metadata.website.as_deref(),
            Some("http://example.com/?a=1&b=2")
        );
    }

    #[test]
    fn test_read_metadata_file_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("audiopassthrough.freeseer-plugin");
        fs::write(&file, VALID).unwrap();

        let parsed = read_metadata_file(&file).unwrap();
        assert_eq!(parsed.module, "audiopassthrough");
    }

    #[test]
    fn test_read_metadata_file_missing() {
        let err = read_metadata_file(Path::new("/nonexistent/x.freeseer-plugin")).unwrap_err();
        assert!(matches!(err, FreeseerError::MalformedMetadata { .. }));
    }
}
