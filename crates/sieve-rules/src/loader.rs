//! Loading rule documents from disk.

use std::fs;
use std::path::Path;

use sieve::Criteria;

use crate::document::RuleDocument;
use crate::error::{Result, RuleError};

/// Supported rule file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Json,
    Yaml,
}

impl RuleFormat {
    /// Picks the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(RuleFormat::Json),
            "yaml" | "yml" => Some(RuleFormat::Yaml),
            _ => None,
        }
    }

    /// Parses a document in this format.
    pub fn parse(self, source: &str) -> Result<RuleDocument> {
        match self {
            RuleFormat::Json => RuleDocument::from_json(source),
            RuleFormat::Yaml => RuleDocument::from_yaml(source),
        }
    }
}

/// Reads a rule document, choosing the format by extension.
pub fn load_document(path: impl AsRef<Path>) -> Result<RuleDocument> {
    let path = path.as_ref();
    let format = RuleFormat::from_path(path).ok_or_else(|| RuleError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let source = fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?format, "loading rules");
    format.parse(&source)
}

/// Reads a rule file and builds its criteria.
pub fn load_rules(path: impl AsRef<Path>) -> Result<Criteria> {
    load_document(path)?.to_criteria()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(RuleFormat::from_path(Path::new("r.json")), Some(RuleFormat::Json));
        assert_eq!(RuleFormat::from_path(Path::new("r.YAML")), Some(RuleFormat::Yaml));
        assert_eq!(RuleFormat::from_path(Path::new("dir/r.yml")), Some(RuleFormat::Yaml));
        assert_eq!(RuleFormat::from_path(Path::new("r.toml")), None);
        assert_eq!(RuleFormat::from_path(Path::new("rules")), None);
    }

    #[test]
    fn unsupported_extension_is_checked_before_reading() {
        let err = load_rules("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_rules("does/not/exist.json").unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
