//! Error types for rule parsing.

use std::io;
use std::path::PathBuf;

use sieve::SieveError;

/// Errors that can occur while turning a rule document into criteria.
///
/// Parsing is all-or-nothing: no partial leaf is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule names an unknown operator or carries a malformed value.
    #[error(transparent)]
    Criteria(#[from] SieveError),

    /// The document is not valid JSON or does not have the rule layout.
    #[error("Invalid JSON rule document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML or does not have the rule layout.
    #[error("Invalid YAML rule document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The rule file could not be read.
    #[error("Failed to read rules from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rule file extension is neither JSON nor YAML.
    #[error("Unsupported rule file {}: expected .json, .yaml or .yml", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Result type for rule parsing.
pub type Result<T> = std::result::Result<T, RuleError>;
