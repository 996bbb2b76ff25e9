//! Error types for the sieve crate.

use thiserror::Error;

use crate::op::{Arity, Operator};

/// Errors raised while building, evaluating or compiling criteria.
///
/// Evaluation and compilation are all-or-nothing: the first error aborts the
/// whole call and no partial result is returned.
#[derive(Debug, Error)]
pub enum SieveError {
    /// An operator token that is not part of the catalog.
    #[error("unknown operator: {token}")]
    UnknownOperator { token: String },

    /// A filter value whose shape does not fit its operator.
    #[error("operator '{operator}' on field '{field}' expects {expected}, got {actual}")]
    ValueShape {
        field: String,
        operator: Operator,
        expected: Arity,
        actual: &'static str,
    },

    /// An operator reached a code path that has no rule for it.
    #[error("operator '{operator}' is not supported here")]
    UnsupportedOperator { operator: Operator },

    /// Incompatible value kinds under a comparison or pattern operator.
    #[error("type mismatch for '{operator}' on field '{field}': cannot compare {actual} with {expected}")]
    TypeMismatch {
        field: String,
        operator: Operator,
        expected: &'static str,
        actual: &'static str,
    },

    /// A value kind with no [`Value`](crate::Value) counterpart, such as a
    /// nested JSON object.
    #[error("unsupported value: {kind}")]
    UnsupportedValue { kind: &'static str },

    /// A LIKE pattern that could not be translated.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for sieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
