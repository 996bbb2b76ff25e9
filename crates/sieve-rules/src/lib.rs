//! Declarative rule documents for sieve.
//!
//! A rule document maps field names to `{operator, value, message}` entries
//! and produces a single [`sieve::Criteria`] leaf. Messages travel with the
//! filters so [`sieve::evaluate_with_messages`] can report them.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use sieve::{evaluate_with_messages, Value};
//!
//! let criteria = sieve_rules::parse_rules_yaml(r#"
//! filters:
//!   age: { operator: ge, value: 18, message: must be an adult }
//!   email: { operator: is_not_null, message: email is required }
//! "#).unwrap();
//!
//! let record: HashMap<String, Value> = HashMap::from([
//!     ("age".to_string(), Value::from(16)),
//!     ("email".to_string(), Value::from("kid@example.com")),
//! ]);
//!
//! let outcome = evaluate_with_messages(&record, &criteria).unwrap();
//! assert!(!outcome.passed);
//! assert_eq!(outcome.errors, ["must be an adult"]);
//! ```
//!
//! # Operator Tokens
//!
//! `eq`, `ne`, `gt`, `ge`, `lt`, `le`, `like`, `not_like`, `contains`,
//! `not_contains`, `starts_with`, `not_starts_with`, `ends_with`,
//! `not_ends_with`, `in`, `not_in`, `is_null`, `is_not_null`, `between`,
//! `not_between`. Any other token fails the whole document.

mod document;
mod error;
mod loader;

pub use document::{build_leaf, parse_rules_json, parse_rules_yaml, FilterRule, RuleDocument};
pub use error::{Result, RuleError};
pub use loader::{load_document, load_rules, RuleFormat};
