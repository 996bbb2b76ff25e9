//! Field access for in-memory evaluation.
//!
//! The evaluator only needs to look a field up by name. [`Record`] is
//! implemented for the common map types; implement it on your own structs to
//! evaluate criteria against them directly.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::value::Value;

/// Types whose fields can be tested by criteria.
///
/// # Manual Implementation
///
/// ```
/// use sieve::{Criteria, Filter, Record, Value};
///
/// struct User {
///     name: Value,
///     age: Value,
/// }
///
/// impl Record for User {
///     fn field_value(&self, field: &str) -> Option<&Value> {
///         match field {
///             "name" => Some(&self.name),
///             "age" => Some(&self.age),
///             _ => None,
///         }
///     }
/// }
///
/// let user = User { name: "Ada".into(), age: 36.into() };
/// let adults = Criteria::filtered([Filter::gte("age", 18)]);
/// assert!(sieve::evaluate(&user, &adults).unwrap());
/// ```
pub trait Record {
    /// Returns the value of a field, or `None` if the record has no such field.
    ///
    /// `None` and `Some(Value::Null)` are both treated as missing.
    fn field_value(&self, field: &str) -> Option<&Value>;
}

impl<S: BuildHasher> Record for HashMap<String, Value, S> {
    fn field_value(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl Record for BTreeMap<String, Value> {
    fn field_value(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl<S: BuildHasher> Record for IndexMap<String, Value, S> {
    fn field_value(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Option<&Value> {
        (**self).field_value(field)
    }
}
