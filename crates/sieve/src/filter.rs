//! Leaf conditions.
//!
//! A [`Filter`] is a single predicate: a field name, an operator, and the
//! value the field is compared against.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};
use crate::op::{Arity, Operator};
use crate::value::Value;

/// A single leaf condition.
///
/// # Example
///
/// ```
/// use sieve::{Filter, Operator, Value};
///
/// let filter = Filter::new("age", Operator::Between, (18, 30));
/// assert_eq!(filter.value, Value::from(vec![18, 30]));
///
/// let filter = Filter::is_null("email").with_message("email is required");
/// assert_eq!(filter.message.as_deref(), Some("email is required"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The operand. `Null` for operators that take none.
    #[serde(default)]
    pub value: Value,
    /// Human readable message reported when the filter fails validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Filter {
    /// Creates a new filter.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Filter {
            field: field.into(),
            operator,
            value: value.into(),
            message: None,
        }
    }

    /// Attaches a validation message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Checks that the value has the shape the operator expects.
    ///
    /// Pattern operators also need a string operand; anything else is a
    /// [`SieveError::TypeMismatch`].
    pub fn check_shape(&self) -> Result<()> {
        let fits = match self.operator.arity() {
            Arity::None => self.value.is_null(),
            Arity::Scalar => self.value.is_scalar(),
            Arity::Pair => matches!(
                self.value.as_list(),
                Some(items) if items.len() == 2 && items.iter().all(Value::is_scalar)
            ),
            Arity::Sequence => matches!(
                self.value.as_list(),
                Some(items) if !items.is_empty() && items.iter().all(Value::is_scalar)
            ),
        };

        if !fits {
            return Err(self.shape_error());
        }
        if self.operator.is_pattern() && self.value.as_str().is_none() {
            return Err(SieveError::TypeMismatch {
                field: self.field.clone(),
                operator: self.operator,
                expected: "string",
                actual: self.value.kind(),
            });
        }
        Ok(())
    }

    pub(crate) fn shape_error(&self) -> SieveError {
        let actual = match &self.value {
            Value::List(items) if items.is_empty() => "an empty list",
            Value::List(items) if items.iter().all(Value::is_scalar) => match items.len() {
                2 => "a pair",
                _ => "a list",
            },
            Value::List(_) => "a nested list",
            Value::Null => "no value",
            Value::Bool(_) => "a bool",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
        };
        SieveError::ValueShape {
            field: self.field.clone(),
            operator: self.operator,
            expected: self.operator.arity(),
            actual,
        }
    }

    // ========================================================================
    // Shorthand constructors
    // ========================================================================

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::new(field, Operator::Equal, value)
    }

    /// `field != value`
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::new(field, Operator::NotEqual, value)
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::new(field, Operator::Greater, value)
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::new(field, Operator::GreaterOrEqual, value)
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::new(field, Operator::Less, value)
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::new(field, Operator::LessOrEqual, value)
    }

    pub fn like(field: impl Into<String>, pattern: &str) -> Self {
        Filter::new(field, Operator::Like, pattern)
    }

    pub fn not_like(field: impl Into<String>, pattern: &str) -> Self {
        Filter::new(field, Operator::NotLike, pattern)
    }

    pub fn contains(field: impl Into<String>, needle: &str) -> Self {
        Filter::new(field, Operator::Contains, needle)
    }

    pub fn not_contains(field: impl Into<String>, needle: &str) -> Self {
        Filter::new(field, Operator::NotContains, needle)
    }

    pub fn starts_with(field: impl Into<String>, prefix: &str) -> Self {
        Filter::new(field, Operator::StartsWith, prefix)
    }

    pub fn not_starts_with(field: impl Into<String>, prefix: &str) -> Self {
        Filter::new(field, Operator::NotStartsWith, prefix)
    }

    pub fn ends_with(field: impl Into<String>, suffix: &str) -> Self {
        Filter::new(field, Operator::EndsWith, suffix)
    }

    pub fn not_ends_with(field: impl Into<String>, suffix: &str) -> Self {
        Filter::new(field, Operator::NotEndsWith, suffix)
    }

    /// Membership in a set of values.
    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items: Vec<Value> = values.into_iter().map(Into::into).collect();
        Filter::new(field, Operator::In, Value::List(items))
    }

    pub fn not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items: Vec<Value> = values.into_iter().map(Into::into).collect();
        Filter::new(field, Operator::NotIn, Value::List(items))
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::new(field, Operator::IsNull, Value::Null)
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::new(field, Operator::IsNotNull, Value::Null)
    }

    /// Inclusive range `lo <= field <= hi`.
    pub fn between(field: impl Into<String>, lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        Filter::new(field, Operator::Between, (lo, hi))
    }

    pub fn not_between(
        field: impl Into<String>,
        lo: impl Into<Value>,
        hi: impl Into<Value>,
    ) -> Self {
        Filter::new(field, Operator::NotBetween, (lo, hi))
    }
}
