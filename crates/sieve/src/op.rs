//! The operator catalog.
//!
//! [`Operator`] is a closed set. Several variants render to the same SQL
//! keyword (`Contains`, `StartsWith`, `EndsWith` and `Like` are all `LIKE`),
//! so backends always match on the variant and never on its surface text.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// Comparison or pattern operator of a single filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Operator {
    // Comparison
    /// `field = value`
    Equal,
    /// `field != value`
    NotEqual,
    /// `field > value`
    Greater,
    /// `field >= value`
    GreaterOrEqual,
    /// `field < value`
    Less,
    /// `field <= value`
    LessOrEqual,

    // Pattern matching
    /// SQL LIKE pattern with `%` and `_` wildcards.
    Like,
    /// Negated LIKE.
    NotLike,
    /// Substring test.
    Contains,
    /// Negated substring test.
    NotContains,
    /// Literal prefix test.
    StartsWith,
    /// Negated prefix test.
    NotStartsWith,
    /// Literal suffix test.
    EndsWith,
    /// Negated suffix test.
    NotEndsWith,

    // Membership
    /// Value is one of a sequence.
    In,
    /// Value is none of a sequence.
    NotIn,

    // Nulls
    /// Field is missing or null.
    IsNull,
    /// Field is present and not null.
    IsNotNull,

    // Ranges
    /// Inclusive range `[lo, hi]`.
    Between,
    /// Outside the inclusive range `[lo, hi]`.
    NotBetween,
}

/// The value shape an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// No value (null).
    None,
    /// One scalar: string, number or bool.
    Scalar,
    /// Exactly two scalars, `[lo, hi]`.
    Pair,
    /// A non-empty list of scalars.
    Sequence,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arity::None => "no value",
            Arity::Scalar => "a scalar",
            Arity::Pair => "a two-element pair",
            Arity::Sequence => "a non-empty sequence",
        })
    }
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 20] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Less,
        Operator::LessOrEqual,
        Operator::Like,
        Operator::NotLike,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::NotStartsWith,
        Operator::EndsWith,
        Operator::NotEndsWith,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::Between,
        Operator::NotBetween,
    ];

    /// Returns the value shape this operator expects.
    pub fn arity(self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull => Arity::None,
            Operator::Between | Operator::NotBetween => Arity::Pair,
            Operator::In | Operator::NotIn => Arity::Sequence,
            Operator::Equal
            | Operator::NotEqual
            | Operator::Greater
            | Operator::GreaterOrEqual
            | Operator::Less
            | Operator::LessOrEqual
            | Operator::Like
            | Operator::NotLike
            | Operator::Contains
            | Operator::NotContains
            | Operator::StartsWith
            | Operator::NotStartsWith
            | Operator::EndsWith
            | Operator::NotEndsWith => Arity::Scalar,
        }
    }

    /// Returns `true` for the six ordering comparisons.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::Greater
                | Operator::GreaterOrEqual
                | Operator::Less
                | Operator::LessOrEqual
        )
    }

    /// Returns `true` for the string pattern operators.
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            Operator::Like
                | Operator::NotLike
                | Operator::Contains
                | Operator::NotContains
                | Operator::StartsWith
                | Operator::NotStartsWith
                | Operator::EndsWith
                | Operator::NotEndsWith
        )
    }

    /// Evaluates a comparison given the ordering of field value to filter value.
    ///
    /// Only the six comparison operators have an ordering rule.
    pub fn eval_ordering(self, ordering: Ordering) -> Result<bool> {
        Ok(match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::Less => ordering == Ordering::Less,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            other => return Err(SieveError::UnsupportedOperator { operator: other }),
        })
    }

    /// Returns the rule token of this operator (`eq`, `not_like`, ...).
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::Greater => "gt",
            Operator::GreaterOrEqual => "ge",
            Operator::Less => "lt",
            Operator::LessOrEqual => "le",
            Operator::Like => "like",
            Operator::NotLike => "not_like",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::NotStartsWith => "not_starts_with",
            Operator::EndsWith => "ends_with",
            Operator::NotEndsWith => "not_ends_with",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::Between => "between",
            Operator::NotBetween => "not_between",
        }
    }

    /// Returns the SQL keyword this operator renders with.
    ///
    /// Not unique: `Like`, `Contains`, `StartsWith` and `EndsWith` share
    /// `LIKE`. Use it for display only.
    pub fn sql_keyword(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Like | Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
                "LIKE"
            }
            Operator::NotLike
            | Operator::NotContains
            | Operator::NotStartsWith
            | Operator::NotEndsWith => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = SieveError;

    fn from_str(token: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.token() == token)
            .ok_or_else(|| SieveError::UnknownOperator {
                token: token.to_string(),
            })
    }
}

impl TryFrom<String> for Operator {
    type Error = SieveError;

    fn try_from(token: String) -> Result<Self> {
        token.parse()
    }
}

impl From<Operator> for &'static str {
    fn from(op: Operator) -> Self {
        op.token()
    }
}
