//! Sort directives.
//!
//! Provides [`Direction`] and [`Order`]. The SQL compiler renders orders as an
//! `ORDER BY` list; [`select`](crate::select) applies them in memory.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Direction {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    /// Returns the SQL keyword of this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A single sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Order {
            field: field.into(),
            direction,
        }
    }

    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Order::new(field, Direction::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Order::new(field, Direction::Desc)
    }
}

/// Compares two field values for sorting.
///
/// Missing values sort after present ones. Returns `None` when the values
/// cannot be ordered (mixed kinds or NaN).
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    match (present(a), present(b)) {
        (None, None) => Some(Ordering::Equal),
        (None, Some(_)) => Some(Ordering::Greater),
        (Some(_), None) => Some(Ordering::Less),
        (Some(a), Some(b)) => a.compare(b),
    }
}

/// Compares two records using a list of orders.
///
/// The first order is the primary key, the next ones break ties. Pairs that
/// cannot be ordered compare equal on that key. Missing values stay last in
/// both directions.
pub fn compare_by_orders<R: Record + ?Sized>(a: &R, b: &R, orders: &[&Order]) -> Ordering {
    for order in orders {
        let val_a = present(a.field_value(&order.field));
        let val_b = present(b.field_value(&order.field));

        let ordering = match (val_a, val_b) {
            (Some(x), Some(y)) => match x.compare(y) {
                Some(ordering) => order.direction.apply(ordering),
                None => continue,
            },
            _ => match compare_values(val_a, val_b) {
                Some(ordering) => ordering,
                None => continue,
            },
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
