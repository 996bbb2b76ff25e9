//! Backend-neutral condition trees for ORM adapters.
//!
//! An ORM binding does not want SQL text; it wants to call its own
//! `field == value`, `and_(..)`, `or_(..)` builders. [`Criteria::conditions`]
//! lowers a criteria tree into [`Condition`] values such an adapter can walk
//! without knowing about leaves or vacuous subtrees.

use indexmap::IndexMap;
use serde::Serialize;

use crate::criteria::Criteria;
use crate::error::Result;
use crate::op::Operator;
use crate::value::Value;

/// One field comparison, with the field already mapped to its column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

/// A node of the lowered condition tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Compare(Comparison),
    /// Every condition must hold.
    All(Vec<Condition>),
    /// At least one condition must hold.
    Any(Vec<Condition>),
    Negate(Box<Condition>),
}

impl Criteria {
    /// Lowers this tree into conditions, implicitly ANDed at the top level.
    ///
    /// A leaf contributes one comparison per filter. Vacuous subtrees (see
    /// [`Criteria::is_vacuous`]) contribute nothing, so an empty result means
    /// "no constraint".
    ///
    /// # Example
    ///
    /// ```
    /// use indexmap::IndexMap;
    /// use sieve::{Condition, Criteria, Filter};
    ///
    /// let criteria = Criteria::filtered([Filter::eq("name", "John Doe")])
    ///     | Criteria::filtered([Filter::is_null("email")]);
    ///
    /// let conditions = criteria.conditions(&IndexMap::new()).unwrap();
    /// assert!(matches!(conditions.as_slice(), [Condition::Any(items)] if items.len() == 2));
    /// ```
    pub fn conditions(&self, column_mapping: &IndexMap<String, String>) -> Result<Vec<Condition>> {
        match self {
            Criteria::Leaf { filters, .. } => filters
                .iter()
                .map(|filter| {
                    filter.check_shape()?;
                    let field = column_mapping
                        .get(&filter.field)
                        .unwrap_or(&filter.field)
                        .clone();
                    Ok(Condition::Compare(Comparison {
                        field,
                        operator: filter.operator,
                        value: filter.value.clone(),
                    }))
                })
                .collect(),
            Criteria::And(left, right) => {
                let mut items = left.conditions(column_mapping)?;
                items.extend(right.conditions(column_mapping)?);
                Ok(if items.len() < 2 {
                    items
                } else {
                    vec![Condition::All(items)]
                })
            }
            Criteria::Or(left, right) => {
                let left = left.conditions(column_mapping)?;
                let right = right.conditions(column_mapping)?;
                if left.is_empty() || right.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(vec![Condition::Any(vec![
                    conjunction(left),
                    conjunction(right),
                ])])
            }
            Criteria::Not(inner) => {
                let inner = inner.conditions(column_mapping)?;
                if inner.is_empty() {
                    return Ok(inner);
                }
                Ok(vec![Condition::Negate(Box::new(conjunction(inner)))])
            }
        }
    }
}

/// Collapses a non-empty implicit AND into a single condition.
fn conjunction(mut items: Vec<Condition>) -> Condition {
    if items.len() == 1 {
        items.remove(0)
    } else {
        Condition::All(items)
    }
}
