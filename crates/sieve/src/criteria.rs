//! The criteria expression tree.
//!
//! A [`Criteria`] is an immutable tree: leaves hold filters and orders,
//! inner nodes combine subtrees with AND, OR and NOT. Combinators never
//! touch their operands; they return a new node that shares them.
//!
//! No simplification is ever applied. The evaluated or compiled tree mirrors
//! the combinator calls exactly.

use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use crate::filter::Filter;
use crate::ordering::Order;

/// A composable filtering and ordering intent.
///
/// # Example
///
/// ```
/// use sieve::{Criteria, Filter, Order};
///
/// let named = Criteria::filtered([Filter::eq("name", "John Doe")]);
/// let reachable = Criteria::filtered([Filter::is_not_null("email")]);
/// let minor = Criteria::filtered([Filter::lt("age", 18)]);
///
/// let criteria = &named & (&reachable | !&minor);
/// assert_eq!(criteria.filters().len(), 3);
/// assert!(!criteria.has_orders());
///
/// let sorted = criteria.and(&Criteria::ordered([Order::desc("age")]));
/// assert!(sorted.has_orders());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    /// Filters (implicitly ANDed) and orders, in insertion order.
    Leaf {
        filters: Vec<Filter>,
        orders: Vec<Order>,
    },
    /// Both sides must hold. Left renders first.
    And(Arc<Criteria>, Arc<Criteria>),
    /// At least one side must hold. Left renders first.
    Or(Arc<Criteria>, Arc<Criteria>),
    /// The inner criteria must not hold.
    Not(Arc<Criteria>),
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::empty()
    }
}

impl Criteria {
    /// Creates a leaf from filters and orders.
    pub fn leaf(
        filters: impl IntoIterator<Item = Filter>,
        orders: impl IntoIterator<Item = Order>,
    ) -> Self {
        Criteria::Leaf {
            filters: filters.into_iter().collect(),
            orders: orders.into_iter().collect(),
        }
    }

    /// Creates a leaf holding only filters.
    pub fn filtered(filters: impl IntoIterator<Item = Filter>) -> Self {
        Criteria::leaf(filters, [])
    }

    /// Creates a leaf holding only orders.
    pub fn ordered(orders: impl IntoIterator<Item = Order>) -> Self {
        Criteria::leaf([], orders)
    }

    /// Creates an empty leaf. It matches everything.
    pub fn empty() -> Self {
        Criteria::Leaf {
            filters: Vec::new(),
            orders: Vec::new(),
        }
    }

    /// Returns `self AND other` as a new tree.
    pub fn and(&self, other: &Criteria) -> Criteria {
        Criteria::And(Arc::new(self.clone()), Arc::new(other.clone()))
    }

    /// Returns `self OR other` as a new tree.
    pub fn or(&self, other: &Criteria) -> Criteria {
        Criteria::Or(Arc::new(self.clone()), Arc::new(other.clone()))
    }

    /// Returns `NOT self` as a new tree.
    pub fn negate(&self) -> Criteria {
        Criteria::Not(Arc::new(self.clone()))
    }

    /// All filters of every leaf, depth-first, left to right.
    pub fn filters(&self) -> Vec<&Filter> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Criteria::Leaf { filters, .. } = node {
                out.extend(filters);
            }
        });
        out
    }

    /// All orders of every leaf, depth-first, left to right.
    ///
    /// This is the order in which they appear in `ORDER BY`.
    pub fn orders(&self) -> Vec<&Order> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Criteria::Leaf { orders, .. } = node {
                out.extend(orders);
            }
        });
        out
    }

    /// Returns `true` if any leaf holds a filter.
    pub fn has_filters(&self) -> bool {
        match self {
            Criteria::Leaf { filters, .. } => !filters.is_empty(),
            Criteria::And(left, right) | Criteria::Or(left, right) => {
                left.has_filters() || right.has_filters()
            }
            Criteria::Not(inner) => inner.has_filters(),
        }
    }

    /// Returns `true` when the tree constrains nothing.
    ///
    /// A leaf without filters is vacuous. `And` is vacuous when both sides
    /// are, `Or` when either side is, and `Not` when its inner tree is. A
    /// vacuous tree matches every record and compiles without `WHERE`.
    pub fn is_vacuous(&self) -> bool {
        match self {
            Criteria::Leaf { filters, .. } => filters.is_empty(),
            Criteria::And(left, right) => left.is_vacuous() && right.is_vacuous(),
            Criteria::Or(left, right) => left.is_vacuous() || right.is_vacuous(),
            Criteria::Not(inner) => inner.is_vacuous(),
        }
    }

    /// Returns `true` if any leaf holds an order.
    pub fn has_orders(&self) -> bool {
        match self {
            Criteria::Leaf { orders, .. } => !orders.is_empty(),
            Criteria::And(left, right) | Criteria::Or(left, right) => {
                left.has_orders() || right.has_orders()
            }
            Criteria::Not(inner) => inner.has_orders(),
        }
    }

    /// Height of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Criteria::Leaf { .. } => 1,
            Criteria::And(left, right) | Criteria::Or(left, right) => {
                1 + left.depth().max(right.depth())
            }
            Criteria::Not(inner) => 1 + inner.depth(),
        }
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Criteria)) {
        visit(self);
        match self {
            Criteria::Leaf { .. } => {}
            Criteria::And(left, right) | Criteria::Or(left, right) => {
                left.walk(visit);
                right.walk(visit);
            }
            Criteria::Not(inner) => inner.walk(visit),
        }
    }
}

// ============================================================================
// Operator overloads
// ============================================================================

impl BitAnd for Criteria {
    type Output = Criteria;

    fn bitand(self, rhs: Criteria) -> Criteria {
        Criteria::And(Arc::new(self), Arc::new(rhs))
    }
}

impl BitAnd for &Criteria {
    type Output = Criteria;

    fn bitand(self, rhs: &Criteria) -> Criteria {
        self.and(rhs)
    }
}

impl BitAnd<Criteria> for &Criteria {
    type Output = Criteria;

    fn bitand(self, rhs: Criteria) -> Criteria {
        Criteria::And(Arc::new(self.clone()), Arc::new(rhs))
    }
}

impl BitOr for Criteria {
    type Output = Criteria;

    fn bitor(self, rhs: Criteria) -> Criteria {
        Criteria::Or(Arc::new(self), Arc::new(rhs))
    }
}

impl BitOr for &Criteria {
    type Output = Criteria;

    fn bitor(self, rhs: &Criteria) -> Criteria {
        self.or(rhs)
    }
}

impl BitOr<Criteria> for &Criteria {
    type Output = Criteria;

    fn bitor(self, rhs: Criteria) -> Criteria {
        Criteria::Or(Arc::new(self.clone()), Arc::new(rhs))
    }
}

impl Not for Criteria {
    type Output = Criteria;

    fn not(self) -> Criteria {
        Criteria::Not(Arc::new(self))
    }
}

impl Not for &Criteria {
    type Output = Criteria;

    fn not(self) -> Criteria {
        self.negate()
    }
}
