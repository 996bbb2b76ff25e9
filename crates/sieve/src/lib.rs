//! Sieve - Composable filter criteria for in-memory records and SQL.
//!
//! Sieve lets you describe a filtering and ordering intent once, as a boolean
//! expression over named fields, and run it against two targets:
//!
//! - an in-memory test of a record ([`evaluate`], [`select`])
//! - a parameterized SQL query ([`SqlCompiler`], [`compile`])
//!
//! A third backend, [`Criteria::conditions`], lowers the same tree into
//! [`Condition`] values for ORM adapters.
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use sieve::{evaluate, Criteria, Filter, Order, SqlCompiler, Value};
//!
//! let named = Criteria::filtered([Filter::eq("name", "John Doe")]);
//! let reachable = Criteria::filtered([Filter::is_not_null("email")]);
//! let minor = Criteria::filtered([Filter::lt("age", 18)]);
//!
//! let criteria = &named & (&reachable | !&minor);
//!
//! // Compile to SQL
//! let query = SqlCompiler::new("user")
//!     .columns(["id", "name", "email"])
//!     .compile(&criteria)
//!     .unwrap();
//! assert_eq!(
//!     query.sql,
//!     "SELECT id, name, email FROM user WHERE (name = :parameter_0 AND (email IS NOT NULL OR NOT (age < :parameter_1)));"
//! );
//! assert_eq!(query.parameters.len(), 2);
//!
//! // Or test a record directly
//! let record: HashMap<String, Value> = HashMap::from([
//!     ("name".to_string(), Value::from("John Doe")),
//!     ("age".to_string(), Value::from(42)),
//! ]);
//! assert!(evaluate(&record, &criteria).unwrap());
//! ```
//!
//! # Criteria Semantics
//!
//! A [`Criteria`] is a tree:
//!
//! ```text
//! Leaf { filters, orders }   all filters must hold
//! And(l, r)                  both must hold
//! Or(l, r)                   at least one must hold
//! Not(e)                     e must not hold
//! ```
//!
//! Trees are immutable. `&`, `|` and `!` (or [`Criteria::and`],
//! [`Criteria::or`], [`Criteria::negate`]) build new nodes that share their
//! operands. Nothing is simplified: the compiled SQL mirrors the calls made.
//!
//! A subtree without filters places no constraint, and neither does an `Or`
//! with such a side (see [`Criteria::is_vacuous`]). It evaluates to `true`
//! (even under `Not`) and is left out of the `WHERE` clause. Orders are
//! collected from every leaf, depth-first, left to right.
//!
//! # Operators
//!
//! | Group | Operators | Value |
//! |-------|-----------|-------|
//! | Comparison | `Equal`, `NotEqual`, `Greater`, `GreaterOrEqual`, `Less`, `LessOrEqual` | scalar |
//! | Pattern | `Like`, `NotLike`, `Contains`, `NotContains`, `StartsWith`, `NotStartsWith`, `EndsWith`, `NotEndsWith` | string |
//! | Membership | `In`, `NotIn` | non-empty list |
//! | Range | `Between`, `NotBetween` | pair, inclusive |
//! | Null | `IsNull`, `IsNotNull` | none |
//!
//! # Null Handling
//!
//! A missing field and a `Null` field are the same thing. `IsNull` is true
//! for both; every other operator is false, negated ones included.

mod criteria;
mod descriptor;
mod error;
mod eval;
mod filter;
mod like;
mod op;
mod ordering;
mod record;
mod sql;
mod value;

// Re-export public API
pub use criteria::Criteria;
pub use descriptor::{Comparison, Condition};
pub use error::{Result, SieveError};
pub use eval::{evaluate, evaluate_with_messages, select, Validation};
pub use filter::Filter;
pub use like::like_to_regex;
pub use op::{Arity, Operator};
pub use ordering::{compare_by_orders, compare_values, Direction, Order};
pub use record::Record;
pub use sql::{compile, CompiledQuery, Parameters, SqlCompiler};
pub use value::{Number, Value};
