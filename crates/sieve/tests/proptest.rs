//! Property-based tests for sieve using proptest.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use regex::Regex;
use sieve::{evaluate, select, Arity, Criteria, Filter, Operator, Order, SqlCompiler, Value};

// ============================================================================
// Strategies
// ============================================================================

const FIELDS: [&str; 3] = ["a", "b", "c"];

fn field_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(FIELDS.to_vec()).prop_map(String::from)
}

/// Well-formed filters only: the value always fits the operator's arity.
fn filter_strategy() -> impl Strategy<Value = Filter> {
    (
        prop::sample::select(Operator::ALL.to_vec()),
        field_strategy(),
        -50i64..50,
        "[a-z%_]{0,6}",
        prop::collection::vec(-50i64..50, 1..4),
    )
        .prop_map(|(operator, field, n, text, items)| {
            let value = match operator.arity() {
                Arity::None => Value::Null,
                Arity::Scalar if operator.is_pattern() => Value::from(text),
                Arity::Scalar => Value::from(n),
                Arity::Pair => Value::from((n, n + 10)),
                Arity::Sequence => Value::from(items),
            };
            Filter::new(field, operator, value)
        })
}

fn order_strategy() -> impl Strategy<Value = Order> {
    (field_strategy(), any::<bool>()).prop_map(|(field, desc)| {
        if desc {
            Order::desc(field)
        } else {
            Order::asc(field)
        }
    })
}

fn leaf_strategy() -> impl Strategy<Value = Criteria> {
    (
        prop::collection::vec(filter_strategy(), 0..3),
        prop::collection::vec(order_strategy(), 0..2),
    )
        .prop_map(|(filters, orders)| Criteria::leaf(filters, orders))
}

fn criteria_strategy() -> impl Strategy<Value = Criteria> {
    leaf_strategy().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l & r),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l | r),
            inner.prop_map(|e| !e),
        ]
    })
}

/// Criteria whose leaves carry orders only.
fn vacuous_strategy() -> impl Strategy<Value = Criteria> {
    prop::collection::vec(order_strategy(), 0..3)
        .prop_map(|orders| Criteria::ordered(orders))
        .prop_recursive(3, 16, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(l, r)| l & r),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| l | r),
                inner.prop_map(|e| !e),
            ]
        })
}

/// Records with numeric values so comparison filters are well-typed.
fn record_strategy() -> impl Strategy<Value = HashMap<String, Value>> {
    prop::collection::hash_map(field_strategy(), (-60i64..60).prop_map(Value::from), 0..4)
}

fn parameters_of(filter: &Filter) -> usize {
    match filter.operator.arity() {
        Arity::None => 0,
        Arity::Scalar => 1,
        Arity::Pair => 2,
        Arity::Sequence => filter.value.as_list().map_or(0, <[Value]>::len),
    }
}

/// Parameters bound by the filters that reach the SQL text.
fn bound_parameters(criteria: &Criteria) -> usize {
    if criteria.is_vacuous() {
        return 0;
    }
    match criteria {
        Criteria::Leaf { filters, .. } => filters.iter().map(parameters_of).sum(),
        Criteria::And(left, right) | Criteria::Or(left, right) => {
            bound_parameters(left) + bound_parameters(right)
        }
        Criteria::Not(inner) => bound_parameters(inner),
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Every placeholder has exactly one parameter, numbered without gaps.
    #[test]
    fn placeholders_match_parameters(criteria in criteria_strategy()) {
        let placeholder = Regex::new(r":parameter_(\d+)").unwrap();
        let query = SqlCompiler::new("t").compile(&criteria).unwrap();

        let indices: Vec<usize> = placeholder
            .captures_iter(&query.sql)
            .map(|caps| caps[1].parse().unwrap())
            .collect();
        let distinct: BTreeSet<usize> = indices.iter().copied().collect();

        prop_assert_eq!(indices.len(), distinct.len(), "placeholder used twice");
        prop_assert_eq!(distinct.len(), query.parameters.len());
        prop_assert_eq!(
            distinct.into_iter().collect::<Vec<_>>(),
            (0..query.parameters.len()).collect::<Vec<_>>()
        );
        for index in 0..query.parameters.len() {
            let name = format!("parameter_{index}");
            prop_assert!(query.parameters.contains_key(&name));
        }
    }

    /// The parameter count is the sum of what each rendered filter consumes.
    #[test]
    fn parameter_count_is_additive(criteria in criteria_strategy()) {
        let query = SqlCompiler::new("t").compile(&criteria).unwrap();
        prop_assert_eq!(query.parameters.len(), bound_parameters(&criteria));
        prop_assert!(
            query.parameters.len()
                <= criteria.filters().into_iter().map(parameters_of).sum::<usize>()
        );
    }

    /// WHERE appears exactly when the criteria constrain something.
    #[test]
    fn where_clause_iff_constrained(criteria in criteria_strategy()) {
        let query = SqlCompiler::new("t").compile(&criteria).unwrap();
        prop_assert_eq!(query.sql.contains(" WHERE "), !criteria.is_vacuous());
        prop_assert_eq!(query.sql.contains(" ORDER BY "), criteria.has_orders());
        prop_assert!(query.sql.starts_with("SELECT * FROM t"));
        prop_assert!(query.sql.ends_with(';'));
    }

    /// Criteria without filters match every record.
    #[test]
    fn vacuous_criteria_match_everything(
        criteria in vacuous_strategy(),
        record in record_strategy(),
    ) {
        prop_assert!(!criteria.has_filters());
        prop_assert!(criteria.is_vacuous());
        prop_assert!(evaluate(&record, &criteria).unwrap());

        let query = SqlCompiler::new("t").compile(&criteria).unwrap();
        prop_assert!(!query.sql.contains("WHERE"));
        prop_assert!(query.parameters.is_empty());
    }

    /// OR with a vacuous side matches every record and adds no condition.
    #[test]
    fn disjunction_with_vacuous_side_matches_everything(
        vacuous in vacuous_strategy(),
        other in criteria_strategy(),
        record in record_strategy(),
    ) {
        let criteria = &vacuous | &other;
        prop_assert!(criteria.is_vacuous());
        if evaluate(&record, &other).is_ok() {
            prop_assert!(evaluate(&record, &criteria).unwrap());
        }

        let query = SqlCompiler::new("t").compile(&criteria).unwrap();
        prop_assert!(!query.sql.contains("WHERE"));
        prop_assert!(query.parameters.is_empty());
    }

    /// Compiling twice gives identical output.
    #[test]
    fn compile_is_idempotent(criteria in criteria_strategy()) {
        let compiler = SqlCompiler::new("t").columns(["id"]);
        prop_assert_eq!(compiler.compile(&criteria).unwrap(), compiler.compile(&criteria).unwrap());
    }

    /// NOT flips the outcome of any constraining criteria.
    #[test]
    fn negation_flips_outcome(
        criteria in criteria_strategy(),
        record in record_strategy(),
    ) {
        prop_assume!(!criteria.is_vacuous());
        if let Ok(outcome) = evaluate(&record, &criteria) {
            prop_assert_eq!(evaluate(&record, &!&criteria).unwrap(), !outcome);
        }
    }

    /// AND and OR follow boolean logic over their operands, a vacuous
    /// operand counting as true.
    #[test]
    fn combinators_follow_boolean_logic(
        left in criteria_strategy(),
        right in criteria_strategy(),
        record in record_strategy(),
    ) {
        if let (Ok(l), Ok(r)) = (evaluate(&record, &left), evaluate(&record, &right)) {
            prop_assert_eq!(evaluate(&record, &(&left & &right)).unwrap(), l && r);
            prop_assert_eq!(evaluate(&record, &(&left | &right)).unwrap(), l || r);
        }
    }

    /// select keeps only matching records and never grows the input.
    #[test]
    fn select_keeps_matching_records(
        criteria in criteria_strategy(),
        records in prop::collection::vec(record_strategy(), 0..20),
    ) {
        if let Ok(selected) = select(&records, &criteria) {
            prop_assert!(selected.len() <= records.len());
            for record in selected {
                prop_assert!(evaluate(record, &criteria).unwrap());
            }
        }
    }
}
