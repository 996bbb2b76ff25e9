//! In-memory evaluation of criteria against records.
//!
//! Evaluation is total for well-formed filters: a missing or null field fails
//! every operator except `IsNull`, equality across kinds is simply false, and
//! the remaining ill-typed comparisons are reported as errors instead of
//! being guessed.
//!
//! Every filter in the tree is tested, even when an earlier one already
//! decided the outcome, so a malformed filter fails the call regardless of
//! the record.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;

use crate::criteria::Criteria;
use crate::error::{Result, SieveError};
use crate::filter::Filter;
use crate::like::like_to_regex;
use crate::op::Operator;
use crate::ordering::compare_by_orders;
use crate::record::Record;
use crate::value::Value;

/// Outcome of [`evaluate_with_messages`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    /// Whether the record satisfies the criteria.
    pub passed: bool,
    /// Messages of the filters responsible for the outcome.
    pub errors: Vec<String>,
}

impl Validation {
    fn pass() -> Self {
        Validation {
            passed: true,
            errors: Vec::new(),
        }
    }
}

/// Tests a record against criteria.
///
/// Criteria without any filter match every record.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use sieve::{evaluate, Criteria, Filter, Value};
///
/// let record: HashMap<String, Value> = HashMap::from([
///     ("lt_value".to_string(), Value::from(10)),
///     ("str_value".to_string(), Value::from("lorem ipsum dolor sit amet")),
/// ]);
///
/// let criteria = Criteria::filtered([Filter::lt("lt_value", 20)])
///     & Criteria::filtered([Filter::like("str_value", "%lorem_ipsum%")]);
/// assert!(evaluate(&record, &criteria).unwrap());
/// ```
pub fn evaluate<R: Record + ?Sized>(record: &R, criteria: &Criteria) -> Result<bool> {
    Ok(Evaluator::default().eval(record, criteria)?.unwrap_or(true))
}

/// Tests a record and collects the messages of the filters that decided it.
pub fn evaluate_with_messages<R: Record + ?Sized>(
    record: &R,
    criteria: &Criteria,
) -> Result<Validation> {
    Ok(Evaluator::default()
        .validate(record, criteria)?
        .unwrap_or_else(Validation::pass))
}

/// Keeps the records matching the criteria, sorted by its orders.
///
/// The sort is stable; records that compare equal keep their input order.
pub fn select<'a, R: Record>(records: &'a [R], criteria: &Criteria) -> Result<Vec<&'a R>> {
    let mut evaluator = Evaluator::default();
    let mut selected = Vec::new();
    for record in records {
        if evaluator.eval(record, criteria)?.unwrap_or(true) {
            selected.push(record);
        }
    }

    let orders = criteria.orders();
    if !orders.is_empty() {
        selected.sort_by(|a, b| compare_by_orders(*a, *b, &orders));
    }

    tracing::debug!(
        total = records.len(),
        selected = selected.len(),
        orders = orders.len(),
        "selected records"
    );
    Ok(selected)
}

impl Criteria {
    /// Tests a single record. See [`evaluate`].
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> Result<bool> {
        evaluate(record, self)
    }
}

/// Per-call evaluation state: compiled LIKE patterns.
#[derive(Default)]
struct Evaluator {
    patterns: HashMap<String, Regex>,
}

impl Evaluator {
    /// `None` means the subtree is vacuous and constrains nothing.
    fn eval<R: Record + ?Sized>(
        &mut self,
        record: &R,
        criteria: &Criteria,
    ) -> Result<Option<bool>> {
        match criteria {
            Criteria::Leaf { filters, .. } => {
                if filters.is_empty() {
                    return Ok(None);
                }
                let mut passed = true;
                for filter in filters {
                    passed &= self.test(record, filter)?;
                }
                Ok(Some(passed))
            }
            Criteria::And(left, right) => {
                let left = self.eval(record, left)?;
                let right = self.eval(record, right)?;
                Ok(match (left, right) {
                    (Some(l), Some(r)) => Some(l && r),
                    (l, r) => l.or(r),
                })
            }
            // A vacuous side is always true, so the whole disjunction is.
            Criteria::Or(left, right) => {
                let left = self.eval(record, left)?;
                let right = self.eval(record, right)?;
                Ok(left.zip(right).map(|(l, r)| l || r))
            }
            Criteria::Not(inner) => Ok(self.eval(record, inner)?.map(|passed| !passed)),
        }
    }

    fn validate<R: Record + ?Sized>(
        &mut self,
        record: &R,
        criteria: &Criteria,
    ) -> Result<Option<Validation>> {
        match criteria {
            Criteria::Leaf { filters, .. } => {
                if filters.is_empty() {
                    return Ok(None);
                }
                let mut outcome = Validation::pass();
                for filter in filters {
                    if !self.test(record, filter)? {
                        outcome.passed = false;
                        outcome.errors.push(failure_message(filter));
                    }
                }
                Ok(Some(outcome))
            }
            Criteria::And(left, right) => {
                let left = self.validate(record, left)?;
                let right = self.validate(record, right)?;
                Ok(match (left, right) {
                    (Some(mut l), Some(r)) => {
                        l.passed = l.passed && r.passed;
                        l.errors.extend(r.errors);
                        Some(l)
                    }
                    (l, r) => l.or(r),
                })
            }
            Criteria::Or(left, right) => {
                let left = self.validate(record, left)?;
                let right = self.validate(record, right)?;
                Ok(left.zip(right).map(|(l, r)| if l.passed { l } else { r }))
            }
            Criteria::Not(inner) => Ok(self.validate(record, inner)?.map(|v| Validation {
                passed: !v.passed,
                errors: v.errors,
            })),
        }
    }

    fn test<R: Record + ?Sized>(&mut self, record: &R, filter: &Filter) -> Result<bool> {
        filter.check_shape()?;
        let present = record.field_value(&filter.field).filter(|v| !v.is_null());

        match filter.operator {
            Operator::IsNull => Ok(present.is_none()),
            Operator::IsNotNull => Ok(present.is_some()),
            operator => match present {
                Some(value) => self.test_present(operator, filter, value),
                None => Ok(false),
            },
        }
    }

    fn test_present(&mut self, operator: Operator, filter: &Filter, value: &Value) -> Result<bool> {
        match operator {
            Operator::Equal => Ok(value.equals(&filter.value)),
            Operator::NotEqual => Ok(!value.equals(&filter.value)),
            Operator::Greater
            | Operator::GreaterOrEqual
            | Operator::Less
            | Operator::LessOrEqual => {
                check_comparable(filter, value, &filter.value)?;
                match value.compare(&filter.value) {
                    Some(ordering) => operator.eval_ordering(ordering),
                    None => Ok(false),
                }
            }
            Operator::Like => {
                let (text, pattern) = texts(filter, value)?;
                Ok(self.pattern(pattern)?.is_match(text))
            }
            Operator::NotLike => {
                let (text, pattern) = texts(filter, value)?;
                Ok(!self.pattern(pattern)?.is_match(text))
            }
            Operator::Contains => texts(filter, value).map(|(text, needle)| text.contains(needle)),
            Operator::NotContains => {
                texts(filter, value).map(|(text, needle)| !text.contains(needle))
            }
            Operator::StartsWith => {
                texts(filter, value).map(|(text, prefix)| text.starts_with(prefix))
            }
            Operator::NotStartsWith => {
                texts(filter, value).map(|(text, prefix)| !text.starts_with(prefix))
            }
            Operator::EndsWith => texts(filter, value).map(|(text, suffix)| text.ends_with(suffix)),
            Operator::NotEndsWith => {
                texts(filter, value).map(|(text, suffix)| !text.ends_with(suffix))
            }
            Operator::In => Ok(members(filter).iter().any(|item| value.equals(item))),
            Operator::NotIn => Ok(!members(filter).iter().any(|item| value.equals(item))),
            Operator::Between => Ok(within(filter, value)?.unwrap_or(false)),
            Operator::NotBetween => Ok(within(filter, value)?.is_some_and(|inside| !inside)),
            // Decided before the field value is read
            Operator::IsNull | Operator::IsNotNull => {
                Err(SieveError::UnsupportedOperator { operator })
            }
        }
    }

    fn pattern(&mut self, pattern: &str) -> Result<&Regex> {
        if !self.patterns.contains_key(pattern) {
            let regex = like_to_regex(pattern)?;
            self.patterns.insert(pattern.to_string(), regex);
        }
        Ok(&self.patterns[pattern])
    }
}

fn failure_message(filter: &Filter) -> String {
    filter
        .message
        .clone()
        .unwrap_or_else(|| format!("Field '{}' failed {} check", filter.field, filter.operator))
}

fn mismatch(filter: &Filter, expected: &'static str, actual: &'static str) -> SieveError {
    SieveError::TypeMismatch {
        field: filter.field.clone(),
        operator: filter.operator,
        expected,
        actual,
    }
}

fn check_comparable(filter: &Filter, value: &Value, bound: &Value) -> Result<()> {
    if value.is_comparable_with(bound) {
        Ok(())
    } else {
        Err(mismatch(filter, bound.kind(), value.kind()))
    }
}

/// The record text and the filter text of a pattern operator.
fn texts<'a>(filter: &'a Filter, value: &'a Value) -> Result<(&'a str, &'a str)> {
    let text = value
        .as_str()
        .ok_or_else(|| mismatch(filter, "string", value.kind()))?;
    let operand = filter
        .value
        .as_str()
        .ok_or_else(|| mismatch(filter, "string", filter.value.kind()))?;
    Ok((text, operand))
}

fn members(filter: &Filter) -> &[Value] {
    filter.value.as_list().unwrap_or_default()
}

/// Whether `lo <= value <= hi`; `None` when NaN makes it undecidable.
fn within(filter: &Filter, value: &Value) -> Result<Option<bool>> {
    let [lo, hi] = members(filter) else {
        return Err(filter.shape_error());
    };
    check_comparable(filter, value, lo)?;
    check_comparable(filter, value, hi)?;

    let (Some(low), Some(high)) = (value.compare(lo), value.compare(hi)) else {
        return Ok(None);
    };
    Ok(Some(low != Ordering::Less && high != Ordering::Greater))
}
