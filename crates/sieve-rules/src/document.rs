//! Rule documents and their conversion to criteria.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sieve::{Criteria, Filter, Operator, Order, Value};

use crate::error::Result;

/// One field's rule: an operator token, its operand and an optional message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Operator token such as `eq`, `not_like` or `between`.
    pub operator: String,
    /// The operand. Omitted for `is_null` / `is_not_null`.
    #[serde(default)]
    pub value: Value,
    /// Reported when the filter fails validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FilterRule {
    /// Converts this rule into a filter on `field`.
    ///
    /// Fails on an unknown operator token or a value that does not fit the
    /// operator.
    pub fn to_filter(&self, field: &str) -> Result<Filter> {
        let operator: Operator = self.operator.parse()?;
        let filter = Filter {
            field: field.to_string(),
            operator,
            value: self.value.clone(),
            message: self.message.clone(),
        };
        filter.check_shape()?;
        Ok(filter)
    }
}

/// A declarative rule document.
///
/// ```yaml
/// filters:
///   age: { operator: ge, value: 18, message: must be an adult }
///   email: { operator: is_not_null }
/// orders:
///   - { field: age, direction: desc }
/// ```
///
/// Filters keep the order in which they appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub filters: IndexMap<String, FilterRule>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl RuleDocument {
    /// Parses a JSON document.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Builds the single leaf this document describes.
    pub fn to_criteria(&self) -> Result<Criteria> {
        let filters = self
            .filters
            .iter()
            .map(|(field, rule)| rule.to_filter(field))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            filters = filters.len(),
            orders = self.orders.len(),
            "built criteria from rules"
        );
        Ok(Criteria::leaf(filters, self.orders.iter().cloned()))
    }
}

/// Builds one leaf from a field to rule mapping.
///
/// # Example
///
/// ```
/// use indexmap::IndexMap;
/// use sieve::Value;
/// use sieve_rules::{build_leaf, FilterRule};
///
/// let rules = IndexMap::from([(
///     "age".to_string(),
///     FilterRule { operator: "ge".into(), value: Value::from(18), message: None },
/// )]);
/// let criteria = build_leaf(&rules).unwrap();
/// assert_eq!(criteria.filters().len(), 1);
/// ```
pub fn build_leaf(rules: &IndexMap<String, FilterRule>) -> Result<Criteria> {
    RuleDocument {
        filters: rules.clone(),
        orders: Vec::new(),
    }
    .to_criteria()
}

/// Parses a JSON rule document into criteria.
pub fn parse_rules_json(source: &str) -> Result<Criteria> {
    RuleDocument::from_json(source)?.to_criteria()
}

/// Parses a YAML rule document into criteria.
pub fn parse_rules_yaml(source: &str) -> Result<Criteria> {
    RuleDocument::from_yaml(source)?.to_criteria()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use sieve::{Direction, SieveError};

    const JSON: &str = r#"{
        "filters": {
            "name": {"operator": "starts_with", "value": "Jo"},
            "age": {"operator": "between", "value": [18, 30], "message": "age out of range"},
            "email": {"operator": "is_not_null"}
        },
        "orders": [{"field": "age", "direction": "desc"}, {"field": "name"}]
    }"#;

    #[test]
    fn json_document() {
        let criteria = parse_rules_json(JSON).unwrap();

        let filters = criteria.filters();
        let fields: Vec<&str> = filters.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["name", "age", "email"]);
        assert_eq!(filters[0].operator, Operator::StartsWith);
        assert_eq!(filters[1].value, Value::from(vec![18, 30]));
        assert_eq!(filters[1].message.as_deref(), Some("age out of range"));
        assert_eq!(filters[2].value, Value::Null);

        let orders = criteria.orders();
        assert_eq!(orders[0].direction, Direction::Desc);
        assert_eq!(orders[1].direction, Direction::Asc);
    }

    #[test]
    fn yaml_document() {
        let criteria = parse_rules_yaml(
            "filters:\n  \
               status: { operator: in, value: [open, closed] }\n  \
               title: { operator: like, value: '%bug%' }\n",
        )
        .unwrap();

        let filters = criteria.filters();
        assert_eq!(filters[0].operator, Operator::In);
        assert_eq!(filters[0].value, Value::from(["open", "closed"]));
        assert_eq!(filters[1].value, Value::from("%bug%"));
        assert!(!criteria.has_orders());
    }

    #[test]
    fn every_token_parses() {
        for operator in Operator::ALL {
            let rule = FilterRule {
                operator: operator.token().to_string(),
                value: Value::Null,
                message: None,
            };
            let parsed: Operator = rule.operator.parse().unwrap();
            assert_eq!(parsed, operator);
        }
    }

    #[test]
    fn unknown_operator_fails_the_whole_document() {
        let err = parse_rules_json(
            r#"{"filters": {"a": {"operator": "eq", "value": 1}, "b": {"operator": "approx", "value": 2}}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleError::Criteria(SieveError::UnknownOperator { ref token }) if token == "approx"
        ));
    }

    #[test]
    fn malformed_value_is_rejected() {
        let err = parse_rules_json(r#"{"filters": {"age": {"operator": "between", "value": 18}}}"#)
            .unwrap_err();
        assert!(matches!(err, RuleError::Criteria(SieveError::ValueShape { .. })));

        let err = parse_rules_json(r#"{"filters": {"age": {"operator": "gt"}}}"#).unwrap_err();
        assert!(matches!(err, RuleError::Criteria(SieveError::ValueShape { .. })));

        let err = parse_rules_yaml("filters:\n  age: { operator: contains, value: 1 }\n")
            .unwrap_err();
        assert!(matches!(err, RuleError::Criteria(SieveError::TypeMismatch { .. })));
    }

    #[test]
    fn layout_errors_are_reported() {
        assert!(matches!(
            parse_rules_json(r#"{"filters": {"age": {"value": 1}}}"#),
            Err(RuleError::Json(_))
        ));
        assert!(matches!(
            parse_rules_yaml("filters: [1, 2]"),
            Err(RuleError::Yaml(_))
        ));
    }

    #[test]
    fn empty_document_is_an_empty_leaf() {
        assert_eq!(parse_rules_json("{}").unwrap(), Criteria::empty());
        assert_eq!(build_leaf(&IndexMap::new()).unwrap(), Criteria::empty());
    }
}
