//! Compilation of criteria into parameterized SQL.
//!
//! The compiler never inlines a filter value into the query text. Every value
//! is bound to a named placeholder `:parameter_<n>`, numbered left to right
//! across the whole tree, and returned alongside the text.
//!
//! ```text
//! SELECT <columns> FROM <table>[ WHERE <condition>][ ORDER BY <orders>];
//! ```
//!
//! `%%` in the pattern templates is emitted verbatim; it is the escaped `%`
//! of drivers using printf-style paramstyles.

use indexmap::IndexMap;
use serde::Serialize;

use crate::criteria::Criteria;
use crate::error::Result;
use crate::filter::Filter;
use crate::op::Operator;
use crate::value::Value;

/// Bound values by placeholder name, in allocation order.
pub type Parameters = IndexMap<String, Value>;

/// Query text and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub parameters: Parameters,
}

/// Builder for compiling criteria against one table.
///
/// # Example
///
/// ```
/// use sieve::{Criteria, Filter, Order, SqlCompiler};
///
/// let criteria = Criteria::leaf(
///     [Filter::eq("full_name", "John Doe")],
///     [Order::asc("full_name")],
/// );
///
/// let query = SqlCompiler::new("user")
///     .columns(["id", "name"])
///     .column_mapping([("full_name", "name")])
///     .compile(&criteria)
///     .unwrap();
///
/// assert_eq!(
///     query.sql,
///     "SELECT id, name FROM user WHERE name = :parameter_0 ORDER BY name ASC;"
/// );
/// assert_eq!(query.parameters["parameter_0"], "John Doe".into());
/// ```
#[derive(Debug, Clone)]
pub struct SqlCompiler {
    table: String,
    columns: Vec<String>,
    column_mapping: IndexMap<String, String>,
}

impl SqlCompiler {
    /// Creates a compiler selecting every column (`*`) of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        SqlCompiler {
            table: table.into(),
            columns: vec!["*".to_string()],
            column_mapping: IndexMap::new(),
        }
    }

    /// Sets the selected columns. An empty list selects `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        if self.columns.is_empty() {
            self.columns.push("*".to_string());
        }
        self
    }

    /// Adds logical field to physical column renames.
    ///
    /// Only filter and order fields are renamed; the table and the selected
    /// columns are emitted as given.
    pub fn column_mapping<I, K, V>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.column_mapping
            .extend(mapping.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Compiles the criteria into SQL text and its parameters.
    pub fn compile(&self, criteria: &Criteria) -> Result<CompiledQuery> {
        let mut state = CompileState::new(&self.column_mapping);

        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);

        if let Some(condition) = state.render(criteria)? {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }

        let orders = criteria.orders();
        if !orders.is_empty() {
            let rendered: Vec<String> = orders
                .iter()
                .map(|order| {
                    let field = column(&self.column_mapping, &order.field);
                    format!("{field} {}", order.direction)
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&rendered.join(", "));
        }
        sql.push(';');

        tracing::debug!(
            table = %self.table,
            parameters = state.parameters.len(),
            orders = orders.len(),
            "compiled criteria"
        );

        Ok(CompiledQuery {
            sql,
            parameters: state.parameters,
        })
    }
}

/// Compiles criteria with explicit arguments.
///
/// `columns` defaults to `*` when empty. Equivalent to the [`SqlCompiler`]
/// builder.
pub fn compile(
    criteria: &Criteria,
    table: &str,
    columns: &[&str],
    column_mapping: &IndexMap<String, String>,
) -> Result<(String, Parameters)> {
    let query = SqlCompiler::new(table)
        .columns(columns.iter().copied())
        .column_mapping(column_mapping.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .compile(criteria)?;
    Ok((query.sql, query.parameters))
}

fn column<'f>(mapping: &'f IndexMap<String, String>, field: &'f str) -> &'f str {
    mapping.get(field).map_or(field, String::as_str)
}

/// Per-call state: the column mapping and the parameters bound so far.
///
/// The next placeholder number is the number of parameters already bound,
/// so numbering has no gaps by construction.
struct CompileState<'a> {
    mapping: &'a IndexMap<String, String>,
    parameters: Parameters,
}

impl<'a> CompileState<'a> {
    fn new(mapping: &'a IndexMap<String, String>) -> Self {
        CompileState {
            mapping,
            parameters: Parameters::new(),
        }
    }

    /// Binds a value and returns its placeholder.
    fn bind(&mut self, value: &Value) -> String {
        let name = format!("parameter_{}", self.parameters.len());
        let placeholder = format!(":{name}");
        self.parameters.insert(name, value.clone());
        placeholder
    }

    /// `None` when the subtree is vacuous.
    fn render(&mut self, criteria: &Criteria) -> Result<Option<String>> {
        match criteria {
            Criteria::Leaf { filters, .. } => {
                if filters.is_empty() {
                    return Ok(None);
                }
                let mut fragments = Vec::with_capacity(filters.len());
                for filter in filters {
                    fragments.push(self.render_filter(filter)?);
                }
                Ok(Some(fragments.join(" AND ")))
            }
            Criteria::And(left, right) => {
                let left = self.render(left)?;
                let right = self.render(right)?;
                Ok(match (left, right) {
                    (Some(left), Some(right)) => Some(format!("({left} AND {right})")),
                    (left, right) => left.or(right),
                })
            }
            // A vacuous side makes the disjunction vacuous; parameters bound
            // by the other side are released again.
            Criteria::Or(left, right) => {
                let mark = self.parameters.len();
                let left = self.render(left)?;
                let right = self.render(right)?;
                match (left, right) {
                    (Some(left), Some(right)) => Ok(Some(format!("({left} OR {right})"))),
                    _ => {
                        self.parameters.truncate(mark);
                        Ok(None)
                    }
                }
            }
            Criteria::Not(inner) => Ok(self.render(inner)?.map(|inner| format!("NOT ({inner})"))),
        }
    }

    fn render_filter(&mut self, filter: &Filter) -> Result<String> {
        filter.check_shape()?;
        let field = column(self.mapping, &filter.field);

        let fragment = match filter.operator {
            Operator::Equal
            | Operator::NotEqual
            | Operator::Greater
            | Operator::GreaterOrEqual
            | Operator::Less
            | Operator::LessOrEqual
            | Operator::Like
            | Operator::NotLike => {
                let keyword = filter.operator.sql_keyword();
                format!("{field} {keyword} {}", self.bind(&filter.value))
            }
            Operator::Contains => {
                format!("{field} LIKE '%%' || {} || '%%'", self.bind(&filter.value))
            }
            Operator::NotContains => {
                format!("{field} NOT LIKE '%%' || {} || '%%'", self.bind(&filter.value))
            }
            Operator::StartsWith => format!("{field} LIKE {} || '%%'", self.bind(&filter.value)),
            Operator::NotStartsWith => {
                format!("{field} NOT LIKE {} || '%%'", self.bind(&filter.value))
            }
            Operator::EndsWith => format!("{field} LIKE '%%' || {}", self.bind(&filter.value)),
            Operator::NotEndsWith => {
                format!("{field} NOT LIKE '%%' || {}", self.bind(&filter.value))
            }
            Operator::In | Operator::NotIn => {
                let items = filter.value.as_list().unwrap_or_default();
                let placeholders: Vec<String> = items.iter().map(|item| self.bind(item)).collect();
                format!(
                    "{field} {} ({})",
                    filter.operator.sql_keyword(),
                    placeholders.join(", ")
                )
            }
            Operator::Between | Operator::NotBetween => {
                let items = filter.value.as_list().unwrap_or_default();
                let [lo, hi] = items else {
                    return Err(filter.shape_error());
                };
                let (lo, hi) = (self.bind(lo), self.bind(hi));
                format!("{field} {} {lo} AND {hi}", filter.operator.sql_keyword())
            }
            Operator::IsNull => format!("{field} IS NULL"),
            Operator::IsNotNull => format!("{field} IS NOT NULL"),
        };

        tracing::trace!(
            field = %filter.field,
            operator = %filter.operator,
            %fragment,
            "rendered filter"
        );
        Ok(fragment)
    }
}
