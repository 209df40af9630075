//! SQL query builder for record scopes.
//!
//! Translates a [`Scope`] into a `SELECT` against the `records` table. Record
//! attributes live in a JSON document and are addressed with `json_extract`;
//! the primary key uses the real `id` column.

use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use crate::types::{Comparison, Condition, Ordering, Scope, ScopeValue, Window};

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }
}

impl From<&ScopeValue> for SqlParam {
    fn from(value: &ScopeValue) -> Self {
        match value {
            ScopeValue::Integer(i) => SqlParam::Integer(*i),
            ScopeValue::Real(f) => SqlParam::Float(*f),
            ScopeValue::Text(s) => SqlParam::String(s.clone()),
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::String(s) => s.to_sql(),
            SqlParam::Integer(i) => i.to_sql(),
            SqlParam::Float(f) => f.to_sql(),
        }
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter and returns its numbered placeholder.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Returns the parameters as rusqlite trait objects.
    pub fn bound(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p as &dyn ToSql).collect()
    }
}

/// Returns the JSON path for a top-level attribute.
pub fn json_path(column: &str) -> String {
    format!("$.\"{}\"", column)
}

/// Builds SQL from record scopes.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Builds the complete `SELECT id, data` statement for a scope.
    pub fn build(scope: &Scope) -> SqlFragment {
        let mut fragment = SqlFragment::new("");
        let type_param = fragment.add_param(SqlParam::string(scope.resource_type()));

        let mut sql = format!(
            "SELECT id, data FROM records WHERE resource_type = {}",
            type_param
        );

        for condition in scope.conditions() {
            let clause = Self::condition(&mut fragment, condition);
            sql.push_str(" AND ");
            sql.push_str(&clause);
        }

        sql.push_str(&Self::order_by(&mut fragment, scope.order()));

        if let Some(Window { limit, offset }) = scope.window() {
            let limit = fragment.add_param(SqlParam::Integer(clamp(limit)));
            let offset = fragment.add_param(SqlParam::Integer(clamp(offset)));
            sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
        }

        fragment.sql = sql;
        fragment
    }

    /// Returns the SQL expression addressing an attribute.
    fn attribute(fragment: &mut SqlFragment, column: &str) -> String {
        if column == "id" {
            "id".to_string()
        } else {
            let path = fragment.add_param(SqlParam::string(json_path(column)));
            format!("json_extract(data, {})", path)
        }
    }

    /// Builds the clause for a single condition.
    fn condition(fragment: &mut SqlFragment, condition: &Condition) -> String {
        let expr = Self::attribute(fragment, &condition.column);
        let op = condition.comparison.as_sql();
        let value = fragment.add_param(SqlParam::from(&condition.value));

        if condition.comparison.is_pattern() {
            return format!("{} {} {} ESCAPE '\\'", expr, op, value);
        }

        match (&condition.comparison, &condition.value) {
            // Client text that parses as a number is compared numerically
            // against numeric attributes. Anything else compares as text.
            (Comparison::Eq | Comparison::Gt | Comparison::Lt, ScopeValue::Text(text)) => {
                match numeric_param(text) {
                    Some(number) => {
                        let number = fragment.add_param(number);
                        format!(
                            "(CASE WHEN typeof({e}) IN ('integer', 'real') \
                             THEN {e} {op} {n} ELSE {e} {op} {v} END)",
                            e = expr,
                            op = op,
                            n = number,
                            v = value
                        )
                    }
                    None => format!("{} {} {}", expr, op, value),
                }
            }
            _ => format!("{} {} {}", expr, op, value),
        }
    }

    /// Builds the `ORDER BY` clause with an `id` tiebreak.
    fn order_by(fragment: &mut SqlFragment, order: Option<&Ordering>) -> String {
        match order {
            Some(order) if order.column == "id" => {
                format!(" ORDER BY id {}", order.direction.as_sql())
            }
            Some(order) => {
                let expr = Self::attribute(fragment, &order.column);
                let dir = order.direction.as_sql();
                format!(" ORDER BY {} {}, id {}", expr, dir, dir)
            }
            None => " ORDER BY id ASC".to_string(),
        }
    }

    /// Builds `SELECT id, data` for records whose `column` is one of `values`.
    pub fn build_in(resource_type: &str, column: &str, values: &[i64]) -> SqlFragment {
        let mut fragment = SqlFragment::new("");
        let type_param = fragment.add_param(SqlParam::string(resource_type));
        let expr = Self::attribute(&mut fragment, column);

        let placeholders: Vec<String> = values
            .iter()
            .map(|v| fragment.add_param(SqlParam::Integer(*v)))
            .collect();

        fragment.sql = format!(
            "SELECT id, data FROM records WHERE resource_type = {} AND {} IN ({}) ORDER BY id ASC",
            type_param,
            expr,
            placeholders.join(", ")
        );
        fragment
    }
}

/// Parses the whole of `text` as a number, if it is one.
fn numeric_param(text: &str) -> Option<SqlParam> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(SqlParam::Integer(i));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(SqlParam::Float)
}

fn clamp(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Relation, SortDirection};

    #[test]
    fn test_unconstrained_scope() {
        let fragment = QueryBuilder::build(&Scope::all("books"));
        assert_eq!(
            fragment.sql,
            "SELECT id, data FROM records WHERE resource_type = ?1 ORDER BY id ASC"
        );
        assert_eq!(fragment.params, vec![SqlParam::string("books")]);
    }

    #[test]
    fn test_like_condition() {
        let scope = Scope::all("books").with_condition(Condition::new(
            "title",
            Comparison::Like,
            "%Microscope%",
        ));
        let fragment = QueryBuilder::build(&scope);

        assert!(
            fragment
                .sql
                .contains("json_extract(data, ?2) LIKE ?3 ESCAPE '\\'")
        );
        assert_eq!(fragment.params[1], SqlParam::string("$.\"title\""));
        assert_eq!(fragment.params[2], SqlParam::string("%Microscope%"));
    }

    #[test]
    fn test_text_comparison_is_type_aware() {
        let scope =
            Scope::all("books").with_condition(Condition::new("id", Comparison::Gt, "2"));
        let fragment = QueryBuilder::build(&scope);

        assert!(fragment.sql.contains("CASE WHEN typeof(id)"));
        assert!(fragment.sql.contains("THEN id > ?3 ELSE id > ?2 END"));
        assert_eq!(fragment.params[1], SqlParam::string("2"));
        assert_eq!(fragment.params[2], SqlParam::Integer(2));
    }

    #[test]
    fn test_non_numeric_text_is_never_cast() {
        for raw in ["2junk", "abc", "2013-06-01", "inf", ""] {
            let scope =
                Scope::all("books").with_condition(Condition::new("id", Comparison::Gt, raw));
            let fragment = QueryBuilder::build(&scope);

            assert!(!fragment.sql.contains("CASE"), "{raw} took the numeric branch");
            assert!(!fragment.sql.contains("CAST"));
            assert!(fragment.sql.contains("id > ?2"));
            assert_eq!(fragment.params.len(), 2);
        }
    }

    #[test]
    fn test_decimal_text_is_numeric() {
        assert_eq!(numeric_param("2.5"), Some(SqlParam::Float(2.5)));
        assert_eq!(numeric_param("-7"), Some(SqlParam::Integer(-7)));
        assert_eq!(numeric_param("7 "), None);
    }

    #[test]
    fn test_integer_comparison_is_direct() {
        let scope =
            Scope::all("books").with_condition(Condition::new("author_id", Comparison::Eq, 3i64));
        let fragment = QueryBuilder::build(&scope);

        assert!(fragment.sql.contains("json_extract(data, ?2) = ?3"));
        assert!(!fragment.sql.contains("CASE"));
    }

    #[test]
    fn test_order_and_window() {
        let scope = Scope::all("books")
            .with_order(Ordering::new("title", SortDirection::Ascending))
            .with_window(Window::new(2, 4));
        let fragment = QueryBuilder::build(&scope);

        assert!(
            fragment
                .sql
                .ends_with("ORDER BY json_extract(data, ?2) ASC, id ASC LIMIT ?3 OFFSET ?4")
        );
        assert_eq!(fragment.params[2], SqlParam::Integer(2));
        assert_eq!(fragment.params[3], SqlParam::Integer(4));
    }

    #[test]
    fn test_order_by_primary_key() {
        let scope =
            Scope::all("books").with_order(Ordering::new("id", SortDirection::Descending));
        let fragment = QueryBuilder::build(&scope);
        assert!(fragment.sql.ends_with("ORDER BY id DESC"));
    }

    #[test]
    fn test_eager_loads_do_not_change_select() {
        let plain = QueryBuilder::build(&Scope::all("books"));
        let eager = QueryBuilder::build(
            &Scope::all("books").with_eager_load(Relation::belongs_to("author", "authors", "author_id")),
        );
        assert_eq!(plain.sql, eager.sql);
    }

    #[test]
    fn test_build_in() {
        let fragment = QueryBuilder::build_in("books", "author_id", &[1, 2, 3]);
        assert!(
            fragment
                .sql
                .contains("json_extract(data, ?2) IN (?3, ?4, ?5) ORDER BY id ASC")
        );
        assert_eq!(fragment.params.len(), 5);
    }

    #[test]
    fn test_json_path() {
        assert_eq!(json_path("title"), "$.\"title\"");
        assert_eq!(json_path("released_on"), "$.\"released_on\"");
    }
}
