//! Composable record scopes.
//!
//! A [`Scope`] describes a query against one resource collection: conjunctive
//! conditions, an optional ordering, an optional window, and the relations to
//! batch-load with the result. Backends translate it into their own query
//! language; nothing here touches storage.
//!
//! # Example
//!
//! ```
//! use bookland_persistence::types::{
//!     Comparison, Condition, Ordering, Relation, Scope, SortDirection, Window,
//! };
//!
//! let scope = Scope::all("books")
//!     .with_condition(Condition::new("title", Comparison::Like, "%Microscope%"))
//!     .with_order(Ordering::new("id", SortDirection::Descending))
//!     .with_window(Window::new(10, 0))
//!     .with_eager_load(Relation::belongs_to("author", "authors", "author_id"));
//!
//! assert_eq!(scope.resource_type(), "books");
//! assert_eq!(scope.conditions().len(), 1);
//! assert_eq!(scope.eager_loads().len(), 1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::relation::Relation;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending order.
    Ascending,
    /// Descending order.
    #[default]
    Descending,
}

impl SortDirection {
    /// Parses `asc` / `desc` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    /// Returns the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// Equality.
    Eq,
    /// SQL `LIKE` against a pattern containing `%` wildcards.
    Like,
    /// SQL `NOT LIKE`.
    NotLike,
    /// Strictly greater than.
    Gt,
    /// Strictly less than.
    Lt,
}

impl Comparison {
    /// Returns the SQL operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Like => "LIKE",
            Comparison::NotLike => "NOT LIKE",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
        }
    }

    /// Returns true for the pattern comparisons.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Comparison::Like | Comparison::NotLike)
    }
}

/// A typed value bound into a condition.
///
/// Client-supplied filter values arrive as [`ScopeValue::Text`]; backends compare
/// them numerically against numeric attributes and lexicographically otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeValue {
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Real(f64),
    /// Text value.
    Text(String),
}

impl From<&str> for ScopeValue {
    fn from(s: &str) -> Self {
        ScopeValue::Text(s.to_string())
    }
}

impl From<String> for ScopeValue {
    fn from(s: String) -> Self {
        ScopeValue::Text(s)
    }
}

impl From<i64> for ScopeValue {
    fn from(i: i64) -> Self {
        ScopeValue::Integer(i)
    }
}

impl From<f64> for ScopeValue {
    fn from(f: f64) -> Self {
        ScopeValue::Real(f)
    }
}

/// One conjunctive constraint on an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// The attribute being constrained.
    pub column: String,
    /// The comparison.
    pub comparison: Comparison,
    /// The bound value. For pattern comparisons this is the full pattern.
    pub value: ScopeValue,
}

impl Condition {
    /// Creates a condition.
    pub fn new(
        column: impl Into<String>,
        comparison: Comparison,
        value: impl Into<ScopeValue>,
    ) -> Self {
        Self {
            column: column.into(),
            comparison,
            value: value.into(),
        }
    }
}

/// Escapes `LIKE` metacharacters so a client value matches literally.
///
/// Backends pair this with `ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Ordering of a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    /// The attribute to order by.
    pub column: String,
    /// The direction.
    pub direction: SortDirection,
}

impl Ordering {
    /// Creates an ordering.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// A `LIMIT`/`OFFSET` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Maximum number of records.
    pub limit: u64,
    /// Number of records to skip.
    pub offset: u64,
}

impl Window {
    /// Creates a window.
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }
}

/// A query against one resource collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    resource_type: String,
    conditions: Vec<Condition>,
    order: Option<Ordering>,
    window: Option<Window>,
    eager_loads: Vec<Relation>,
}

impl Scope {
    /// Creates an unconstrained scope over a collection.
    pub fn all(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            conditions: Vec::new(),
            order: None,
            window: None,
            eager_loads: Vec::new(),
        }
    }

    /// Adds a conjunctive condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Sets the ordering, replacing any previous one.
    pub fn with_order(mut self, order: Ordering) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the window, replacing any previous one.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    /// Adds a relation to batch-load. Duplicate names are ignored.
    pub fn with_eager_load(mut self, relation: Relation) -> Self {
        if !self.eager_loads.iter().any(|r| r.name() == relation.name()) {
            self.eager_loads.push(relation);
        }
        self
    }

    /// Returns the collection name.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the conditions, in the order they were added.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns the ordering.
    pub fn order(&self) -> Option<&Ordering> {
        self.order.as_ref()
    }

    /// Returns the window.
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Returns the relations to batch-load.
    pub fn eager_loads(&self) -> &[Relation] {
        &self.eager_loads
    }
}
