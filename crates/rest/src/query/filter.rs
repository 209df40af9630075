//! Filter predicates from `q[<column>_<predicate>]` parameters.

use std::fmt;

use bookland_persistence::types::{Comparison, Condition, Scope, escape_like};

use crate::error::InvalidParam;
use crate::extractors::FilterParam;
use crate::schema::ResourceSchema;

/// A named comparison applied to one filter column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Exact match.
    Eq,
    /// Substring match.
    Cont,
    /// Negated substring match.
    NotCont,
    /// Prefix match.
    Start,
    /// Suffix match.
    End,
    /// Strictly greater than.
    Gt,
    /// Strictly less than.
    Lt,
}

impl Predicate {
    /// Parses a predicate name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Predicate::Eq),
            "cont" => Some(Predicate::Cont),
            "notcont" => Some(Predicate::NotCont),
            "start" => Some(Predicate::Start),
            "end" => Some(Predicate::End),
            "gt" => Some(Predicate::Gt),
            "lt" => Some(Predicate::Lt),
            _ => None,
        }
    }

    /// Returns the predicate name as written in parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Eq => "eq",
            Predicate::Cont => "cont",
            Predicate::NotCont => "notcont",
            Predicate::Start => "start",
            Predicate::End => "end",
            Predicate::Gt => "gt",
            Predicate::Lt => "lt",
        }
    }

    /// Builds the storage condition for `column` compared against `value`.
    pub fn condition(&self, column: &str, value: &str) -> Condition {
        match self {
            Predicate::Eq => Condition::new(column, Comparison::Eq, value),
            Predicate::Gt => Condition::new(column, Comparison::Gt, value),
            Predicate::Lt => Condition::new(column, Comparison::Lt, value),
            Predicate::Cont => {
                Condition::new(column, Comparison::Like, format!("%{}%", escape_like(value)))
            }
            Predicate::NotCont => Condition::new(
                column,
                Comparison::NotLike,
                format!("%{}%", escape_like(value)),
            ),
            Predicate::Start => {
                Condition::new(column, Comparison::Like, format!("{}%", escape_like(value)))
            }
            Predicate::End => {
                Condition::new(column, Comparison::Like, format!("%{}", escape_like(value)))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// The attribute being filtered.
    pub column: String,
    /// The comparison.
    pub predicate: Predicate,
    /// The raw client value.
    pub value: String,
}

impl FilterSpec {
    /// Parses `<column>_<predicate>`, splitting on the last underscore.
    ///
    /// Returns `None` when the key has no underscore, an empty column, or an
    /// unknown predicate.
    pub fn parse(key: &str, value: &str) -> Option<Self> {
        let (column, predicate) = key.rsplit_once('_')?;
        if column.is_empty() {
            return None;
        }

        Some(Self {
            column: column.to_string(),
            predicate: Predicate::parse(predicate)?,
            value: value.to_string(),
        })
    }
}

/// Applies filter parameters as conjunctive constraints.
pub struct Filter;

impl Filter {
    /// Validates every filter against the schema and, when all are valid,
    /// adds them to the scope in request order.
    ///
    /// Each invalid filter is reported as `q[<key>]=<value>`; on any error the
    /// scope is returned unchanged.
    pub fn apply(
        scope: Scope,
        schema: &ResourceSchema,
        filters: &[FilterParam],
    ) -> (Scope, Vec<InvalidParam>) {
        let mut specs = Vec::with_capacity(filters.len());
        let mut errors = Vec::new();

        for filter in filters {
            match FilterSpec::parse(&filter.key, &filter.value) {
                Some(spec) if schema.can_filter(&spec.column) => specs.push(spec),
                _ => errors.push(InvalidParam::new(
                    format!("q[{}]", filter.key),
                    filter.value.clone(),
                )),
            }
        }

        if !errors.is_empty() {
            return (scope, errors);
        }

        let scope = specs.iter().fold(scope, |scope, spec| {
            scope.with_condition(spec.predicate.condition(&spec.column, &spec.value))
        });

        (scope, errors)
    }
}
