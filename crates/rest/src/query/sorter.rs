//! Ordering from `sort` and `dir` parameters.

use bookland_persistence::types::{Ordering, Scope, SortDirection};

use crate::error::InvalidParam;
use crate::schema::ResourceSchema;

/// Applies a validated ordering to a scope.
pub struct Sorter;

impl Sorter {
    /// Orders the scope by `sort` (default: the primary key) in direction
    /// `dir` (default: descending).
    ///
    /// A `sort` outside the sortable attributes reports `sort=<value>`, an
    /// unknown `dir` reports `dir=<value>`. On any error the scope is not
    /// ordered.
    pub fn apply(
        scope: Scope,
        schema: &ResourceSchema,
        sort: Option<&str>,
        dir: Option<&str>,
    ) -> (Scope, Vec<InvalidParam>) {
        let mut errors = Vec::new();

        let column = match sort {
            Some(column) if schema.can_sort(column) => Some(column),
            Some(column) => {
                errors.push(InvalidParam::new("sort", column));
                None
            }
            None => Some(schema.primary_key()),
        };

        let direction = match dir {
            None => Some(SortDirection::default()),
            Some(raw) => {
                let parsed = SortDirection::parse(raw);
                if parsed.is_none() {
                    errors.push(InvalidParam::new("dir", raw));
                }
                parsed
            }
        };

        match (column, direction) {
            (Some(column), Some(direction)) if errors.is_empty() => {
                (scope.with_order(Ordering::new(column, direction)), errors)
            }
            _ => (scope, errors),
        }
    }
}
