//! Query building from request parameters.
//!
//! Each stage validates its own parameters against a
//! [`ResourceSchema`](crate::schema::ResourceSchema), reports every offending
//! parameter, and otherwise narrows the [`Scope`](bookland_persistence::types::Scope):
//!
//! - [`Filter`] - `q[<column>_<predicate>]` conditions
//! - [`Sorter`] - `sort` / `dir` ordering
//! - [`Paginator`] - `page` / `per` windowing
//! - [`EagerLoader`] - `embed` relation loading

mod eager_loader;
mod filter;
mod paginator;
mod sorter;

pub use eager_loader::EagerLoader;
pub use filter::{Filter, FilterSpec, Predicate};
pub use paginator::{Page, PageInfo, Paginator};
pub use sorter::Sorter;

/// Splits a comma-separated list, trimming entries, skipping blanks and
/// keeping the first occurrence of duplicates.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in raw.unwrap_or_default().split(',').map(str::trim) {
        if !item.is_empty() && !items.iter().any(|i| i == item) {
            items.push(item.to_string());
        }
    }
    items
}
