//! Core record storage trait.
//!
//! This module defines the [`RecordStorage`] trait, the capability the query
//! pipeline needs from a persistence engine: insert, lookup by id, and
//! execution of a composed [`Scope`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageResult;
use crate::types::{Record, Relation, Scope};

/// Storage for resource collections.
///
/// Implementations must:
///
/// - apply every [`Condition`](crate::types::Condition) of a scope conjunctively;
/// - break ordering ties on `id` in the requested direction, so identical data
///   always yields identical pages;
/// - load each eager relation with one batched query per fetch, never one
///   query per record.
///
/// # Example
///
/// ```ignore
/// use bookland_persistence::core::RecordStorage;
/// use bookland_persistence::types::{Ordering, Scope, SortDirection, Window};
///
/// async fn first_page<S: RecordStorage>(storage: &S) -> StorageResult<Vec<Record>> {
///     let scope = Scope::all("books")
///         .with_order(Ordering::new("id", SortDirection::Descending))
///         .with_window(Window::new(10, 0));
///     storage.fetch(&scope).await
/// }
/// ```
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a record and returns it with its assigned id.
    ///
    /// `attributes` must be a JSON object. An `id` inside it is ignored.
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidRecord` - If `attributes` is not an object
    async fn insert(&self, resource_type: &str, attributes: Value) -> StorageResult<Record>;

    /// Finds a single record by id, loading the given relations.
    ///
    /// Returns `None` when no such record exists.
    async fn find(
        &self,
        resource_type: &str,
        id: i64,
        eager: &[Relation],
    ) -> StorageResult<Option<Record>>;

    /// Executes a scope.
    async fn fetch(&self, scope: &Scope) -> StorageResult<Vec<Record>>;

    /// Counts all records of a collection.
    async fn count(&self, resource_type: &str) -> StorageResult<u64>;
}
