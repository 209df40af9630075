//! The listing and lookup pipeline.
//!
//! [`Orchestrator::handle`] runs every validator against the request before
//! touching storage:
//!
//! 1. [`Filter`], [`Sorter`], [`Paginator`], [`EagerLoader`] and
//!    [`FieldPicker`] each validate their parameters, collecting errors.
//! 2. Any collected error aborts the request with
//!    [`RestError::InvalidParams`], listing every offending parameter in the
//!    order above. Storage is never queried.
//! 3. Otherwise the composed scope runs once and each record is rendered by
//!    the resource's [`Presenter`].

use bookland_persistence::core::RecordStorage;
use bookland_persistence::types::{Record, Scope};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{InvalidParam, RestError, RestResult};
use crate::extractors::QueryParams;
use crate::presentation::{FieldPicker, Presenter, Selection};
use crate::query::{EagerLoader, Filter, PageInfo, Paginator, Sorter};
use crate::schema::{ResourceSchema, SchemaRegistry};

/// The result of a successful listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Rendered records.
    pub items: Vec<Value>,
    /// Pagination facts for the `Link` header.
    pub page_info: PageInfo,
}

/// Composes query building, execution and rendering for one request.
pub struct Orchestrator<'a, S: ?Sized> {
    storage: &'a S,
    registry: &'a SchemaRegistry,
    paginator: Paginator,
}

impl<'a, S> Orchestrator<'a, S>
where
    S: RecordStorage + ?Sized,
{
    /// Creates an orchestrator over `storage`.
    pub fn new(storage: &'a S, registry: &'a SchemaRegistry, paginator: Paginator) -> Self {
        Self {
            storage,
            registry,
            paginator,
        }
    }

    /// Validates the parameters, runs the composed query and renders the page.
    pub async fn handle(
        &self,
        schema: &ResourceSchema,
        params: &QueryParams,
    ) -> RestResult<Outcome> {
        let mut errors: Vec<InvalidParam> = Vec::new();
        let scope = Scope::all(schema.name());

        let (scope, filter_errors) = Filter::apply(scope, schema, params.filters());
        errors.extend(filter_errors);

        let (scope, sort_errors) = Sorter::apply(scope, schema, params.sort(), params.dir());
        errors.extend(sort_errors);

        let (scope, page) = match self.paginator.apply(scope, params.page(), params.per()) {
            Ok((scope, page)) => (scope, Some(page)),
            Err((scope, error)) => {
                errors.push(error);
                (scope, None)
            }
        };

        let (scope, embeds, embed_errors) = EagerLoader::apply(scope, schema, params.embed());
        errors.extend(embed_errors);

        let (fields, field_errors) = FieldPicker::validate(schema, params.fields());
        errors.extend(field_errors);

        let page = match page {
            Some(page) if errors.is_empty() => page,
            _ => return Err(Self::reject(schema, errors)),
        };

        debug!(
            resource = schema.name(),
            conditions = scope.conditions().len(),
            page = page.number,
            per = page.per,
            embeds = ?embeds,
            "Executing listing"
        );

        let records = self.storage.fetch(&scope).await?;
        let page_info = PageInfo::new(page, records.len());

        let selection = Selection { fields, embeds };
        let items = Presenter::new(schema, self.registry).present_all(&records, &selection);

        Ok(Outcome { items, page_info })
    }

    /// Validates `fields` and `embed`, loads one record and renders it.
    ///
    /// Identifiers that are not integers cannot match any record and yield
    /// [`RestError::NotFound`].
    pub async fn show(
        &self,
        schema: &ResourceSchema,
        id: &str,
        params: &QueryParams,
    ) -> RestResult<Value> {
        let selection = Self::selection(schema, params)?;

        let relations: Vec<_> = selection
            .embeds
            .iter()
            .filter_map(|name| schema.relation(name).cloned())
            .collect();

        let not_found = || RestError::NotFound {
            resource_type: schema.name().to_string(),
            id: id.to_string(),
        };

        let id: i64 = id.parse().map_err(|_| not_found())?;
        let record = self
            .storage
            .find(schema.name(), id, &relations)
            .await?
            .ok_or_else(not_found)?;

        Ok(self.present_one(schema, &record, &selection))
    }

    /// Renders a single record with an already validated selection.
    pub fn present_one(&self, schema: &ResourceSchema, record: &Record, selection: &Selection) -> Value {
        Presenter::new(schema, self.registry).present(record, selection)
    }

    /// Validates the shaping parameters of a request.
    pub fn selection(schema: &ResourceSchema, params: &QueryParams) -> RestResult<Selection> {
        let (embeds, mut errors) = EagerLoader::validate(schema, params.embed());
        let (fields, field_errors) = FieldPicker::validate(schema, params.fields());
        errors.extend(field_errors);

        if errors.is_empty() {
            Ok(Selection { fields, embeds })
        } else {
            Err(Self::reject(schema, errors))
        }
    }

    fn reject(schema: &ResourceSchema, errors: Vec<InvalidParam>) -> RestError {
        let invalid: Vec<String> = errors.iter().map(ToString::to_string).collect();
        warn!(
            resource = schema.name(),
            invalid = %invalid.join("; "),
            "Rejected request parameters"
        );
        RestError::InvalidParams(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use async_trait::async_trait;
    use bookland_persistence::error::StorageResult;
    use bookland_persistence::types::Relation;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Storage that counts queries and returns canned records.
    struct CountingStorage {
        records: Vec<Record>,
        fetches: AtomicUsize,
    }

    impl CountingStorage {
        fn new(records: Vec<Record>) -> Self {
            Self {
                records,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecordStorage for CountingStorage {
        fn backend_name(&self) -> &'static str {
            "counting"
        }

        async fn insert(&self, resource_type: &str, attributes: Value) -> StorageResult<Record> {
            Ok(Record::from_value(resource_type, 1, attributes).unwrap())
        }

        async fn find(
            &self,
            _resource_type: &str,
            id: i64,
            _eager: &[Relation],
        ) -> StorageResult<Option<Record>> {
            Ok(self.records.iter().find(|r| r.id() == id).cloned())
        }

        async fn fetch(&self, scope: &Scope) -> StorageResult<Vec<Record>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let limit = scope.window().map(|w| w.limit as usize).unwrap_or(usize::MAX);
            Ok(self.records.iter().take(limit).cloned().collect())
        }

        async fn count(&self, _resource_type: &str) -> StorageResult<u64> {
            Ok(self.records.len() as u64)
        }
    }

    fn publishers() -> Vec<Record> {
        (1..=3)
            .map(|id| {
                Record::from_value(
                    "publishers",
                    id,
                    serde_json::json!({"name": format!("Publisher {}", id)}),
                )
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_accumulates_errors_without_querying() {
        let storage = CountingStorage::new(publishers());
        let registry = catalog::registry();
        let orchestrator = Orchestrator::new(&storage, &registry, Paginator::default());

        let params = QueryParams::from_pairs([
            ("q[fname_cont]", "Reilly"),
            ("sort", "fid"),
            ("page", "fake"),
            ("per", "fake"),
            ("embed", "fake"),
            ("fields", "fid"),
        ]);

        let err = orchestrator
            .handle(&catalog::publishers(), &params)
            .await
            .unwrap_err();

        match err {
            RestError::InvalidParams(errors) => {
                let rendered: Vec<String> = errors.iter().map(ToString::to_string).collect();
                assert_eq!(
                    rendered,
                    vec![
                        "q[fname_cont]=Reilly",
                        "sort=fid",
                        "page=fake",
                        "embed=fake",
                        "fields=fid"
                    ]
                );
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(storage.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handle_renders_page() {
        let storage = CountingStorage::new(publishers());
        let registry = catalog::registry();
        let orchestrator = Orchestrator::new(&storage, &registry, Paginator::default());

        let params = QueryParams::from_pairs([("per", "2"), ("fields", "name")]);
        let outcome = orchestrator
            .handle(&catalog::publishers(), &params)
            .await
            .unwrap();

        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0], serde_json::json!({"name": "Publisher 1"}));
        assert!(outcome.page_info.has_next);
        assert_eq!(storage.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_show_not_found() {
        let storage = CountingStorage::new(publishers());
        let registry = catalog::registry();
        let orchestrator = Orchestrator::new(&storage, &registry, Paginator::default());
        let schema = catalog::publishers();

        let missing = orchestrator
            .show(&schema, "99", &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(missing, RestError::NotFound { .. }));

        let malformed = orchestrator
            .show(&schema, "abc", &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(malformed, RestError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_show_validates_selection() {
        let storage = CountingStorage::new(publishers());
        let registry = catalog::registry();
        let orchestrator = Orchestrator::new(&storage, &registry, Paginator::default());

        let params = QueryParams::from_pairs([("fields", "id,name")]);
        let item = orchestrator
            .show(&catalog::publishers(), "2", &params)
            .await
            .unwrap();
        assert_eq!(item, serde_json::json!({"id": 2, "name": "Publisher 2"}));

        let params = QueryParams::from_pairs([("embed", "authors")]);
        let err = orchestrator
            .show(&catalog::publishers(), "2", &params)
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidParams(_)));
    }
}
