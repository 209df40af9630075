//! Per-resource presentation metadata.
//!
//! A [`ResourceSchema`] declares, once per resource, which attributes clients
//! may sort and filter on, which attributes are rendered (and in what order),
//! which relations may be embedded, and which attributes are computed by an
//! override resolver instead of being read from the record.
//!
//! Schemas are immutable after [`ResourceSchemaBuilder::build`] and shared
//! across requests through the read-only [`SchemaRegistry`].
//!
//! # Example
//!
//! ```rust
//! use bookland_persistence::types::Relation;
//! use bookland_rest::schema::ResourceSchema;
//! use serde_json::Value;
//!
//! let schema = ResourceSchema::builder("publishers")
//!     .sort_by(["id", "name"])
//!     .filter_by(["id", "name"])
//!     .build_with(["id", "name"])
//!     .related_to(Relation::has_many("books", "books", "publisher_id"))
//!     .resolve("name", |record| {
//!         record.attribute("name").cloned().unwrap_or(Value::Null)
//!     })
//!     .build();
//!
//! assert!(schema.can_sort("name"));
//! assert!(schema.relation("books").is_some());
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use bookland_persistence::types::{Record, Relation};
use serde_json::Value;

/// Computes an attribute's value from a record.
pub type Resolver = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Immutable presentation metadata for one resource.
#[derive(Clone)]
pub struct ResourceSchema {
    name: String,
    primary_key: String,
    sort_attributes: BTreeSet<String>,
    filter_attributes: BTreeSet<String>,
    build_attributes: Vec<String>,
    relations: Vec<Relation>,
    resolvers: HashMap<String, Resolver>,
}

impl fmt::Debug for ResourceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overrides: Vec<&String> = self.resolvers.keys().collect();
        overrides.sort();

        f.debug_struct("ResourceSchema")
            .field("name", &self.name)
            .field("primary_key", &self.primary_key)
            .field("sort_attributes", &self.sort_attributes)
            .field("filter_attributes", &self.filter_attributes)
            .field("build_attributes", &self.build_attributes)
            .field("relations", &self.relations)
            .field("overrides", &overrides)
            .finish()
    }
}

impl ResourceSchema {
    /// Starts declaring a resource.
    pub fn builder(name: impl Into<String>) -> ResourceSchemaBuilder {
        ResourceSchemaBuilder::new(name)
    }

    /// Returns the resource name (also its storage type).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primary key attribute, the default sort column.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Returns whether clients may order by `column`.
    pub fn can_sort(&self, column: &str) -> bool {
        self.sort_attributes.contains(column)
    }

    /// Returns whether clients may filter on `column`.
    pub fn can_filter(&self, column: &str) -> bool {
        self.filter_attributes.contains(column)
    }

    /// Returns whether `field` is a rendered attribute.
    pub fn can_build(&self, field: &str) -> bool {
        self.build_attributes.iter().any(|a| a == field)
    }

    /// Returns the rendered attributes in canonical order.
    pub fn build_attributes(&self) -> &[String] {
        &self.build_attributes
    }

    /// Returns the embeddable relations.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Looks up an embeddable relation by name.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name() == name)
    }

    /// Returns whether `attribute` has an override resolver.
    pub fn has_override(&self, attribute: &str) -> bool {
        self.resolvers.contains_key(attribute)
    }

    /// Resolves one attribute of a record.
    ///
    /// An override resolver takes precedence over the stored attribute of the
    /// same name. Attributes absent from the record resolve to `null`.
    pub fn resolve(&self, attribute: &str, record: &Record) -> Value {
        match self.resolvers.get(attribute) {
            Some(resolver) => resolver(record),
            None => record.attribute(attribute).cloned().unwrap_or(Value::Null),
        }
    }
}

/// Builder for [`ResourceSchema`].
pub struct ResourceSchemaBuilder {
    schema: ResourceSchema,
}

impl ResourceSchemaBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            schema: ResourceSchema {
                name: name.into(),
                primary_key: "id".to_string(),
                sort_attributes: BTreeSet::new(),
                filter_attributes: BTreeSet::new(),
                build_attributes: Vec::new(),
                relations: Vec::new(),
                resolvers: HashMap::new(),
            },
        }
    }

    /// Overrides the primary key (defaults to `id`).
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.schema.primary_key = column.into();
        self
    }

    /// Declares the sortable attributes.
    pub fn sort_by<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.schema
            .sort_attributes
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Declares the filterable attributes.
    pub fn filter_by<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.schema
            .filter_attributes
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Declares the rendered attributes. Order is preserved, duplicates dropped.
    pub fn build_with<I, T>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for attribute in attributes {
            let attribute = attribute.into();
            if !self.schema.build_attributes.contains(&attribute) {
                self.schema.build_attributes.push(attribute);
            }
        }
        self
    }

    /// Declares an embeddable relation. A later declaration replaces an
    /// earlier one of the same name.
    pub fn related_to(mut self, relation: Relation) -> Self {
        self.schema.relations.retain(|r| r.name() != relation.name());
        self.schema.relations.push(relation);
        self
    }

    /// Registers an override resolver for an attribute.
    pub fn resolve<F>(mut self, attribute: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.schema
            .resolvers
            .insert(attribute.into(), Arc::new(resolver));
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> ResourceSchema {
        self.schema
    }
}

/// Read-only mapping from resource name to schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<ResourceSchema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema, keyed by its name.
    pub fn with(mut self, schema: ResourceSchema) -> Self {
        self.schemas
            .insert(schema.name().to_string(), Arc::new(schema));
        self
    }

    /// Looks up a schema by resource name.
    pub fn get(&self, name: &str) -> Option<Arc<ResourceSchema>> {
        self.schemas.get(name).cloned()
    }

    /// Returns the registered resource names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns whether no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
