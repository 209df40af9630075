//! Stored record types.
//!
//! A [`Record`] is one row of a resource collection: its attributes as a JSON
//! object plus whatever associations were eager loaded alongside it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record of a resource collection with its loaded associations.
///
/// # Examples
///
/// ```
/// use bookland_persistence::types::Record;
/// use serde_json::json;
///
/// let record = Record::from_value(
///     "books",
///     7,
///     json!({ "title": "Ruby Under a Microscope" }),
/// )
/// .unwrap();
///
/// assert_eq!(record.id(), 7);
/// assert_eq!(record.attribute("id"), Some(&json!(7)));
/// assert_eq!(record.attribute("title"), Some(&json!("Ruby Under a Microscope")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The resource collection this record belongs to (e.g. "books").
    resource_type: String,

    /// The primary key.
    id: i64,

    /// Attribute values, always including `id`.
    attributes: Map<String, Value>,

    /// Associations loaded for this record, keyed by relation name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    associations: BTreeMap<String, Association>,
}

/// The loaded target(s) of a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Association {
    /// A belongs-to association; `None` when the foreign key dangles or is null.
    One(Option<Box<Record>>),
    /// A has-many association.
    Many(Vec<Record>),
}

impl Record {
    /// Creates a record from an attribute map, stamping `id` into it.
    pub fn new(resource_type: impl Into<String>, id: i64, mut attributes: Map<String, Value>) -> Self {
        attributes.insert("id".to_string(), Value::from(id));
        Self {
            resource_type: resource_type.into(),
            id,
            attributes,
            associations: BTreeMap::new(),
        }
    }

    /// Creates a record from a JSON value, which must be an object.
    ///
    /// Returns `None` when `value` is not a JSON object.
    pub fn from_value(resource_type: impl Into<String>, id: i64, value: Value) -> Option<Self> {
        match value {
            Value::Object(attributes) => Some(Self::new(resource_type, id, attributes)),
            _ => None,
        }
    }

    /// Returns the resource collection name.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the primary key.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the attribute map.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns a single attribute value.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns an integer attribute, used to follow foreign keys.
    pub fn integer_attribute(&self, name: &str) -> Option<i64> {
        self.attributes.get(name).and_then(Value::as_i64)
    }

    /// Returns the loaded association for a relation name.
    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    /// Returns all loaded associations.
    pub fn associations(&self) -> &BTreeMap<String, Association> {
        &self.associations
    }

    /// Attaches a loaded association.
    pub fn set_association(&mut self, name: impl Into<String>, association: Association) {
        self.associations.insert(name.into(), association);
    }

    /// Builder form of [`Record::set_association`].
    pub fn with_association(mut self, name: impl Into<String>, association: Association) -> Self {
        self.set_association(name, association);
        self
    }
}
