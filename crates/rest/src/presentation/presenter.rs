//! Record rendering.

use bookland_persistence::types::Record;
use serde_json::Value;

use super::{EmbedPicker, FieldPicker, Selection};
use crate::schema::{ResourceSchema, SchemaRegistry};

/// Renders records of one resource.
///
/// The presenter owns no state beyond borrowed metadata, so one can be built
/// per request (or per embedded relation) at no cost.
pub struct Presenter<'a> {
    schema: &'a ResourceSchema,
    registry: &'a SchemaRegistry,
}

impl<'a> Presenter<'a> {
    /// Creates a presenter for `schema`, embedding through `registry`.
    pub fn new(schema: &'a ResourceSchema, registry: &'a SchemaRegistry) -> Self {
        Self { schema, registry }
    }

    /// Returns the schema this presenter renders.
    pub fn schema(&self) -> &ResourceSchema {
        self.schema
    }

    /// Renders one record: picked fields first, then embedded relations.
    pub fn present(&self, record: &Record, selection: &Selection) -> Value {
        let mut output = FieldPicker::pick(self.schema, record, &selection.fields);
        EmbedPicker::new(self.registry).embed(self.schema, record, &selection.embeds, &mut output);
        Value::Object(output)
    }

    /// Renders every record with the same selection.
    pub fn present_all(&self, records: &[Record], selection: &Selection) -> Vec<Value> {
        records
            .iter()
            .map(|record| self.present(record, selection))
            .collect()
    }
}
