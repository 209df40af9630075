//! Field selection from the `fields` parameter.

use bookland_persistence::types::Record;
use serde_json::{Map, Value};

use crate::error::InvalidParam;
use crate::query::split_list;
use crate::schema::ResourceSchema;

/// Restricts rendered attributes to a client-selected list.
pub struct FieldPicker;

impl FieldPicker {
    /// Splits and validates the comma-separated `fields` list.
    ///
    /// Each name outside the schema's build attributes reports
    /// `fields=<name>`.
    pub fn validate(
        schema: &ResourceSchema,
        fields: Option<&str>,
    ) -> (Vec<String>, Vec<InvalidParam>) {
        let mut picked = Vec::new();
        let mut errors = Vec::new();

        for field in split_list(fields) {
            if schema.can_build(&field) {
                picked.push(field);
            } else {
                errors.push(InvalidParam::new("fields", field));
            }
        }

        (picked, errors)
    }

    /// Resolves the selected attributes of a record.
    ///
    /// With no selection the output carries exactly the build attributes in
    /// schema order; otherwise it carries the selection in request order.
    /// `requested` must already be validated.
    pub fn pick(schema: &ResourceSchema, record: &Record, requested: &[String]) -> Map<String, Value> {
        let fields = if requested.is_empty() {
            schema.build_attributes()
        } else {
            requested
        };

        fields
            .iter()
            .map(|field| (field.clone(), schema.resolve(field, record)))
            .collect()
    }
}
