//! Nested rendering of embedded relations.

use bookland_persistence::types::{Association, Record, RelationKind};
use serde_json::{Map, Value};

use super::{Presenter, Selection};
use crate::schema::{ResourceSchema, SchemaRegistry};

/// Adds embedded relations to a rendered record.
pub struct EmbedPicker<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> EmbedPicker<'a> {
    /// Creates an embed picker resolving related resources through `registry`.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Appends one key per embedded relation, after the picked fields.
    ///
    /// Related records are rendered with the related resource's default
    /// attributes. A missing belongs-to target renders `null`; has-many
    /// renders an array.
    pub fn embed(
        &self,
        schema: &ResourceSchema,
        record: &Record,
        embeds: &[String],
        output: &mut Map<String, Value>,
    ) {
        for name in embeds {
            let Some(relation) = schema.relation(name) else {
                continue;
            };

            let Some(target) = self.registry.get(relation.target()) else {
                tracing::warn!(
                    relation = %name,
                    target = relation.target(),
                    "Embedded relation targets an unregistered resource"
                );
                output.insert(name.clone(), Value::Null);
                continue;
            };

            let presenter = Presenter::new(&target, self.registry);
            let plain = Selection::default();

            let value = match (record.association(name), relation.kind()) {
                (Some(Association::One(Some(related))), _) => presenter.present(related, &plain),
                (Some(Association::Many(related)), _) => Value::Array(
                    related
                        .iter()
                        .map(|r| presenter.present(r, &plain))
                        .collect(),
                ),
                (Some(Association::One(None)), _) | (None, RelationKind::BelongsTo { .. }) => {
                    Value::Null
                }
                (None, RelationKind::HasMany { .. }) => Value::Array(Vec::new()),
            };

            output.insert(name.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use serde_json::json;

    fn author() -> Record {
        Record::from_value(
            "authors",
            2,
            json!({"given_name": "Jim", "family_name": "Blandy", "private": 1}),
        )
        .unwrap()
    }

    #[test]
    fn test_embeds_belongs_to_with_default_attributes() {
        let registry = catalog::registry();
        let books = catalog::books();
        let book = Record::from_value("books", 1, json!({"author_id": 2}))
            .unwrap()
            .with_association("author", Association::One(Some(Box::new(author()))));

        let mut output = Map::new();
        EmbedPicker::new(&registry).embed(&books, &book, &["author".to_string()], &mut output);

        let keys: Vec<&str> = output["author"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["id", "given_name", "family_name", "created_at", "updated_at"]
        );
    }

    #[test]
    fn test_missing_targets() {
        let registry = catalog::registry();
        let books = catalog::books();
        let book = Record::from_value("books", 1, json!({}))
            .unwrap()
            .with_association("publisher", Association::One(None));

        let mut output = Map::new();
        EmbedPicker::new(&registry).embed(
            &books,
            &book,
            &["publisher".to_string(), "author".to_string()],
            &mut output,
        );
        assert_eq!(output["publisher"], Value::Null);
        assert_eq!(output["author"], Value::Null);

        let authors = catalog::authors();
        let mut output = Map::new();
        EmbedPicker::new(&registry).embed(&authors, &author(), &["books".to_string()], &mut output);
        assert_eq!(output["books"], json!([]));
    }
}
