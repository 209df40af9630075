//! The resources served by the Bookland API.

use bookland_persistence::types::{Record, Relation};
use serde_json::Value;

use crate::schema::{ResourceSchema, SchemaRegistry};

/// Books, with their publisher and author.
pub fn books() -> ResourceSchema {
    ResourceSchema::builder("books")
        .sort_by(["id", "title", "released_on", "created_at", "updated_at"])
        .filter_by([
            "id",
            "title",
            "isbn_10",
            "isbn_13",
            "released_on",
            "publisher_id",
            "author_id",
        ])
        .build_with([
            "id",
            "title",
            "subtitle",
            "isbn_10",
            "isbn_13",
            "description",
            "released_on",
            "publisher_id",
            "author_id",
            "created_at",
            "updated_at",
            "cover",
        ])
        .related_to(Relation::belongs_to("publisher", "publishers", "publisher_id"))
        .related_to(Relation::belongs_to("author", "authors", "author_id"))
        .resolve("cover", cover_url)
        .build()
}

/// Authors and the books they wrote.
pub fn authors() -> ResourceSchema {
    let attributes = ["id", "given_name", "family_name", "created_at", "updated_at"];

    ResourceSchema::builder("authors")
        .sort_by(attributes)
        .filter_by(attributes)
        .build_with(attributes)
        .related_to(Relation::has_many("books", "books", "author_id"))
        .build()
}

/// Publishers and the books they published.
pub fn publishers() -> ResourceSchema {
    let attributes = ["id", "name", "created_at", "updated_at"];

    ResourceSchema::builder("publishers")
        .sort_by(attributes)
        .filter_by(attributes)
        .build_with(attributes)
        .related_to(Relation::has_many("books", "books", "publisher_id"))
        .build()
}

/// Registry holding every catalog resource.
pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(books())
        .with(authors())
        .with(publishers())
}

/// Public path of an uploaded cover, or `null` when none was uploaded.
fn cover_url(record: &Record) -> Value {
    match record.attribute("cover").and_then(Value::as_str) {
        Some(file) if !file.is_empty() => Value::String(format!(
            "/uploads/books/cover/{}/{}",
            record.id(),
            file
        )),
        _ => Value::Null,
    }
}
