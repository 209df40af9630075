//! Test fixtures for REST API testing.
//!
//! Three publishers, three authors and three books. Book 3 has no publisher.

use bookland_persistence::backends::sqlite::SqliteBackend;
use bookland_persistence::core::RecordStorage;
use serde_json::{Value, json};

/// Publishers, inserted with ids 1..=3.
pub fn publishers() -> Vec<Value> {
    vec![
        json!({"name": "O'Reilly"}),
        json!({"name": "Dev Media"}),
        json!({"name": "Super Books"}),
    ]
}

/// Authors, inserted with ids 1..=3.
pub fn authors() -> Vec<Value> {
    vec![
        json!({"given_name": "Pat", "family_name": "Shaughnessy"}),
        json!({"given_name": "Michael", "family_name": "Hartl"}),
        json!({"given_name": "Sam", "family_name": "Ruby"}),
    ]
}

/// Books, inserted with ids 1..=3.
pub fn books() -> Vec<Value> {
    vec![
        json!({
            "title": "Ruby Under a Microscope",
            "subtitle": "An Illustrated Guide to Ruby Internals",
            "isbn_10": "1593275617",
            "isbn_13": "9781593275617",
            "description": "Ruby Under a Microscope is a cool book!",
            "released_on": "2013-09-01",
            "publisher_id": 1,
            "author_id": 1,
            "cover": "ruby_microscope.png"
        }),
        json!({
            "title": "Ruby on Rails Tutorial",
            "subtitle": "Learn Web Development with Rails",
            "isbn_10": "0134077709",
            "isbn_13": "9780134077703",
            "description": "The Rails Tutorial is great!",
            "released_on": "2013-05-09",
            "publisher_id": 2,
            "author_id": 2,
            "cover": null
        }),
        json!({
            "title": "Agile Web Development with Rails 4",
            "subtitle": "",
            "isbn_10": "1937785564",
            "isbn_13": "9781937785567",
            "description": "Stay agile!",
            "released_on": "2015-10-11",
            "publisher_id": null,
            "author_id": 3,
            "cover": null
        }),
    ]
}

/// Seeds every fixture into `backend`.
pub async fn seed(backend: &SqliteBackend) {
    for (resource_type, records) in [
        ("publishers", publishers()),
        ("authors", authors()),
        ("books", books()),
    ] {
        for record in records {
            backend
                .insert(resource_type, record)
                .await
                .unwrap_or_else(|e| panic!("Failed to seed {}: {}", resource_type, e));
        }
    }
}
