//! Integration tests for the publishers endpoints.
//!
//! Covers the default listing, sorting, pagination, filtering, field
//! selection, embedding and lookups against a seeded SQLite backend.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::harness::RestTestHarness;

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id should be an integer"))
        .collect()
}

fn keys(item: &Value) -> Vec<&str> {
    item.as_object()
        .expect("item should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

// ============================================================================
// Index
// ============================================================================

#[tokio::test]
async fn test_index_defaults_to_id_descending_with_build_attributes() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(ids(&body), vec![3, 2, 1]);
    for item in body["data"].as_array().unwrap() {
        assert_eq!(keys(item), vec!["id", "name", "created_at", "updated_at"]);
    }
}

#[tokio::test]
async fn test_index_empty_collection() {
    let harness = RestTestHarness::new().await;

    let response = harness.get("/api/publishers").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"data": []}));
    assert!(response.headers().get("link").is_none());
}

#[tokio::test]
async fn test_index_sorts_by_requested_column() {
    let harness = RestTestHarness::seeded().await;

    let body: Value = harness.get("/api/publishers?sort=id&dir=asc").await.json();
    assert_eq!(ids(&body), vec![1, 2, 3]);

    let body: Value = harness.get("/api/publishers?sort=name&dir=asc").await.json();
    assert_eq!(ids(&body), vec![2, 1, 3]);
    assert_eq!(body["data"][0]["name"], "Dev Media");
}

#[tokio::test]
async fn test_index_rejects_unknown_sort() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?sort=fid&dir=asc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": {"invalid_params": "sort=fid"}})
    );
}

#[tokio::test]
async fn test_index_rejects_unknown_direction() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?dir=sideways").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["invalid_params"],
        "dir=sideways"
    );
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_first_page_links_to_next() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?page=1&per=2").await;
    response.assert_status_ok();

    let link = response
        .headers()
        .get("link")
        .expect("Link header should be present")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        link,
        "<http://test.host/api/publishers?page=2&per=2>; rel=\"next\""
    );

    let body: Value = response.json();
    assert_eq!(ids(&body), vec![3, 2]);
}

#[tokio::test]
async fn test_last_page_has_no_link() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?page=2&per=2").await;
    response.assert_status_ok();
    assert!(response.headers().get("link").is_none());

    let body: Value = response.json();
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_invalid_page() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?page=fake").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": {"invalid_params": "page=fake"}})
    );
}

#[tokio::test]
async fn test_invalid_per() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?per=0").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["invalid_params"], "per=0");

    let response = harness.get("/api/publishers?per=101").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["invalid_params"], "per=101");
}

#[tokio::test]
async fn test_page_reported_before_per() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?page=fake&per=fake").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["invalid_params"], "page=fake");
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_filter_by_name() {
    let harness = RestTestHarness::seeded().await;

    let body: Value = harness
        .get("/api/publishers?q%5Bname_cont%5D=Reilly")
        .await
        .json();
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_filter_rejects_unknown_column() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?q%5Bfname_cont%5D=Reilly").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": {"invalid_params": "q[fname_cont]=Reilly"}})
    );
}

// ============================================================================
// Fields and embeds
// ============================================================================

#[tokio::test]
async fn test_fields_follow_request_order() {
    let harness = RestTestHarness::seeded().await;

    let body: Value = harness.get("/api/publishers?fields=name,id").await.json();
    for item in body["data"].as_array().unwrap() {
        assert_eq!(keys(item), vec!["name", "id"]);
    }
}

#[tokio::test]
async fn test_fields_reject_unknown_name() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers?fields=fid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["invalid_params"], "fields=fid");
}

#[tokio::test]
async fn test_embed_books() {
    let harness = RestTestHarness::seeded().await;

    let body: Value = harness
        .get("/api/publishers?sort=id&dir=asc&embed=books")
        .await
        .json();

    let first = &body["data"][0];
    assert_eq!(first["books"].as_array().unwrap().len(), 1);
    assert_eq!(first["books"][0]["title"], "Ruby Under a Microscope");
    assert_eq!(body["data"][2]["books"], json!([]));
}

#[tokio::test]
async fn test_all_errors_are_reported_together() {
    let harness = RestTestHarness::seeded().await;

    let response = harness
        .get("/api/publishers?q%5Bfname_cont%5D=Reilly&sort=fid&page=fake&embed=fake&fields=fid")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["invalid_params"],
        "q[fname_cont]=Reilly; sort=fid; page=fake; embed=fake; fields=fid"
    );
}

// ============================================================================
// Show
// ============================================================================

#[tokio::test]
async fn test_show_publisher() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers/1").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "O'Reilly");
}

#[tokio::test]
async fn test_show_missing_publisher() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers/9999999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().is_empty());

    let response = harness.get("/api/publishers/not-a-number").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_show_validates_fields() {
    let harness = RestTestHarness::seeded().await;

    let response = harness.get("/api/publishers/1?fields=fid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["invalid_params"], "fields=fid");
}

#[tokio::test]
async fn test_unknown_resource() {
    let harness = RestTestHarness::seeded().await;

    harness
        .get("/api/magazines")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    harness
        .get("/api/magazines/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
