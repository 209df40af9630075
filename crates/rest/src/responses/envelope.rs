//! The JSON success envelope.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::query::PageInfo;

/// A `{"data": ...}` response with optional pagination link.
#[derive(Debug, Clone)]
pub struct DataResponse {
    data: Value,
    link: Option<String>,
}

impl DataResponse {
    /// Wraps a single rendered record.
    pub fn one(item: Value) -> Self {
        Self {
            data: item,
            link: None,
        }
    }

    /// Wraps a page of rendered records, linking the next page from `url`.
    pub fn page(items: Vec<Value>, page_info: &PageInfo, url: &str) -> Self {
        Self {
            data: Value::Array(items),
            link: page_info.next_link(url),
        }
    }

    /// Returns the `Link` header value, if any.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

impl IntoResponse for DataResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(value) = self.link.and_then(|l| HeaderValue::from_str(&l).ok()) {
            headers.insert(header::LINK, value);
        }

        (StatusCode::OK, headers, Json(json!({ "data": self.data }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Page;

    #[test]
    fn test_page_with_next_link() {
        let info = PageInfo::new(Page { number: 1, per: 2 }, 2);
        let response = DataResponse::page(vec![json!({}), json!({})], &info, "http://x/api/books")
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::LINK],
            "<http://x/api/books?page=2&per=2>; rel=\"next\""
        );
    }

    #[test]
    fn test_one_has_no_link() {
        let response = DataResponse::one(json!({"id": 1})).into_response();
        assert!(response.headers().get(header::LINK).is_none());
    }
}
