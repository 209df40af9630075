//! Query parameters extractor.
//!
//! Extracts the listing conventions (`q[...]`, `sort`, `dir`, `page`, `per`,
//! `fields`, `embed`) from query strings, keeping filters in the order the
//! client wrote them.

use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};

/// One `q[<key>]=<value>` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParam {
    /// The text between the brackets, e.g. `title_cont`.
    pub key: String,
    /// The raw value.
    pub value: String,
}

/// Axum extractor for listing query parameters.
///
/// A parameter given more than once keeps its last value; unrecognised
/// parameters are ignored.
///
/// # Example
///
/// ```rust,ignore
/// use bookland_rest::extractors::QueryParams;
///
/// async fn index_handler(params: QueryParams) {
///     for filter in params.filters() {
///         println!("{} = {}", filter.key, filter.value);
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    filters: Vec<FilterParam>,
    sort: Option<String>,
    dir: Option<String>,
    page: Option<String>,
    per: Option<String>,
    fields: Option<String>,
    embed: Option<String>,
}

impl QueryParams {
    /// Creates empty query params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates query params from decoded `(name, value)` pairs in request order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();

        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();

            match name.as_str() {
                "sort" => params.sort = Some(value),
                "dir" => params.dir = Some(value),
                "page" => params.page = Some(value),
                "per" => params.per = Some(value),
                "fields" => params.fields = Some(value),
                "embed" => params.embed = Some(value),
                _ => {
                    if let Some(key) = filter_key(&name) {
                        let key = key.to_string();
                        params.filters.retain(|f| f.key != key);
                        params.filters.push(FilterParam { key, value });
                    }
                }
            }
        }

        params
    }

    /// Parses a raw (still percent-encoded) query string.
    pub fn from_query_string(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Returns the filter parameters in request order.
    pub fn filters(&self) -> &[FilterParam] {
        &self.filters
    }

    /// Returns the requested sort column.
    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Returns the requested sort direction.
    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    /// Returns the requested page number, unparsed.
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// Returns the requested page size, unparsed.
    pub fn per(&self) -> Option<&str> {
        self.per.as_deref()
    }

    /// Returns the raw `fields` list.
    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }

    /// Returns the raw `embed` list.
    pub fn embed(&self) -> Option<&str> {
        self.embed.as_deref()
    }
}

/// Extracts `key` from a `q[key]` parameter name.
fn filter_key(name: &str) -> Option<&str> {
    name.strip_prefix("q[")?
        .strip_suffix(']')
        .filter(|key| !key.is_empty())
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid query parameters"))?;

        Ok(QueryParams::from_pairs(pairs))
    }
}
