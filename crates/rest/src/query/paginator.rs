//! Page windowing from `page` and `per` parameters.

use bookland_persistence::types::{Scope, Window};

use crate::error::InvalidParam;

/// The requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u64,
    /// Page size.
    pub per: u64,
}

impl Page {
    /// Returns the storage window for this page.
    pub fn window(&self) -> Window {
        let offset = (self.number - 1).saturating_mul(self.per);
        Window::new(self.per, offset)
    }
}

/// Pagination facts about an executed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub per: u64,
    /// Whether a further page is plausible.
    pub has_next: bool,
}

impl PageInfo {
    /// Describes a page that returned `returned` records.
    ///
    /// A full page implies a next page may exist; this is an approximation
    /// and yields one empty trailing page when the total is a multiple of `per`.
    pub fn new(page: Page, returned: usize) -> Self {
        Self {
            page: page.number,
            per: page.per,
            has_next: returned as u64 == page.per,
        }
    }

    /// Returns the `Link` header value pointing at the next page, if any.
    pub fn next_link(&self, url: &str) -> Option<String> {
        self.has_next.then(|| {
            format!(
                "<{}?page={}&per={}>; rel=\"next\"",
                url,
                self.page + 1,
                self.per
            )
        })
    }
}

/// Windows scopes into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    default_per: u64,
    max_per: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(10, 100)
    }
}

impl Paginator {
    /// Creates a paginator with the page size used when `per` is absent and
    /// the largest page size a client may request.
    pub fn new(default_per: u64, max_per: u64) -> Self {
        Self {
            default_per,
            max_per,
        }
    }

    /// Parses `page` and `per` and windows the scope.
    ///
    /// Both must be positive integers and `per` may not exceed the maximum.
    /// Only the first offending parameter is reported, `page` before `per`.
    pub fn apply(
        &self,
        scope: Scope,
        page: Option<&str>,
        per: Option<&str>,
    ) -> Result<(Scope, Page), (Scope, InvalidParam)> {
        let number = match page {
            None => 1,
            Some(raw) => match parse_positive(raw) {
                Some(number) => number,
                None => return Err((scope, InvalidParam::new("page", raw))),
            },
        };

        let per = match per {
            None => self.default_per,
            Some(raw) => match parse_positive(raw) {
                Some(per) if per <= self.max_per => per,
                _ => return Err((scope, InvalidParam::new("per", raw))),
            },
        };

        let page = Page { number, per };
        Ok((scope.with_window(page.window()), page))
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}
