//! Page-number pagination for listing queries.
//!
//! Callers pass a 1-based page number, possibly as a raw query-string value.
//! Non-positive or unparseable values fall back to page 1 rather than
//! erroring the listing.

/// Rows returned per page by every listing query.
pub const PER_PAGE: i64 = 20;

/// A normalized 1-based page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    /// Creates a page from a 1-based number, clamping to page 1.
    pub fn from_number(number: i64) -> Self {
        Self(number.max(1))
    }

    /// Creates a page from a raw query-string value.
    ///
    /// Missing, unparseable, or non-positive values fall back to page 1.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let number = raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1);
        Self::from_number(number)
    }

    /// 1-based page number.
    pub fn number(&self) -> i64 {
        self.0
    }

    /// Row limit for the query.
    pub fn limit(&self) -> i64 {
        PER_PAGE
    }

    /// Row offset for the query.
    pub fn offset(&self) -> i64 {
        (self.0 - 1) * PER_PAGE
    }
}

impl Default for Page {
    fn default() -> Self {
        Self(1)
    }
}
