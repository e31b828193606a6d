//! Pagination
//!
//! 1-based page/limit parameters with clamping.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build from optional client input. Zero or missing values fall back to
    /// the defaults; `limit` is capped at [`MAX_PAGE_LIMIT`].
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
        }
    }

    /// Transform items while keeping paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_zero_values_fall_back() {
        let req = PageRequest::new(Some(0), Some(0));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_limit_is_capped() {
        let req = PageRequest::new(Some(3), Some(500));
        assert_eq!(req.limit(), MAX_PAGE_LIMIT);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(Some(2), Some(3)), 9);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.total, 9);
    }
}
