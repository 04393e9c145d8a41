//! Shared pagination utilities
//!
//! Page numbers are 1-indexed. List responses carry a [`Pagination`] block
//! whose `next` and `prev` links are present only when those pages exist.
//!
//! # Examples
//!
//! ```rust,ignore
//! use devcamper_server::features::shared::pagination::{PageRequest, Pagination};
//!
//! let request = PageRequest::new(2, 10);
//! let skip = request.skip();
//!
//! // After counting matches...
//! let pagination = Pagination::new(request, 42);
//! ```

use serde::{Deserialize, Serialize};

/// Largest skip a store is asked for; document stores count in `i64`
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// A resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Create a page request; both values are raised to at least 1
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of matching documents to skip, at most [`MAX_SKIP`]
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_SKIP)
    }
}

/// Link to an adjacent page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub page: u64,
    pub limit: u64,
}

/// Pagination block returned alongside list data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: u64,

    /// Items per page
    pub limit: u64,

    /// Total number of matching items
    pub total: u64,

    /// Total number of pages
    pub pages: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let PageRequest { page, limit } = request;

        let next = (page.saturating_mul(limit) < total).then_some(PageLink {
            page: page + 1,
            limit,
        });
        let prev = (page > 1).then_some(PageLink {
            page: page - 1,
            limit,
        });

        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
            next,
            prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_skip() {
        assert_eq!(PageRequest::new(1, 25).skip(), 0);
        assert_eq!(PageRequest::new(3, 10).skip(), 20);
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
    }

    #[test]
    fn test_skip_is_capped() {
        assert_eq!(PageRequest::new(u64::MAX, 100).skip(), MAX_SKIP);
        assert_eq!(PageRequest::new(MAX_SKIP, 2).skip(), MAX_SKIP);
    }

    #[test]
    fn test_first_page_has_only_next() {
        let pagination = Pagination::new(PageRequest::new(1, 2), 5);
        assert_eq!(pagination.next, Some(PageLink { page: 2, limit: 2 }));
        assert_eq!(pagination.prev, None);
        assert_eq!(pagination.pages, 3);
    }

    #[test]
    fn test_last_page_has_only_prev() {
        let pagination = Pagination::new(PageRequest::new(3, 2), 5);
        assert_eq!(pagination.next, None);
        assert_eq!(pagination.prev, Some(PageLink { page: 2, limit: 2 }));
    }

    #[test]
    fn test_exact_multiple_has_no_next() {
        let pagination = Pagination::new(PageRequest::new(2, 5), 10);
        assert_eq!(pagination.next, None);
        assert!(pagination.prev.is_some());
    }

    #[test]
    fn test_empty_result() {
        let pagination = Pagination::new(PageRequest::new(1, 25), 0);
        assert_eq!(pagination.pages, 0);
        assert_eq!(pagination.next, None);
        assert_eq!(pagination.prev, None);
    }

    #[test]
    fn test_serialization_omits_missing_links() {
        let json = serde_json::to_value(Pagination::new(PageRequest::new(1, 25), 3)).unwrap();
        assert!(json.get("next").is_none());
        assert!(json.get("prev").is_none());
        assert_eq!(json["total"], 3);
    }
}
