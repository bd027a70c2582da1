use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Standard response envelope: `{ "status": "success" | "error", data?, message? }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn message(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            status: "success".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for all list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Get clamped limit (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Pagination block returned alongside paged data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(query: &PaginationQuery, total: i64) -> Self {
        let page = query.page.max(1);
        let limit = query.limit();
        let total_pages = if total == 0 {
            0
        } else {
            // Ceiling division; limit is clamped to at least 1.
            (total + limit - 1) / limit
        };

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: i64, limit: i64) -> PaginationQuery {
        PaginationQuery { page, limit }
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(query(1, 20).offset(), 0);
        assert_eq!(query(3, 20).offset(), 40);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(query(1, 0).limit(), 1);
        assert_eq!(query(1, 500).limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn pagination_math() {
        let p = Pagination::new(&query(2, 20), 45);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let first = Pagination::new(&query(1, 20), 45);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(&query(3, 20), 45);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let p = Pagination::new(&query(1, 20), 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn exact_multiple_has_no_extra_page() {
        let p = Pagination::new(&query(2, 20), 40);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next);
    }

    #[test]
    fn partial_page_rounds_up() {
        assert_eq!(Pagination::new(&query(1, 20), 1).total_pages, 1);
        assert_eq!(Pagination::new(&query(1, 20), 21).total_pages, 2);
        assert_eq!(Pagination::new(&query(1, 1), 7).total_pages, 7);
    }

    #[test]
    fn envelope_shapes() {
        let ok = ApiResponse::success(1);
        assert_eq!(ok.status, "success");
        assert_eq!(ok.data, Some(1));

        let err = ApiResponse::<()>::error("boom");
        assert_eq!(err.status, "error");
        assert_eq!(err.message.as_deref(), Some("boom"));

        let json = serde_json::to_value(ApiResponse::<()>::message("done")).unwrap();
        assert!(json.get("data").is_none());
    }
}
