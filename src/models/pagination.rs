use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationParams {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Zero-based page index for sea-orm's paginator.
    pub fn page_index(&self) -> u64 {
        self.page() - 1
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.per_page();
        Self {
            items,
            page: params.page(),
            per_page,
            total,
            total_pages: total.div_ceil(per_page).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params = PaginationParams::new(None, None);
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(params.page_index(), 0);
    }

    #[test]
    fn test_pagination_clamping() {
        let params = PaginationParams::new(Some(0), Some(10_000));
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), MAX_PER_PAGE);

        let params = PaginationParams::new(Some(3), Some(0));
        assert_eq!(params.page(), 3);
        assert_eq!(params.per_page(), 1);
        assert_eq!(params.page_index(), 2);
    }

    #[test]
    fn test_paginated_response_total_pages() {
        let params = PaginationParams::new(Some(1), Some(10));
        let resp = PaginatedResponse::new(vec![1, 2, 3], &params, 25);
        assert_eq!(resp.total_pages, 3);

        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], &params, 0);
        assert_eq!(empty.total_pages, 1);
    }
}
