use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be 1 or greater")]
    InvalidPage,
    #[error("limit must be between 1 and {max}")]
    InvalidLimit { max: usize },
}

/// Bounds applied to caller-supplied page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    pub fn resolve(
        &self,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> Result<PageRequest, PaginationError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }

        let limit = limit.unwrap_or(self.default_limit);
        if !(1..=self.max_limit).contains(&limit) {
            return Err(PaginationError::InvalidLimit {
                max: self.max_limit,
            });
        }

        Ok(PageRequest { page, limit })
    }
}

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Apply skip/limit to an already ordered list.
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, Pagination) {
        let pagination = Pagination::new(*self, items.len());
        let page = items.into_iter().skip(self.skip()).take(self.limit).collect();
        (page, pagination)
    }
}

/// Pagination block returned next to every ranked page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total_count: usize) -> Self {
        let total_pages = total_count.div_ceil(request.limit);
        Self {
            current_page: request.page,
            total_pages,
            total_count,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
            limit: request.limit,
        }
    }
}
