//! Fixed-size page arithmetic shared by every listing.

use serde::Serialize;

use crate::error::DomainError;

/// Number of rows per listing page.
pub const PAGE_SIZE: u64 = 10;

/// Highest page whose offset still fits a signed 64-bit `OFFSET`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / PAGE_SIZE;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
}

impl PageRequest {
    pub fn new(page: u64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::invalid("page must be 1 or greater"));
        }
        if page > MAX_PAGE {
            return Err(DomainError::invalid(format!(
                "page must be at most {MAX_PAGE}"
            )));
        }
        Ok(Self { page })
    }

    pub fn first() -> Self {
        Self { page: 1 }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * PAGE_SIZE
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }
}

/// Number of pages needed to show `total_count` rows.
pub fn total_pages(total_count: u64) -> u64 {
    total_count.div_ceil(PAGE_SIZE)
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: u64,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched rows and the total matching count.
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_pages: total_pages(total_count),
            current_page: request.page(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}
