use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Body of endpoints that answer with nothing useful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyDto {}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationEx<T> {
    pub contents: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// 1-based
    pub page: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Default for PaginationEx<T> {
    fn default() -> Self {
        PaginationEx {
            contents: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            page: 1,
            size: 10,
            first: true,
            last: true,
        }
    }
}

impl<T> PaginationEx<T> {
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Display number of the row at `index` on this page.
    pub fn row_number(&self, index: usize) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.size as u64 + index as u64 + 1
    }
}

/// Page request parameters sent as query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PageDto {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, message = "size must be at least 1"))]
    pub size: u32,
}

impl Default for PageDto {
    fn default() -> Self {
        PageDto {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageDto {
    pub fn new(page: u32, size: u32) -> Self {
        PageDto { page, size }
    }

    pub fn with_page(self, page: u32) -> Self {
        PageDto { page, ..self }
    }
}
