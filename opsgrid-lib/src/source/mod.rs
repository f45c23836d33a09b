//! Data source seam
//!
//! The engine asks a [`DataSource`] for one page at a time with the current
//! sort and filters. Network, retry and auth concerns stay on the other side
//! of this trait.

mod filter;
mod memory;

pub use filter::*;
pub use memory::*;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Row;
use crate::sort::SortSpec;

/// Parameters for one page request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Active sort, if any.
    pub sort: Option<SortSpec>,
    /// Active filters.
    pub filters: FilterSet,
}

impl PageQuery {
    /// Creates a query for a page with no sort or filters.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sort: None,
            filters: FilterSet::default(),
        }
    }

    /// Sets the sort.
    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the filters.
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }
}

/// One page of rows with pagination information.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    /// Rows on this page.
    pub rows: Vec<Row>,
    /// Page the rows belong to.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of rows across all pages.
    pub total_count: u64,
}

/// Produces pages of rows for the engine.
///
/// Failures carry a human-readable message that the engine shows through
/// its notifier, keeping the last good page on screen.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches one page.
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult, FetchError>;
}
