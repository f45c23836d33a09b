//! In-memory data source

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use super::DataSource;
use super::PageQuery;
use super::PageResult;
use crate::error::FetchError;
use crate::model::Row;
use crate::pagination::page_count;
use crate::sort::SortDirection;

/// Serves pages from a vector of rows held in memory.
///
/// Filters, sorts (stable, nulls first when ascending) and pages the rows on
/// every request. An optional latency simulates a remote API.
///
/// # Example
///
/// ```
/// use opsgrid_lib::model::Row;
/// use opsgrid_lib::source::MemorySource;
///
/// let source = MemorySource::new(vec![Row::new("1").set("sku", "A-1")]);
/// assert_eq!(source.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: RwLock<Vec<Row>>,
    latency: Option<Duration>,
}

impl MemorySource {
    /// Creates a source over the given rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: RwLock::new(rows),
            latency: None,
        }
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of rows before filtering.
    pub fn len(&self) -> usize {
        self.rows.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Returns `true` if the source holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Computes a page synchronously.
    pub fn page(&self, query: &PageQuery) -> Result<PageResult, FetchError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| FetchError::failed("row store is unavailable"))?;

        let mut matching: Vec<&Row> = guard.iter().filter(|r| query.filters.matches(r)).collect();

        if let Some(sort) = &query.sort {
            matching.sort_by(|a, b| {
                let ordering = a.value(&sort.key).sort_cmp(b.value(&sort.key));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let page_size = query.page_size.max(1);
        let total_count = matching.len() as u64;
        let total_pages = page_count(total_count, page_size);
        let current_page = query.page.clamp(1, total_pages.max(1));
        let offset = (current_page as usize - 1) * page_size as usize;

        Ok(PageResult {
            rows: matching
                .into_iter()
                .skip(offset)
                .take(page_size as usize)
                .cloned()
                .collect(),
            current_page,
            total_pages,
            total_count,
        })
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.page(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortSpec;
    use crate::source::{Filter, FilterSet};

    fn source() -> MemorySource {
        MemorySource::new(
            (1..=25i64)
                .map(|n| {
                    Row::new(n.to_string())
                        .set("units", n)
                        .set("status", if n % 2 == 0 { "paid" } else { "open" })
                })
                .collect(),
        )
    }

    #[test]
    fn test_pages_and_counts() {
        let page = source().page(&PageQuery::new(3, 10)).expect("page");
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].id(), "21");
    }

    #[test]
    fn test_sort_descending() {
        let query = PageQuery::new(1, 3).with_sort(Some(SortSpec::desc("units")));
        let page = source().page(&query).expect("page");
        let ids: Vec<_> = page.rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["25", "24", "23"]);
    }

    #[test]
    fn test_filter_then_clamp_page() {
        let query = PageQuery::new(9, 5)
            .with_filters(FilterSet::new().with(Filter::eq("status", "paid")));
        let page = source().page(&query).expect("page");
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.rows.len(), 2);
    }
}
