//! Page fetching and the stale-response rule.
//!
//! Every fetch takes a ticket carrying a request sequence number. Only the
//! ticket matching the most recently issued request may be applied; older
//! responses that arrive late are dropped.

use crate::error::FetchError;
use crate::notify::Notice;
use crate::pagination::compute_window;
use crate::persist::LayoutSection;
use crate::source::FilterSet;
use crate::source::PageQuery;
use crate::source::PageResult;

use super::EngineInner;
use super::Services;
use super::TableEngine;

/// An issued page request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    seq: u64,
    query: PageQuery,
}

impl FetchTicket {
    /// Monotonic request sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Parameters to send to the data source.
    pub fn query(&self) -> &PageQuery {
        &self.query
    }
}

/// What happened to a fetch response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page replaced the table contents.
    Applied,
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    /// The source failed; the previous page stays and a notice was sent.
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }
}

impl TableEngine {
    /// Issues a request for the current page, sort and filters.
    ///
    /// Marks the table as loading and supersedes every earlier ticket.
    pub fn begin_fetch(&self) -> FetchTicket {
        self.update(|inner, _| {
            inner.latest_request += 1;
            inner.loading = true;
            let query = PageQuery::new(inner.current_page, inner.page_size)
                .with_sort(inner.layout.sort().cloned())
                .with_filters(inner.filters.clone());
            log::debug!(
                "fetch #{}: page {} size {} sort {:?}",
                inner.latest_request,
                query.page,
                query.page_size,
                query.sort
            );
            FetchTicket {
                seq: inner.latest_request,
                query,
            }
        })
    }

    /// Applies the response to a ticket, unless a newer ticket exists.
    ///
    /// On failure the previous page stays on screen and the header goes back
    /// to the sort those rows were fetched with. [`refresh`](Self::refresh)
    /// also re-persists that sort; callers driving tickets by hand should use
    /// it or flush the sort themselves.
    pub fn apply_fetch(&self, ticket: &FetchTicket, result: Result<PageResult, FetchError>) -> FetchOutcome {
        self.settle(ticket, result).0
    }

    /// Applies a response. The flag is set when a failure rolled the sort back.
    fn settle(&self, ticket: &FetchTicket, result: Result<PageResult, FetchError>) -> (FetchOutcome, bool) {
        let (outcome, sort_reverted) = self.update(|inner, services| {
            if ticket.seq != inner.latest_request {
                log::debug!(
                    "discarding stale fetch #{} (latest #{})",
                    ticket.seq,
                    inner.latest_request
                );
                return (FetchOutcome::Stale, false);
            }
            inner.loading = false;

            match result {
                Ok(page) => {
                    inner.current_page = page.current_page.max(1);
                    inner.total_count = page.total_count;
                    inner.pagination = compute_window(
                        inner.current_page,
                        page.total_pages,
                        services.config.page_window_radius,
                    );
                    inner.rows = page.rows;
                    inner.applied_sort = ticket.query.sort.clone();
                    inner.rerender(services);
                    (FetchOutcome::Applied, false)
                }
                Err(e) => {
                    inner.current_page = inner.pagination.current_page.max(1);
                    let reverted = revert_sort(inner, services);
                    (FetchOutcome::Failed(e), reverted)
                }
            }
        });

        if let FetchOutcome::Failed(e) = &outcome {
            log::warn!("fetch #{} failed: {}", ticket.seq, e);
            self.services
                .notifier
                .notify(Notice::error(format!("Failed to load data: {}", e)));
        }
        (outcome, sort_reverted)
    }

    /// Fetches the current page and applies it.
    pub async fn refresh(&self) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = self.services.source.fetch_page(ticket.query()).await;
        let (outcome, sort_reverted) = self.settle(&ticket, result);
        if sort_reverted {
            self.flush(&[LayoutSection::Sort]).await;
        }
        outcome
    }

    /// Moves to a page, clamped into the known page range, and fetches it.
    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        self.update(|inner, _| {
            inner.current_page = page.clamp(1, inner.pagination.total_pages.max(1));
        });
        self.refresh().await
    }

    /// Fetches the next page. `None` if already on the last page.
    pub async fn next_page(&self) -> Option<FetchOutcome> {
        let (has_next, current) = self.read(|inner| (inner.pagination.has_next, inner.current_page));
        if !has_next {
            return None;
        }
        Some(self.go_to_page(current + 1).await)
    }

    /// Fetches the previous page. `None` if already on the first page.
    pub async fn prev_page(&self) -> Option<FetchOutcome> {
        let (has_prev, current) = self.read(|inner| (inner.pagination.has_prev, inner.current_page));
        if !has_prev {
            return None;
        }
        Some(self.go_to_page(current - 1).await)
    }

    /// Replaces the filters and fetches the first page.
    pub async fn set_filters(&self, filters: FilterSet) -> FetchOutcome {
        self.update(|inner, _| {
            inner.filters = filters;
            inner.current_page = 1;
        });
        self.refresh().await
    }

    /// Changes the page size and fetches the first page.
    pub async fn set_page_size(&self, page_size: u32) -> FetchOutcome {
        self.update(|inner, _| {
            inner.page_size = page_size.max(1);
            inner.current_page = 1;
        });
        self.refresh().await
    }
}

/// Puts the header back on the sort of the rows still on screen.
///
/// A sort the current actor may no longer use is not brought back.
fn revert_sort(inner: &mut EngineInner, services: &Services) -> bool {
    let fallback = inner
        .applied_sort
        .clone()
        .filter(|sort| services.catalog.is_sortable(&sort.key, &*inner.role));
    if inner.layout.sort() == fallback.as_ref() {
        return false;
    }
    log::debug!("sort rolled back to {:?} after failed fetch", fallback);
    inner.layout.set_sort(fallback);
    inner.rerender(services);
    true
}
