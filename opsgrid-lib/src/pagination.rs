//! Page-number window around the current page.

/// Pages shown on each side of the current page by default.
pub const DEFAULT_WINDOW_RADIUS: u32 = 2;

/// One element of a rendered pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// Previous-page control.
    Prev,
    /// A numbered page.
    Page {
        /// 1-based page number.
        number: u32,
        /// Whether this is the current page.
        current: bool,
    },
    /// Gap marker between non-adjacent page numbers.
    Ellipsis,
    /// Next-page control.
    Next,
}

/// Derived pagination state, recomputed after every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageWindow {
    /// Current page after clamping into `[1, total_pages]`.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Contiguous page numbers around the current page.
    pub pages: Vec<u32>,
    /// Page 1 is shown separately, followed by a gap.
    pub show_leading_ellipsis: bool,
    /// A gap precedes the separately shown last page.
    pub show_trailing_ellipsis: bool,
    /// A previous page exists.
    pub has_prev: bool,
    /// A next page exists.
    pub has_next: bool,
}

impl PageWindow {
    /// First page of the window.
    pub fn window_start(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    /// Last page of the window.
    pub fn window_end(&self) -> Option<u32> {
        self.pages.last().copied()
    }

    /// Returns `true` when no pagination controls should be rendered.
    pub fn is_empty(&self) -> bool {
        self.total_pages <= 1
    }

    /// Expands the window into the links of a pagination bar.
    ///
    /// Empty when there is at most one page.
    pub fn links(&self) -> Vec<PageLink> {
        let (Some(start), Some(end)) = (self.window_start(), self.window_end()) else {
            return Vec::new();
        };
        if self.is_empty() {
            return Vec::new();
        }

        let page = |number| PageLink::Page {
            number,
            current: number == self.current_page,
        };

        let mut links = vec![PageLink::Prev];
        if start > 1 {
            links.push(page(1));
        }
        if self.show_leading_ellipsis {
            links.push(PageLink::Ellipsis);
        }
        links.extend(self.pages.iter().map(|&n| page(n)));
        if self.show_trailing_ellipsis {
            links.push(PageLink::Ellipsis);
        }
        if end < self.total_pages {
            links.push(page(self.total_pages));
        }
        links.push(PageLink::Next);
        links
    }
}

/// Computes the visible page window.
///
/// `current_page` is clamped into `[1, total_pages]` first. A `total_pages`
/// of zero is treated as a single empty page.
pub fn compute_window(current_page: u32, total_pages: u32, radius: u32) -> PageWindow {
    let last = total_pages.max(1);
    let current = current_page.clamp(1, last);
    let start = current.saturating_sub(radius).max(1);
    let end = current.saturating_add(radius).min(last);

    PageWindow {
        current_page: current,
        total_pages,
        pages: (start..=end).collect(),
        show_leading_ellipsis: start > 2,
        show_trailing_ellipsis: end < last.saturating_sub(1),
        has_prev: current > 1,
        has_next: current < total_pages,
    }
}

/// Number of pages needed for `total_count` rows.
pub fn page_count(total_count: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    u32::try_from(total_count.div_ceil(size)).unwrap_or(u32::MAX)
}
