//! Page controls: the visible page-number window and page bookkeeping.
//!
//! [`visible_pages`] decides which page buttons to show. When there are more
//! pages than buttons it shows a window around the current page, always keeps
//! the first and last page, and marks skipped ranges with an ellipsis:
//!
//! ```text
//! total = 20, current = 10, max_visible = 7
//! [1] … [7] [8] [9] (10) [11] [12] [13] … [20]
//! ```

use serde::{Deserialize, Serialize};

/// One slot of the page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Default number of page buttons.
pub const DEFAULT_MAX_VISIBLE: usize = 7;

/// Computes the page window for 1-based `current` out of `total` pages.
///
/// Near the start the window is extended to end at `max_visible - 1`; near
/// the end it is pulled back to start at `total - max_visible + 2`.
///
/// ```
/// use complete_table::ui::pagination::{visible_pages, PageItem::{Ellipsis, Page}};
///
/// assert_eq!(visible_pages(2, 4, 7), vec![Page(1), Page(2), Page(3), Page(4)]);
/// assert_eq!(
///     visible_pages(1, 20, 7),
///     vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Ellipsis, Page(20)]
/// );
/// ```
#[must_use]
pub fn visible_pages(current: usize, total: usize, max_visible: usize) -> Vec<PageItem> {
    if total <= max_visible {
        return (1..=total).map(PageItem::Page).collect();
    }

    let half = max_visible / 2;
    let mut start = current.saturating_sub(half).max(1);
    let mut end = total.min(current.saturating_add(half));

    if current <= half {
        end = total.min(max_visible.saturating_sub(1));
    } else if current >= total.saturating_sub(half) {
        start = total.saturating_add(2).saturating_sub(max_visible).max(1);
    }

    let mut pages = Vec::with_capacity(max_visible.min(total).saturating_add(4));
    if start > 1 {
        pages.push(PageItem::Page(1));
        if start > 2 {
            pages.push(PageItem::Ellipsis);
        }
    }
    pages.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end + 1 < total {
            pages.push(PageItem::Ellipsis);
        }
        pages.push(PageItem::Page(total));
    }
    pages
}

/// Requested page, emitted towards the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageChange {
    pub page: usize,
    pub page_size: usize,
}

/// Server-side paging position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_count: usize,
}

impl PageInfo {
    #[must_use]
    pub const fn new(current_page: usize, page_size: usize, total_count: usize) -> Self {
        Self {
            current_page,
            page_size,
            total_count,
        }
    }

    #[must_use]
    pub const fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// 1-based index of the first item on the current page, capped at the total.
    #[must_use]
    pub const fn start_item(&self) -> usize {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .saturating_add(1);
        if start < self.total_count {
            start
        } else {
            self.total_count
        }
    }

    /// 1-based index of the last item on the current page, capped at the total.
    #[must_use]
    pub const fn end_item(&self) -> usize {
        let end = self.current_page.saturating_mul(self.page_size);
        if end < self.total_count {
            end
        } else {
            self.total_count
        }
    }

    /// Validates a jump to `page`. Returns `None` for the current page or an
    /// out-of-range page.
    #[must_use]
    pub const fn go_to_page(&self, page: usize) -> Option<PageChange> {
        if page == self.current_page || page < 1 || page > self.total_pages() {
            return None;
        }
        Some(PageChange {
            page,
            page_size: self.page_size,
        })
    }

    #[must_use]
    pub const fn previous(&self) -> Option<PageChange> {
        if self.has_previous() {
            self.go_to_page(self.current_page - 1)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn next(&self) -> Option<PageChange> {
        if self.has_next() {
            self.go_to_page(self.current_page + 1)
        } else {
            None
        }
    }

    /// A page size change always goes back to the first page.
    #[must_use]
    pub const fn change_page_size(&self, page_size: usize) -> PageChange {
        PageChange { page: 1, page_size }
    }

    /// Page window for this position.
    #[must_use]
    pub fn visible_pages(&self, max_visible: usize) -> Vec<PageItem> {
        visible_pages(self.current_page, self.total_pages(), max_visible)
    }
}
