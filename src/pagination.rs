use serde::Serialize;

/// Page size used when the configuration does not override it.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;

/// A 1-based page number together with the page size it is measured in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

impl PageRequest {
    /// Builds a request, clamping the page to at least 1 and the page size to
    /// at least one item.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Parses a raw `page` query parameter.
    ///
    /// Missing, non-numeric, zero or negative values fall back to page 1.
    pub fn from_param(raw: Option<&str>, per_page: usize) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> usize {
        if self.page == 1 {
            0
        } else {
            (self.page - 1).saturating_mul(self.per_page)
        }
    }

    /// Number of pages needed to show `total` items.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page)
    }
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Navigation links rendered under a listing.
///
/// `pages` holds the numbered links, with `None` marking a gap.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageLinks {
    pub page: usize,
    pub total_pages: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub pages: Vec<Option<usize>>,
}

impl PageLinks {
    pub fn new(request: PageRequest, total: usize) -> Self {
        let page = request.page();
        let total_pages = request.total_pages(total);

        Self {
            page,
            total_pages,
            previous: (page > 1).then(|| page - 1),
            next: (page < total_pages).then(|| page + 1),
            pages: get_pages(total_pages, page, 2, 2, 4, 2),
        }
    }
}
