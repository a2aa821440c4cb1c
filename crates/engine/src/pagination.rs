use api_types::pagination::PageInfo;

/// Page position of a paginated list.
///
/// Invariants: `page >= 1`, `limit > 0`, and `(page - 1) * limit < total`
/// whenever `total > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
    total: u64,
    total_pages: u64,
}

impl Pagination {
    pub fn new(limit: u64) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            total_pages: 0,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Highest page `set_page` accepts; 1 for an empty list.
    pub fn last_page(&self) -> u64 {
        self.total_pages.max(1)
    }

    /// Moves to page `n` and reports whether the page changed. Out-of-range
    /// pages are ignored; navigation controls are expected to be disabled at the
    /// bounds anyway.
    pub fn set_page(&mut self, n: u64) -> bool {
        if n < 1 || n > self.last_page() || n == self.page {
            return false;
        }
        self.page = n;
        true
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    /// Every filter mutation goes through here before the next reload, so a
    /// narrower result set is never asked for a page it no longer has.
    pub fn on_filter_change(&mut self) {
        self.page = 1;
    }

    /// Applies the `pagination` block of a list envelope.
    pub fn apply_server(&mut self, info: PageInfo) {
        if info.limit > 0 {
            self.limit = info.limit;
        }
        self.total = info.total;
        self.total_pages = self.total.div_ceil(self.limit);
        self.page = info.page.clamp(1, self.last_page());
    }

    /// A bare array response is a single page holding everything.
    pub fn apply_bare(&mut self, len: usize) {
        self.page = 1;
        self.total = len as u64;
        self.total_pages = u64::from(len > 0);
    }

    /// 1-based `(start, end)` of the rows on the current page, `None` when the
    /// list is empty.
    pub fn displayed_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let start = (self.page - 1) * self.limit + 1;
        let end = if self.page >= self.total_pages {
            self.total
        } else {
            (self.page * self.limit).min(self.total)
        };
        Some((start, end))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(total: u64, limit: u64) -> Pagination {
        let mut pagination = Pagination::new(limit);
        pagination.apply_server(PageInfo {
            page: 1,
            limit,
            total,
            total_pages: 0,
        });
        pagination
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        for (total, limit, pages) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (25, 10, 3)] {
            assert_eq!(with_total(total, limit).total_pages(), pages, "{total}/{limit}");
        }
    }

    #[test]
    fn set_page_ignores_out_of_range() {
        let mut pagination = with_total(25, 10);
        assert!(pagination.set_page(3));
        assert!(!pagination.set_page(4));
        assert_eq!(pagination.page(), 3);
        assert!(!pagination.set_page(0));
        assert_eq!(pagination.page(), 3);
        assert!(!pagination.has_next());
        assert!(pagination.has_prev());
    }

    #[test]
    fn empty_list_only_has_page_one() {
        let mut pagination = with_total(0, 10);
        assert!(!pagination.set_page(2));
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.displayed_range(), None);
        assert!(!pagination.has_next());
    }

    #[test]
    fn filter_change_resets_page() {
        let mut pagination = with_total(25, 10);
        pagination.set_page(3);
        pagination.on_filter_change();
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn displayed_range_clips_last_page() {
        let mut pagination = with_total(25, 10);
        assert_eq!(pagination.displayed_range(), Some((1, 10)));
        pagination.set_page(3);
        assert_eq!(pagination.displayed_range(), Some((21, 25)));
    }

    #[test]
    fn server_page_is_clamped_into_range() {
        let mut pagination = Pagination::new(10);
        pagination.apply_server(PageInfo {
            page: 9,
            limit: 10,
            total: 25,
            total_pages: 3,
        });
        assert_eq!(pagination.page(), 3);
    }

    #[test]
    fn bare_response_is_one_page() {
        let mut pagination = with_total(25, 10);
        pagination.set_page(2);
        pagination.apply_bare(14);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.total(), 14);
        assert_eq!(pagination.total_pages(), 1);
        assert_eq!(pagination.displayed_range(), Some((1, 14)));
    }
}
