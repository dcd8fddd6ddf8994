use std::ops::Range;

/// Client-side page cursor; the row count is passed in by the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Move to `page` if it exists for `total` rows
    pub fn go_to(&mut self, page: usize, total: usize) -> bool {
        if page >= 1 && page <= self.total_pages(total) {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// Index range of the current page, clipped to `total`
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(total);
        let end = (self.page * self.page_size).min(total);
        start..end
    }

    pub fn start_item(&self, total: usize) -> usize {
        if total == 0 {
            0
        } else {
            ((self.page - 1) * self.page_size + 1).min(total)
        }
    }

    pub fn end_item(&self, total: usize) -> usize {
        (self.page * self.page_size).min(total)
    }
}
