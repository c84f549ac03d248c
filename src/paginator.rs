// Fixed-size windowing over an in-memory result set.
// A `Paginator` is built once per displayed list and owns the items for
// as long as the view is open. Out-of-range requests never fail: they are
// clamped onto the nearest valid page.

/// Default number of items shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Position and navigability of one page within the full result set.
///
/// Indices are 1-based and inclusive, ready for "Showing 11-20 of 25".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Splits an ordered collection into pages and tracks a cursor.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    page_size: usize,
    total_pages: usize,
    current_page: usize,
}

impl<T> Paginator<T> {
    /// A `page_size` of zero is treated as 1.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = items.len().div_ceil(page_size);

        Self {
            items,
            page_size,
            total_pages,
            current_page: 1,
        }
    }

    /// Get the items on `page_number` and move the cursor there.
    ///
    /// The page number is clamped into `1..=total_pages` (page 1 when the
    /// collection is empty).
    pub fn get_page(&mut self, page_number: usize) -> (&[T], PageInfo) {
        let page = page_number.clamp(1, self.total_pages.max(1));
        self.current_page = page;

        let start = (page - 1) * self.page_size;
        let end = start + self.page_size;
        let total_items = self.items.len();

        let info = PageInfo {
            current_page: page,
            total_pages: self.total_pages,
            page_size: self.page_size,
            total_items,
            start_index: start + 1,
            end_index: end.min(total_items),
            has_next: page < self.total_pages,
            has_prev: page > 1,
        };

        let slice = &self.items[start.min(total_items)..end.min(total_items)];
        (slice, info)
    }

    /// Re-read the page under the cursor.
    pub fn current(&mut self) -> (&[T], PageInfo) {
        self.get_page(self.current_page)
    }

    pub fn next_page(&mut self) -> (&[T], PageInfo) {
        self.get_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> (&[T], PageInfo) {
        self.get_page(self.current_page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> (&[T], PageInfo) {
        self.get_page(1)
    }

    pub fn last_page(&mut self) -> (&[T], PageInfo) {
        self.get_page(self.total_pages)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, in their original order.
    pub fn items(&self) -> &[T] {
        &self.items
    }
}
