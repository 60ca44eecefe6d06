//! This modules defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The number of items per page when a caller only asks for a page index.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
        }
    }
}

/// Selects one page of a query's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The zero-based index of the page.
    pub page_index: u64,
    /// The maximum number of items on the page.
    pub page_size: u64,
}

impl PageRequest {
    /// Request page `page_index` (zero-based) of `page_size` items.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new(page_index: u64, page_size: u64) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }

    /// The number of rows to skip to get to the start of the page.
    pub fn offset(&self) -> u64 {
        self.page_index.saturating_mul(self.page_size)
    }
}

/// One page of a query's results, along with the size of the whole result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// The zero-based index of this page.
    pub page_index: u64,
    /// The maximum number of items per page.
    pub page_size: u64,
    /// The number of items across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Create a page for `request` holding `content`.
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page_index: request.page_index,
            page_size: request.page_size,
            total_elements,
        }
    }

    /// The number of pages needed to show every item.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }

        self.total_elements.div_ceil(self.page_size)
    }

    /// The number of items on this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether this page has no items.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether this is the first page.
    pub fn is_first(&self) -> bool {
        self.page_index == 0
    }

    /// Whether there are no pages after this one.
    pub fn is_last(&self) -> bool {
        self.page_index.saturating_add(1) >= self.total_pages()
    }
}

#[cfg(test)]
mod page_request_tests {
    use super::PageRequest;

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 30);
    }

    #[test]
    fn zero_page_size_becomes_one() {
        assert_eq!(PageRequest::new(2, 0).page_size, 1);
    }
}

#[cfg(test)]
mod page_tests {
    use super::{Page, PageRequest};

    #[test]
    fn counts_partial_last_page() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(0, 3), 7);

        assert_eq!(page.total_pages(), 3);
        assert!(page.is_first());
        assert!(!page.is_last());
    }

    #[test]
    fn last_page_is_last() {
        let page = Page::new(vec![7], PageRequest::new(2, 3), 7);

        assert_eq!(page.len(), 1);
        assert!(page.is_last());
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Page<i32> = Page::new(Vec::new(), PageRequest::new(0, 10), 0);

        assert_eq!(page.total_pages(), 0);
        assert!(page.is_empty());
        assert!(page.is_last());
    }

    #[test]
    fn last_possible_page_index_is_last() {
        let page: Page<i32> = Page::new(Vec::new(), PageRequest::new(u64::MAX, 10), 0);

        assert!(page.is_last());
        assert_eq!(page.page_index, u64::MAX);
    }
}
