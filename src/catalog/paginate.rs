//! Page slicing and page navigation.
//!
//! Out-of-range input is never an error here: page numbers are clamped into
//! `1..=total_pages` and a zero page size behaves like a page size of one.

use serde::{Deserialize, Serialize};

/// One page of an ordered sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Always at least 1, even for an empty sequence.
    pub total_pages: usize,
    /// The 1-based page actually shown, after clamping.
    pub page: usize,
    /// Length of the whole sequence.
    pub total_items: usize,
}

/// Number of pages needed for `len` items, never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Slice `items` down to the requested page.
pub fn paginate<T>(items: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page = current_page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(items.len());
    let end = (page * page_size).min(items.len());

    Page {
        items: &items[start..end],
        total_pages,
        page,
        total_items: items.len(),
    }
}

/// Page size and 1-based current page for one list session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    page_size: usize,
    current_page: usize,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Back to the first page; called on every filter, search or sort change.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Keep the current page inside `1..=total_pages`.
    pub fn clamp_to(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }

    /// Advance one page; no-op on the last page.
    pub fn next(&mut self, total_pages: usize) {
        if self.current_page < total_pages {
            self.current_page += 1;
        }
    }

    /// Go back one page; no-op on the first page.
    pub fn prev(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Jump to `page`, clamped silently.
    pub fn jump(&mut self, page: usize, total_pages: usize) {
        self.current_page = page.clamp(1, total_pages.max(1));
    }

    /// Change the page size. The current page is kept and clamped against
    /// `item_count` under the new size.
    pub fn set_page_size(&mut self, page_size: usize, item_count: usize) {
        self.page_size = page_size.max(1);
        self.clamp_to(total_pages(item_count, self.page_size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_never_below_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_page_is_clamped_into_range() {
        let items: Vec<u32> = (0..23).collect();

        let last = paginate(&items, 10, 3);
        assert_eq!(last.items, &[20, 21, 22]);
        assert_eq!(last.total_pages, 3);

        let beyond = paginate(&items, 10, 99);
        assert_eq!(beyond.page, 3);
        assert_eq!(beyond.items, last.items);

        let zero = paginate(&items, 10, 0);
        assert_eq!(zero.page, 1);
        assert_eq!(zero.items.len(), 10);
    }

    #[test]
    fn test_clamp_holds_for_every_length_and_size() {
        for len in 0..40usize {
            let items: Vec<usize> = (0..len).collect();
            for size in 0..12usize {
                for requested in 0..10usize {
                    let page = paginate(&items, size, requested);
                    assert!(page.page >= 1);
                    assert!(page.page <= total_pages(len, size));
                    assert!(page.items.len() <= size.max(1));
                }
            }
        }
    }

    #[test]
    fn test_empty_sequence_has_one_empty_page() {
        let items: Vec<u8> = Vec::new();
        let page = paginate(&items, 10, 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_navigation_is_a_no_op_at_the_bounds() {
        let mut state = PaginationState::new(10);

        state.prev();
        assert_eq!(state.current_page(), 1);

        state.next(3);
        state.next(3);
        state.next(3);
        assert_eq!(state.current_page(), 3);

        state.jump(42, 3);
        assert_eq!(state.current_page(), 3);
        state.jump(0, 3);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_page_size_change_clamps_without_reset() {
        let mut state = PaginationState::new(5);
        state.jump(4, 5);

        state.set_page_size(10, 23);
        assert_eq!(state.current_page(), 3);

        state.set_page_size(2, 23);
        assert_eq!(state.current_page(), 3);
    }
}
