//! Pagination over a ranked list.
//!
//! "Next" grows the visible window by one page rather than replacing it,
//! so the shown set is always a prefix of the full ranked list. Any
//! change to the upstream filtered/ranked input resets to the first page.

use std::cmp::min;

/// A monotonically growing page window over a ranked list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    pages_shown: usize,
    total: usize,
}

impl Pager {
    /// Creates a pager with the given page size and an empty list.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            page_size,
            pages_shown: 1,
            total: 0,
        }
    }

    /// Resets to the first page over a list of `total` items.
    pub const fn reset(&mut self, total: usize) {
        self.total = total;
        self.pages_shown = 1;
    }

    /// Updates the total without collapsing the shown window (vote
    /// reconciliation reorders but does not grow or shrink the list).
    pub const fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    /// Extends the window by one page, if more items remain.
    pub fn advance(&mut self) {
        if self.has_more() {
            self.pages_shown += 1;
        }
    }

    /// Number of items currently shown.
    #[must_use]
    pub fn shown(&self) -> usize {
        min(self.total, self.pages_shown.saturating_mul(self.page_size))
    }

    /// Total items in the ranked list.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Whether a "Next" control should be offered.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.shown() < self.total
    }

    /// The currently shown prefix of a ranked list.
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..min(items.len(), self.shown())]
    }

    /// The count display line, `"Showing {shown} of {total} locations"`.
    #[must_use]
    pub fn counter(&self) -> String {
        format!("Showing {} of {} locations", self.shown(), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_page_caps_at_page_size() {
        let mut pager = Pager::new(25);
        pager.reset(30);
        assert_eq!(pager.shown(), 25);
        assert!(pager.has_more());
        assert_eq!(pager.counter(), "Showing 25 of 30 locations");
    }

    #[test]
    fn next_extends_rather_than_replaces() {
        let mut pager = Pager::new(25);
        pager.reset(30);
        pager.advance();
        assert_eq!(pager.shown(), 30);
        assert!(!pager.has_more());
        assert_eq!(pager.counter(), "Showing 30 of 30 locations");
    }

    #[test]
    fn shown_count_is_monotonic_prefix() {
        let mut pager = Pager::new(25);
        pager.reset(120);
        for advances in 0..6 {
            assert_eq!(pager.shown(), min(120, (advances + 1) * 25));
            pager.advance();
        }
        // Advancing past the end is a no-op.
        assert_eq!(pager.shown(), 120);
    }

    #[test]
    fn no_next_when_total_fits_one_page() {
        let mut pager = Pager::new(25);
        pager.reset(25);
        assert!(!pager.has_more());
        pager.reset(10);
        assert!(!pager.has_more());
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let mut pager = Pager::new(25);
        pager.reset(0);
        assert_eq!(pager.shown(), 0);
        assert!(!pager.has_more());
        assert_eq!(pager.counter(), "Showing 0 of 0 locations");
    }

    #[test]
    fn reset_collapses_to_first_page() {
        let mut pager = Pager::new(25);
        pager.reset(100);
        pager.advance();
        pager.advance();
        assert_eq!(pager.shown(), 75);
        pager.reset(100);
        assert_eq!(pager.shown(), 25);
    }

    #[test]
    fn window_is_a_prefix_of_the_list() {
        let items: Vec<u32> = (0..30).collect();
        let mut pager = Pager::new(25);
        pager.reset(items.len());
        assert_eq!(pager.window(&items), &items[..25]);
        pager.advance();
        assert_eq!(pager.window(&items), &items[..]);
    }
}
