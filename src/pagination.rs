/// Pagination state for one independently paginated list. Every list
/// (top-level grid, tabbed browse, each related list) owns its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub current: u32,
    pub total: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current: 1,
            total: 1,
        }
    }
}

impl PageState {
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Replaces the server-reported page count, keeping the current
    /// page untouched (the server response is authoritative, the
    /// controls clamp navigation).
    pub fn set_total(&mut self, total: u32) {
        self.total = total.max(1);
    }

    pub fn go_to(&mut self, page: u32) {
        self.current = page;
    }

    pub fn prev(&self) -> u32 {
        self.current.saturating_sub(1).max(1)
    }

    pub fn next(&self) -> u32 {
        (self.current + 1).min(self.total)
    }

    pub fn at_first(&self) -> bool {
        self.current == 1
    }

    pub fn at_last(&self) -> bool {
        self.current >= self.total
    }
}

/// Which numbered buttons and ellipses the page controls render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub pages: Vec<u32>,
    pub show_first: bool,
    pub leading_ellipsis: bool,
    pub show_last: bool,
    pub trailing_ellipsis: bool,
}

/// Five-page window centered on the current page, snapped to the range
/// edges. Pages that fall outside [1, total] are dropped, so the window
/// shrinks near the edges of short ranges.
pub fn page_window(current: u32, total: u32) -> PageWindow {
    let current = i64::from(current.max(1));
    let total = i64::from(total.max(1));

    let start = if current <= 3 {
        1
    } else if current >= total - 2 {
        total - 4
    } else {
        current - 2
    };

    let pages = (start..start + 5)
        .filter(|page| *page >= 1 && *page <= total)
        .map(|page| page as u32)
        .collect();

    PageWindow {
        pages,
        show_first: current > 3,
        leading_ellipsis: current > 4,
        show_last: current < total - 2,
        trailing_ellipsis: current < total - 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_at_first_page() {
        let window = page_window(1, 10);
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(!window.show_first);
        assert!(!window.leading_ellipsis);
        assert!(window.show_last);
        assert!(window.trailing_ellipsis);
    }

    #[test]
    fn window_at_last_page() {
        let window = page_window(10, 10);
        assert_eq!(window.pages, vec![6, 7, 8, 9, 10]);
        assert!(window.show_first);
        assert!(window.leading_ellipsis);
        assert!(!window.show_last);
        assert!(!window.trailing_ellipsis);
    }

    #[test]
    fn window_in_the_middle() {
        let window = page_window(5, 10);
        assert_eq!(window.pages, vec![3, 4, 5, 6, 7]);
        assert!(window.show_first);
        assert!(window.leading_ellipsis);
        assert!(window.show_last);
        assert!(window.trailing_ellipsis);
    }

    #[test]
    fn window_shrinks_for_short_ranges() {
        assert_eq!(page_window(1, 1).pages, vec![1]);
        assert_eq!(page_window(2, 3).pages, vec![1, 2, 3]);
        assert_eq!(page_window(4, 4).pages, vec![1, 2, 3, 4]);
    }

    #[test]
    fn ellipsis_boundaries() {
        // page 4 of many: first page shown but no gap to bridge yet
        let window = page_window(4, 10);
        assert!(window.show_first);
        assert!(!window.leading_ellipsis);
        // mirrored at the far end
        let window = page_window(7, 10);
        assert!(window.show_last);
        assert!(!window.trailing_ellipsis);
    }

    #[test]
    fn window_invariants_hold_everywhere() {
        for total in 1..=25u32 {
            for current in 1..=total {
                let window = page_window(current, total);
                assert!(window.pages.len() <= 5);
                assert!(window.pages.windows(2).all(|w| w[0] < w[1]));
                assert!(window.pages.iter().all(|p| *p >= 1 && *p <= total));
                assert!(
                    window.pages.contains(&current),
                    "window {:?} misses current {} of {}",
                    window.pages,
                    current,
                    total
                );
            }
        }
    }

    #[test]
    fn navigation_clamps_at_edges() {
        let state = PageState {
            current: 1,
            total: 10,
        };
        assert_eq!(state.prev(), 1);
        assert!(state.at_first());

        let state = PageState {
            current: 10,
            total: 10,
        };
        assert_eq!(state.next(), 10);
        assert!(state.at_last());

        let state = PageState {
            current: 5,
            total: 10,
        };
        assert_eq!(state.prev(), 4);
        assert_eq!(state.next(), 6);
    }

    #[test]
    fn total_defaults_to_at_least_one() {
        let mut state = PageState::default();
        state.set_total(0);
        assert_eq!(state.total, 1);
        state.set_total(7);
        assert_eq!(state.total, 7);
    }
}
