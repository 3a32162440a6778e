/// Whether a page fetch started by the pager is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagerState {
    #[default]
    Idle,
    Fetching,
}

/// Requests the next page when the slot after the last row scrolls into view.
///
/// A trigger moves the pager to `Fetching`; it returns to `Idle` once the
/// owner reports that no fetch is in flight any more. After a trigger the
/// pager stays disarmed until the sentinel leaves the viewport or the row
/// count changes, so one crossing produces one request.
#[derive(Debug, Clone, Default)]
pub struct ScrollPager {
    state: PagerState,
    disarmed_at: Option<usize>,
}

impl ScrollPager {
    /// Feed the owner's `isLoadingMore` flag back in.
    pub fn sync(&mut self, is_loading_more: bool) {
        if self.state == PagerState::Fetching && !is_loading_more {
            self.state = PagerState::Idle;
        }
    }

    /// Returns true when the next page should be requested.
    pub fn observe(&mut self, sentinel_visible: bool, has_more: bool, row_count: usize) -> bool {
        if !sentinel_visible || self.disarmed_at.is_some_and(|n| n != row_count) {
            self.disarmed_at = None;
        }

        let armed = self.disarmed_at.is_none();
        if sentinel_visible && has_more && armed && self.state == PagerState::Idle {
            self.state = PagerState::Fetching;
            self.disarmed_at = Some(row_count);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The sentinel is a zero-height slot right after the last row. It is in
/// view once the last row's bottom edge is inside the viewport.
pub fn sentinel_visible(offset: usize, viewport_rows: usize, row_count: usize) -> bool {
    viewport_rows > 0 && row_count >= offset && row_count <= offset + viewport_rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_once_while_fetching() {
        let mut pager = ScrollPager::default();
        assert!(pager.observe(true, true, 20));
        assert_eq!(pager.state, PagerState::Fetching);

        pager.sync(true);
        assert!(!pager.observe(true, true, 20));
        assert!(!pager.observe(false, true, 20));
        assert!(!pager.observe(true, true, 20));
    }

    #[test]
    fn settles_and_triggers_again_after_new_rows() {
        let mut pager = ScrollPager::default();
        assert!(pager.observe(true, true, 20));
        pager.sync(false);
        assert_eq!(pager.state, PagerState::Idle);
        assert!(pager.observe(true, true, 40));
    }

    #[test]
    fn failed_fetch_needs_a_new_crossing() {
        let mut pager = ScrollPager::default();
        assert!(pager.observe(true, true, 20));
        pager.sync(false);
        // Same rows, sentinel never left the viewport.
        assert!(!pager.observe(true, true, 20));
        assert!(!pager.observe(false, true, 20));
        assert!(pager.observe(true, true, 20));
    }

    #[test]
    fn no_trigger_without_more_pages() {
        let mut pager = ScrollPager::default();
        assert!(!pager.observe(true, false, 20));
        assert_eq!(pager.state, PagerState::Idle);
    }

    #[test]
    fn sentinel_visibility() {
        assert!(sentinel_visible(0, 10, 5));
        assert!(sentinel_visible(0, 10, 0));
        assert!(sentinel_visible(0, 10, 10));
        assert!(!sentinel_visible(0, 10, 11));
        assert!(sentinel_visible(5, 10, 14));
        assert!(!sentinel_visible(20, 10, 14));
        assert!(!sentinel_visible(0, 0, 0));
    }
}
