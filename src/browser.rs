//! Paginated browsing of one search result list
//!
//! A small state machine over a fixed, immutable result list: a zero-based
//! page cursor plus boundary-checked navigation and 1-based item selection.
//! The browser is recreated per search and owns nothing beyond its snapshot.

use crate::errors::{AppError, AppResult};
use crate::models::Message;

/// Messages per page
pub const PAGE_SIZE: usize = 10;

/// Stateful paginator over an immutable result list
///
/// The empty list is a degenerate single state: no navigation is possible
/// and the current page is always empty.
#[derive(Debug)]
pub struct ResultBrowser {
    results: Vec<Message>,
    page: usize,
}

impl ResultBrowser {
    /// Create a browser positioned at the first page
    pub fn new(results: Vec<Message>) -> Self {
        Self { results, page: 0 }
    }

    /// Whether there is anything to browse
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Total number of results across all pages
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Current zero-based page index
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages (zero for an empty list)
    pub fn page_count(&self) -> usize {
        self.results.len().div_ceil(PAGE_SIZE)
    }

    /// Zero-based index of the first item on the current page
    ///
    /// Used by callers to number listed items by absolute position.
    pub fn page_start(&self) -> usize {
        self.page * PAGE_SIZE
    }

    /// Messages on the current page, in result order
    pub fn current_page(&self) -> &[Message] {
        let start = self.page_start().min(self.results.len());
        let end = (start + PAGE_SIZE).min(self.results.len());
        &self.results[start..end]
    }

    /// Advance to the next page
    ///
    /// Returns `false` without moving when already on the last page; the
    /// caller reports that as a warning, not an error.
    pub fn next(&mut self) -> bool {
        if (self.page + 1) * PAGE_SIZE < self.results.len() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back to the previous page
    ///
    /// Returns `false` without moving when already on the first page.
    pub fn prev(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Select a message by 1-based position in the full result list
    ///
    /// The index addresses the whole list, not the current page. Selection
    /// never changes the page cursor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `index` is outside `1..=len`.
    pub fn select(&self, index: usize) -> AppResult<&Message> {
        if index == 0 || index > self.results.len() {
            return Err(AppError::invalid(format!(
                "index {index} out of range 1..={}",
                self.results.len()
            )));
        }
        Ok(&self.results[index - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::{PAGE_SIZE, ResultBrowser};
    use crate::models::Message;

    fn messages(count: usize) -> Vec<Message> {
        (0..count)
            .map(|i| Message {
                id: format!("id-{i}"),
                subject: format!("subject {i}"),
                sender: String::new(),
                recipient: String::new(),
                timestamp: String::new(),
                plain_body: String::new(),
                html_body: String::new(),
                attachments: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn pages_split_at_fixed_boundaries() {
        let mut browser = ResultBrowser::new(messages(25));
        assert_eq!(browser.page_count(), 3);
        assert_eq!(browser.current_page().len(), PAGE_SIZE);
        assert_eq!(browser.current_page()[0].id, "id-0");

        assert!(browser.next());
        assert_eq!(browser.current_page()[0].id, "id-10");

        assert!(browser.next());
        assert_eq!(browser.current_page().len(), 5);
        assert_eq!(browser.current_page()[0].id, "id-20");
    }

    #[test]
    fn next_past_last_page_is_rejected_without_moving() {
        let mut browser = ResultBrowser::new(messages(25));
        browser.next();
        browser.next();
        assert_eq!(browser.page(), 2);

        assert!(!browser.next());
        assert_eq!(browser.page(), 2);
    }

    #[test]
    fn prev_before_first_page_is_rejected_without_moving() {
        let mut browser = ResultBrowser::new(messages(25));
        assert!(!browser.prev());
        assert_eq!(browser.page(), 0);
    }

    #[test]
    fn select_translates_one_based_index_over_full_list() {
        let browser = ResultBrowser::new(messages(25));
        assert_eq!(browser.select(1).expect("first").id, "id-0");
        assert_eq!(browser.select(25).expect("last").id, "id-24");
        // index addresses the whole list even after paging forward
        assert_eq!(browser.select(15).expect("off-page").id, "id-14");
    }

    #[test]
    fn select_rejects_out_of_range_indexes() {
        let browser = ResultBrowser::new(messages(25));
        browser.select(0).expect_err("zero index");
        browser.select(26).expect_err("past end");
    }

    #[test]
    fn empty_list_is_a_degenerate_state() {
        let mut browser = ResultBrowser::new(Vec::new());
        assert!(browser.is_empty());
        assert_eq!(browser.page_count(), 0);
        assert!(browser.current_page().is_empty());
        assert!(!browser.next());
        assert!(!browser.prev());
        browser.select(1).expect_err("nothing to select");
    }
}
