//! Paged selection state shared by the dashboard tables.
//!
//! Holds every row, shows one page at a time, and tracks the selected row
//! both as a page-relative position (for the ratatui `TableState`) and as a
//! global index.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::TableState,
};

pub struct PaginatedList<T> {
    items: Vec<T>,
    /// Current page (0-indexed)
    page: usize,
    page_size: usize,
    /// Selected row within the current page
    selected: usize,
    table_state: TableState,
}

impl<T> Default for PaginatedList<T> {
    fn default() -> Self {
        Self::new(10)
    }
}

impl<T> PaginatedList<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            selected: 0,
            table_state: TableState::default().with_selected(Some(0)),
        }
    }

    /// Replace the rows and return to the first row of the first page
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 0;
        self.selected = 0;
        self.sync_state();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        if self.items.is_empty() {
            1
        } else {
            self.items.len().div_ceil(self.page_size)
        }
    }

    /// Current page number (1-indexed for display)
    pub fn current_page(&self) -> usize {
        self.page + 1
    }

    pub fn current_page_items(&self) -> &[T] {
        let start = self.page * self.page_size;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected_index())
    }

    /// Global index of the selected row
    pub fn selected_index(&self) -> usize {
        self.page * self.page_size + self.selected
    }

    /// Selected row within the current page
    pub fn selected_position(&self) -> usize {
        self.selected
    }

    /// Select the first row matching `predicate`, switching pages as needed
    pub fn select_where(&mut self, predicate: impl Fn(&T) -> bool) -> bool {
        match self.items.iter().position(predicate) {
            Some(index) => {
                self.page = index / self.page_size;
                self.selected = index % self.page_size;
                self.sync_state();
                true
            }
            None => false,
        }
    }

    /// Move down one row, crossing into the next page and wrapping at the end
    pub fn select_next(&mut self) {
        let page_items = self.current_page_items().len();
        if page_items == 0 {
            return;
        }

        if self.selected + 1 < page_items {
            self.selected += 1;
        } else if self.page + 1 < self.total_pages() {
            self.page += 1;
            self.selected = 0;
        } else {
            self.page = 0;
            self.selected = 0;
        }
        self.sync_state();
    }

    /// Move up one row, crossing into the previous page and wrapping at the start
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }

        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.page = if self.page > 0 {
                self.page - 1
            } else {
                self.total_pages() - 1
            };
            self.selected = self.current_page_items().len().saturating_sub(1);
        }
        self.sync_state();
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.total_pages() {
            self.page += 1;
            self.selected = 0;
            self.sync_state();
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
            self.sync_state();
        }
    }

    pub fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    /// Footer line with the row count or page position
    pub fn footer_line(&self) -> Line<'static> {
        if self.total_pages() <= 1 {
            Line::from(Span::styled(
                format!("{} items", self.items.len()),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::styled(
                    format!("Page {}/{}", self.current_page(), self.total_pages()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw("  "),
                Span::styled("[n]", Style::default().fg(Color::Yellow)),
                Span::styled(" next  ", Style::default().fg(Color::DarkGray)),
                Span::styled("[p]", Style::default().fg(Color::Yellow)),
                Span::styled(" prev", Style::default().fg(Color::DarkGray)),
            ])
        }
    }

    fn sync_state(&mut self) {
        self.table_state.select(Some(self.selected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        let list: PaginatedList<String> = PaginatedList::new(5);
        assert!(list.is_empty());
        assert_eq!(list.total_pages(), 1);
        assert!(list.selected_item().is_none());
        assert!(list.current_page_items().is_empty());
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let mut list: PaginatedList<i32> = PaginatedList::new(0);
        list.set_items(vec![1, 2]);
        assert_eq!(list.page_size(), 1);
        assert_eq!(list.total_pages(), 2);
    }

    #[test]
    fn test_pages() {
        let mut list: PaginatedList<i32> = PaginatedList::new(3);
        list.set_items(vec![1, 2, 3, 4, 5, 6, 7]);

        assert_eq!(list.total_pages(), 3);
        assert_eq!(list.current_page_items(), &[1, 2, 3]);

        list.next_page();
        assert_eq!(list.current_page_items(), &[4, 5, 6]);
        list.next_page();
        assert_eq!(list.current_page_items(), &[7]);
        list.next_page();
        assert_eq!(list.current_page(), 3);

        list.prev_page();
        assert_eq!(list.current_page(), 2);
    }

    #[test]
    fn test_selection_crosses_pages_and_wraps() {
        let mut list: PaginatedList<&str> = PaginatedList::new(2);
        list.set_items(vec!["a", "b", "c"]);

        list.select_next();
        assert_eq!(list.selected_item(), Some(&"b"));
        list.select_next();
        assert_eq!(list.current_page(), 2);
        assert_eq!(list.selected_item(), Some(&"c"));
        list.select_next();
        assert_eq!(list.selected_item(), Some(&"a"));

        list.select_prev();
        assert_eq!(list.selected_item(), Some(&"c"));
        assert_eq!(list.selected_position(), 0);
    }

    #[test]
    fn test_select_where_jumps_to_page() {
        let mut list: PaginatedList<i32> = PaginatedList::new(2);
        list.set_items(vec![10, 20, 30, 40, 50]);

        assert!(list.select_where(|v| *v == 40));
        assert_eq!(list.current_page(), 2);
        assert_eq!(list.selected_position(), 1);
        assert_eq!(list.selected_index(), 3);
        assert!(!list.select_where(|v| *v == 99));
        assert_eq!(list.selected_item(), Some(&40));
    }
}
