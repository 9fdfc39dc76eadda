//! Filterable, searchable list state over one catalog

use std::collections::BTreeMap;

use super::{Catalog, Entry, ViewConfig};
use crate::ui::paginated_list::PaginatedList;

pub struct ListDetailView {
    catalog: Catalog,
    /// Active value per filter key; absent means "any"
    filters: BTreeMap<String, String>,
    search: String,
    list: PaginatedList<Entry>,
}

impl ListDetailView {
    pub fn new(catalog: Catalog, page_size: usize) -> Self {
        let mut view = Self {
            catalog,
            filters: BTreeMap::new(),
            search: String::new(),
            list: PaginatedList::new(page_size),
        };
        view.refresh();
        view
    }

    pub fn title(&self) -> &str {
        &self.catalog.view.title
    }

    pub fn config(&self) -> &ViewConfig {
        &self.catalog.view
    }

    /// Distinct non-empty values of `key`, sorted
    pub fn filter_options(&self, key: &str) -> Vec<String> {
        let mut values: Vec<String> = self
            .catalog
            .entries
            .iter()
            .map(|e| e.field(key))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        values.sort();
        values.dedup();
        values
    }

    pub fn active_filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn set_filter(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => self.filters.insert(key.to_string(), value),
            None => self.filters.remove(key),
        };
        self.refresh();
    }

    /// Step a filter through any -> each value -> any
    pub fn cycle_filter(&mut self, key: &str) {
        let options = self.filter_options(key);
        let next = match self.active_filter(key) {
            None => options.first().cloned(),
            Some(current) => options
                .iter()
                .position(|o| o == current)
                .and_then(|pos| options.get(pos + 1))
                .cloned(),
        };
        self.set_filter(key, next);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search.clear();
        self.refresh();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Case-insensitive match over the column fields
    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
        self.refresh();
    }

    pub fn list(&self) -> &PaginatedList<Entry> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut PaginatedList<Entry> {
        &mut self.list
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.list.selected_item()
    }

    /// Labelled detail rows for the selected entry
    pub fn detail(&self) -> Vec<(String, String)> {
        let Some(entry) = self.selected() else {
            return Vec::new();
        };
        self.catalog
            .view
            .detail
            .iter()
            .map(|field| {
                let value = entry.field(&field.key);
                let value = if value.is_empty() { "-" } else { value };
                (field.label.clone(), value.to_string())
            })
            .collect()
    }

    pub fn select_next(&mut self) {
        self.list.select_next();
    }

    pub fn select_prev(&mut self) {
        self.list.select_prev();
    }

    pub fn next_page(&mut self) {
        self.list.next_page();
    }

    pub fn prev_page(&mut self) {
        self.list.prev_page();
    }

    fn matches(&self, entry: &Entry) -> bool {
        let filtered = self
            .filters
            .iter()
            .all(|(key, value)| entry.field(key) == value);
        if !filtered {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        self.catalog
            .view
            .columns
            .iter()
            .any(|c| entry.field(&c.key).to_lowercase().contains(&needle))
    }

    /// Recompute visible rows, keeping the selected entry when it survives
    fn refresh(&mut self) {
        let previous = self.list.selected_item().map(|e| e.id.clone());
        let visible: Vec<Entry> = self
            .catalog
            .entries
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        self.list.set_items(visible);
        if let Some(id) = previous {
            self.list.select_where(|e| e.id == id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"
        [view]
        title = "People"
        detail = [
            { key = "name", label = "Name" },
            { key = "city", label = "City" },
            { key = "note", label = "Note" },
        ]

        [[view.columns]]
        key = "name"
        label = "Name"

        [[view.columns]]
        key = "city"
        label = "City"

        [[view.filters]]
        key = "status"
        label = "Status"

        [[entries]]
        id = "p1"
        name = "Ada"
        city = "Lagos"
        status = "Active"
        note = "Mentor"

        [[entries]]
        id = "p2"
        name = "Bayo"
        city = "Accra"
        status = "Inactive"
        note = ""

        [[entries]]
        id = "p3"
        name = "Chidi"
        city = "Lagos"
        status = "Active"
        note = "New"
    "#;

    fn view(page_size: usize) -> ListDetailView {
        ListDetailView::new(Catalog::from_toml("people", PEOPLE).unwrap(), page_size)
    }

    #[test]
    fn test_filter_options_are_distinct_and_sorted() {
        assert_eq!(view(10).filter_options("status"), vec!["Active", "Inactive"]);
    }

    #[test]
    fn test_cycle_filter_wraps_to_any() {
        let mut view = view(10);
        view.cycle_filter("status");
        assert_eq!(view.active_filter("status"), Some("Active"));
        assert_eq!(view.list().len(), 2);

        view.cycle_filter("status");
        assert_eq!(view.active_filter("status"), Some("Inactive"));
        assert_eq!(view.list().len(), 1);

        view.cycle_filter("status");
        assert_eq!(view.active_filter("status"), None);
        assert_eq!(view.list().len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_over_columns() {
        let mut view = view(10);
        view.set_search("  lagos ");
        assert_eq!(view.search(), "lagos");
        assert_eq!(view.list().len(), 2);

        // "note" is a detail field, not a column
        view.set_search("mentor");
        assert!(view.list().is_empty());
        assert!(view.detail().is_empty());
    }

    #[test]
    fn test_selection_survives_refresh() {
        let mut view = view(10);
        view.select_next();
        view.select_next();
        assert_eq!(view.selected().unwrap().id, "p3");

        view.set_filter("status", Some("Active".into()));
        assert_eq!(view.selected().unwrap().id, "p3");

        view.clear_filters();
        assert_eq!(view.list().len(), 3);
        assert_eq!(view.selected().unwrap().id, "p3");
    }

    #[test]
    fn test_detail_uses_placeholder_for_empty_fields() {
        let mut view = view(2);
        view.next_page();
        view.prev_page();
        view.select_next();
        let detail = view.detail();
        assert_eq!(detail[0], ("Name".to_string(), "Bayo".to_string()));
        assert_eq!(detail[2], ("Note".to_string(), "-".to_string()));
    }
}
