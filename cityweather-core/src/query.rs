//! The query state that fully determines one page of city results.
//!
//! All transitions are pure so the paging/sorting rules can be tested
//! without any I/O. Invariant: the page number resets to 1 whenever the
//! search text or the sort field changes; flipping only the direction of
//! the current sort field keeps the page.

use serde::{Deserialize, Serialize};

/// Rows requested per page. Fixed by the dataset contract.
pub const PAGE_SIZE: u32 = 50;

/// Sortable columns of the city table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Country,
    Timezone,
}

impl SortField {
    /// Dotted field path understood by the dataset's sort parameter.
    pub fn as_query_field(self) -> &'static str {
        match self {
            SortField::Name => "fields.name",
            SortField::Country => "fields.cou_name_en",
            SortField::Timezone => "fields.timezone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Complete set of parameters for one city-directory request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub search_text: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_number: u32,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_field: SortField::Name,
            sort_direction: SortDirection::Ascending,
            page_number: 1,
        }
    }
}

impl QuerySpec {
    /// Zero-based row offset for the current page.
    pub fn offset(&self) -> u32 {
        (self.page_number - 1) * PAGE_SIZE
    }

    /// Sort parameter as transmitted: the dotted field path, prefixed with
    /// `-` for a descending sort.
    pub fn sort_param(&self) -> String {
        match self.sort_direction {
            SortDirection::Ascending => self.sort_field.as_query_field().to_string(),
            SortDirection::Descending => format!("-{}", self.sort_field.as_query_field()),
        }
    }

    pub fn search_changed(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page_number = 1;
    }

    /// Clicking the header of the current sort field flips the direction
    /// and keeps the page; picking a new field sorts ascending from page 1.
    pub fn sort_requested(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_direction = self.sort_direction.flip();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
            self.page_number = 1;
        }
    }

    pub fn next_page(&mut self) {
        self.page_number += 1;
    }

    pub fn previous_page(&mut self) {
        self.page_number = self.page_number.saturating_sub(1).max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_requests_first_page_by_name() {
        let spec = QuerySpec::default();
        assert_eq!(spec.page_number, 1);
        assert_eq!(spec.offset(), 0);
        assert_eq!(spec.sort_param(), "fields.name");
    }

    #[test]
    fn offset_is_zero_based_page_times_size() {
        let mut spec = QuerySpec::default();
        spec.page_number = 3;
        assert_eq!(spec.offset(), 100);
    }

    #[test]
    fn search_change_resets_page() {
        let mut spec = QuerySpec::default();
        spec.page_number = 4;
        spec.search_changed("Paris");
        assert_eq!(spec.search_text, "Paris");
        assert_eq!(spec.page_number, 1);
    }

    #[test]
    fn new_sort_field_resets_page_and_sorts_ascending() {
        let mut spec = QuerySpec::default();
        spec.sort_direction = SortDirection::Descending;
        spec.page_number = 7;

        spec.sort_requested(SortField::Country);

        assert_eq!(spec.sort_field, SortField::Country);
        assert_eq!(spec.sort_direction, SortDirection::Ascending);
        assert_eq!(spec.page_number, 1);
    }

    #[test]
    fn direction_flip_preserves_page() {
        let mut spec = QuerySpec::default();
        spec.page_number = 5;

        spec.sort_requested(SortField::Name);
        assert_eq!(spec.sort_direction, SortDirection::Descending);
        assert_eq!(spec.page_number, 5);

        spec.sort_requested(SortField::Name);
        assert_eq!(spec.sort_direction, SortDirection::Ascending);
        assert_eq!(spec.page_number, 5);
    }

    #[test]
    fn descending_sort_param_is_minus_prefixed() {
        let mut spec = QuerySpec::default();
        spec.sort_requested(SortField::Timezone);
        spec.sort_requested(SortField::Timezone);
        assert_eq!(spec.sort_param(), "-fields.timezone");
    }

    #[test]
    fn previous_page_never_goes_below_one() {
        let mut spec = QuerySpec::default();
        spec.previous_page();
        assert_eq!(spec.page_number, 1);

        spec.next_page();
        spec.next_page();
        spec.previous_page();
        assert_eq!(spec.page_number, 2);
    }
}
