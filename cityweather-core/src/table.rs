//! State machine behind the city table: search text, sort, page, loading
//! flag and the last fetched page, with no I/O of its own.
//!
//! Every query-changing transition stamps a new generation and hands back a
//! [`FetchTicket`]; the driver executes the ticket and reports back with the
//! same stamp. A completion carrying an older stamp is discarded, so a slow
//! in-flight response can never overwrite the state of a newer query — the
//! most recently initiated query is always authoritative. In-flight fetches
//! are never aborted.

use crate::model::CityRecord;
use crate::query::{QuerySpec, SortField};

/// A snapshot of the query to execute, stamped with the generation that
/// issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub spec: QuerySpec,
}

#[derive(Debug, Default)]
pub struct CityTable {
    spec: QuerySpec,
    loading: bool,
    rows: Vec<CityRecord>,
    generation: u64,
    location_available: bool,
}

impl CityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The one fetch performed on mount, using the default query.
    pub fn initial_fetch(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    pub fn search_text_changed(&mut self, text: impl Into<String>) -> FetchTicket {
        self.spec.search_changed(text);
        self.begin_fetch()
    }

    pub fn sort_requested(&mut self, field: SortField) -> FetchTicket {
        self.spec.sort_requested(field);
        self.begin_fetch()
    }

    pub fn page_next(&mut self) -> FetchTicket {
        self.spec.next_page();
        self.begin_fetch()
    }

    pub fn page_previous(&mut self) -> FetchTicket {
        self.spec.previous_page();
        self.begin_fetch()
    }

    /// Apply a finished fetch. Stale stamps are dropped.
    pub fn fetch_completed(&mut self, generation: u64, records: Vec<CityRecord>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale city page");
            return;
        }
        self.loading = false;
        self.rows = records;
    }

    /// A fetch failed: clear the loading flag and keep the previous page.
    /// The failure is logged, never surfaced as an error state.
    pub fn fetch_failed(&mut self, generation: u64) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale fetch failed, ignored");
            return;
        }
        self.loading = false;
        tracing::warn!(page = self.spec.page_number, "city fetch failed, keeping previous page");
    }

    pub fn set_location_available(&mut self, available: bool) {
        self.location_available = available;
    }

    pub fn rows(&self) -> &[CityRecord] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn query(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn location_available(&self) -> bool {
        self.location_available
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket { generation: self.generation, spec: self.spec.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    fn city(record_id: &str, name: &str) -> CityRecord {
        CityRecord {
            record_id: record_id.to_string(),
            name: name.to_string(),
            country_name: "France".to_string(),
            timezone: "Europe/Paris".to_string(),
            coordinates: Coordinates { latitude: 48.85, longitude: 2.35 },
        }
    }

    #[test]
    fn mount_issues_one_fetch_with_the_default_query() {
        let mut table = CityTable::new();
        let ticket = table.initial_fetch();

        assert_eq!(ticket.generation, 1);
        assert_eq!(ticket.spec, QuerySpec::default());
        assert!(table.is_loading());
        assert!(table.rows().is_empty());
    }

    #[test]
    fn completion_applies_records_and_clears_loading() {
        let mut table = CityTable::new();
        let ticket = table.initial_fetch();

        table.fetch_completed(ticket.generation, vec![city("a", "Paris")]);

        assert!(!table.is_loading());
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].name, "Paris");
    }

    #[test]
    fn stale_response_cannot_overwrite_a_newer_query() {
        let mut table = CityTable::new();
        let stale = table.search_text_changed("Par");
        let fresh = table.search_text_changed("Paris");

        // The newer fetch lands first, then the superseded one trickles in.
        table.fetch_completed(fresh.generation, vec![city("b", "Paris")]);
        table.fetch_completed(stale.generation, vec![city("a", "Parma")]);

        assert_eq!(table.rows()[0].name, "Paris");
        assert!(!table.is_loading());
    }

    #[test]
    fn stale_failure_does_not_clear_loading_of_a_newer_fetch() {
        let mut table = CityTable::new();
        let stale = table.initial_fetch();
        let _fresh = table.page_next();

        table.fetch_failed(stale.generation);
        assert!(table.is_loading());
    }

    #[test]
    fn failure_keeps_the_previous_page() {
        let mut table = CityTable::new();
        let first = table.initial_fetch();
        table.fetch_completed(first.generation, vec![city("a", "Paris")]);

        let second = table.page_next();
        table.fetch_failed(second.generation);

        assert!(!table.is_loading());
        assert_eq!(table.rows().len(), 1, "stale rows must be kept on failure");
    }

    #[test]
    fn search_and_sort_reset_the_page_but_direction_flip_does_not() {
        let mut table = CityTable::new();
        table.page_next();
        table.page_next();
        assert_eq!(table.query().page_number, 3);

        let flip = table.sort_requested(SortField::Name);
        assert_eq!(flip.spec.page_number, 3);

        let resort = table.sort_requested(SortField::Timezone);
        assert_eq!(resort.spec.page_number, 1);

        table.page_next();
        let search = table.search_text_changed("Lyon");
        assert_eq!(search.spec.page_number, 1);
    }

    #[test]
    fn page_previous_never_drives_the_page_below_one() {
        let mut table = CityTable::new();
        let ticket = table.page_previous();
        assert_eq!(ticket.spec.page_number, 1);
    }

    #[test]
    fn ticket_spec_is_a_snapshot() {
        let mut table = CityTable::new();
        let ticket = table.search_text_changed("Paris");
        table.search_text_changed("Lyon");

        assert_eq!(ticket.spec.search_text, "Paris");
        assert_eq!(table.query().search_text, "Lyon");
    }

    #[test]
    fn location_flag_is_independent_of_the_table() {
        let mut table = CityTable::new();
        assert!(!table.location_available());
        table.set_location_available(true);
        assert!(table.location_available());
        assert!(table.rows().is_empty());
    }
}
