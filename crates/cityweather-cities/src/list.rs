//! Incremental city list state.
//!
//! Holds the accumulated sequence of fetched cities plus pagination,
//! search and display-sort state. Transitions are plain methods; network
//! work happens elsewhere and reports back through `apply_page` /
//! `apply_failure`.

use std::cmp::Ordering;

use cityweather_core::LoadState;

use crate::types::{CityRecord, PageRequest, SortColumn, SortDirection, SortOrder};

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Result of applying a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Records were appended; more pages may follow.
    Appended(usize),
    /// The page was empty; no further pages will be requested.
    Exhausted,
    /// The page did not answer the outstanding request and was dropped.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CityListState {
    cities: Vec<CityRecord>,
    offset: usize,
    page_size: usize,
    has_more: bool,
    load: LoadState,
    search_term: String,
    sort: Option<SortOrder>,
}

impl Default for CityListState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CityListState {
    pub fn new(page_size: usize) -> Self {
        Self {
            cities: Vec::new(),
            offset: 0,
            page_size: page_size.max(1),
            has_more: true,
            load: LoadState::Idle,
            search_term: String::new(),
            sort: None,
        }
    }

    /// Start loading the next page.
    ///
    /// Returns the request to issue, or `None` when a request is already
    /// outstanding or the dataset is exhausted.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if !self.has_more || !self.load.can_start() {
            return None;
        }

        self.load = self.load.on_start(self.offset);
        Some(PageRequest {
            offset: self.offset,
            rows: self.page_size,
        })
    }

    /// Apply a successfully fetched page.
    pub fn apply_page(&mut self, request: PageRequest, records: Vec<CityRecord>) -> PageOutcome {
        if self.load.pending_offset() != Some(request.offset) {
            tracing::warn!(
                "Dropping city page for offset {} (pending: {:?})",
                request.offset,
                self.load.pending_offset()
            );
            return PageOutcome::Ignored;
        }

        self.load = self.load.on_done();
        self.offset += self.page_size;
        self.has_more = !records.is_empty();

        if records.is_empty() {
            return PageOutcome::Exhausted;
        }

        let count = records.len();
        self.cities.extend(records);
        PageOutcome::Appended(count)
    }

    /// Release the guard after a failed fetch. Data and `has_more` stay as
    /// they were so the next scroll retries the same offset.
    pub fn apply_failure(&mut self, request: PageRequest) -> bool {
        if self.load.pending_offset() != Some(request.offset) {
            return false;
        }
        self.load = self.load.on_done();
        true
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Cities matching the search term, in accumulated order.
    pub fn filtered(&self) -> Vec<&CityRecord> {
        if self.search_term.is_empty() {
            return self.cities.iter().collect();
        }

        let needle = self.search_term.to_lowercase();
        self.cities
            .iter()
            .filter(|city| city.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Rows to display: the filtered view, ordered by the active sort.
    pub fn visible(&self) -> Vec<&CityRecord> {
        let mut rows = self.filtered();

        if let Some(order) = self.sort {
            rows.sort_by(|a, b| {
                let ord = compare_collated(order.column.key(a), order.column.key(b));
                match order.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        rows
    }

    /// Cycle the sort on `column`: ascending, descending, then unsorted.
    /// A different column always starts at ascending.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some(SortOrder {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => Some(SortOrder {
                column,
                direction: SortDirection::Descending,
            }),
            Some(SortOrder {
                column: current,
                direction: SortDirection::Descending,
            }) if current == column => None,
            _ => Some(SortOrder {
                column,
                direction: SortDirection::Ascending,
            }),
        };
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    /// Everything fetched so far, in fetch order.
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_loading()
    }

    /// The spinner is shown only while loading a page that may exist.
    pub fn show_loading_indicator(&self) -> bool {
        self.is_loading() && self.has_more
    }
}

/// Locale-aware ordering: transliterated, case-folded text first, raw text
/// as the tie-breaker so the order is total.
pub fn compare_collated(a: &str, b: &str) -> Ordering {
    fold_key(a).cmp(&fold_key(b)).then_with(|| a.cmp(b))
}

fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}
