//! City list screen: paginated cities with search, sort and infinite scroll.

use std::sync::Arc;

use cityweather_cities::{CityListState, CityRecord, PageOutcome, SortColumn};
use cityweather_core::AppError;

use crate::app_services::{AppServices, CityServiceMessage};
use crate::services;

pub struct CityListModel {
    services: Arc<AppServices>,
    state: CityListState,
    /// Bumped on every mount so pages requested by an earlier mount are
    /// recognised and dropped.
    mount: u64,
    /// First visible row of the window the screen prints
    window_start: usize,
}

impl CityListModel {
    pub fn new(services: Arc<AppServices>) -> Self {
        let page_size = services.config().cities.page_size;
        Self {
            services,
            state: CityListState::new(page_size),
            mount: 0,
            window_start: 0,
        }
    }

    /// Start a fresh list and load the first page.
    pub fn mount(&mut self) {
        self.mount += 1;
        self.state = CityListState::new(self.services.config().cities.page_size);
        self.window_start = 0;
        self.load_next_page();
    }

    /// Request the next page unless one is in flight or the list is
    /// exhausted. Returns whether a request was issued.
    pub fn load_next_page(&mut self) -> bool {
        let Some(request) = self.state.begin_load() else {
            return false;
        };

        tracing::debug!("Requesting cities at offset {}", request.offset);
        services::request_city_page(
            self.services.city_sender(),
            self.services.runtime().handle(),
            self.services.city_client(),
            self.mount,
            request,
        );
        true
    }

    /// Scroll one window down and ask for more rows.
    pub fn on_scroll(&mut self) -> bool {
        let rows = self.window_rows();
        if self.window_start + rows < self.state.visible().len() {
            self.window_start += rows;
        }
        self.load_next_page()
    }

    pub fn scroll_up(&mut self) {
        self.window_start = self.window_start.saturating_sub(self.window_rows());
    }

    pub fn search(&mut self, term: &str) {
        self.state.search(term);
        self.window_start = 0;
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.state.toggle_sort(column);
        self.window_start = 0;
    }

    /// City at a zero-based row of the visible (filtered, sorted) list.
    pub fn city_at(&self, row: usize) -> Option<&CityRecord> {
        self.state.visible().get(row).copied()
    }

    /// Rows of the current window with their zero-based visible index.
    pub fn window(&self) -> Vec<(usize, &CityRecord)> {
        self.state
            .visible()
            .into_iter()
            .enumerate()
            .skip(self.window_start)
            .take(self.window_rows())
            .collect()
    }

    pub fn state(&self) -> &CityListState {
        &self.state
    }

    fn window_rows(&self) -> usize {
        self.services.config().ui.visible_rows.max(1)
    }

    /// Apply finished page requests. Returns whether anything changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;

        while let Some(msg) = self.services.try_recv_city_message() {
            match msg {
                CityServiceMessage::PageDone {
                    mount,
                    request,
                    result,
                } => {
                    if mount != self.mount {
                        tracing::debug!("Dropping city page from earlier list mount {}", mount);
                        continue;
                    }

                    match result {
                        Ok(records) => match self.state.apply_page(request, records) {
                            PageOutcome::Appended(n) => {
                                tracing::info!(
                                    "Loaded {} cities ({} total)",
                                    n,
                                    self.state.cities().len()
                                );
                                changed = true;
                            }
                            PageOutcome::Exhausted => {
                                tracing::info!("City list exhausted at offset {}", request.offset);
                                changed = true;
                            }
                            PageOutcome::Ignored => {}
                        },
                        Err(e) => {
                            let app: AppError = e.into();
                            tracing::error!(
                                "Failed to load cities at offset {}: {}",
                                request.offset,
                                app
                            );
                            changed |= self.state.apply_failure(request);
                        }
                    }
                }
            }
        }

        changed
    }
}
