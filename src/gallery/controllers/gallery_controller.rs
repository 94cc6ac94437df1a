//! # Gallery Controller
//!
//! Owns the query state and keeps the published results consistent with it.
//!
//! Every query change issues a new search (and, depending on the
//! [`FacetRefresh`] policy, a new facet discovery). Requests run as tokio
//! tasks and report back through a channel; responses are applied one at a
//! time on the owner's task by [`GalleryController::poll_responses`] or
//! [`GalleryController::next_response`].
//!
//! ```text
//!  set_search_text / set_filter / set_page
//!                │
//!                ▼
//!        ┌──────────────┐  spawn (generation n)   ┌───────────────┐
//!        │  QueryState  │────────────────────────▶│ CatalogClient │
//!        └──────────────┘                         └───────┬───────┘
//!                                                         │ FetchMessage
//!        ┌──────────────┐   generation == latest?         │
//!        │  published   │◀────────────────────────────────┘
//!        │    state     │   otherwise discarded
//!        └──────────────┘
//! ```

use crate::gallery::events::{EventBus, ModelEvent};
use crate::gallery::models::{
    total_pages, ArtItem, FacetKind, FacetOption, PageControl, PaginationWindow, QueryState,
    SearchRequest, SearchResult,
};
use crate::gallery::services::{CatalogClient, CatalogError};
use crate::gallery::view_models::{FacetOptions, GallerySnapshot, SearchFailure};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// When facet option lists are re-fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacetRefresh {
    /// Once when the controller starts, then only on explicit refresh
    #[default]
    Startup,
    /// Alongside every search
    Always,
}

impl FromStr for FacetRefresh {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "startup" | "once" => Ok(FacetRefresh::Startup),
            "always" => Ok(FacetRefresh::Always),
            other => Err(format!(
                "invalid facet refresh policy '{other}' (expected startup or always)"
            )),
        }
    }
}

impl fmt::Display for FacetRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetRefresh::Startup => f.write_str("startup"),
            FacetRefresh::Always => f.write_str("always"),
        }
    }
}

/// Rejected user actions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    #[error("page {page} is out of range (1-{total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },

    #[error("{control:?} is not available from page {page}")]
    ControlDisabled { control: PageControl, page: u32 },

    #[error("no item #{index} on this page")]
    NoSuchItem { index: usize },

    #[error("results for the current search are still loading")]
    ResultsPending,
}

/// Response of a spawned fetch, tagged with the generation it was issued for
#[derive(Debug)]
enum FetchMessage {
    Search {
        generation: u64,
        result: Result<SearchResult, CatalogError>,
    },
    Facet {
        generation: u64,
        kind: FacetKind,
        result: Result<Vec<FacetOption>, CatalogError>,
    },
}

/// Capacity of the response channel
const RESPONSE_CHANNEL_CAPACITY: usize = 32;

pub struct GalleryController {
    client: Arc<dyn CatalogClient>,
    facet_refresh: FacetRefresh,

    query: QueryState,

    // Published state
    items: Arc<[ArtItem]>,
    total_records: u64,
    filter_options: FacetOptions,
    selected_item: Option<ArtItem>,
    error: Option<SearchFailure>,
    // Published results belong to an older search text or filter set
    results_outdated: bool,

    // Request bookkeeping
    search_generation: u64,
    search_in_flight: Option<(u64, JoinHandle<()>)>,
    facet_generation: u64,
    facets_in_flight: HashMap<FacetKind, JoinHandle<()>>,
    response_sender: mpsc::Sender<FetchMessage>,
    response_receiver: mpsc::Receiver<FetchMessage>,

    event_bus: Option<Box<dyn EventBus>>,
}

impl GalleryController {
    /// Create a controller with an empty query. Nothing is fetched until [`start`](Self::start).
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        let (response_sender, response_receiver) = mpsc::channel(RESPONSE_CHANNEL_CAPACITY);

        Self {
            client,
            facet_refresh: FacetRefresh::default(),
            query: QueryState::new(),
            items: Arc::from(Vec::new()),
            total_records: 0,
            filter_options: FacetOptions::default(),
            selected_item: None,
            error: None,
            results_outdated: true,
            search_generation: 0,
            search_in_flight: None,
            facet_generation: 0,
            facets_in_flight: HashMap::new(),
            response_sender,
            response_receiver,
            event_bus: None,
        }
    }

    pub fn with_facet_refresh(mut self, facet_refresh: FacetRefresh) -> Self {
        self.facet_refresh = facet_refresh;
        self
    }

    /// Replace the initial query (before starting)
    pub fn with_query(mut self, query: QueryState) -> Self {
        self.query = query;
        self
    }

    pub fn set_event_bus(&mut self, event_bus: Box<dyn EventBus>) {
        self.event_bus = Some(event_bus);
    }

    /// Issue the initial facet discovery and search. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        tracing::debug!(
            "Starting gallery controller ({}, facet refresh: {})",
            self.query,
            self.facet_refresh
        );
        self.refresh_facets();
        self.issue_search();
    }

    // === Query State mutations ===

    /// Replace the search text and go back to page 1
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        if self.query.set_search_text(text) {
            self.results_outdated = true;
            self.on_query_changed();
        }
    }

    /// Replace one facet filter (empty means All) and go back to page 1
    pub fn set_filter(&mut self, kind: FacetKind, value: impl Into<String>) {
        if self.query.set_filter(kind, value) {
            self.results_outdated = true;
            self.on_query_changed();
        }
    }

    /// Move to a page within `1..=total_pages`.
    ///
    /// Refused while the page count still describes an older search text or
    /// filter set, since the pending search may have fewer pages.
    pub fn set_page(&mut self, page: u32) -> Result<(), GalleryError> {
        let total_pages = self.total_pages();
        if page < 1 || page > total_pages {
            tracing::debug!("Rejected page {} of {}", page, total_pages);
            return Err(GalleryError::PageOutOfRange { page, total_pages });
        }
        if page == self.page() {
            return Ok(());
        }
        if self.results_outdated && self.is_search_loading() {
            tracing::debug!("Rejected page {} while a new search is loading", page);
            return Err(GalleryError::ResultsPending);
        }
        if self.query.set_page(page) {
            self.on_query_changed();
        }
        Ok(())
    }

    /// Activate a pagination control
    pub fn navigate(&mut self, control: PageControl) -> Result<(), GalleryError> {
        let window = self.pagination();
        let target = window
            .target(control)
            .ok_or(GalleryError::ControlDisabled {
                control,
                page: window.page(),
            })?;
        self.set_page(target)
    }

    // === Selection ===

    /// Show the detail view for an item, or dismiss it with `None`
    pub fn select_item(&mut self, item: Option<ArtItem>) {
        let item_id = item.as_ref().map(|item| item.id);
        self.selected_item = item;
        tracing::debug!("Selected item: {:?}", item_id);
        self.emit(ModelEvent::SelectionChanged { item_id });
    }

    /// Select an item of the current page by zero-based position.
    /// Refused while a search is loading, as the listed items are hidden then.
    pub fn select_index(&mut self, index: usize) -> Result<(), GalleryError> {
        if self.is_search_loading() {
            return Err(GalleryError::ResultsPending);
        }
        let item = self
            .items
            .get(index)
            .cloned()
            .ok_or(GalleryError::NoSuchItem { index: index + 1 })?;
        self.select_item(Some(item));
        Ok(())
    }

    // === Fetch orchestration ===

    /// Re-fetch all three facet option lists
    pub fn refresh_facets(&mut self) {
        self.facet_generation += 1;
        let generation = self.facet_generation;

        for (kind, stale) in self.facets_in_flight.drain() {
            tracing::debug!("Aborting outdated {} discovery", kind);
            stale.abort();
        }

        for kind in FacetKind::ALL {
            let client = Arc::clone(&self.client);
            let sender = self.response_sender.clone();
            let handle = tokio::spawn(async move {
                let result = client.facet_options(kind).await;
                // Receiver is gone only when the controller was dropped
                let _ = sender
                    .send(FetchMessage::Facet {
                        generation,
                        kind,
                        result,
                    })
                    .await;
            });
            self.facets_in_flight.insert(kind, handle);
        }
        tracing::debug!("Facet discovery #{} issued", generation);
    }

    fn on_query_changed(&mut self) {
        tracing::debug!("Query changed: {}", self.query);
        self.emit(ModelEvent::QueryChanged {
            query: self.query.clone(),
        });
        if self.facet_refresh == FacetRefresh::Always {
            self.refresh_facets();
        }
        self.issue_search();
    }

    fn issue_search(&mut self) {
        self.search_generation += 1;
        let generation = self.search_generation;

        if let Some((stale, handle)) = self.search_in_flight.take() {
            tracing::debug!("Aborting superseded search #{}", stale);
            handle.abort();
        }

        let request = SearchRequest::from(&self.query);
        tracing::debug!("Search #{} issued: {:?}", generation, request);

        let client = Arc::clone(&self.client);
        let sender = self.response_sender.clone();
        let handle = tokio::spawn(async move {
            let result = client.search(&request).await;
            let _ = sender
                .send(FetchMessage::Search { generation, result })
                .await;
        });
        self.search_in_flight = Some((generation, handle));

        self.emit(ModelEvent::SearchStarted {
            generation,
            page: self.query.page(),
        });
    }

    /// Apply every response that already arrived, without waiting.
    /// Returns the number of responses processed.
    pub fn poll_responses(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(message) = self.response_receiver.try_recv() {
            self.apply(message);
            processed += 1;
        }
        processed
    }

    /// Wait for the next response and apply it.
    /// Returns `false` immediately when nothing is outstanding. Cancel safe.
    pub async fn next_response(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        match self.response_receiver.recv().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    /// Apply responses until no request is outstanding
    pub async fn settle(&mut self) {
        while self.next_response().await {}
    }

    fn apply(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Search { generation, result } => {
                self.apply_search(generation, result)
            }
            FetchMessage::Facet {
                generation,
                kind,
                result,
            } => self.apply_facet(generation, kind, result),
        }
    }

    fn apply_search(&mut self, generation: u64, result: Result<SearchResult, CatalogError>) {
        let is_latest = matches!(self.search_in_flight, Some((latest, _)) if latest == generation);
        if !is_latest {
            tracing::debug!(
                "Discarding stale search #{} (latest is #{})",
                generation,
                self.search_generation
            );
            self.emit(ModelEvent::StaleSearchDiscarded { generation });
            return;
        }
        self.search_in_flight = None;
        self.results_outdated = false;

        match result {
            Ok(result) => {
                self.items = result.items.into();
                self.total_records = result.total_records;
                self.error = None;
                if self.repair_page() {
                    return;
                }
                tracing::debug!(
                    "Search #{} published {} items, {} records",
                    generation,
                    self.items.len(),
                    self.total_records
                );
                self.emit(ModelEvent::ResultsPublished {
                    generation,
                    item_count: self.items.len(),
                    total_pages: self.total_pages(),
                });
            }
            Err(e) => {
                tracing::error!("Search #{} failed: {}", generation, e);
                let failure = SearchFailure {
                    kind: e.kind(),
                    message: e.to_string(),
                };
                // total_records is kept so total_pages stays at its last known value
                self.items = Arc::from(Vec::new());
                self.error = Some(failure.clone());
                self.emit(ModelEvent::SearchFailed {
                    generation,
                    kind: failure.kind,
                    message: failure.message,
                });
            }
        }
    }

    fn apply_facet(
        &mut self,
        generation: u64,
        kind: FacetKind,
        result: Result<Vec<FacetOption>, CatalogError>,
    ) {
        if generation != self.facet_generation || self.facets_in_flight.remove(&kind).is_none() {
            tracing::debug!("Discarding stale {} discovery #{}", kind, generation);
            self.emit(ModelEvent::StaleFacetDiscarded { kind, generation });
            return;
        }

        let options = match result {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!("Failed to load {} options: {}", kind, e);
                Vec::new()
            }
        };
        let count = options.len();
        self.filter_options.replace(kind, options);
        self.emit(ModelEvent::FacetOptionsPublished { kind, count });
    }

    /// Move back to the last page when a result turns out shorter than the
    /// current page, and fetch that page instead. Returns whether it did.
    fn repair_page(&mut self) -> bool {
        let total_pages = self.total_pages();
        if self.page() <= total_pages {
            return false;
        }
        tracing::debug!(
            "Page {} is past the end of {} pages, moving to the last page",
            self.page(),
            total_pages
        );
        self.query.set_page(total_pages);
        self.emit(ModelEvent::QueryChanged {
            query: self.query.clone(),
        });
        self.issue_search();
        true
    }

    // === Events ===

    fn emit(&mut self, event: ModelEvent) {
        tracing::trace!("Model event: {:?}", event);
        if let Some(bus) = self.event_bus.as_mut() {
            bus.publish_model_event(event);
        }
    }

    // === Read access ===

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.query.page()
    }

    pub fn items(&self) -> &[ArtItem] {
        &self.items
    }

    /// Derived from the last successful search
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_records)
    }

    pub fn pagination(&self) -> PaginationWindow {
        PaginationWindow::new(self.page(), self.total_pages())
    }

    pub fn filter_options(&self) -> &FacetOptions {
        &self.filter_options
    }

    pub fn selected_item(&self) -> Option<&ArtItem> {
        self.selected_item.as_ref()
    }

    pub fn error(&self) -> Option<&SearchFailure> {
        self.error.as_ref()
    }

    pub fn facet_refresh(&self) -> FacetRefresh {
        self.facet_refresh
    }

    /// Any request of the latest-issued set is outstanding
    pub fn is_loading(&self) -> bool {
        self.is_search_loading() || !self.facets_in_flight.is_empty()
    }

    pub fn is_search_loading(&self) -> bool {
        self.search_in_flight.is_some()
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            query: self.query.clone(),
            items: Arc::clone(&self.items),
            total_pages: self.total_pages(),
            loading: self.is_loading(),
            search_loading: self.is_search_loading(),
            filter_options: self.filter_options.clone(),
            selected_item: self.selected_item.clone(),
            error: self.error.clone(),
        }
    }
}

impl Drop for GalleryController {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.search_in_flight.take() {
            handle.abort();
        }
        for (_, handle) in self.facets_in_flight.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::testing::{art_item, recording_event_bus, take_events, MockCatalogClient};
    use pretty_assertions::assert_eq;

    fn started(client: MockCatalogClient) -> GalleryController {
        let mut controller = GalleryController::new(Arc::new(client));
        controller.start();
        controller
    }

    #[test]
    fn facet_refresh_should_parse_policies() {
        assert_eq!("startup".parse::<FacetRefresh>(), Ok(FacetRefresh::Startup));
        assert_eq!(" Always ".parse::<FacetRefresh>(), Ok(FacetRefresh::Always));
        assert!("sometimes".parse::<FacetRefresh>().is_err());
    }

    #[tokio::test]
    async fn empty_result_should_publish_one_page_and_no_items() {
        let client = MockCatalogClient::new().with_total_records(0);
        let requests = client.recorded_searches();
        let mut controller = started(client);

        controller.settle().await;

        assert!(controller.items().is_empty());
        assert_eq!(controller.total_pages(), 1);
        assert!(controller.error().is_none());
        assert!(controller.snapshot().is_empty_result());

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].query_pairs(),
            vec![("page", "1".to_string()), ("size", "12".to_string())]
        );
    }

    #[tokio::test]
    async fn results_should_replace_items_and_total_pages_together() {
        let client = MockCatalogClient::new()
            .with_items((1..=12).map(art_item).collect())
            .with_total_records(30);
        let mut controller = started(client);

        assert!(controller.is_search_loading());
        controller.settle().await;

        assert!(!controller.is_loading());
        assert_eq!(controller.items().len(), 12);
        assert_eq!(controller.total_pages(), 3);
    }

    #[tokio::test]
    async fn set_page_should_reject_out_of_range_pages() {
        let client = MockCatalogClient::new().with_total_records(30);
        let mut controller = started(client);
        controller.settle().await;

        assert_eq!(
            controller.set_page(0),
            Err(GalleryError::PageOutOfRange {
                page: 0,
                total_pages: 3
            })
        );
        assert_eq!(
            controller.set_page(4),
            Err(GalleryError::PageOutOfRange {
                page: 4,
                total_pages: 3
            })
        );
        assert_eq!(controller.page(), 1);
        assert!(!controller.is_search_loading());

        assert_eq!(controller.set_page(3), Ok(()));
        assert_eq!(controller.page(), 3);
        assert!(controller.is_search_loading());
    }

    #[tokio::test]
    async fn navigate_should_refuse_disabled_controls() {
        let client = MockCatalogClient::new().with_total_records(24);
        let mut controller = started(client);
        controller.settle().await;

        assert_eq!(
            controller.navigate(PageControl::Previous),
            Err(GalleryError::ControlDisabled {
                control: PageControl::Previous,
                page: 1
            })
        );

        controller.navigate(PageControl::Last).unwrap();
        controller.settle().await;
        assert_eq!(controller.page(), 2);
        assert!(controller.navigate(PageControl::Next).is_err());

        controller.navigate(PageControl::First).unwrap();
        assert_eq!(controller.page(), 1);
    }

    #[tokio::test]
    async fn filter_change_should_reset_page_and_search_again() {
        let client = MockCatalogClient::new().with_total_records(120);
        let requests = client.recorded_searches();
        let mut controller = started(client);
        controller.settle().await;

        controller.set_page(5).unwrap();
        controller.settle().await;
        controller.set_filter(FacetKind::Century, "18th century");
        controller.settle().await;

        assert_eq!(controller.page(), 1);
        let requests = requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(
            last.query_pairs(),
            vec![
                ("century", "18th century".to_string()),
                ("page", "1".to_string()),
                ("size", "12".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unchanged_search_text_should_not_refetch() {
        let client = MockCatalogClient::new();
        let requests = client.recorded_searches();
        let mut controller = started(client);
        controller.settle().await;

        controller.set_search_text("");
        controller.set_filter(FacetKind::Culture, "");

        assert!(!controller.is_loading());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_search_should_keep_last_total_pages_and_flag_error() {
        let client = MockCatalogClient::new()
            .with_items(vec![art_item(1)])
            .with_total_records(50);
        let failing = client.failing_searches();
        let mut controller = started(client);
        controller.settle().await;
        assert_eq!(controller.total_pages(), 5);

        failing.store(true, std::sync::atomic::Ordering::SeqCst);
        controller.set_search_text("broken");
        controller.settle().await;

        assert!(controller.items().is_empty());
        assert_eq!(controller.total_pages(), 5);
        let error = controller.error().expect("error should be published");
        assert_eq!(error.kind, crate::gallery::services::FailureKind::Network);
        assert!(!controller.snapshot().is_empty_result());

        // Still usable afterwards
        failing.store(false, std::sync::atomic::Ordering::SeqCst);
        controller.set_search_text("fixed");
        controller.settle().await;
        assert!(controller.error().is_none());
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn failed_facet_discovery_should_degrade_to_empty_list() {
        let client = MockCatalogClient::new()
            .with_facet(FacetKind::Classification, &["Paintings", "Prints"])
            .with_failing_facet(FacetKind::Century);
        let mut controller = started(client);
        controller.settle().await;

        let options = controller.filter_options();
        assert_eq!(options.classifications.len(), 2);
        assert!(options.centuries.is_empty());
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn facets_should_load_once_with_startup_policy() {
        let client = MockCatalogClient::new();
        let facet_calls = client.facet_calls();
        let mut controller = started(client);
        controller.settle().await;

        controller.set_search_text("vase");
        controller.settle().await;
        assert_eq!(facet_calls.load(std::sync::atomic::Ordering::SeqCst), 3);

        controller.refresh_facets();
        controller.settle().await;
        assert_eq!(facet_calls.load(std::sync::atomic::Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn facets_should_reload_on_every_change_with_always_policy() {
        let client = MockCatalogClient::new();
        let facet_calls = client.facet_calls();
        let mut controller =
            GalleryController::new(Arc::new(client)).with_facet_refresh(FacetRefresh::Always);
        controller.start();
        controller.settle().await;

        controller.set_search_text("vase");
        controller.settle().await;
        assert_eq!(facet_calls.load(std::sync::atomic::Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn selection_should_be_independent_of_query_state() {
        let client = MockCatalogClient::new()
            .with_items(vec![art_item(7), art_item(8)])
            .with_total_records(2);
        let mut controller = started(client);
        controller.settle().await;

        controller.select_index(1).unwrap();
        assert_eq!(controller.selected_item().map(|item| item.id), Some(8));

        controller.set_search_text("other");
        assert_eq!(controller.selected_item().map(|item| item.id), Some(8));
        controller.settle().await;

        controller.select_item(None);
        assert!(controller.selected_item().is_none());
        assert_eq!(
            controller.select_index(5),
            Err(GalleryError::NoSuchItem { index: 6 })
        );
    }

    #[tokio::test]
    async fn select_index_should_wait_for_loading_results() {
        let client = MockCatalogClient::new()
            .with_items(vec![art_item(1)])
            .with_total_records(1);
        let mut controller = started(client);
        controller.settle().await;

        controller.set_search_text("jar");
        assert_eq!(controller.select_index(0), Err(GalleryError::ResultsPending));
        assert!(controller.selected_item().is_none());

        controller.settle().await;
        assert_eq!(controller.select_index(0), Ok(()));
    }

    #[tokio::test]
    async fn set_page_should_wait_while_new_filter_results_load() {
        let client = MockCatalogClient::new().with_total_records(120);
        let requests = client.recorded_searches();
        let mut controller = started(client);
        controller.settle().await;
        assert_eq!(controller.total_pages(), 10);

        controller.set_filter(FacetKind::Culture, "Dutch");
        assert_eq!(controller.set_page(8), Err(GalleryError::ResultsPending));
        assert_eq!(controller.navigate(PageControl::Last), Err(GalleryError::ResultsPending));
        assert_eq!(controller.page(), 1);

        controller.settle().await;
        assert_eq!(controller.set_page(8), Ok(()));
        let pages: Vec<u32> = requests.lock().unwrap().iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![1, 1, 8]);
    }

    #[tokio::test]
    async fn set_page_should_be_allowed_while_only_the_page_is_loading() {
        let client = MockCatalogClient::new().with_total_records(60);
        let mut controller = started(client);
        controller.settle().await;

        controller.set_page(2).unwrap();
        assert!(controller.is_search_loading());
        assert_eq!(controller.set_page(3), Ok(()));
        controller.settle().await;
        assert_eq!(controller.page(), 3);
    }

    #[tokio::test]
    async fn late_facet_listing_should_not_replace_newer_list() {
        let (client, mut listings) = MockCatalogClient::new().gated_facets();
        let mut controller = GalleryController::new(Arc::new(client));
        let (bus, events) = recording_event_bus();
        controller.set_event_bus(bus);
        controller.start();

        let mut first = Vec::new();
        for _ in FacetKind::ALL {
            first.push(listings.recv().await.unwrap());
        }
        // One old listing is queued before the refresh, the others answer after it
        let culture = first.iter().position(|p| p.kind == FacetKind::Culture).unwrap();
        first.remove(culture).respond(&["Old culture"]);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        controller.refresh_facets();
        for pending in first {
            pending.respond(&["Old"]);
        }
        for _ in FacetKind::ALL {
            let pending = listings.recv().await.unwrap();
            match pending.kind {
                FacetKind::Culture => pending.respond(&["French", "Dutch"]),
                _ => pending.respond(&["New"]),
            }
        }
        controller.settle().await;

        let options = controller.filter_options();
        let cultures: Vec<&str> = options.cultures.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(cultures, vec!["French", "Dutch"]);
        assert_eq!(options.classifications[0].name, "New");
        assert_eq!(options.centuries[0].name, "New");

        let events = take_events(&events);
        assert!(events.contains(&ModelEvent::StaleFacetDiscarded {
            kind: FacetKind::Culture,
            generation: 1
        }));
        assert!(!events.iter().any(|event| matches!(
            event,
            ModelEvent::StaleSearchDiscarded { .. }
        )));
    }

    #[tokio::test]
    async fn events_should_be_published_in_order() {
        let client = MockCatalogClient::new().with_total_records(13);
        let mut controller = GalleryController::new(Arc::new(client));
        let (bus, events) = recording_event_bus();
        controller.set_event_bus(bus);
        controller.start();
        controller.settle().await;
        take_events(&events);

        controller.set_page(2).unwrap();
        controller.settle().await;

        assert_eq!(
            take_events(&events),
            vec![
                ModelEvent::QueryChanged {
                    query: controller.query().clone()
                },
                ModelEvent::SearchStarted {
                    generation: 2,
                    page: 2
                },
                ModelEvent::ResultsPublished {
                    generation: 2,
                    item_count: 0,
                    total_pages: 2
                },
            ]
        );
        assert!(take_events(&events).is_empty());
    }
}
