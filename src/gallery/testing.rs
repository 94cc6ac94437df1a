//! Testing infrastructure for gallery components
//!
//! Provides a scripted catalog client and an output capture so the
//! controller and renderer can be exercised without a network or terminal.

use crate::gallery::events::{EventBus, ModelEvent, SimpleEventBus};
use crate::gallery::models::{ArtItem, FacetKind, FacetOption, Person, SearchRequest, SearchResult};
use crate::gallery::services::{CatalogClient, CatalogError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// Mock writer that captures output instead of writing to terminal
#[derive(Default)]
pub struct MockWriter {
    pub output: Vec<u8>,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_output(&self) -> String {
        String::from_utf8_lossy(&self.output).to_string()
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}

/// Build a minimal art item for tests
pub fn art_item(id: u64) -> ArtItem {
    ArtItem {
        id,
        title: Some(format!("Item {id}")),
        dated: Some("c. 1900".to_string()),
        primary_image_url: None,
        description: None,
        people: Some(vec![Person {
            name: format!("Artist {id}"),
            role: Some("Artist".to_string()),
        }]),
        detail_url: Some(format!(
            "https://www.harvardartmuseums.org/collections/object/{id}"
        )),
    }
}

/// Event bus recording every published event, plus a handle to the record
pub fn recording_event_bus() -> (Box<dyn EventBus>, Arc<Mutex<Vec<ModelEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let mut bus = SimpleEventBus::new();
    bus.subscribe_to_model_events(Box::new(move |event| {
        if let Ok(mut events) = sink.lock() {
            events.push(event.clone());
        }
    }));
    (Box::new(bus), events)
}

/// Take the events recorded so far
pub fn take_events(events: &Mutex<Vec<ModelEvent>>) -> Vec<ModelEvent> {
    events
        .lock()
        .map(|mut events| std::mem::take(&mut *events))
        .unwrap_or_default()
}

/// A search held back until the test answers it
pub struct PendingSearch {
    pub request: SearchRequest,
    responder: oneshot::Sender<Result<SearchResult, CatalogError>>,
}

impl PendingSearch {
    /// Resolve the search successfully. Ignored if the request was cancelled.
    pub fn respond(self, result: SearchResult) {
        let _ = self.responder.send(Ok(result));
    }

    /// Resolve the search with a failure
    pub fn fail(self, status: u16) {
        let _ = self.responder.send(Err(mock_failure(status)));
    }
}

/// A facet listing held back until the test answers it
pub struct PendingFacet {
    pub kind: FacetKind,
    responder: oneshot::Sender<Result<Vec<FacetOption>, CatalogError>>,
}

impl PendingFacet {
    /// Resolve the listing with the given names. Ignored if the request was cancelled.
    pub fn respond(self, names: &[&str]) {
        let _ = self.responder.send(Ok(named_options(names)));
    }
}

fn named_options(names: &[&str]) -> Vec<FacetOption> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| FacetOption {
            id,
            name: name.to_string(),
        })
        .collect()
}

fn mock_failure(status: u16) -> CatalogError {
    CatalogError::Status {
        endpoint: "/object".to_string(),
        status,
    }
}

/// Scripted catalog client
///
/// Answers immediately with the configured records unless gated, in which
/// case every search is handed to the test as a [`PendingSearch`].
#[derive(Default)]
pub struct MockCatalogClient {
    items: Vec<ArtItem>,
    total_records: u64,
    facets: HashMap<FacetKind, Vec<FacetOption>>,
    failing_facets: HashSet<FacetKind>,
    fail_searches: Arc<AtomicBool>,
    searches: Arc<Mutex<Vec<SearchRequest>>>,
    facet_calls: Arc<AtomicUsize>,
    gate: Option<mpsc::UnboundedSender<PendingSearch>>,
    facet_gate: Option<mpsc::UnboundedSender<PendingFacet>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, items: Vec<ArtItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_total_records(mut self, total_records: u64) -> Self {
        self.total_records = total_records;
        self
    }

    pub fn with_facet(mut self, kind: FacetKind, names: &[&str]) -> Self {
        self.facets.insert(kind, named_options(names));
        self
    }

    pub fn with_failing_facet(mut self, kind: FacetKind) -> Self {
        self.failing_facets.insert(kind);
        self
    }

    /// Hand every search to the returned receiver instead of answering it
    pub fn gated(mut self) -> (Self, mpsc::UnboundedReceiver<PendingSearch>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.gate = Some(sender);
        (self, receiver)
    }

    /// Hand every facet listing to the returned receiver instead of answering it
    pub fn gated_facets(mut self) -> (Self, mpsc::UnboundedReceiver<PendingFacet>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.facet_gate = Some(sender);
        (self, receiver)
    }

    /// Requests received so far, in arrival order
    pub fn recorded_searches(&self) -> Arc<Mutex<Vec<SearchRequest>>> {
        Arc::clone(&self.searches)
    }

    /// Switch that makes ungated searches fail with HTTP 503
    pub fn failing_searches(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_searches)
    }

    /// Number of facet listing requests received
    pub fn facet_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.facet_calls)
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn facet_options(&self, kind: FacetKind) -> Result<Vec<FacetOption>, CatalogError> {
        self.facet_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.facet_gate {
            let (responder, answer) = oneshot::channel();
            if gate.send(PendingFacet { kind, responder }).is_err() {
                return Err(mock_failure(503));
            }
            return answer.await.unwrap_or_else(|_| Err(mock_failure(499)));
        }
        if self.failing_facets.contains(&kind) {
            let source = serde_json::from_str::<serde_json::Value>("<html>")
                .expect_err("mock body is not JSON");
            return Err(CatalogError::Decode {
                endpoint: format!("/{kind}"),
                source,
            });
        }
        Ok(self.facets.get(&kind).cloned().unwrap_or_default())
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, CatalogError> {
        self.searches
            .lock()
            .map_err(|_| mock_failure(500))?
            .push(request.clone());

        if let Some(gate) = &self.gate {
            let (responder, answer) = oneshot::channel();
            let pending = PendingSearch {
                request: request.clone(),
                responder,
            };
            if gate.send(pending).is_err() {
                return Err(mock_failure(503));
            }
            return answer.await.unwrap_or_else(|_| Err(mock_failure(499)));
        }

        if self.fail_searches.load(Ordering::SeqCst) {
            return Err(mock_failure(503));
        }
        Ok(SearchResult {
            items: self.items.clone(),
            total_records: self.total_records,
        })
    }
}
