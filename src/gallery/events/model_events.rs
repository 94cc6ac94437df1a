//! # Model Events
//!
//! Events emitted when gallery state changes.
//! The presentation layer observes these to know what to redraw.

use crate::gallery::models::{FacetKind, QueryState};
use crate::gallery::services::FailureKind;

/// Events emitted when the gallery state changes
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// Search text, a filter or the page changed
    QueryChanged { query: QueryState },

    /// A search fetch was issued
    SearchStarted { generation: u64, page: u32 },

    /// A search result replaced the published items
    ResultsPublished {
        generation: u64,
        item_count: usize,
        total_pages: u32,
    },

    /// The latest search fetch failed
    SearchFailed {
        generation: u64,
        kind: FailureKind,
        message: String,
    },

    /// A facet option list was replaced
    FacetOptionsPublished { kind: FacetKind, count: usize },

    /// A search response arrived after a newer search was issued
    StaleSearchDiscarded { generation: u64 },

    /// A facet listing arrived after a newer facet discovery was issued
    StaleFacetDiscarded { kind: FacetKind, generation: u64 },

    /// The detail view target changed
    SelectionChanged { item_id: Option<u64> },
}

impl ModelEvent {
    /// Whether the rendered gallery changes. Facet lists are only shown on request.
    pub fn requires_redraw(&self) -> bool {
        matches!(
            self,
            ModelEvent::QueryChanged { .. }
                | ModelEvent::SearchStarted { .. }
                | ModelEvent::ResultsPublished { .. }
                | ModelEvent::SearchFailed { .. }
                | ModelEvent::SelectionChanged { .. }
        )
    }
}
