//! # Gallery Snapshot
//!
//! Read-only view of everything the presentation layer renders.
//! Item and option lists are shared, so taking a snapshot is cheap.

use crate::gallery::models::{ArtItem, FacetKind, FacetOption, PaginationWindow, QueryState};
use crate::gallery::services::FailureKind;
use std::sync::Arc;

/// Published option lists, one per facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOptions {
    pub classifications: Arc<[FacetOption]>,
    pub centuries: Arc<[FacetOption]>,
    pub cultures: Arc<[FacetOption]>,
}

impl Default for FacetOptions {
    fn default() -> Self {
        Self {
            classifications: Arc::from(Vec::new()),
            centuries: Arc::from(Vec::new()),
            cultures: Arc::from(Vec::new()),
        }
    }
}

impl FacetOptions {
    pub fn get(&self, kind: FacetKind) -> &Arc<[FacetOption]> {
        match kind {
            FacetKind::Classification => &self.classifications,
            FacetKind::Century => &self.centuries,
            FacetKind::Culture => &self.cultures,
        }
    }

    /// Replace one list wholesale
    pub fn replace(&mut self, kind: FacetKind, options: Vec<FacetOption>) {
        let slot = match kind {
            FacetKind::Classification => &mut self.classifications,
            FacetKind::Century => &mut self.centuries,
            FacetKind::Culture => &mut self.cultures,
        };
        *slot = options.into();
    }
}

/// Why the latest search produced no items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Everything the presentation layer may read
#[derive(Debug, Clone)]
pub struct GallerySnapshot {
    pub query: QueryState,
    pub items: Arc<[ArtItem]>,
    pub total_pages: u32,
    pub loading: bool,
    pub search_loading: bool,
    pub filter_options: FacetOptions,
    pub selected_item: Option<ArtItem>,
    pub error: Option<SearchFailure>,
}

impl GallerySnapshot {
    pub fn page(&self) -> u32 {
        self.query.page()
    }

    pub fn pagination(&self) -> PaginationWindow {
        PaginationWindow::new(self.page(), self.total_pages)
    }

    /// Completed search with zero matches. Distinct from a failed search.
    pub fn is_empty_result(&self) -> bool {
        !self.search_loading && self.error.is_none() && self.items.is_empty()
    }
}
