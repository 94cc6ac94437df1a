//! # Gallery
//!
//! Browsing state for a remote art-collection catalog, organised the same
//! way as the rest of the application: models hold data, services reach the
//! catalog, controllers own state transitions, views render snapshots.

pub mod commands;
pub mod controllers;
pub mod events;
pub mod io;
pub mod models;
pub mod services;
pub mod testing;
pub mod view_models;
pub mod views;

// Re-export core types
pub use commands::{CommandError, GalleryCommand};
pub use controllers::{AppController, FacetRefresh, GalleryController, GalleryError};
pub use events::{EventBus, ModelEvent, SimpleEventBus};
pub use models::{
    ArtItem, FacetKind, FacetOption, Filters, PageControl, PaginationWindow, QueryState,
    SearchRequest, SearchResult,
};
pub use services::{CatalogClient, CatalogError, FailureKind, HttpCatalogClient};
pub use view_models::{FacetOptions, GallerySnapshot, SearchFailure};
pub use views::{TerminalRenderer, ViewRenderer};
