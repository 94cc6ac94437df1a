//! # Models
//!
//! Plain data owned by the gallery: the user's query, catalog records and
//! the derived pagination window. Nothing in here performs I/O.

pub mod catalog;
pub mod pagination;
pub mod query_state;
pub mod search_request;

pub use catalog::{
    total_pages, ArtItem, FacetListing, FacetOption, ListingInfo, ObjectListing, Person,
    SearchResult, PAGE_SIZE,
};
pub use pagination::{PageButton, PageControl, PaginationWindow, WINDOW_SIZE};
pub use query_state::{FacetKind, Filters, QueryState, UnknownFacet};
pub use search_request::SearchRequest;
