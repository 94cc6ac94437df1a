//! # View Models
//!
//! Observable state handed to the presentation layer.

pub mod snapshot;

pub use snapshot::{FacetOptions, GallerySnapshot, SearchFailure};
