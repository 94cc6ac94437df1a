//! # Controllers
//!
//! The gallery controller owns query state and fetch orchestration; the
//! application controller drives it from the command prompt.

pub mod app_controller;
pub mod gallery_controller;

pub use app_controller::AppController;
pub use gallery_controller::{FacetRefresh, GalleryController, GalleryError};
