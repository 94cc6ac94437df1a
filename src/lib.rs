//! # artline - Terminal Browser for Art-Collection Catalogs
//!
//! Search a remote catalog by free text, narrow the results by
//! classification, century and culture, page through them and inspect
//! single objects, all from a command prompt.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   snapshot   ┌───────────────────┐   requests   ┌───────────────┐
//! │    View     │◄─────────────│ GalleryController │─────────────▶│ CatalogClient │
//! │             │              │                   │◄─────────────│               │
//! │ - Renderer  │              │ - Query state     │  responses   │ - HTTP / JSON │
//! │ - Prompt    │              │ - Staleness check │  (tagged)    │               │
//! └─────────────┘              └───────────────────┘              └───────────────┘
//!                                        ▲
//!                                        │ commands
//!                                        ▼
//!                               ┌──────────────┐
//!                               │AppController │
//!                               │              │
//!                               │ - Input      │
//!                               │ - Event Loop │
//!                               └──────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod gallery;

// Re-export main types for easy access
pub use gallery::*;
