//! # Services Layer
//!
//! Services encapsulate access to external resources. The gallery has one:
//! the remote catalog, reached through the [`CatalogClient`] seam so the
//! controller can be driven by a scripted client in tests.

pub mod catalog;

pub use catalog::{CatalogClient, CatalogError, FailureKind, HttpCatalogClient};
