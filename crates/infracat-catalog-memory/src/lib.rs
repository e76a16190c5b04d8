//! In-memory catalog backend for infracat.
//!
//! This crate provides an implementation of the `Catalog` trait from
//! `infracat-catalog` backed by papaya lock-free maps. It serves tests and
//! the demo binary; production deployments talk to a real catalog.
//!
//! # Example
//!
//! ```ignore
//! use infracat_catalog::{Catalog, ParentProperties};
//! use infracat_catalog_memory::InMemoryCatalog;
//!
//! let catalog = InMemoryCatalog::new();
//! let broker = catalog.create_parent(&broker_properties).await?;
//! let page = catalog.list_for_parent(&broker, 0, 50).await?;
//! ```

mod catalog;
pub mod seed;

pub use catalog::{InMemoryCatalog, StoredCapability, StoredLink};
pub use seed::{CatalogSeed, SeedEntry, SeedParent};

// Re-export the Catalog trait for convenience
pub use infracat_catalog::{Catalog, CatalogError};

/// Creates a new shareable in-memory catalog.
pub fn create_catalog() -> infracat_catalog::DynCatalog {
    std::sync::Arc::new(InMemoryCatalog::new())
}
