//! # infracat-catalog
//!
//! Catalog client contract for infracat.
//!
//! This crate defines the [`Catalog`] trait every catalog backend implements,
//! the entry and property types that cross it, and [`CatalogError`]. It does
//! not talk to any catalog itself; backends live in separate crates.
//!
//! ## Example
//!
//! ```ignore
//! use infracat_catalog::{Catalog, CatalogError, CatalogEntry};
//!
//! async fn first_page(
//!     catalog: &dyn Catalog,
//!     parent: &ElementId,
//! ) -> Result<Vec<CatalogEntry>, CatalogError> {
//!     catalog.list_for_parent(parent, 0, 50).await
//! }
//! ```

mod error;
pub mod evented;
mod traits;
mod types;

pub use error::{CatalogError, ErrorCategory};
pub use evented::EventedCatalog;
pub use traits::Catalog;
pub use types::{
    AssetUseType, CapabilityProperties, CatalogEntry, ChildProperties, ParentProperties,
    ParentRecord, TemplateProperties,
};

/// Type alias for a catalog result.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Type alias for a shareable catalog trait object.
pub type DynCatalog = std::sync::Arc<dyn Catalog>;
