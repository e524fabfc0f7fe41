//! SchemeSage Store — scheme catalog, loaders, flat L2 embedding index.

pub mod catalog;
pub mod index;
pub mod types;

pub use catalog::{load, Corpus};
pub use index::EmbeddingIndex;
pub use types::{CatalogRecord, CATALOG_COLUMNS};
