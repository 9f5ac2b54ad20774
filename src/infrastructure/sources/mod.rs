//! Source adapter implementations
//!
//! The holdings and electronic-resource adapters share one HTTP catalog
//! service; the vector adapter talks to the embedding index service.

mod catalog;
pub mod catalog_backend;
mod electronic;
mod holdings;
mod registry;
mod vector;
pub mod vector_client;

pub use catalog::{rank_score, search_branches};
pub use catalog_backend::{
    CatalogBackend, CatalogBackendRequest, CatalogCollection, CatalogRecord, HttpCatalogBackend,
};
pub use electronic::ElectronicResourcesAdapter;
pub use holdings::LibraryHoldingsAdapter;
pub use registry::SourceRegistry;
pub use vector::{distance_score, VectorIndexAdapter};
pub use vector_client::{HttpVectorIndexClient, VectorHit, VectorIndexClient};
