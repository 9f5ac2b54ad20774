//! Source adapter domain
//!
//! Each data source sits behind [`SourceAdapter`], which translates a search
//! request into native parameters and executes the search.

mod adapter;
mod params;

pub use adapter::{ExecutionLane, SourceAdapter};
pub use params::{CatalogQuery, CatalogSearchParams, SourceParams, VectorSearchParams};

#[cfg(test)]
pub use adapter::mock::MockSourceAdapter;
