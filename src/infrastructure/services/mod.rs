//! Pipeline services
//!
//! [`SearchExecutor`] runs [`Retriever`], [`Ranker`] and [`Refiner`] in
//! sequence for each request.

mod ranker;
mod refiner;
mod retriever;
mod search_executor;

pub use ranker::{Ranker, RankingOutcome};
pub use refiner::{RefinementOutcome, Refiner};
pub use retriever::{RetrievalOutcome, Retriever, RetrieverConfig};
pub use search_executor::SearchExecutor;
