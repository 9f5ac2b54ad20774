//! Infrastructure layer - source backends, model clients and pipeline services

pub mod crag;
pub mod http_client;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod ranking;
pub mod services;
pub mod sources;
