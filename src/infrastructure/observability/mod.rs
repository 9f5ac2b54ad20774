//! Observability infrastructure - pipeline metrics
//!
//! Metrics go through the `metrics` facade; installing an exporter is left
//! to the embedding application.

mod metrics;

pub use metrics::{
    record_judgment, record_pipeline_run, record_source_search, JudgmentStatus, SourceStatus,
};
