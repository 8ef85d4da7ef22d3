//! Ingestion: normalization, aggregation and dedup persistence
//!
//! [`Pipeline::run_ingestion`] is the entry point invoked on each run.

mod gateway;
mod normalize;
mod pipeline;

pub use gateway::persist_new;
pub use normalize::{normalize, normalize_all, ValidationError};
pub use pipeline::Pipeline;
