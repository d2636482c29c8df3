//! Portfolio aggregation.
//!
//! Runs one query at a time: validate, discover, enrich each holding through
//! the shared request queue, and publish a fresh snapshot after every merge.

mod aggregator_model;
mod aggregator_service;

pub use aggregator_model::*;
pub use aggregator_service::*;
