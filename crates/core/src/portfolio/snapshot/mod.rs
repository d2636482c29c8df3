//! Portfolio snapshots.
//!
//! A query owns one private [`SnapshotBuilder`] and publishes immutable
//! [`PortfolioSnapshot`] copies of it after every merge.

mod snapshot_builder;
mod snapshot_model;

pub(crate) use snapshot_builder::SnapshotBuilder;
pub use snapshot_model::PortfolioSnapshot;

#[cfg(test)]
mod snapshot_model_tests;
