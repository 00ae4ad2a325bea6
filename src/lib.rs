//! # u-tendency
//!
//! Clustering tendency estimation for the U-Engine ecosystem.
//!
//! This crate computes the Hopkins statistic: it asks whether a point set
//! is distributed more tightly (or more evenly) than uniform random data
//! filling the same region, and how significant that deviation is. It
//! knows nothing about spatial indexing; nearest-neighbor queries go
//! through a caller-supplied [`neighbors::KnnOracle`].
//!
//! ## Modules
//!
//! - [`hopkins`] — Configuration and orchestration of a Hopkins run
//! - [`dataset`] — Validated point sets
//! - [`extent`] — Sampling bounding box from data or explicit bounds
//! - [`neighbors`] — The k-nearest-neighbor distance oracle
//! - [`sampler`] — Real-data and uniform-synthetic distance sums
//! - [`trial`] — Repetitions, per-repetition seeding, aggregation
//! - [`significance`] — Beta(S, S) p-value of the mean statistic
//! - [`report`] — Run reports and the statistics channel
//! - [`result_tree`] — Result hierarchy with change notification
//! - [`special`] — Gamma and incomplete beta functions
//! - [`stats`] — Running moments and compensated summation
//! - [`random`] — Seeded generators and index sampling
//! - [`error`] — Error type
//!
//! ## Design Philosophy
//!
//! - **Reproducible**: a fixed seed gives bit-identical reports run to run
//! - **Numerical stability first**: Welford/Chan moments, Neumaier sums,
//!   continued-fraction incomplete beta
//! - **Property-based testing**: Mathematical invariants verified via proptest
//!
//! ## Features
//!
//! - `parallel` — run repetitions on the rayon pool
//! - `serde` — serialize configurations and reports

pub mod dataset;
pub mod error;
pub mod extent;
pub mod hopkins;
pub mod neighbors;
pub mod random;
pub mod report;
pub mod result_tree;
pub mod sampler;
pub mod significance;
pub mod special;
pub mod stats;
pub mod trial;

#[cfg(test)]
mod testing;

pub use dataset::Dataset;
pub use error::TendencyError;
pub use hopkins::{hopkins, HopkinsConfig, HopkinsStatistic};
pub use neighbors::{KnnOracle, MaybeSync, OracleError};
pub use report::{StatisticReport, StatisticsSink, TracingSink};
