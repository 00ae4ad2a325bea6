//! Error types for u-tendency.

use thiserror::Error;

use crate::neighbors::OracleError;

/// Which side of a caller-supplied sampling range is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Per-dimension minima.
    Minima,
    /// Per-dimension maxima.
    Maxima,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Minima => f.write_str("minima"),
            Bound::Maxima => f.write_str("maxima"),
        }
    }
}

/// All errors produced by u-tendency operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TendencyError {
    /// Override length is neither the dataset dimensionality nor 1.
    #[error("invalid {bound} specified: expected {expected} (or 1) values, got {actual}")]
    InvalidDimensionality {
        bound: Bound,
        expected: usize,
        actual: usize,
    },

    /// Only one of minima/maxima was supplied.
    #[error("{missing} must be supplied together with the other bound")]
    IncompleteOverride { missing: Bound },

    /// Requested more real samples than the dataset holds.
    #[error("sample size {sample_size} exceeds dataset size {available}")]
    SampleSizeExceedsData { sample_size: usize, available: usize },

    /// A nearest-neighbor query failed; the run is aborted.
    #[error("nearest-neighbor query failed: {0}")]
    OracleFailure(#[from] OracleError),

    /// A numeric run parameter violates its constraint.
    #[error("parameter {name} = {value} violates constraint {constraint}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        constraint: &'static str,
    },

    /// Not enough points to do anything.
    #[error("need at least {min_required} points, got {actual}")]
    InsufficientData { min_required: usize, actual: usize },

    /// A point's dimensionality differs from the first point's.
    #[error("point {index} has {actual} coordinates, expected {expected}")]
    InconsistentPoint {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// A point contains NaN or an infinity.
    #[error("point {index} contains a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// The oracle answered with a negative, NaN or infinite distance.
    #[error("nearest-neighbor distance {distance} is not a finite non-negative number")]
    InvalidDistance { distance: f64 },

    /// A distance sum is not a finite non-negative number.
    #[error("distance sum {name} = {value} is not a finite non-negative number")]
    NonFiniteSum { name: &'static str, value: f64 },

    /// A result-tree node id that the tree does not contain.
    #[error("result tree has no node #{index}")]
    UnknownNode { index: usize },
}
