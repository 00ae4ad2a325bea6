//! Nearest-neighbor distance capability.
//!
//! The statistic never searches for neighbors itself. It asks an injected
//! [`KnnOracle`] for "the distance from this query to its rank-th nearest
//! corpus member". The corpus and the distance metric are fixed when the
//! oracle is built; any index or brute-force backend is substitutable.

use thiserror::Error;

/// Failure reported by a [`KnnOracle`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OracleError {
    message: String,
}

impl OracleError {
    /// Creates an oracle error with a human-readable reason.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend's reason string.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// k-th nearest neighbor distance queries over a fixed corpus.
///
/// `rank` is 1-based. When `query` is itself a corpus member, rank 1 is
/// the member itself at distance zero; callers wanting the nearest
/// *other* member ask for rank 2.
///
/// With the `parallel` feature, oracles must also be `Sync` (see
/// [`MaybeSync`]) so repetitions can query concurrently; serial builds
/// accept oracles with interior caches such as `RefCell`.
///
/// # Examples
/// ```
/// use u_tendency::neighbors::{KnnOracle, OracleError};
///
/// struct Line(Vec<f64>);
///
/// impl KnnOracle for Line {
///     fn knn_distance(&self, query: &[f64], rank: usize) -> Result<f64, OracleError> {
///         let mut d: Vec<f64> = self.0.iter().map(|x| (x - query[0]).abs()).collect();
///         d.sort_by(f64::total_cmp);
///         d.get(rank - 1)
///             .copied()
///             .ok_or_else(|| OracleError::new("rank exceeds corpus size"))
///     }
/// }
///
/// let oracle = Line(vec![0.0, 1.0, 3.0]);
/// assert_eq!(oracle.knn_distance(&[0.5], 1).unwrap(), 0.5);
/// assert!(oracle.knn_distance(&[0.5], 4).is_err());
/// ```
pub trait KnnOracle {
    /// Distance from `query` to its `rank`-th nearest corpus member.
    fn knn_distance(&self, query: &[f64], rank: usize) -> Result<f64, OracleError>;
}

/// `Sync` when the `parallel` feature is enabled, no bound otherwise.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}

#[cfg(feature = "parallel")]
impl<T: Sync + ?Sized> MaybeSync for T {}

/// `Sync` when the `parallel` feature is enabled, no bound otherwise.
#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}

#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> MaybeSync for T {}

impl<O: KnnOracle + ?Sized> KnnOracle for &O {
    fn knn_distance(&self, query: &[f64], rank: usize) -> Result<f64, OracleError> {
        (**self).knn_distance(query, rank)
    }
}

impl<O: KnnOracle + ?Sized> KnnOracle for Box<O> {
    fn knn_distance(&self, query: &[f64], rank: usize) -> Result<f64, OracleError> {
        (**self).knn_distance(query, rank)
    }
}
