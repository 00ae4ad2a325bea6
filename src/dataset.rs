//! Point sets of fixed dimensionality.

use crate::error::TendencyError;

/// An ordered, immutable collection of points sharing one dimensionality.
///
/// Construction validates that there is at least one point, that every
/// point has the same number of coordinates, and that all coordinates are
/// finite.
///
/// # Examples
/// ```
/// use u_tendency::dataset::Dataset;
/// let ds = Dataset::new(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
/// assert_eq!(ds.len(), 2);
/// assert_eq!(ds.dimensionality(), 2);
/// assert_eq!(ds.point(1), &[2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Vec<Vec<f64>>,
    dim: usize,
}

impl Dataset {
    /// Validates `points` and wraps them.
    ///
    /// # Errors
    /// - [`TendencyError::InsufficientData`] if `points` is empty or the
    ///   points have zero coordinates.
    /// - [`TendencyError::InconsistentPoint`] if dimensionalities differ.
    /// - [`TendencyError::NonFiniteCoordinate`] on NaN or infinity.
    pub fn new(points: Vec<Vec<f64>>) -> Result<Self, TendencyError> {
        let Some(first) = points.first() else {
            return Err(TendencyError::InsufficientData {
                min_required: 1,
                actual: 0,
            });
        };
        let dim = first.len();
        if dim == 0 {
            return Err(TendencyError::InsufficientData {
                min_required: 1,
                actual: 0,
            });
        }
        for (index, p) in points.iter().enumerate() {
            if p.len() != dim {
                return Err(TendencyError::InconsistentPoint {
                    index,
                    expected: dim,
                    actual: p.len(),
                });
            }
            if !p.iter().all(|x| x.is_finite()) {
                return Err(TendencyError::NonFiniteCoordinate { index });
            }
        }
        Ok(Self { points, dim })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; an empty dataset cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of coordinates per point (D).
    pub fn dimensionality(&self) -> usize {
        self.dim
    }

    /// The `i`-th point.
    ///
    /// # Panics
    /// If `i >= self.len()`.
    pub fn point(&self, i: usize) -> &[f64] {
        &self.points[i]
    }

    /// Iterates over all points in order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.points.iter().map(Vec::as_slice)
    }

    /// Per-dimension minima and maxima over all points.
    pub fn min_max(&self) -> (Vec<f64>, Vec<f64>) {
        let mut min = self.points[0].clone();
        let mut max = self.points[0].clone();
        for p in &self.points[1..] {
            for (d, &x) in p.iter().enumerate() {
                if x < min[d] {
                    min[d] = x;
                }
                if x > max[d] {
                    max[d] = x;
                }
            }
        }
        (min, max)
    }
}
