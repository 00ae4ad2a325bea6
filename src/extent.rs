//! Sampling extents for synthetic uniform points.
//!
//! The bounding box is either measured from the data (per-dimension
//! minimum and span) or taken from caller-supplied minima/maxima. A
//! supplied bound may list one value per dimension or a single value
//! that is broadcast to every dimension.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Bound, TendencyError};

/// Uniform sampling domain: `min[d] + [0, 1) · extend[d]` per axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    min: Vec<f64>,
    extend: Vec<f64>,
}

impl BoundingBox {
    /// Builds a box from explicit per-axis minima and spans.
    ///
    /// Spans are not checked for sign: an inverted caller range yields a
    /// negative span and samples are drawn below `min`.
    ///
    /// # Errors
    /// [`TendencyError::InvalidDimensionality`] if the lengths differ.
    pub fn new(min: Vec<f64>, extend: Vec<f64>) -> Result<Self, TendencyError> {
        if min.len() != extend.len() {
            return Err(TendencyError::InvalidDimensionality {
                bound: Bound::Maxima,
                expected: min.len(),
                actual: extend.len(),
            });
        }
        Ok(Self { min, extend })
    }

    /// Per-axis lower corner.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Per-axis span (`max − min`).
    pub fn extend(&self) -> &[f64] {
        &self.extend
    }

    /// Number of axes.
    pub fn dimensionality(&self) -> usize {
        self.min.len()
    }

    /// Maps unit-cube coordinates `u ∈ [0,1)^D` into the box, writing into
    /// `out`. A zero span pins that axis to `min[d]` exactly.
    pub(crate) fn place(&self, unit: impl Iterator<Item = f64>, out: &mut [f64]) {
        for ((o, u), (&lo, &span)) in out
            .iter_mut()
            .zip(unit)
            .zip(self.min.iter().zip(&self.extend))
        {
            *o = lo + u * span;
        }
    }
}

/// Caller-supplied sampling range overriding the data's own extent.
///
/// Either field may hold `D` values or a single broadcast value. Both must
/// be supplied together; an empty vector counts as not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtentOverride {
    /// Per-dimension (or broadcast) minima.
    pub minima: Option<Vec<f64>>,
    /// Per-dimension (or broadcast) maxima.
    pub maxima: Option<Vec<f64>>,
}

impl ExtentOverride {
    /// Override with both bounds given.
    pub fn new(minima: Vec<f64>, maxima: Vec<f64>) -> Self {
        Self {
            minima: Some(minima),
            maxima: Some(maxima),
        }
    }

    /// Checks that the override is complete and matches `dim`, without
    /// touching any data. An absent override is valid.
    ///
    /// # Errors
    /// - [`TendencyError::IncompleteOverride`] if exactly one bound is set.
    /// - [`TendencyError::InvalidDimensionality`] if a bound's length is
    ///   neither `dim` nor 1.
    pub fn validate(&self, dim: usize) -> Result<(), TendencyError> {
        self.resolve(dim).map(|_| ())
    }

    /// Validated (minima, maxima) broadcast to `dim`, or `None` if absent.
    fn resolve(&self, dim: usize) -> Result<Option<(Vec<f64>, Vec<f64>)>, TendencyError> {
        let minima = self.minima.as_deref().filter(|v| !v.is_empty());
        let maxima = self.maxima.as_deref().filter(|v| !v.is_empty());
        match (minima, maxima) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(TendencyError::IncompleteOverride {
                missing: Bound::Maxima,
            }),
            (None, Some(_)) => Err(TendencyError::IncompleteOverride {
                missing: Bound::Minima,
            }),
            (Some(lo), Some(hi)) => Ok(Some((
                broadcast(lo, dim, Bound::Minima)?,
                broadcast(hi, dim, Bound::Maxima)?,
            ))),
        }
    }
}

fn broadcast(values: &[f64], dim: usize, bound: Bound) -> Result<Vec<f64>, TendencyError> {
    match values.len() {
        n if n == dim => Ok(values.to_vec()),
        1 => Ok(vec![values[0]; dim]),
        actual => Err(TendencyError::InvalidDimensionality {
            bound,
            expected: dim,
            actual,
        }),
    }
}

/// Computes the uniform sampling box for `dataset`.
///
/// Without an override the box spans the data's own per-dimension
/// minimum and maximum, so every span is non-negative. With an override
/// the span is `maxima[d] − minima[d]` as given.
///
/// # Errors
/// See [`ExtentOverride::validate`].
///
/// # Examples
/// ```
/// use u_tendency::dataset::Dataset;
/// use u_tendency::extent::{estimate_extent, ExtentOverride};
///
/// let ds = Dataset::new(vec![vec![0.2, 5.0, 1.0], vec![0.8, 6.0, 3.0]]).unwrap();
///
/// let measured = estimate_extent(&ds, &ExtentOverride::default()).unwrap();
/// assert_eq!(measured.min(), &[0.2, 5.0, 1.0]);
///
/// let unit = ExtentOverride::new(vec![0.0], vec![1.0]);
/// let bbox = estimate_extent(&ds, &unit).unwrap();
/// assert_eq!(bbox.min(), &[0.0, 0.0, 0.0]);
/// assert_eq!(bbox.extend(), &[1.0, 1.0, 1.0]);
/// ```
pub fn estimate_extent(
    dataset: &Dataset,
    overrides: &ExtentOverride,
) -> Result<BoundingBox, TendencyError> {
    let dim = dataset.dimensionality();
    let (min, max) = match overrides.resolve(dim)? {
        Some(bounds) => bounds,
        None => dataset.min_max(),
    };
    let extend = max.iter().zip(&min).map(|(hi, lo)| hi - lo).collect();
    Ok(BoundingBox { min, extend })
}
