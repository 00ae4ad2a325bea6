//! Real-data and uniform-synthetic nearest-neighbor samplers.
//!
//! Both samplers return Σ distance^D over S queries:
//!
//! - **w** (real data): S distinct dataset points, each queried at rank
//!   k+1 because the point itself sits in the corpus at distance zero.
//! - **u** (uniform): S synthetic points drawn uniformly in the bounding
//!   box, queried at rank k. Synthetic points never enter the corpus.
//!
//! Sums are accumulated as `ln Σ exp(D · ln d)`: distances raised to D
//! leave the `f64` range quickly in higher dimensions (`8^400`,
//! `0.001^400`), while their logarithms do not.

use rand::Rng;

use crate::dataset::Dataset;
use crate::error::TendencyError;
use crate::extent::BoundingBox;
use crate::neighbors::KnnOracle;
use crate::random::sample_indices;
use crate::stats::LogSumExp;

/// Shared inputs of one sampling pass.
#[derive(Debug, Clone, Copy)]
pub struct SampleSpec {
    /// Number of queries (S).
    pub sample_size: usize,
    /// Neighbor rank (k ≥ 1).
    pub k: usize,
}

/// Σ (k+1)-NN distance^D over `spec.sample_size` distinct real points.
///
/// Consumes exactly `sample_size` draws from `rng`.
///
/// # Errors
/// - [`TendencyError::SampleSizeExceedsData`] if S exceeds the dataset.
/// - [`TendencyError::OracleFailure`] on the first failing query; no
///   partial sum is returned.
/// - [`TendencyError::InvalidDistance`] if the oracle answers with a
///   negative or non-finite distance.
pub fn real_data_sum<O, R>(
    oracle: &O,
    dataset: &Dataset,
    spec: SampleSpec,
    rng: &mut R,
) -> Result<LogSumExp, TendencyError>
where
    O: KnnOracle + ?Sized,
    R: Rng,
{
    let dim = dataset.dimensionality() as f64;
    let picked = sample_indices(dataset.len(), spec.sample_size, rng).ok_or(
        TendencyError::SampleSizeExceedsData {
            sample_size: spec.sample_size,
            available: dataset.len(),
        },
    )?;

    let mut w = LogSumExp::new();
    for i in picked {
        let dist = checked(oracle.knn_distance(dataset.point(i), spec.k + 1)?)?;
        w.add(dim * dist.ln());
    }
    Ok(w)
}

/// Σ k-NN distance^D over `spec.sample_size` uniform synthetic points.
///
/// Draws coordinates point-major: all D coordinates of the first point,
/// then the second, and so on (S·D draws in total). The dataset is
/// reached only through `oracle`.
///
/// # Errors
/// [`TendencyError::OracleFailure`] on the first failing query, or
/// [`TendencyError::InvalidDistance`] for a negative or non-finite answer.
pub fn uniform_sum<O, R>(
    oracle: &O,
    bbox: &BoundingBox,
    spec: SampleSpec,
    rng: &mut R,
) -> Result<LogSumExp, TendencyError>
where
    O: KnnOracle + ?Sized,
    R: Rng,
{
    let dim = bbox.dimensionality();
    let mut query = vec![0.0; dim];

    let mut u = LogSumExp::new();
    for _ in 0..spec.sample_size {
        bbox.place((0..dim).map(|_| rng.random::<f64>()), &mut query);
        let dist = checked(oracle.knn_distance(&query, spec.k)?)?;
        u.add(dim as f64 * dist.ln());
    }
    Ok(u)
}

fn checked(distance: f64) -> Result<f64, TendencyError> {
    if distance >= 0.0 && distance.is_finite() {
        Ok(distance)
    } else {
        Err(TendencyError::InvalidDistance { distance })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::extent::{estimate_extent, ExtentOverride};
    use crate::neighbors::OracleError;
    use crate::random::create_rng;
    use crate::testing::{BruteForceOracle, ConstantOracle, FailingOracle};

    /// Records every query it receives.
    struct RecordingOracle {
        queries: Mutex<Vec<(Vec<f64>, usize)>>,
    }

    impl RecordingOracle {
        fn new() -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
            }
        }

        fn take(&self) -> Vec<(Vec<f64>, usize)> {
            std::mem::take(&mut *self.queries.lock().unwrap())
        }
    }

    impl KnnOracle for RecordingOracle {
        fn knn_distance(&self, query: &[f64], rank: usize) -> Result<f64, OracleError> {
            self.queries.lock().unwrap().push((query.to_vec(), rank));
            Ok(1.0)
        }
    }

    fn grid() -> Dataset {
        let mut pts = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                pts.push(vec![i as f64, j as f64]);
            }
        }
        Dataset::new(pts).unwrap()
    }

    #[test]
    fn test_real_queries_use_rank_k_plus_one() {
        let ds = grid();
        let oracle = RecordingOracle::new();
        let spec = SampleSpec {
            sample_size: 6,
            k: 2,
        };
        let w = real_data_sum(&oracle, &ds, spec, &mut create_rng(1)).unwrap();
        let queries = oracle.take();
        assert_eq!(queries.len(), 6);
        assert!(queries.iter().all(|(_, rank)| *rank == 3));
        assert_eq!(w.value(), 6.0);

        let mut seen: Vec<Vec<f64>> = queries.into_iter().map(|(q, _)| q).collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        seen.dedup();
        assert_eq!(seen.len(), 6, "real samples must be distinct");
    }

    #[test]
    fn test_real_sum_on_unit_grid() {
        // Every grid point's nearest other point is at distance 1.
        let ds = grid();
        let oracle = BruteForceOracle::new(&ds);
        let spec = SampleSpec {
            sample_size: 10,
            k: 1,
        };
        let w = real_data_sum(&oracle, &ds, spec, &mut create_rng(3)).unwrap();
        assert!((w.value() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_real_sample_too_large() {
        let ds = grid();
        let spec = SampleSpec {
            sample_size: 26,
            k: 1,
        };
        let err = real_data_sum(&ConstantOracle(1.0), &ds, spec, &mut create_rng(0)).unwrap_err();
        assert_eq!(
            err,
            TendencyError::SampleSizeExceedsData {
                sample_size: 26,
                available: 25
            }
        );
    }

    #[test]
    fn test_distance_raised_to_dimensionality() {
        let ds = grid();
        let bbox = estimate_extent(&ds, &ExtentOverride::default()).unwrap();
        let spec = SampleSpec {
            sample_size: 4,
            k: 1,
        };
        let u = uniform_sum(&ConstantOracle(3.0), &bbox, spec, &mut create_rng(0)).unwrap();
        assert!((u.value() - 4.0 * 9.0).abs() < 1e-12);
        let w = real_data_sum(&ConstantOracle(3.0), &ds, spec, &mut create_rng(0)).unwrap();
        assert!((w.value() - 4.0 * 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_high_dimensional_sums_stay_in_log_space() {
        let points: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64; 400]).collect();
        let ds = Dataset::new(points).unwrap();
        let bbox = estimate_extent(&ds, &ExtentOverride::default()).unwrap();
        let spec = SampleSpec {
            sample_size: 3,
            k: 1,
        };

        let u = uniform_sum(&ConstantOracle(8.0), &bbox, spec, &mut create_rng(0)).unwrap();
        assert_eq!(u.value(), f64::INFINITY);
        assert!((u.ln() - (400.0 * 8f64.ln() + 3f64.ln())).abs() < 1e-9);

        let w = real_data_sum(&ConstantOracle(1e-3), &ds, spec, &mut create_rng(0)).unwrap();
        assert_eq!(w.value(), 0.0);
        assert!((w.ln() - (400.0 * 1e-3_f64.ln() + 3f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distances_sum_to_zero() {
        let ds = grid();
        let spec = SampleSpec {
            sample_size: 5,
            k: 1,
        };
        let w = real_data_sum(&ConstantOracle(0.0), &ds, spec, &mut create_rng(0)).unwrap();
        assert_eq!(w.value(), 0.0);
        assert_eq!(w.ln(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_invalid_distances_rejected() {
        let ds = grid();
        let bbox = estimate_extent(&ds, &ExtentOverride::default()).unwrap();
        let spec = SampleSpec {
            sample_size: 2,
            k: 1,
        };
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let err = uniform_sum(&ConstantOracle(bad), &bbox, spec, &mut create_rng(0)).unwrap_err();
            assert!(matches!(err, TendencyError::InvalidDistance { .. }), "{err:?}");
            let err = real_data_sum(&ConstantOracle(bad), &ds, spec, &mut create_rng(0)).unwrap_err();
            assert!(matches!(err, TendencyError::InvalidDistance { .. }), "{err:?}");
        }
    }

    #[test]
    fn test_uniform_queries_inside_box_with_rank_k() {
        let bbox = BoundingBox::new(vec![-1.0, 10.0, 3.0], vec![2.0, 0.5, 0.0]).unwrap();
        let oracle = RecordingOracle::new();
        let spec = SampleSpec {
            sample_size: 200,
            k: 4,
        };
        uniform_sum(&oracle, &bbox, spec, &mut create_rng(11)).unwrap();
        let queries = oracle.take();
        assert_eq!(queries.len(), 200);
        for (q, rank) in queries {
            assert_eq!(rank, 4);
            assert!((-1.0..=1.0).contains(&q[0]), "{q:?}");
            assert!((10.0..=10.5).contains(&q[1]), "{q:?}");
            assert_eq!(q[2], 3.0, "degenerate axis must stay at min");
        }
    }

    #[test]
    fn test_uniform_draw_order_is_point_major() {
        let bbox = BoundingBox::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        let oracle = RecordingOracle::new();
        let spec = SampleSpec {
            sample_size: 3,
            k: 1,
        };
        uniform_sum(&oracle, &bbox, spec, &mut create_rng(5)).unwrap();
        let got: Vec<f64> = oracle.take().into_iter().flat_map(|(q, _)| q).collect();

        let mut rng = create_rng(5);
        let expected: Vec<f64> = (0..6).map(|_| rng.random::<f64>()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let ds = grid();
        let bbox = estimate_extent(&ds, &ExtentOverride::default()).unwrap();
        let spec = SampleSpec {
            sample_size: 3,
            k: 1,
        };
        let err = uniform_sum(&FailingOracle, &bbox, spec, &mut create_rng(0)).unwrap_err();
        assert!(matches!(err, TendencyError::OracleFailure(_)));
        let err = real_data_sum(&FailingOracle, &ds, spec, &mut create_rng(0)).unwrap_err();
        assert!(matches!(err, TendencyError::OracleFailure(_)));
    }

    #[test]
    fn test_rank_beyond_corpus_is_oracle_failure() {
        let ds = Dataset::new(vec![vec![0.0], vec![1.0]]).unwrap();
        let oracle = BruteForceOracle::new(&ds);
        let spec = SampleSpec {
            sample_size: 1,
            k: 2,
        };
        let err = real_data_sum(&oracle, &ds, spec, &mut create_rng(0)).unwrap_err();
        assert!(matches!(err, TendencyError::OracleFailure(_)));
    }
}
