//! Test fixtures: a brute-force Euclidean oracle and synthetic point sets.

use rand::Rng;

use crate::dataset::Dataset;
use crate::neighbors::{KnnOracle, OracleError};
use crate::random::create_rng;

/// Linear-scan Euclidean k-NN over a copy of the dataset.
pub(crate) struct BruteForceOracle {
    corpus: Vec<Vec<f64>>,
}

impl BruteForceOracle {
    pub(crate) fn new(dataset: &Dataset) -> Self {
        Self {
            corpus: dataset.iter().map(<[f64]>::to_vec).collect(),
        }
    }
}

impl KnnOracle for BruteForceOracle {
    fn knn_distance(&self, query: &[f64], rank: usize) -> Result<f64, OracleError> {
        if rank == 0 || rank > self.corpus.len() {
            return Err(OracleError::new(format!(
                "rank {rank} outside 1..={}",
                self.corpus.len()
            )));
        }
        let mut dists: Vec<f64> = self
            .corpus
            .iter()
            .map(|p| {
                p.iter()
                    .zip(query)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();
        dists.select_nth_unstable_by(rank - 1, f64::total_cmp);
        Ok(dists[rank - 1])
    }
}

/// Oracle that always fails.
pub(crate) struct FailingOracle;

impl KnnOracle for FailingOracle {
    fn knn_distance(&self, _query: &[f64], _rank: usize) -> Result<f64, OracleError> {
        Err(OracleError::new("index unavailable"))
    }
}

/// Oracle that always answers `distance`.
pub(crate) struct ConstantOracle(pub(crate) f64);

impl KnnOracle for ConstantOracle {
    fn knn_distance(&self, _query: &[f64], _rank: usize) -> Result<f64, OracleError> {
        Ok(self.0)
    }
}

/// `n` points uniform in `[0,1]^dim`.
pub(crate) fn uniform_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.random::<f64>()).collect())
        .collect()
}

/// `background` uniform points in `[0,1]^2` plus a tight cluster of
/// `cluster` points around (0.5, 0.5).
pub(crate) fn clustered_points(background: usize, cluster: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut points = uniform_points(background, 2, seed);
    let mut rng = create_rng(seed ^ 0xC1u64);
    for _ in 0..cluster {
        let dx = (rng.random::<f64>() - 0.5) * 0.01;
        let dy = (rng.random::<f64>() - 0.5) * 0.01;
        points.push(vec![0.5 + dx, 0.5 + dy]);
    }
    points
}
