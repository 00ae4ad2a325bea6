//! Hopkins statistic of clustering tendency.
//!
//! Compares nearest-neighbor distances of real data points with those of
//! points drawn uniformly inside the data's extent. With
//! `h = u / (u + w)`, where `u` sums the synthetic points' distances and
//! `w` the real points' distances (each raised to the dimensionality):
//!
//! - h ≈ 0.5: no evidence against uniform randomness
//! - h → 1: real points crowd together (clustered)
//! - h → 0: real points are spread more evenly than random
//!
//! Reference: Hopkins & Skellam (1954), "A new method for determining the
//! type of distribution of plant individuals", *Annals of Botany* 18(2),
//! 213–227.
//!
//! Only a single neighbor rank k is evaluated per run.
//!
//! # Example
//!
//! ```
//! use u_tendency::dataset::Dataset;
//! use u_tendency::hopkins::{HopkinsConfig, HopkinsStatistic};
//! use u_tendency::neighbors::{KnnOracle, OracleError};
//! use u_tendency::report::Statistic;
//!
//! struct Scan(Vec<Vec<f64>>);
//!
//! impl KnnOracle for Scan {
//!     fn knn_distance(&self, q: &[f64], rank: usize) -> Result<f64, OracleError> {
//!         let mut d: Vec<f64> = self.0.iter()
//!             .map(|p| p.iter().zip(q).map(|(a, b)| (a - b).powi(2)).sum::<f64>().sqrt())
//!             .collect();
//!         d.sort_by(f64::total_cmp);
//!         d.get(rank - 1).copied().ok_or_else(|| OracleError::new("rank too large"))
//!     }
//! }
//!
//! let points: Vec<Vec<f64>> = (0..100)
//!     .map(|i| vec![(i % 10) as f64, (i / 10) as f64])
//!     .collect();
//! let dataset = Dataset::new(points.clone()).unwrap();
//!
//! let config = HopkinsConfig::new(10).repetitions(3).seed(7);
//! let report = HopkinsStatistic::new(config)
//!     .run(&dataset, &Scan(points), &mut Vec::<Statistic>::new())
//!     .unwrap();
//! assert_eq!(report.dimensionality, 2);
//! assert!((0.0..=1.0).contains(&report.h.mean));
//! assert!((0.0..=1.0).contains(&report.p_value));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dataset::Dataset;
use crate::error::TendencyError;
use crate::extent::{estimate_extent, ExtentOverride};
use crate::neighbors::{KnnOracle, MaybeSync};
use crate::random::entropy_seed;
use crate::report::{MomentSummary, StatisticReport, StatisticsSink, TracingSink};
use crate::result_tree::{NodeId, ResultTree};
use crate::sampler::SampleSpec;
use crate::significance::hopkins_p_value;
use crate::trial::TrialPlan;

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for one Hopkins run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HopkinsConfig {
    /// Real and synthetic points per repetition (S). Must be in
    /// `1..=dataset.len()`.
    pub sample_size: usize,
    /// Number of repetitions (R). Default: 1.
    pub repetitions: usize,
    /// Neighbor rank (k). Default: 1.
    pub k: usize,
    /// Base seed. `None` draws a fresh one from OS entropy per run.
    pub seed: Option<u64>,
    /// Optional sampling range instead of the data's own extent.
    pub extent: ExtentOverride,
    /// Run repetitions on the rayon pool (requires the `parallel`
    /// feature). Default: false.
    pub parallel: bool,
}

impl HopkinsConfig {
    /// Defaults with the given sample size.
    pub fn new(sample_size: usize) -> Self {
        Self {
            sample_size,
            repetitions: 1,
            k: 1,
            seed: None,
            extent: ExtentOverride::default(),
            parallel: false,
        }
    }

    /// Sets the number of repetitions.
    pub fn repetitions(mut self, r: usize) -> Self {
        self.repetitions = r;
        self
    }

    /// Sets the neighbor rank.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Fixes the base seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets per-dimension (or single broadcast) sampling minima.
    pub fn minima(mut self, minima: Vec<f64>) -> Self {
        self.extent.minima = Some(minima);
        self
    }

    /// Sets per-dimension (or single broadcast) sampling maxima.
    pub fn maxima(mut self, maxima: Vec<f64>) -> Self {
        self.extent.maxima = Some(maxima);
        self
    }

    /// Enables or disables the parallel repetition loop.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks every constraint against `dataset` without sampling.
    ///
    /// # Errors
    /// - [`TendencyError::InvalidParameter`] if S, R or k is zero.
    /// - [`TendencyError::SampleSizeExceedsData`] if S > dataset size.
    /// - [`TendencyError::IncompleteOverride`] /
    ///   [`TendencyError::InvalidDimensionality`] for a bad extent.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), TendencyError> {
        for (name, value) in [
            ("sample_size", self.sample_size),
            ("repetitions", self.repetitions),
            ("k", self.k),
        ] {
            if value < 1 {
                return Err(TendencyError::InvalidParameter {
                    name,
                    value,
                    constraint: ">= 1",
                });
            }
        }
        if self.sample_size > dataset.len() {
            return Err(TendencyError::SampleSizeExceedsData {
                sample_size: self.sample_size,
                available: dataset.len(),
            });
        }
        self.extent.validate(dataset.dimensionality())
    }
}

// ── Orchestration ─────────────────────────────────────────────────────

/// Runs the Hopkins statistic for a fixed configuration.
#[derive(Debug, Clone)]
pub struct HopkinsStatistic {
    config: HopkinsConfig,
}

impl HopkinsStatistic {
    /// Wraps a configuration.
    pub fn new(config: HopkinsConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &HopkinsConfig {
        &self.config
    }

    /// Computes the statistic and publishes its records to `sink`.
    ///
    /// All configuration errors surface before the first random draw. A
    /// disabled `sink` only triggers a warning; the report is returned
    /// either way.
    ///
    /// # Errors
    /// Any [`HopkinsConfig::validate`] error,
    /// [`TendencyError::OracleFailure`] from the first failing query, or
    /// [`TendencyError::InvalidDistance`] for an unusable oracle answer.
    pub fn run<O>(
        &self,
        dataset: &Dataset,
        oracle: &O,
        sink: &mut dyn StatisticsSink,
    ) -> Result<StatisticReport, TendencyError>
    where
        O: KnnOracle + MaybeSync + ?Sized,
    {
        let cfg = &self.config;
        cfg.validate(dataset)?;
        let bbox = estimate_extent(dataset, &cfg.extent)?;

        if !sink.is_enabled() {
            warn!("statistics channel is disabled; Hopkins records will not be published");
        }

        let base_seed = cfg.seed.unwrap_or_else(entropy_seed);
        debug!(
            base_seed,
            sample_size = cfg.sample_size,
            repetitions = cfg.repetitions,
            k = cfg.k,
            "starting hopkins run"
        );

        let plan = TrialPlan {
            oracle,
            dataset,
            bbox: &bbox,
            spec: SampleSpec {
                sample_size: cfg.sample_size,
                k: cfg.k,
            },
            base_seed,
        };
        let summary = plan.run(cfg.repetitions, cfg.parallel)?;

        let h = MomentSummary::from_moments(summary.h());
        let u = MomentSummary::from_moments(summary.u());
        let w = MomentSummary::from_moments(summary.w());
        if !(u.mean.is_finite() && w.mean.is_finite()) {
            warn!(
                dimensionality = dataset.dimensionality(),
                "distance sums exceed the f64 range; u and w moments are saturated, h and p stay exact"
            );
        }
        let report = StatisticReport {
            sample_size: cfg.sample_size,
            dimensionality: dataset.dimensionality(),
            k: cfg.k,
            repetitions: cfg.repetitions,
            h,
            u,
            w,
            p_value: hopkins_p_value(h.mean, cfg.sample_size),
        };
        info!(h = report.h.mean, p = report.p_value, "hopkins statistic computed");
        report.emit(sink);
        Ok(report)
    }

    /// Runs with a [`TracingSink`] and attaches the report under `parent`,
    /// notifying the tree's listeners.
    ///
    /// # Errors
    /// [`TendencyError::UnknownNode`] if `parent` is not in `tree`, checked
    /// before any work; otherwise as [`HopkinsStatistic::run`]. Nothing is
    /// attached on error.
    pub fn run_into_tree<O>(
        &self,
        dataset: &Dataset,
        oracle: &O,
        tree: &mut ResultTree<StatisticReport>,
        parent: NodeId,
    ) -> Result<NodeId, TendencyError>
    where
        O: KnnOracle + MaybeSync + ?Sized,
    {
        if !tree.contains(parent) {
            return Err(TendencyError::UnknownNode {
                index: parent.index(),
            });
        }
        let report = self.run(dataset, oracle, &mut TracingSink)?;
        Ok(tree.attach(parent, report))
    }
}

/// Computes the Hopkins statistic, publishing records through `tracing`.
///
/// # Errors
/// See [`HopkinsStatistic::run`].
pub fn hopkins<O>(
    dataset: &Dataset,
    oracle: &O,
    config: &HopkinsConfig,
) -> Result<StatisticReport, TendencyError>
where
    O: KnnOracle + MaybeSync + ?Sized,
{
    HopkinsStatistic::new(config.clone()).run(dataset, oracle, &mut TracingSink)
}
