//! Repeated Hopkins trials and their running moments.
//!
//! Each repetition draws a fresh real-data subsample and a fresh set of
//! uniform points from its own generator (see [`crate::random`]), turning
//! the two distance sums into one [`TrialResult`]. Only the scalar values
//! survive into [`TrialSummary`].
//!
//! With the `parallel` feature, repetitions are split into fixed
//! contiguous chunks; every chunk is accumulated serially and the chunk
//! summaries are merged in chunk order. Trial values are identical to
//! the serial path, and the chunking never depends on the thread pool, so
//! parallel runs are reproducible too.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::TendencyError;
use crate::extent::BoundingBox;
use crate::neighbors::{KnnOracle, MaybeSync};
use crate::random::{create_rng, substream_seed};
use crate::sampler::{real_data_sum, uniform_sum, SampleSpec};
use crate::stats::{LogSumExp, RunningMoments};

/// Repetitions per parallel work unit.
#[cfg(feature = "parallel")]
const TRIAL_CHUNK: usize = 4;

/// Outcome of one repetition.
///
/// `u` and `w` saturate to `inf` or `0` when the sums leave the `f64`
/// range; `h` is computed from their logarithms in that case and stays
/// exact.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialResult {
    /// Σ k-NN distance^D of uniform synthetic points.
    pub u: f64,
    /// Σ (k+1)-NN distance^D of real points.
    pub w: f64,
    /// Hopkins ratio `u / (u + w)`.
    pub h: f64,
}

impl TrialResult {
    /// Combines two representable sums. `h` is 0.5 only when both are
    /// zero.
    ///
    /// # Errors
    /// [`TendencyError::NonFiniteSum`] if a sum is negative, NaN or
    /// infinite.
    ///
    /// # Examples
    /// ```
    /// use u_tendency::trial::TrialResult;
    /// assert_eq!(TrialResult::from_sums(3.0, 1.0).unwrap().h, 0.75);
    /// assert_eq!(TrialResult::from_sums(0.0, 0.0).unwrap().h, 0.5);
    /// assert!(TrialResult::from_sums(f64::NAN, 1.0).is_err());
    /// ```
    pub fn from_sums(u: f64, w: f64) -> Result<Self, TendencyError> {
        for (name, value) in [("u", u), ("w", w)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(TendencyError::NonFiniteSum { name, value });
            }
        }
        Ok(Self::combine(u, w, u.ln(), w.ln()))
    }

    /// Combines two log-space sums, as produced by the samplers.
    ///
    /// # Errors
    /// [`TendencyError::NonFiniteSum`] if a logarithm is NaN or `+inf`.
    pub fn from_log_sums(u: &LogSumExp, w: &LogSumExp) -> Result<Self, TendencyError> {
        let (ln_u, ln_w) = (u.ln(), w.ln());
        for (name, value) in [("ln u", ln_u), ("ln w", ln_w)] {
            if value.is_nan() || value == f64::INFINITY {
                return Err(TendencyError::NonFiniteSum { name, value });
            }
        }
        Ok(Self::combine(u.value(), w.value(), ln_u, ln_w))
    }

    fn combine(u: f64, w: f64, ln_u: f64, ln_w: f64) -> Self {
        let total = u + w;
        let h = if total.is_finite() && total >= f64::MIN_POSITIVE {
            u / total
        } else if ln_u == f64::NEG_INFINITY && ln_w == f64::NEG_INFINITY {
            0.5
        } else {
            // u / (u + w) = 1 / (1 + w/u)
            1.0 / (1.0 + (ln_w - ln_u).exp())
        };
        Self { u, w, h }
    }
}

/// Mean and sample variance of h, u and w across repetitions.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialSummary {
    h: RunningMoments,
    u: RunningMoments,
    w: RunningMoments,
}

impl TrialSummary {
    /// Empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one repetition in.
    pub fn push(&mut self, trial: &TrialResult) {
        self.h.update(trial.h);
        self.u.update(trial.u);
        self.w.update(trial.w);
    }

    /// Folds another summary in, preserving variances.
    pub fn merge(&mut self, other: &TrialSummary) {
        self.h.merge(&other.h);
        self.u.merge(&other.u);
        self.w.merge(&other.w);
    }

    /// Number of repetitions folded in.
    pub fn repetitions(&self) -> u64 {
        self.h.count()
    }

    /// Moments of the Hopkins ratio.
    pub fn h(&self) -> &RunningMoments {
        &self.h
    }

    /// Moments of the uniform-point sum.
    pub fn u(&self) -> &RunningMoments {
        &self.u
    }

    /// Moments of the real-point sum.
    pub fn w(&self) -> &RunningMoments {
        &self.w
    }
}

/// Read-only inputs shared by every repetition.
pub struct TrialPlan<'a, O: ?Sized> {
    /// Neighbor queries over the dataset.
    pub oracle: &'a O,
    /// Real points.
    pub dataset: &'a Dataset,
    /// Uniform sampling domain.
    pub bbox: &'a BoundingBox,
    /// Sample size and neighbor rank.
    pub spec: SampleSpec,
    /// Seed from which each repetition's substream is derived.
    pub base_seed: u64,
}

impl<O: KnnOracle + MaybeSync + ?Sized> TrialPlan<'_, O> {
    /// Runs repetition `index` on its own substream.
    ///
    /// Draw order: real-data subsample first, then uniform points.
    pub fn run_trial(&self, index: usize) -> Result<TrialResult, TendencyError> {
        let mut rng = create_rng(substream_seed(self.base_seed, index as u64));
        let w = real_data_sum(self.oracle, self.dataset, self.spec, &mut rng)?;
        let u = uniform_sum(self.oracle, self.bbox, self.spec, &mut rng)?;
        let trial = TrialResult::from_log_sums(&u, &w)?;
        debug!(
            repetition = index,
            ln_u = u.ln(),
            ln_w = w.ln(),
            h = trial.h,
            "hopkins repetition"
        );
        Ok(trial)
    }

    /// Runs repetitions `range` in order into one summary.
    fn run_range(&self, range: std::ops::Range<usize>) -> Result<TrialSummary, TendencyError> {
        let mut summary = TrialSummary::new();
        for index in range {
            summary.push(&self.run_trial(index)?);
        }
        Ok(summary)
    }

    /// Runs `repetitions` trials. The first failing trial aborts the run.
    ///
    /// With `parallel`, chunks of repetitions run on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn run(&self, repetitions: usize, parallel: bool) -> Result<TrialSummary, TendencyError> {
        if parallel && repetitions > TRIAL_CHUNK {
            self.run_parallel(repetitions)
        } else {
            self.run_range(0..repetitions)
        }
    }

    /// Runs `repetitions` trials. The first failing trial aborts the run.
    ///
    /// `parallel` is ignored; build with the `parallel` feature to use it.
    #[cfg(not(feature = "parallel"))]
    pub fn run(&self, repetitions: usize, _parallel: bool) -> Result<TrialSummary, TendencyError> {
        self.run_range(0..repetitions)
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(&self, repetitions: usize) -> Result<TrialSummary, TendencyError> {
        let chunks = repetitions.div_ceil(TRIAL_CHUNK);
        let partials: Vec<TrialSummary> = (0..chunks)
            .into_par_iter()
            .map(|c| {
                let start = c * TRIAL_CHUNK;
                self.run_range(start..(start + TRIAL_CHUNK).min(repetitions))
            })
            .collect::<Result<_, _>>()?;

        let mut summary = TrialSummary::new();
        for partial in &partials {
            summary.merge(partial);
        }
        Ok(summary)
    }
}
