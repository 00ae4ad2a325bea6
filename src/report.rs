//! Run reports and the statistics channel.
//!
//! A finished run yields one [`StatisticReport`]. Its fields are also
//! published as individually named numeric [`Statistic`] records through
//! a [`StatisticsSink`]; [`TracingSink`] forwards them to `tracing` on the
//! [`STATISTICS_TARGET`] target.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::stats::RunningMoments;

/// `tracing` target carrying statistic records.
pub const STATISTICS_TARGET: &str = "u_tendency::statistics";

/// Prefix of every record name.
pub const STATISTIC_PREFIX: &str = "hopkins";

/// Mean and spread of one quantity across repetitions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MomentSummary {
    /// Mean over repetitions.
    pub mean: f64,
    /// Sample variance; `None` after a single repetition.
    pub variance: Option<f64>,
}

impl MomentSummary {
    /// Sample standard deviation; `None` after a single repetition.
    pub fn std_dev(&self) -> Option<f64> {
        self.variance.map(f64::sqrt)
    }

    pub(crate) fn from_moments(moments: &RunningMoments) -> Self {
        Self {
            mean: moments.mean().unwrap_or(f64::NAN),
            variance: moments.sample_variance(),
        }
    }
}

/// Outcome of a Hopkins run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatisticReport {
    /// Points sampled per repetition (S).
    pub sample_size: usize,
    /// Dataset dimensionality (D).
    pub dimensionality: usize,
    /// Neighbor rank (k).
    pub k: usize,
    /// Number of repetitions (R).
    pub repetitions: usize,
    /// Hopkins ratio across repetitions.
    pub h: MomentSummary,
    /// Uniform-point distance sums across repetitions.
    pub u: MomentSummary,
    /// Real-point distance sums across repetitions.
    pub w: MomentSummary,
    /// Significance of `h.mean` against Beta(S, S).
    pub p_value: f64,
}

impl StatisticReport {
    /// The report as named records, in emission order.
    ///
    /// Standard deviation records are present only when more than one
    /// repetition ran.
    pub fn statistics(&self) -> Vec<Statistic> {
        let mut out = vec![
            Statistic::long("samplesize", self.sample_size as i64),
            Statistic::long("dim", self.dimensionality as i64),
            Statistic::long("nearest-neighbor", self.k as i64),
            Statistic::double("h.mean", self.h.mean),
            Statistic::double("u.mean", self.u.mean),
            Statistic::double("w.mean", self.w.mean),
        ];
        for (name, summary) in [("h.std", &self.h), ("u.std", &self.u), ("w.std", &self.w)] {
            if let Some(sd) = summary.std_dev() {
                out.push(Statistic::double(name, sd));
            }
        }
        out.push(Statistic::double("p", self.p_value));
        out
    }

    /// Sends every record to `sink`.
    pub fn emit(&self, sink: &mut dyn StatisticsSink) {
        for statistic in self.statistics() {
            sink.record(statistic);
        }
    }
}

/// Value of a named record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatisticValue {
    /// Integer-valued record (sizes, ranks).
    Long(i64),
    /// Real-valued record.
    Double(f64),
}

impl std::fmt::Display for StatisticValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatisticValue::Long(v) => write!(f, "{v}"),
            StatisticValue::Double(v) => write!(f, "{v}"),
        }
    }
}

/// One named numeric record, e.g. `hopkins.h.mean = 0.51`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistic {
    /// Fully qualified name.
    pub name: String,
    /// Recorded value.
    pub value: StatisticValue,
}

impl Statistic {
    fn long(key: &str, value: i64) -> Self {
        Self {
            name: format!("{STATISTIC_PREFIX}.{key}"),
            value: StatisticValue::Long(value),
        }
    }

    fn double(key: &str, value: f64) -> Self {
        Self {
            name: format!("{STATISTIC_PREFIX}.{key}"),
            value: StatisticValue::Double(value),
        }
    }
}

/// Consumer of statistic records.
pub trait StatisticsSink {
    /// Whether records sent here reach anyone.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Accepts one record.
    fn record(&mut self, statistic: Statistic);
}

/// Collects records in memory.
impl StatisticsSink for Vec<Statistic> {
    fn record(&mut self, statistic: Statistic) {
        self.push(statistic);
    }
}

/// Discards records and reports itself disabled.
impl StatisticsSink for () {
    fn is_enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _statistic: Statistic) {}
}

/// Forwards records as `info!` events on [`STATISTICS_TARGET`].
///
/// Enabled exactly when the active subscriber accepts INFO events on that
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl StatisticsSink for TracingSink {
    fn is_enabled(&self) -> bool {
        tracing::enabled!(target: STATISTICS_TARGET, tracing::Level::INFO)
    }

    fn record(&mut self, statistic: Statistic) {
        tracing::info!(
            target: STATISTICS_TARGET,
            name = %statistic.name,
            value = %statistic.value,
            "statistic"
        );
    }
}
