//! Streaming moments and compensated summation.
//!
//! # Algorithms
//!
//! - **Running mean/variance**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Merging partial accumulators**: Chan, Golub & LeVeque (1979),
//!   "Updating Formulae and a Pairwise Algorithm for Computing Sample
//!   Variances".
//! - **Summation**: Neumaier's improved Kahan summation.
//! - **Sums of huge or tiny powers**: streaming log-sum-exp, rescaled
//!   whenever a larger exponent arrives.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated running sum with O(ε) error independent of `n`.
///
/// This is an improved variant of Kahan summation that also handles the
/// case where the addend is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *Zeitschrift für Angewandte
/// Mathematik und Mechanik* 54(1), pp. 39–51.
///
/// # Examples
/// ```
/// use u_tendency::stats::CompensatedSum;
/// let mut sum = CompensatedSum::new();
/// for &x in &[1e16, 1.0, -1e16] {
///     sum.add(x);
/// }
/// assert_eq!(sum.value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    c: f64,
}

impl CompensatedSum {
    /// Creates a zero sum.
    pub fn new() -> Self {
        Self { sum: 0.0, c: 0.0 }
    }

    /// Adds `x` to the running sum.
    ///
    /// Once the sum is no longer finite the compensation is dropped, so an
    /// overflow reads as `±inf` rather than `NaN`.
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if !t.is_finite() {
            self.sum = t;
            self.c = 0.0;
            return;
        }
        if self.sum.abs() >= x.abs() {
            self.c += (self.sum - t) + x;
        } else {
            self.c += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Multiplies the running sum by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.sum *= factor;
        self.c *= factor;
    }

    /// Returns the compensated total.
    pub fn value(&self) -> f64 {
        self.sum + self.c
    }
}

// ---------------------------------------------------------------------------
// Log-sum-exp
// ---------------------------------------------------------------------------

/// Streaming `ln Σ exp(xᵢ)`.
///
/// Terms are kept relative to the largest exponent seen so far, so sums
/// like `Σ dᵢ^400` stay representable through [`LogSumExp::ln`] even when
/// the sum itself overflows or underflows `f64`.
///
/// # Examples
/// ```
/// use u_tendency::stats::LogSumExp;
/// let mut acc = LogSumExp::new();
/// acc.add(1000.0);
/// acc.add(1000.0);
/// assert!((acc.ln() - (1000.0 + 2f64.ln())).abs() < 1e-12);
/// assert_eq!(acc.value(), f64::INFINITY);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogSumExp {
    max: f64,
    scaled: CompensatedSum,
}

impl LogSumExp {
    /// Empty sum (`ln 0 = −inf`).
    pub fn new() -> Self {
        Self {
            max: f64::NEG_INFINITY,
            scaled: CompensatedSum::new(),
        }
    }

    /// Adds `exp(x)`. `x = −inf` adds zero.
    pub fn add(&mut self, x: f64) {
        debug_assert!(!x.is_nan(), "log-sum-exp term is NaN");
        if x == f64::NEG_INFINITY {
            return;
        }
        if x <= self.max {
            self.scaled.add((x - self.max).exp());
        } else {
            self.scaled.scale((self.max - x).exp());
            self.scaled.add(1.0);
            self.max = x;
        }
    }

    /// `ln` of the sum; `−inf` when nothing positive was added.
    pub fn ln(&self) -> f64 {
        if self.max == f64::NEG_INFINITY {
            f64::NEG_INFINITY
        } else {
            self.max + self.scaled.value().ln()
        }
    }

    /// The sum itself, saturating to `inf` or `0` outside the `f64` range.
    pub fn value(&self) -> f64 {
        if self.max == f64::NEG_INFINITY {
            0.0
        } else {
            self.max.exp() * self.scaled.value()
        }
    }
}

impl Default for LogSumExp {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for count, mean and sample variance.
///
/// Computes running statistics in a single pass with O(1) memory,
/// avoiding the catastrophic cancellation of `E[X²] − (E[X])²`.
///
/// # Examples
/// ```
/// use u_tendency::stats::RunningMoments;
/// let mut acc = RunningMoments::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunningMoments {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl RunningMoments {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean_acc: 0.0,
            m2: 0.0,
        }
    }

    /// Feeds a new sample into the accumulator.
    ///
    /// The first sample only initializes the mean, so a huge first value
    /// cannot overflow the squared-deviation sum.
    pub fn update(&mut self, value: f64) {
        let n1 = self.count;
        self.count += 1;

        if n1 == 0 {
            self.mean_acc = value;
            return;
        }

        let n = self.count as f64;
        let delta = value - self.mean_acc;
        let delta_n = delta / n;
        self.m2 += delta * delta_n * n1 as f64;
        self.mean_acc += delta_n;
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Returns the sample variance (n − 1 denominator), or `None` if fewer
    /// than 2 samples have been added.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }

    /// Returns the sample standard deviation, or `None` if fewer than 2
    /// samples have been added.
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    /// Merges another accumulator into this one.
    ///
    /// The result equals feeding both sample streams into one accumulator
    /// (up to rounding); sample variances are never summed directly.
    pub fn merge(&mut self, other: &RunningMoments) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let total = self.count + other.count;
        let n = total as f64;
        let delta = other.mean_acc - self.mean_acc;

        self.mean_acc += delta * (nb / n);
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count = total;
    }
}

impl Default for RunningMoments {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
