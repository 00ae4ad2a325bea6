//! Special mathematical functions.
//!
//! Log-gamma, log-beta and the regularized incomplete beta function used
//! to turn a mean Hopkins statistic into a significance value.

/// Lanczos approximation of ln Γ(x).
///
/// Reference: Lanczos (1964), "A Precision Approximation of the Gamma
/// Function", *SIAM Journal on Numerical Analysis* 1(1).
///
/// # Accuracy
/// Relative error < 2 × 10⁻¹⁰ for x > 0.
///
/// # Examples
/// ```
/// use u_tendency::special::ln_gamma;
/// // Γ(5) = 24
/// assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
/// ```
pub fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &c) in COEFFICIENTS[1..].iter().enumerate() {
        sum += c / (x + i as f64 + 1.0);
    }

    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Log of the Beta function: `ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a+b)`.
///
/// # Examples
/// ```
/// use u_tendency::special::ln_beta;
/// // B(1,1) = 1, so ln B(1,1) = 0
/// assert!(ln_beta(1.0, 1.0).abs() < 1e-10);
/// ```
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

// ============================================================================
// Regularized Incomplete Beta Function
// ============================================================================

/// Regularized incomplete beta function I_x(a, b).
///
/// # Definition
/// ```text
/// I_x(a, b) = B(x; a, b) / B(a, b)
/// ```
/// where B(x; a, b) is the incomplete beta function.
///
/// # Algorithm
/// Continued fraction representation (modified Lentz) with the symmetry
/// relation `I_x(a,b) = 1 − I_{1−x}(b,a)` so the fraction is always
/// evaluated on the side where it converges quickly. The prefactor
/// `x^a (1−x)^b / B(a,b)` is formed in log space, which keeps shape
/// parameters in the thousands from overflowing.
///
/// Reference: Press et al. (2007), *Numerical Recipes*, 3rd ed., §6.4.
///
/// # Returns
/// - `0.0` for `x <= 0`, `1.0` for `x >= 1`.
/// - `NaN` if any argument is NaN.
///
/// # Examples
/// ```
/// use u_tendency::special::regularized_incomplete_beta;
/// // I_0(a,b) = 0, I_1(a,b) = 1
/// assert_eq!(regularized_incomplete_beta(0.0, 2.0, 3.0), 0.0);
/// assert_eq!(regularized_incomplete_beta(1.0, 2.0, 3.0), 1.0);
/// // I_0.5(1,1) = 0.5 (uniform)
/// assert!((regularized_incomplete_beta(0.5, 1.0, 1.0) - 0.5).abs() < 1e-10);
/// ```
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - incomplete_beta_lower(1.0 - x, b, a);
    }
    incomplete_beta_lower(x, a, b)
}

/// Complement `1 − I_x(a, b)`, computed as `I_{1−x}(b, a)`.
///
/// Avoids the cancellation of `1.0 - regularized_incomplete_beta(..)`
/// when the upper tail is tiny.
///
/// # Examples
/// ```
/// use u_tendency::special::{regularized_incomplete_beta, regularized_incomplete_beta_complement};
/// let upper = regularized_incomplete_beta_complement(0.3, 2.0, 5.0);
/// let lower = regularized_incomplete_beta(0.3, 2.0, 5.0);
/// assert!((upper + lower - 1.0).abs() < 1e-10);
/// ```
pub fn regularized_incomplete_beta_complement(x: f64, a: f64, b: f64) -> f64 {
    regularized_incomplete_beta(1.0 - x, b, a)
}

/// I_x(a, b) evaluated directly from the continued fraction.
///
/// Only accurate for `x <= (a+1)/(a+b+2)`.
fn incomplete_beta_lower(x: f64, a: f64, b: f64) -> f64 {
    let ln_prefix = a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b);
    let cf = beta_cf(x, a, b);
    (ln_prefix.exp() / a) * cf
}

/// Continued fraction for the incomplete beta function (Lentz's algorithm).
///
/// Convergence takes O(√max(a, b)) iterations, so the cap grows with the
/// shape parameters.
fn beta_cf(x: f64, a: f64, b: f64) -> f64 {
    const BASE_ITER: usize = 200;
    const EPS: f64 = 1e-14;
    const TINY: f64 = 1e-300;

    let max_iter = BASE_ITER + (10.0 * a.max(b).sqrt()) as usize;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - (a + b) * x / (a + 1.0));
    let mut h = d;

    for m in 1..=max_iter {
        let m_f = m as f64;
        let num_even = m_f * (b - m_f) * x / ((a + 2.0 * m_f - 1.0) * (a + 2.0 * m_f));
        d = 1.0 / guard(1.0 + num_even * d);
        c = guard(1.0 + num_even / c);
        h *= d * c;

        let num_odd =
            -(a + m_f) * (a + b + m_f) * x / ((a + 2.0 * m_f) * (a + 2.0 * m_f + 1.0));
        d = 1.0 / guard(1.0 + num_odd * d);
        c = guard(1.0 + num_odd / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_factorials() {
        // Γ(n) = (n-1)!
        let mut fact = 1.0_f64;
        for n in 1..15 {
            if n > 1 {
                fact *= (n - 1) as f64;
            }
            let lg = ln_gamma(n as f64);
            assert!(
                (lg - fact.ln()).abs() < 1e-9,
                "ln Γ({n}) = {lg}, expected {}",
                fact.ln()
            );
        }
    }

    #[test]
    fn test_ln_gamma_half() {
        let expected = std::f64::consts::PI.sqrt().ln();
        assert!((ln_gamma(0.5) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_ln_beta_symmetric() {
        assert!((ln_beta(2.5, 7.0) - ln_beta(7.0, 2.5)).abs() < 1e-12);
        // B(2,3) = 1/12
        assert!((ln_beta(2.0, 3.0) - (1.0_f64 / 12.0).ln()).abs() < 1e-10);
    }

    #[test]
    fn test_inc_beta_boundaries() {
        assert_eq!(regularized_incomplete_beta(-0.1, 3.0, 3.0), 0.0);
        assert_eq!(regularized_incomplete_beta(1.5, 3.0, 3.0), 1.0);
        assert!(regularized_incomplete_beta(f64::NAN, 3.0, 3.0).is_nan());
    }

    #[test]
    fn test_inc_beta_known_values() {
        // I_x(1,1) = x
        for &x in &[0.1, 0.25, 0.6, 0.9] {
            assert!((regularized_incomplete_beta(x, 1.0, 1.0) - x).abs() < 1e-10);
        }
        // I_x(2,2) = 3x² − 2x³
        for &x in &[0.1, 0.3, 0.7] {
            let expected = 3.0 * x * x - 2.0 * x * x * x;
            let got = regularized_incomplete_beta(x, 2.0, 2.0);
            assert!((got - expected).abs() < 1e-10, "I_{x}(2,2) = {got}");
        }
        // I_x(a,1) = x^a
        assert!((regularized_incomplete_beta(0.4, 3.0, 1.0) - 0.064).abs() < 1e-10);
    }

    #[test]
    fn test_inc_beta_symmetric_shapes_at_half() {
        for &s in &[1.0, 5.0, 50.0, 500.0, 5000.0] {
            let v = regularized_incomplete_beta(0.5, s, s);
            assert!((v - 0.5).abs() < 1e-8, "I_0.5({s},{s}) = {v}");
        }
    }

    #[test]
    fn test_inc_beta_large_shapes_tail() {
        // Beta(1000, 1000) has sd ≈ 0.0112; x = 0.45 is ~4.5 sd below the mean
        let v = regularized_incomplete_beta(0.45, 1000.0, 1000.0);
        assert!(v > 0.0 && v < 1e-4, "tail = {v}");
        let upper = regularized_incomplete_beta_complement(0.55, 1000.0, 1000.0);
        assert!((upper - v).abs() < 1e-12 * v.max(1e-300) + 1e-15);
    }

    #[test]
    fn test_inc_beta_large_shapes_monotone() {
        let xs = [0.40, 0.45, 0.48, 0.50, 0.52, 0.55, 0.60];
        let vals: Vec<f64> = xs
            .iter()
            .map(|&x| regularized_incomplete_beta(x, 2000.0, 2000.0))
            .collect();
        for w in vals.windows(2) {
            assert!(w[0] <= w[1], "not monotone: {vals:?}");
        }
    }

    #[test]
    fn test_complement_avoids_cancellation() {
        let upper = regularized_incomplete_beta_complement(0.7, 200.0, 200.0);
        assert!(upper > 0.0, "upper tail underflowed to {upper}");
        assert!(upper < 1e-10);
    }
}
