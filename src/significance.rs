//! Significance of a mean Hopkins statistic.
//!
//! Under uniform randomness, H over S real and S synthetic samples
//! follows Beta(S, S) (Hopkins & Skellam, 1954, *Annals of Botany*
//! 18(2)). The p-value is the tail on the side of 0.5 where the observed
//! mean lies, so deviations of equal size toward clustering (H → 1, real
//! points sit much closer to each other than random probes do) or toward
//! regular spacing (H → 0) map to the same p.

use crate::special::regularized_incomplete_beta;

/// One-sided significance of `mean_h` against Beta(S, S).
///
/// Returns `I_x(S, S)` for `x <= 0.5` and `1 − I_x(S, S)` above it. The
/// upper tail is evaluated as `I_{1−x}(S, S)`, which is the same value
/// without cancellation, so `p(x)` and `p(1 − x)` agree up to the
/// rounding of `1 − x`.
///
/// # Examples
/// ```
/// use u_tendency::significance::hopkins_p_value;
/// assert!((hopkins_p_value(0.5, 50) - 0.5).abs() < 1e-9);
/// assert!(hopkins_p_value(0.2, 50) < 1e-5);
/// assert!((hopkins_p_value(0.3, 20) - hopkins_p_value(0.7, 20)).abs() < 1e-12);
/// ```
pub fn hopkins_p_value(mean_h: f64, sample_size: usize) -> f64 {
    let s = sample_size as f64;
    let x = if mean_h > 0.5 { 1.0 - mean_h } else { mean_h };
    regularized_incomplete_beta(x, s, s)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn p_in_unit_interval(x in 0.0_f64..=1.0, s in 1_usize..3000) {
            let p = hopkins_p_value(x, s);
            prop_assert!((0.0..=1.0).contains(&p), "p({x}, {s}) = {p}");
        }

        #[test]
        fn p_symmetric(x in 0.0_f64..=1.0, s in 1_usize..3000) {
            let (a, b) = (hopkins_p_value(x, s), hopkins_p_value(1.0 - x, s));
            prop_assert!((a - b).abs() < 1e-10, "p({x}) = {a}, p(1-x) = {b}");
        }

        #[test]
        fn p_at_most_one_half(x in 0.0_f64..=1.0, s in 1_usize..500) {
            prop_assert!(hopkins_p_value(x, s) <= 0.5 + 1e-9);
        }
    }
}
