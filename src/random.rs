//! Random number generation and sampling without replacement.
//!
//! # Reproducibility
//!
//! Every repetition of the statistic draws from its own generator,
//! seeded with [`substream_seed`]`(base_seed, repetition)`. Repetitions
//! therefore never share generator state, which keeps a run reproducible
//! no matter whether repetitions execute in sequence or in parallel.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::Rng;
use rand::SeedableRng;

/// Generator type used for all sampling.
pub type TendencyRng = rand::rngs::SmallRng;

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_tendency::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> TendencyRng {
    TendencyRng::seed_from_u64(seed)
}

/// Draws a fresh base seed from operating-system entropy.
pub fn entropy_seed() -> u64 {
    rand::rng().random()
}

/// Derives the seed of substream `index` from `base_seed`.
///
/// Counter-based: the seed depends only on `(base_seed, index)`, never on
/// how many draws other substreams made.
///
/// # Algorithm
/// SplitMix64 finalizer applied to `base_seed + (index + 1) · γ`, with
/// γ = 0x9E37_79B9_7F4A_7C15 (the 64-bit golden ratio increment).
///
/// Reference: Steele, Lea & Flood (2014), "Fast Splittable Pseudorandom
/// Number Generators", OOPSLA.
///
/// # Examples
/// ```
/// use u_tendency::random::substream_seed;
/// assert_eq!(substream_seed(7, 3), substream_seed(7, 3));
/// assert_ne!(substream_seed(7, 3), substream_seed(7, 4));
/// ```
pub fn substream_seed(base_seed: u64, index: u64) -> u64 {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut z = base_seed.wrapping_add(index.wrapping_add(1).wrapping_mul(GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Draws `amount` distinct indices from `[0, n)` uniformly at random.
///
/// Every `amount`-subset is equally likely; the returned order is random
/// as well.
///
/// # Algorithm
/// Partial Fisher-Yates (Durstenfeld): only the first `amount` positions
/// of the index permutation are settled. Consumes exactly `amount`
/// generator draws.
///
/// Reference: Knuth (1997), *TAOCP* Vol. 2, §3.4.2, Algorithm P.
///
/// # Complexity
/// Time: O(n), Space: O(n)
///
/// # Returns
/// - `None` if `amount > n`.
///
/// # Examples
/// ```
/// use u_tendency::random::{create_rng, sample_indices};
/// let mut rng = create_rng(42);
/// let mut picked = sample_indices(10, 4, &mut rng).unwrap();
/// assert_eq!(picked.len(), 4);
/// picked.sort();
/// picked.dedup();
/// assert_eq!(picked.len(), 4);
/// assert!(sample_indices(3, 4, &mut rng).is_none());
/// ```
pub fn sample_indices<R: Rng>(n: usize, amount: usize, rng: &mut R) -> Option<Vec<usize>> {
    if amount > n {
        return None;
    }
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..amount {
        let j = rng.random_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(amount);
    Some(indices)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);
        let vals1: Vec<f64> = (0..10).map(|_| rng1.random()).collect();
        let vals2: Vec<f64> = (0..10).map(|_| rng2.random()).collect();
        assert_eq!(vals1, vals2);
    }

    #[test]
    fn test_substream_seeds_distinct() {
        let seeds: Vec<u64> = (0..1000).map(|i| substream_seed(42, i)).collect();
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), seeds.len());
    }

    #[test]
    fn test_substream_seed_depends_on_base() {
        assert_ne!(substream_seed(1, 0), substream_seed(2, 0));
    }

    #[test]
    fn test_sample_indices_full() {
        let mut rng = create_rng(7);
        let mut all = sample_indices(10, 10, &mut rng).unwrap();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_sample_indices_zero() {
        let mut rng = create_rng(7);
        assert_eq!(sample_indices(5, 0, &mut rng), Some(vec![]));
        assert_eq!(sample_indices(0, 0, &mut rng), Some(vec![]));
    }

    #[test]
    fn test_sample_indices_too_many() {
        let mut rng = create_rng(7);
        assert_eq!(sample_indices(2, 3, &mut rng), None);
    }

    #[test]
    fn test_sample_indices_deterministic() {
        let a = sample_indices(100, 20, &mut create_rng(9)).unwrap();
        let b = sample_indices(100, 20, &mut create_rng(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_indices_roughly_uniform() {
        // Each of 10 indices should be picked in ~30% of 3-draws.
        let mut rng = create_rng(123);
        let mut counts = [0u32; 10];
        let trials = 20_000;
        for _ in 0..trials {
            for i in sample_indices(10, 3, &mut rng).unwrap() {
                counts[i] += 1;
            }
        }
        for (i, &c) in counts.iter().enumerate() {
            let frac = c as f64 / trials as f64;
            assert!((frac - 0.3).abs() < 0.03, "index {i} picked {frac}");
        }
    }
}
