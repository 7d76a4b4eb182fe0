//! # Signal Generator
//!
//! Synthetic telemetry produced as a bounded random walk.
//!
//! Windowed channels move by a uniformly chosen integer offset in `-R..=R`
//! from their previous sample, which gives smooth but time-varying traces.
//! Composite entries are redrawn from scratch every tick.
//!
//! ## Usage
//!
//! ```
//! use gcs_telemetry::telemetry::generator::next_value;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let next = next_value(&mut rng, 30.0, 5);
//! assert!((25.0..=35.0).contains(&next));
//! assert_eq!(next.fract(), 0.0);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::source::SampleSource;
use crate::error::Result;

/// Default per-tick step bound (R).
pub const DEFAULT_STEP_BOUND: u32 = 5;

/// Default upper bound for composite values (percent).
pub const DEFAULT_FRESH_MAX: f64 = 100.0;

/// Returns `previous + k` where `k` is uniform over the `2 * bound + 1`
/// integers in `-bound..=bound`.
///
/// `previous` must be finite.
pub fn next_value<R: Rng + ?Sized>(rng: &mut R, previous: f64, bound: u32) -> f64 {
    let bound = i64::from(bound);
    let offset = rng.gen_range(-bound..=bound);
    previous + offset as f64
}

/// Returns a value uniform over `[0, max)`. Non-positive `max` yields 0.
pub fn fresh_value<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    rng.gen_range(0.0..max)
}

/// Random-walk [`SampleSource`] backed by a [`StdRng`].
///
/// Seed it for reproducible runs; production use draws from OS entropy.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    rng: StdRng,
}

impl RandomWalk {
    /// Creates a generator seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use gcs_telemetry::telemetry::generator::RandomWalk;
    /// use gcs_telemetry::telemetry::source::SampleSource;
    ///
    /// let mut a = RandomWalk::seeded(42);
    /// let mut b = RandomWalk::seeded(42);
    /// assert_eq!(
    ///     a.next_value("temperature", 30.0, 5)?,
    ///     b.next_value("temperature", 30.0, 5)?,
    /// );
    /// # Ok::<(), gcs_telemetry::error::GcsError>(())
    /// ```
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl SampleSource for RandomWalk {
    fn next_value(&mut self, _channel: &str, previous: f64, bound: u32) -> Result<f64> {
        Ok(next_value(&mut self.rng, previous, bound))
    }

    fn fresh_value(&mut self, _channel: &str, max: f64) -> Result<f64> {
        Ok(fresh_value(&mut self.rng, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_next_value_stays_within_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let s = next_value(&mut rng, 1100.0, 5);
            assert!((1095.0..=1105.0).contains(&s), "sample {} escaped bound", s);
        }
    }

    #[test]
    fn test_next_value_is_integer_for_integer_input() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1_000 {
            let s = next_value(&mut rng, 76.0, 5);
            assert_eq!(s.fract(), 0.0, "sample {} is not an integer", s);
        }
    }

    #[test]
    fn test_next_value_covers_all_offsets() {
        let mut rng = StdRng::seed_from_u64(3);
        let seen: HashSet<i64> = (0..5_000)
            .map(|_| next_value(&mut rng, 0.0, 3) as i64)
            .collect();
        assert_eq!(seen.len(), 7, "bound 3 should produce 2*3+1 distinct offsets");
        assert!(seen.contains(&-3));
        assert!(seen.contains(&3));
    }

    #[test]
    fn test_next_value_zero_bound_is_constant() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            assert_eq!(next_value(&mut rng, 30.0, 0), 30.0);
        }
    }

    #[test]
    fn test_next_value_keeps_fractional_part() {
        let mut rng = StdRng::seed_from_u64(5);
        let s = next_value(&mut rng, 10.5, 2);
        assert_eq!(s.fract(), 0.5);
        assert!((8.5..=12.5).contains(&s));
    }

    #[test]
    fn test_fresh_value_range() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..10_000 {
            let v = fresh_value(&mut rng, 100.0);
            assert!((0.0..100.0).contains(&v), "value {} out of [0, 100)", v);
        }
    }

    #[test]
    fn test_fresh_value_non_positive_max() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(fresh_value(&mut rng, 0.0), 0.0);
        assert_eq!(fresh_value(&mut rng, -5.0), 0.0);
    }

    #[test]
    fn test_seeded_generators_are_deterministic() {
        let mut a = RandomWalk::seeded(99);
        let mut b = RandomWalk::seeded(99);

        let mut prev_a = 30.0;
        let mut prev_b = 30.0;
        for _ in 0..200 {
            prev_a = a.next_value("temperature", prev_a, 5).unwrap();
            prev_b = b.next_value("temperature", prev_b, 5).unwrap();
            assert_eq!(prev_a, prev_b);
            assert_eq!(
                a.fresh_value("copper", 100.0).unwrap(),
                b.fresh_value("copper", 100.0).unwrap()
            );
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = RandomWalk::seeded(1);
        let mut b = RandomWalk::seeded(2);
        let seq_a: Vec<f64> = (0..50).map(|_| a.fresh_value("x", 100.0).unwrap()).collect();
        let seq_b: Vec<f64> = (0..50).map(|_| b.fresh_value("x", 100.0).unwrap()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_new_with_seed_matches_seeded() {
        let mut a = RandomWalk::new(Some(11));
        let mut b = RandomWalk::seeded(11);
        assert_eq!(
            a.next_value("altitude", 1100.0, 5).unwrap(),
            b.next_value("altitude", 1100.0, 5).unwrap()
        );
    }
}
