//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by an OS-seeded `StdRng`.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Create an RNG with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_u32_range_stays_within_bounds() {
        let mut rng = SystemRng::seeded(7);
        for _ in 0..200 {
            let value = rng.next_u32_range(3, 5);
            assert!((3..=5).contains(&value));
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut rng = SystemRng::seeded(7);
        assert_eq!(rng.next_u32_range(4, 4), 4);
        assert_eq!(rng.next_u32_range(9, 2), 9);
    }

    #[test]
    fn test_seeded_rngs_are_reproducible() {
        let mut a = SystemRng::seeded(42);
        let mut b = SystemRng::seeded(42);
        let xs: Vec<u32> = (0..10).map(|_| a.next_u32_range(0, 100)).collect();
        let ys: Vec<u32> = (0..10).map(|_| b.next_u32_range(0, 100)).collect();
        assert_eq!(xs, ys);
    }
}
