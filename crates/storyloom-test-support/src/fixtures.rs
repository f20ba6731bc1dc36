//! Deterministic time and randomness.

use chrono::{DateTime, Utc};
use storyloom_core::clock::Clock;
use storyloom_core::rng::DeterministicRng;

/// Clock frozen at the wrapped instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Always picks the lowest value, so the first character and the first
/// template alternative win.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// Replays scripted picks in order, clamped into each requested range.
///
/// Panics once the script runs out, which flags a test that consumed more
/// picks than it planned for.
#[derive(Debug)]
pub struct SequenceRng {
    picks: std::vec::IntoIter<u32>,
}

impl SequenceRng {
    #[must_use]
    pub fn new(picks: Vec<u32>) -> Self {
        Self {
            picks: picks.into_iter(),
        }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let Some(pick) = self.picks.next() else {
            panic!("SequenceRng script exhausted");
        };
        pick.clamp(min, max.max(min))
    }
}
