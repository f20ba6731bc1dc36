//! Engine tuning knobs.

use std::time::Duration;

/// Default per-turn token budget.
pub const DEFAULT_BUDGET: u32 = 60;

/// Budget for dialogue turns and for the story opening.
pub const ELEVATED_BUDGET: u32 = 120;

/// Default wall-clock deadline for a single generation call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(300);

/// Similarity above which the newest turn is discarded as a repeat.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;

/// Number of most recent turns included in each prompt.
pub const DEFAULT_MEMORY: usize = 20;

/// Configuration shared by every session the manager creates.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Budget used for ordinary turns.
    pub default_budget: u32,
    /// Budget used for dialogue turns and the story opening.
    pub elevated_budget: u32,
    /// Deadline applied to every generation call.
    pub deadline: Duration,
    /// Repetition threshold; a similarity strictly greater discards the turn.
    pub similarity_threshold: f64,
    /// How many recent turns are replayed into the prompt.
    pub memory: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_budget: DEFAULT_BUDGET,
            elevated_budget: ELEVATED_BUDGET,
            deadline: DEFAULT_DEADLINE,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            memory: DEFAULT_MEMORY,
        }
    }
}
