//! Test doubles for the Storyloom crates.

mod fixtures;
mod generator;

pub use fixtures::{FixedClock, MockRng, SequenceRng};
pub use generator::{DelayedGenerator, FailingGenerator, ScriptedGenerator, StalledGenerator};
